use chrono::NaiveDateTime;
use employee_points::config::LedgerConfig;
use employee_points::points::timestamp::parse_timestamp;
use employee_points::points::{ConfiguredTieBreaker, InMemoryEntityStore, PointsLedgerService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Ledger = PointsLedgerService<InMemoryEntityStore, ConfiguredTieBreaker>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Ledger backed by a fresh process-local store.
pub(crate) fn in_memory_ledger(config: &LedgerConfig) -> Ledger {
    PointsLedgerService::from_config(Arc::new(InMemoryEntityStore::new()), config)
}

pub(crate) fn parse_cli_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw)
}
