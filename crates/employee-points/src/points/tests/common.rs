use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDateTime;
use serde_json::Value;

use crate::points::domain::{
    Application, ApplicationId, Employee, NewApplication, NewEmployee, NewPeriod,
    NewPoint, Period, Point, PointDraft,
};
use crate::points::evaluation::TieBreaker;
use crate::points::memory::InMemoryEntityStore;
use crate::points::store::{EntityStore, PointFilter, StoreError};
use crate::points::{ledger_router, PointsLedgerService};

pub(super) const APPLICATION: &str = "Billing";

pub(super) fn ts(raw: &str) -> NaiveDateTime {
    crate::points::timestamp::parse_timestamp(raw).expect("valid timestamp")
}

/// Tie-breaker that replays a scripted list of picks and records the candidate counts.
#[derive(Default)]
pub(super) struct ScriptedTieBreaker {
    picks: Mutex<Vec<usize>>,
    seen: Mutex<Vec<usize>>,
}

impl ScriptedTieBreaker {
    pub(super) fn new(picks: Vec<usize>) -> Self {
        Self {
            picks: Mutex::new(picks),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn seen(&self) -> Vec<usize> {
        self.seen.lock().expect("tie-break mutex poisoned").clone()
    }
}

impl TieBreaker for ScriptedTieBreaker {
    fn pick(&self, candidates: usize) -> usize {
        self.seen
            .lock()
            .expect("tie-break mutex poisoned")
            .push(candidates);
        let mut picks = self.picks.lock().expect("tie-break mutex poisoned");
        if picks.is_empty() {
            0
        } else {
            picks.remove(0)
        }
    }
}

pub(super) type TestService = PointsLedgerService<InMemoryEntityStore, Arc<ScriptedTieBreaker>>;

pub(super) fn build_service(
    picks: Vec<usize>,
) -> (TestService, Arc<InMemoryEntityStore>, Arc<ScriptedTieBreaker>) {
    let store = Arc::new(InMemoryEntityStore::new());
    let tie_breaker = Arc::new(ScriptedTieBreaker::new(picks));
    let service = PointsLedgerService::new(store.clone(), tie_breaker.clone());
    (service, store, tie_breaker)
}

pub(super) fn add_employees<S, T>(service: &PointsLedgerService<S, T>, names: &[&str])
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    for name in names {
        service
            .add_employee(NewEmployee {
                name: name.to_string(),
                active: true,
            })
            .expect("employee added");
    }
}

pub(super) fn add_application<S, T>(service: &PointsLedgerService<S, T>)
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    service
        .add_application(NewApplication {
            name: APPLICATION.to_string(),
        })
        .expect("application added");
}

pub(super) fn march() -> NewPeriod {
    NewPeriod {
        periodname: "March".to_string(),
        startdate: ts("2024-03-01"),
        enddate: ts("2024-03-31"),
    }
}

pub(super) fn new_point(employee: &str, earned: &str) -> NewPoint {
    NewPoint {
        date_earned: ts(earned),
        employee_name: employee.to_string(),
        application_name: APPLICATION.to_string(),
        description: format!("fixed bug for {employee}"),
        prod_env: false,
    }
}

pub(super) fn award<S, T>(service: &PointsLedgerService<S, T>, employee: &str, earned: &[&str])
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    for date in earned {
        service
            .add_point(new_point(employee, date))
            .expect("point accepted");
    }
}

/// Alice and Bob, one application, and the March period.
pub(super) fn seeded_service(picks: Vec<usize>) -> (TestService, Arc<ScriptedTieBreaker>) {
    let (service, _store, tie_breaker) = build_service(picks);
    add_employees(&service, &["Alice", "Bob"]);
    add_application(&service);
    service.add_period(march()).expect("period added");
    (service, tie_breaker)
}

pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("database offline".to_string()))
}

impl EntityStore for UnavailableStore {
    fn insert_employee(&self, _employee: NewEmployee) -> Result<Employee, StoreError> {
        offline()
    }

    fn update_employee(&self, _employee: Employee) -> Result<(), StoreError> {
        offline()
    }

    fn employee_by_name(&self, _name: &str) -> Result<Option<Employee>, StoreError> {
        offline()
    }

    fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        offline()
    }

    fn insert_application(
        &self,
        _application: NewApplication,
    ) -> Result<Application, StoreError> {
        offline()
    }

    fn application_by_name(&self, _name: &str) -> Result<Option<Application>, StoreError> {
        offline()
    }

    fn applications(&self) -> Result<Vec<Application>, StoreError> {
        offline()
    }

    fn remove_application(&self, _id: &ApplicationId) -> Result<Application, StoreError> {
        offline()
    }

    fn insert_point(&self, _point: PointDraft) -> Result<Point, StoreError> {
        offline()
    }

    fn points(&self, _filter: &PointFilter) -> Result<Vec<Point>, StoreError> {
        offline()
    }

    fn insert_period(&self, _period: NewPeriod) -> Result<Period, StoreError> {
        offline()
    }

    fn period_by_name(&self, _name: &str) -> Result<Option<Period>, StoreError> {
        offline()
    }

    fn periods(&self) -> Result<Vec<Period>, StoreError> {
        offline()
    }

    fn update_period(&self, _period: Period) -> Result<(), StoreError> {
        offline()
    }
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    ledger_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
