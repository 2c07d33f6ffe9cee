//! Point ledger: entity store, eligibility guard, aggregator and period evaluator,
//! composed by [`PointsLedgerService`] and exposed over HTTP by [`ledger_router`].

pub mod domain;
pub mod eligibility;
pub mod evaluation;
pub mod memory;
pub mod router;
pub mod service;
pub mod store;
pub mod tally;
pub mod timestamp;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, Employee, EmployeeId, NewApplication, NewEmployee, NewPeriod,
    NewPoint, Period, PeriodId, PeriodState, Point, PointId,
};
pub use eligibility::{check_eligible, EligibilityViolation};
pub use evaluation::{
    ConfiguredTieBreaker, EvaluationError, EvaluationOutcome, PeriodEvaluator, SeededTieBreaker,
    TieBreaker, UniformTieBreaker,
};
pub use memory::InMemoryEntityStore;
pub use router::ledger_router;
pub use service::{EmployeeTotal, ErrorKind, LedgerError, PointsLedgerService, RangeTotals};
pub use store::{Collection, EntityStore, PointFilter, StoreError};
pub use tally::{count_points, count_points_for_all, DateRange, EmployeeTally};
