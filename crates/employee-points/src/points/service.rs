use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    Application, Employee, NewApplication, NewEmployee, NewPeriod, NewPoint, Period, PeriodId,
    Point, PointDraft,
};
use super::eligibility::{check_eligible, EligibilityViolation};
use super::evaluation::{
    ConfiguredTieBreaker, EvaluationError, EvaluationOutcome, PeriodEvaluator, TieBreaker,
};
use super::store::{EntityStore, PointFilter, StoreError};
use super::tally::{count_points, count_points_for_all, points_in_range, DateRange, EmployeeTally};
use super::views::NameDirectory;
use crate::config::LedgerConfig;

/// Service composing the store, eligibility guard, aggregator and period evaluator.
pub struct PointsLedgerService<S, T> {
    store: Arc<S>,
    evaluator: PeriodEvaluator<T>,
    period_locks: PeriodLocks,
}

impl<S> PointsLedgerService<S, ConfiguredTieBreaker>
where
    S: EntityStore + 'static,
{
    pub fn from_config(store: Arc<S>, config: &LedgerConfig) -> Self {
        Self::new(store, ConfiguredTieBreaker::from_seed(config.tie_break_seed))
    }
}

impl<S, T> PointsLedgerService<S, T>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    pub fn new(store: Arc<S>, tie_breaker: T) -> Self {
        Self {
            store,
            evaluator: PeriodEvaluator::new(tie_breaker),
            period_locks: PeriodLocks::default(),
        }
    }

    pub fn add_employee(&self, employee: NewEmployee) -> Result<Employee, LedgerError> {
        require_name("employee", &employee.name)?;
        let stored = self.store.insert_employee(employee)?;
        info!(employee = %stored.name, "employee added");
        Ok(stored)
    }

    /// Flip the `active` flag. Employees are never removed.
    pub fn set_employee_active(&self, name: &str, active: bool) -> Result<Employee, LedgerError> {
        let mut employee = self.employee_named(name)?;
        employee.active = active;
        self.store.update_employee(employee.clone())?;
        info!(employee = %employee.name, active, "employee activity updated");
        Ok(employee)
    }

    pub fn employees(&self) -> Result<Vec<Employee>, LedgerError> {
        Ok(self.store.employees()?)
    }

    pub fn add_application(&self, application: NewApplication) -> Result<Application, LedgerError> {
        require_name("application", &application.name)?;
        let stored = self.store.insert_application(application)?;
        info!(application = %stored.name, "application added");
        Ok(stored)
    }

    pub fn applications(&self) -> Result<Vec<Application>, LedgerError> {
        Ok(self.store.applications()?)
    }

    /// Remove an application that no point refers to.
    pub fn remove_application(&self, name: &str) -> Result<Application, LedgerError> {
        let application = self
            .store
            .application_by_name(name)?
            .ok_or_else(|| LedgerError::not_found("application", name))?;

        let references = self
            .store
            .count_points(&PointFilter::for_application(application.id.clone()))?;
        if references > 0 {
            return Err(LedgerError::Referenced {
                entity: "application",
                name: application.name,
                references,
            });
        }

        let removed = self.store.remove_application(&application.id)?;
        info!(application = %removed.name, "application removed");
        Ok(removed)
    }

    /// Resolve references, run the eligibility guard and store the point.
    pub fn add_point(&self, point: NewPoint) -> Result<Point, LedgerError> {
        let employee = self.employee_named(&point.employee_name)?;
        let application = self
            .store
            .application_by_name(&point.application_name)?
            .ok_or_else(|| LedgerError::not_found("application", &point.application_name))?;

        let periods = self.store.periods()?;
        if let Err(violation) = check_eligible(point.date_earned, &periods) {
            warn!(
                employee = %employee.name,
                date_earned = %point.date_earned,
                %violation,
                "point rejected"
            );
            return Err(violation.into());
        }

        let stored = self.store.insert_point(PointDraft {
            date_added: now(),
            date_earned: point.date_earned,
            employee: employee.id,
            application: application.id,
            description: point.description,
            prod_env: point.prod_env,
        })?;
        info!(
            employee = %employee.name,
            application = %application.name,
            date_earned = %stored.date_earned,
            "point added"
        );
        Ok(stored)
    }

    pub fn points(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<Vec<Point>, LedgerError> {
        let range = DateRange::resolve(from, to, now());
        Ok(points_in_range(self.store.as_ref(), range)?)
    }

    pub fn employee_total(
        &self,
        name: &str,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<EmployeeTotal, LedgerError> {
        let range = DateRange::resolve(from, to, now());
        let employee = self.employee_named(name)?;
        let total = count_points(self.store.as_ref(), &employee, range)?;
        Ok(EmployeeTotal {
            range,
            employee,
            total,
        })
    }

    pub fn all_totals(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<RangeTotals, LedgerError> {
        let range = DateRange::resolve(from, to, now());
        let totals = count_points_for_all(self.store.as_ref(), range)?;
        Ok(RangeTotals { range, totals })
    }

    pub fn add_period(&self, period: NewPeriod) -> Result<Period, LedgerError> {
        require_name("period", &period.periodname)?;
        if period.startdate >= period.enddate {
            return Err(LedgerError::InvalidPeriod {
                period: period.periodname,
            });
        }
        let stored = self.store.insert_period(period)?;
        info!(
            period = %stored.periodname,
            start = %stored.startdate,
            end = %stored.enddate,
            "period added"
        );
        Ok(stored)
    }

    pub fn periods(&self) -> Result<Vec<Period>, LedgerError> {
        Ok(self.store.periods()?)
    }

    /// Evaluate the named period. Calls for the same period are serialized so only
    /// one of several racing evaluations can succeed.
    pub fn evaluate_period(&self, name: &str) -> Result<EvaluationOutcome, LedgerError> {
        let lock = self.period_locks.lock_for(&self.period_named(name)?.id)?;
        let _held = lock
            .lock()
            .map_err(|_| StoreError::Unavailable("period lock poisoned".to_string()))?;

        // Re-read under the lock so a racing transition is observed.
        let mut period = self.period_named(name)?;
        let outcome = self.evaluator.evaluate(self.store.as_ref(), &mut period)?;
        self.store.update_period(period)?;

        info!(
            period = %outcome.period.periodname,
            winner = %outcome.winner.name,
            top_count = outcome.top_count,
            tied = outcome.tied,
            state = outcome.period.state().label(),
            "period evaluated"
        );
        Ok(outcome)
    }

    pub fn unevaluate_period(&self, name: &str) -> Result<Period, LedgerError> {
        let lock = self.period_locks.lock_for(&self.period_named(name)?.id)?;
        let _held = lock
            .lock()
            .map_err(|_| StoreError::Unavailable("period lock poisoned".to_string()))?;

        let mut period = self.period_named(name)?;
        self.evaluator.revert(&mut period)?;
        self.store.update_period(period.clone())?;

        info!(
            period = %period.periodname,
            state = period.state().label(),
            "period unevaluated"
        );
        Ok(period)
    }

    /// Snapshot of display names for building views.
    pub fn directory(&self) -> Result<NameDirectory, LedgerError> {
        Ok(NameDirectory::new(
            &self.store.employees()?,
            &self.store.applications()?,
        ))
    }

    #[cfg(test)]
    pub(crate) fn locked_period_count(&self) -> usize {
        self.period_locks.len()
    }

    fn employee_named(&self, name: &str) -> Result<Employee, LedgerError> {
        self.store
            .employee_by_name(name)?
            .ok_or_else(|| LedgerError::not_found("employee", name))
    }

    fn period_named(&self, name: &str) -> Result<Period, LedgerError> {
        self.store
            .period_by_name(name)?
            .ok_or_else(|| LedgerError::not_found("period", name))
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn require_name(entity: &'static str, name: &str) -> Result<(), LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::BlankName { entity });
    }
    Ok(())
}

/// One mutex per stored period, created on first use. Only ids of periods that
/// exist are ever inserted, so the table is bounded by the period collection.
#[derive(Default)]
struct PeriodLocks {
    locks: Mutex<HashMap<PeriodId, Arc<Mutex<()>>>>,
}

impl PeriodLocks {
    fn lock_for(&self, period: &PeriodId) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut guard = self
            .locks
            .lock()
            .map_err(|_| StoreError::Unavailable("period lock table poisoned".to_string()))?;
        Ok(guard.entry(period.clone()).or_default().clone())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|guard| guard.len()).unwrap_or_default()
    }
}

/// Total for a single employee over a resolved range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeTotal {
    pub range: DateRange,
    pub employee: Employee,
    pub total: usize,
}

/// Totals for every employee over a resolved range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTotals {
    pub range: DateRange,
    pub totals: Vec<EmployeeTally>,
}

/// Boundary classification for ledger errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    DuplicateKey,
    InvalidInput,
    Unavailable,
}

/// Error raised by the ledger service.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("could not find {entity} named '{name}'")]
    NotFound { entity: &'static str, name: String },
    #[error("{entity} '{name}' is still referenced by {references} point(s)")]
    Referenced {
        entity: &'static str,
        name: String,
        references: usize,
    },
    #[error("period '{period}' must start before it ends")]
    InvalidPeriod { period: String },
    #[error("{entity} name must not be blank")]
    BlankName { entity: &'static str },
    #[error(transparent)]
    Eligibility(#[from] EligibilityViolation),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    fn not_found(entity: &'static str, name: &str) -> Self {
        Self::NotFound {
            entity,
            name: name.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::Referenced { .. } | LedgerError::Eligibility(_) => ErrorKind::Conflict,
            LedgerError::InvalidPeriod { .. } | LedgerError::BlankName { .. } => {
                ErrorKind::InvalidInput
            }
            LedgerError::Evaluation(EvaluationError::Store(err)) | LedgerError::Store(err) => {
                store_kind(err)
            }
            LedgerError::Evaluation(_) => ErrorKind::Conflict,
        }
    }
}

fn store_kind(err: &StoreError) -> ErrorKind {
    match err {
        StoreError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
        StoreError::NotFound(_) => ErrorKind::NotFound,
        StoreError::Unavailable(_) => ErrorKind::Unavailable,
    }
}
