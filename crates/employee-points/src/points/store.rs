use super::domain::{
    Application, ApplicationId, Employee, EmployeeId, NewApplication, NewEmployee, NewPeriod,
    Period, Point, PointDraft,
};
use super::tally::DateRange;

/// Storage abstraction so the ledger can be exercised against any backend.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for store
/// failures and constraint violations. Collections iterate in insertion order.
pub trait EntityStore: Send + Sync {
    fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, StoreError>;
    fn update_employee(&self, employee: Employee) -> Result<(), StoreError>;
    fn employee_by_name(&self, name: &str) -> Result<Option<Employee>, StoreError>;
    fn employees(&self) -> Result<Vec<Employee>, StoreError>;

    fn insert_application(&self, application: NewApplication)
        -> Result<Application, StoreError>;
    fn application_by_name(&self, name: &str) -> Result<Option<Application>, StoreError>;
    fn applications(&self) -> Result<Vec<Application>, StoreError>;
    fn remove_application(&self, id: &ApplicationId) -> Result<Application, StoreError>;

    fn insert_point(&self, point: PointDraft) -> Result<Point, StoreError>;
    fn points(&self, filter: &PointFilter) -> Result<Vec<Point>, StoreError>;
    fn count_points(&self, filter: &PointFilter) -> Result<usize, StoreError> {
        Ok(self.points(filter)?.len())
    }

    fn insert_period(&self, period: NewPeriod) -> Result<Period, StoreError>;
    fn period_by_name(&self, name: &str) -> Result<Option<Period>, StoreError>;
    fn periods(&self) -> Result<Vec<Period>, StoreError>;
    fn update_period(&self, period: Period) -> Result<(), StoreError>;
}

/// Predicate over the indexed point fields. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointFilter {
    pub employee: Option<EmployeeId>,
    pub application: Option<ApplicationId>,
    pub earned: Option<DateRange>,
}

impl PointFilter {
    pub fn for_employee(employee: EmployeeId, earned: DateRange) -> Self {
        Self {
            employee: Some(employee),
            application: None,
            earned: Some(earned),
        }
    }

    pub fn for_application(application: ApplicationId) -> Self {
        Self {
            application: Some(application),
            ..Self::default()
        }
    }

    pub fn earned_within(earned: DateRange) -> Self {
        Self {
            earned: Some(earned),
            ..Self::default()
        }
    }

    pub fn matches(&self, point: &Point) -> bool {
        self.employee
            .as_ref()
            .map_or(true, |employee| &point.employee == employee)
            && self
                .application
                .as_ref()
                .map_or(true, |application| &point.application == application)
            && self
                .earned
                .as_ref()
                .map_or(true, |range| range.contains(point.date_earned))
    }
}

/// Collections the store manages, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Employees,
    Applications,
    Periods,
}

impl Collection {
    pub const fn label(self) -> &'static str {
        match self {
            Collection::Employees => "employees",
            Collection::Applications => "applications",
            Collection::Periods => "periods",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{collection} already contains '{key}'")]
    DuplicateKey { collection: Collection, key: String },
    #[error("record not found in {0}")]
    NotFound(Collection),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
