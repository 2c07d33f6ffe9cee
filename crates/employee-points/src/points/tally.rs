use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::domain::{Employee, Point};
use super::store::{EntityStore, PointFilter, StoreError};

/// Closed interval `[from, to]` over `date_earned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    /// Earliest instant an open-ended range reaches back to.
    pub fn epoch() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1900, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// Fill in missing endpoints independently: `from` falls back to the epoch,
    /// `to` falls back to `now`.
    pub fn resolve(
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            from: from.unwrap_or_else(Self::epoch),
            to: to.unwrap_or(now),
        }
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.from && timestamp <= self.to
    }
}

/// Number of points one employee earned within a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTally {
    pub employee: Employee,
    pub count: usize,
}

pub fn count_points<S>(
    store: &S,
    employee: &Employee,
    range: DateRange,
) -> Result<usize, StoreError>
where
    S: EntityStore + ?Sized,
{
    store.count_points(&PointFilter::for_employee(employee.id.clone(), range))
}

/// One tally per known employee, inactive ones included, in store order.
pub fn count_points_for_all<S>(store: &S, range: DateRange) -> Result<Vec<EmployeeTally>, StoreError>
where
    S: EntityStore + ?Sized,
{
    store
        .employees()?
        .into_iter()
        .map(|employee| {
            let count = count_points(store, &employee, range)?;
            Ok(EmployeeTally { employee, count })
        })
        .collect()
}

pub fn points_in_range<S>(store: &S, range: DateRange) -> Result<Vec<Point>, StoreError>
where
    S: EntityStore + ?Sized,
{
    store.points(&PointFilter::earned_within(range))
}
