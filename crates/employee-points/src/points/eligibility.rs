use chrono::NaiveDateTime;

use super::domain::Period;

/// Rejection raised when a point would land inside a locked period.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EligibilityViolation {
    #[error("period '{period}' has already been evaluated; points earned inside it are locked")]
    PeriodAlreadyEvaluated { period: String },
}

/// Check a candidate `date_earned` against every known period.
///
/// Only evaluated periods block, and only when the date lies strictly between
/// `startdate` and `enddate`. A point dated exactly on either boundary passes.
pub fn check_eligible<'a, I>(earned: NaiveDateTime, periods: I) -> Result<(), EligibilityViolation>
where
    I: IntoIterator<Item = &'a Period>,
{
    match periods
        .into_iter()
        .find(|period| period.evaluated && period.strictly_contains(earned))
    {
        Some(period) => Err(EligibilityViolation::PeriodAlreadyEvaluated {
            period: period.periodname.clone(),
        }),
        None => Ok(()),
    }
}
