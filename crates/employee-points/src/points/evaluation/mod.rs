mod policy;
mod tie_break;

pub use policy::WinnerSelection;
pub use tie_break::{ConfiguredTieBreaker, SeededTieBreaker, TieBreaker, UniformTieBreaker};

use policy::{select_winner, standings};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Employee, Period};
use super::store::{EntityStore, StoreError};
use super::tally::{count_points_for_all, DateRange, EmployeeTally};

/// Computes period winners from per-employee tallies.
pub struct PeriodEvaluator<T> {
    tie_breaker: T,
}

impl<T> PeriodEvaluator<T>
where
    T: TieBreaker,
{
    pub fn new(tie_breaker: T) -> Self {
        Self { tie_breaker }
    }

    /// Tally `[startdate, enddate]` for every employee, choose the winner and flip
    /// the period to evaluated. The caller persists the mutated period.
    pub fn evaluate<S>(
        &self,
        store: &S,
        period: &mut Period,
    ) -> Result<EvaluationOutcome, EvaluationError>
    where
        S: EntityStore + ?Sized,
    {
        if period.evaluated {
            return Err(EvaluationError::AlreadyEvaluated {
                period: period.periodname.clone(),
            });
        }

        let range = DateRange::new(period.startdate, period.enddate);
        let standings = standings(count_points_for_all(store, range)?);
        let selection = select_winner(&standings, &self.tie_breaker).ok_or_else(|| {
            EvaluationError::NoEmployees {
                period: period.periodname.clone(),
            }
        })?;

        debug!(
            period = %period.periodname,
            top_count = selection.top_count,
            tied = selection.tied,
            "selected period winner"
        );

        period.mark_evaluated(selection.winner.id.clone())?;

        Ok(EvaluationOutcome {
            period: period.clone(),
            winner: selection.winner,
            top_count: selection.top_count,
            tied: selection.tied,
            standings,
        })
    }

    /// Clear the winner so the period can take new points and be evaluated again.
    pub fn revert(&self, period: &mut Period) -> Result<(), EvaluationError> {
        period.reset()
    }
}

/// Evaluation output describing the winner and the standings it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub period: Period,
    pub winner: Employee,
    pub top_count: usize,
    pub tied: usize,
    pub standings: Vec<EmployeeTally>,
}

impl EvaluationOutcome {
    pub fn summary(&self) -> String {
        if self.tied > 1 {
            format!(
                "{} wins '{}' with {} point(s), drawn from {} tied employees",
                self.winner.name, self.period.periodname, self.top_count, self.tied
            )
        } else {
            format!(
                "{} wins '{}' with {} point(s)",
                self.winner.name, self.period.periodname, self.top_count
            )
        }
    }
}

/// Period state-machine and evaluation failures.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("a winner already exists for period '{period}'")]
    AlreadyEvaluated { period: String },
    #[error("period '{period}' has not been evaluated yet")]
    NotEvaluated { period: String },
    #[error("period '{period}' cannot be evaluated without any employees")]
    NoEmployees { period: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
