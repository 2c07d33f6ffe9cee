use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::evaluation::EvaluationError;

/// Identifier wrapper for employees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

/// Identifier wrapper for applications in which bugs get fixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub name: String,
}

/// A single awarded point. Points are immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub date_added: NaiveDateTime,
    pub date_earned: NaiveDateTime,
    pub employee: EmployeeId,
    pub application: ApplicationId,
    pub description: String,
    pub prod_env: bool,
}

/// Caller-supplied point request; references are resolved by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoint {
    pub date_earned: NaiveDateTime,
    pub employee_name: String,
    pub application_name: String,
    pub description: String,
    pub prod_env: bool,
}

/// Point with its references resolved, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointDraft {
    pub date_added: NaiveDateTime,
    pub date_earned: NaiveDateTime,
    pub employee: EmployeeId,
    pub application: ApplicationId,
    pub description: String,
    pub prod_env: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodState {
    Unevaluated,
    Evaluated,
}

impl PeriodState {
    pub const fn label(self) -> &'static str {
        match self {
            PeriodState::Unevaluated => "unevaluated",
            PeriodState::Evaluated => "evaluated",
        }
    }
}

/// Named date range over which points are tallied to pick one winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub periodname: String,
    pub startdate: NaiveDateTime,
    pub enddate: NaiveDateTime,
    pub winner: Option<EmployeeId>,
    pub evaluated: bool,
}

impl Period {
    pub fn state(&self) -> PeriodState {
        if self.evaluated {
            PeriodState::Evaluated
        } else {
            PeriodState::Unevaluated
        }
    }

    /// Open-interval membership; the boundaries themselves are outside.
    pub fn strictly_contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp > self.startdate && timestamp < self.enddate
    }

    pub fn mark_evaluated(&mut self, winner: EmployeeId) -> Result<(), EvaluationError> {
        if self.evaluated {
            return Err(EvaluationError::AlreadyEvaluated {
                period: self.periodname.clone(),
            });
        }
        self.winner = Some(winner);
        self.evaluated = true;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), EvaluationError> {
        if !self.evaluated {
            return Err(EvaluationError::NotEvaluated {
                period: self.periodname.clone(),
            });
        }
        self.winner = None;
        self.evaluated = false;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPeriod {
    pub periodname: String,
    pub startdate: NaiveDateTime,
    pub enddate: NaiveDateTime,
}
