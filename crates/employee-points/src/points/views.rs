//! Presentation projections. References are dereferenced to display names here,
//! at the boundary, so the core records keep their identifiers.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId, Employee, EmployeeId, Period, Point};
use super::evaluation::EvaluationOutcome;
use super::service::{EmployeeTotal, RangeTotals};
use super::tally::EmployeeTally;

/// Lookup from identifiers to display names.
#[derive(Debug, Clone, Default)]
pub struct NameDirectory {
    employees: HashMap<EmployeeId, String>,
    applications: HashMap<ApplicationId, String>,
}

impl NameDirectory {
    pub fn new(employees: &[Employee], applications: &[Application]) -> Self {
        Self {
            employees: employees
                .iter()
                .map(|e| (e.id.clone(), e.name.clone()))
                .collect(),
            applications: applications
                .iter()
                .map(|a| (a.id.clone(), a.name.clone()))
                .collect(),
        }
    }

    pub fn employee_name(&self, id: &EmployeeId) -> Option<&str> {
        self.employees.get(id).map(String::as_str)
    }

    pub fn application_name(&self, id: &ApplicationId) -> Option<&str> {
        self.applications.get(id).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub name: String,
    pub active: bool,
}

impl From<&Employee> for EmployeeView {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            active: employee.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationView {
    pub name: String,
}

impl From<&Application> for ApplicationView {
    fn from(application: &Application) -> Self {
        Self {
            name: application.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodView {
    pub periodname: String,
    pub startdate: NaiveDateTime,
    pub enddate: NaiveDateTime,
    pub winner: Option<String>,
    pub evaluated: bool,
}

pub fn period_view(period: &Period, names: &NameDirectory) -> PeriodView {
    PeriodView {
        periodname: period.periodname.clone(),
        startdate: period.startdate,
        enddate: period.enddate,
        winner: period
            .winner
            .as_ref()
            .and_then(|id| names.employee_name(id))
            .map(str::to_string),
        evaluated: period.evaluated,
    }
}

/// The winner is carried by the outcome itself, so no directory is needed.
pub fn outcome_view(outcome: &EvaluationOutcome) -> PeriodView {
    PeriodView {
        periodname: outcome.period.periodname.clone(),
        startdate: outcome.period.startdate,
        enddate: outcome.period.enddate,
        winner: Some(outcome.winner.name.clone()),
        evaluated: outcome.period.evaluated,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointView {
    pub date_added: NaiveDateTime,
    pub date_earned: NaiveDateTime,
    pub employee_name: Option<String>,
    pub application_name: Option<String>,
    pub description: String,
    pub prod_env: bool,
}

pub fn point_view(point: &Point, names: &NameDirectory) -> PointView {
    PointView {
        date_added: point.date_added,
        date_earned: point.date_earned,
        employee_name: names.employee_name(&point.employee).map(str::to_string),
        application_name: names
            .application_name(&point.application)
            .map(str::to_string),
        description: point.description.clone(),
        prod_env: point.prod_env,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTallyView {
    pub employee_name: String,
    pub total_points: usize,
}

impl From<&EmployeeTally> for EmployeeTallyView {
    fn from(tally: &EmployeeTally) -> Self {
        Self {
            employee_name: tally.employee.name.clone(),
            total_points: tally.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTotalsView {
    pub date_from: NaiveDateTime,
    pub date_to: NaiveDateTime,
    pub point_totals: Vec<EmployeeTallyView>,
}

impl From<&RangeTotals> for PointTotalsView {
    fn from(totals: &RangeTotals) -> Self {
        Self {
            date_from: totals.range.from,
            date_to: totals.range.to,
            point_totals: totals.totals.iter().map(EmployeeTallyView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTotalView {
    pub date_from: NaiveDateTime,
    pub date_to: NaiveDateTime,
    pub employee: String,
    pub total_points: usize,
}

impl From<&EmployeeTotal> for EmployeeTotalView {
    fn from(total: &EmployeeTotal) -> Self {
        Self {
            date_from: total.range.from,
            date_to: total.range.to,
            employee: total.employee.name.clone(),
            total_points: total.total,
        }
    }
}
