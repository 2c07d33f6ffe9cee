use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use super::domain::{NewApplication, NewEmployee, NewPeriod, NewPoint};
use super::evaluation::TieBreaker;
use super::service::{ErrorKind, LedgerError, PointsLedgerService};
use super::store::EntityStore;
use super::timestamp::{deserialize_optional_timestamp, deserialize_timestamp};
use super::views::{
    outcome_view, period_view, point_view, ApplicationView, EmployeeTotalView, EmployeeView,
    PeriodView, PointTotalsView, PointView,
};

type Ledger<S, T> = Arc<PointsLedgerService<S, T>>;

/// Router builder exposing the ledger over HTTP.
pub fn ledger_router<S, T>(service: Ledger<S, T>) -> Router
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    Router::new()
        .route("/employees/add", post(add_employee::<S, T>))
        .route("/employees/all", get(all_employees::<S, T>))
        .route("/employees/active", put(set_employee_active::<S, T>))
        .route("/applications/add", post(add_application::<S, T>))
        .route("/applications/all", get(all_applications::<S, T>))
        .route("/applications/remove", delete(remove_application::<S, T>))
        .route("/points/add", post(add_point::<S, T>))
        .route("/points/employee", get(employee_points::<S, T>))
        .route("/points/allemployees", get(all_employee_points::<S, T>))
        .route("/points/allpoints", get(all_points::<S, T>))
        .route("/periodwinners/add", post(add_period::<S, T>))
        .route("/periodwinners/all", get(all_periods::<S, T>))
        .route("/periodwinners/evaluate", put(evaluate_period::<S, T>))
        .route("/periodwinners/unevaluate", put(unevaluate_period::<S, T>))
        .with_state(service)
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::FORBIDDEN,
            ErrorKind::DuplicateKey => StatusCode::CONFLICT,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.kind().status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NameRequest {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityRequest {
    pub(crate) name: String,
    pub(crate) active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddPointRequest {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub(crate) date_earned: NaiveDateTime,
    pub(crate) description: String,
    pub(crate) prod_env: bool,
    pub(crate) employee_name: String,
    pub(crate) application_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddPeriodRequest {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub(crate) period_start: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub(crate) period_end: NaiveDateTime,
    pub(crate) period_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeriodNameRequest {
    pub(crate) period_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RangeQuery {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) start_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) end_date: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeRangeQuery {
    pub(crate) employee_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) start_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) end_date: Option<NaiveDateTime>,
}

async fn add_employee<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<NewEmployee>,
) -> Result<(StatusCode, Json<EmployeeView>), LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let employee = service.add_employee(request)?;
    Ok((StatusCode::CREATED, Json(EmployeeView::from(&employee))))
}

async fn all_employees<S, T>(
    State(service): State<Ledger<S, T>>,
) -> Result<Json<Vec<EmployeeView>>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let employees = service.employees()?;
    Ok(Json(employees.iter().map(EmployeeView::from).collect()))
}

async fn set_employee_active<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<ActivityRequest>,
) -> Result<Json<EmployeeView>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let employee = service.set_employee_active(&request.name, request.active)?;
    Ok(Json(EmployeeView::from(&employee)))
}

async fn add_application<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<NameRequest>,
) -> Result<(StatusCode, Json<ApplicationView>), LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let application = service.add_application(NewApplication { name: request.name })?;
    Ok((StatusCode::CREATED, Json(ApplicationView::from(&application))))
}

async fn all_applications<S, T>(
    State(service): State<Ledger<S, T>>,
) -> Result<Json<Vec<ApplicationView>>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let applications = service.applications()?;
    Ok(Json(applications.iter().map(ApplicationView::from).collect()))
}

async fn remove_application<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<NameRequest>,
) -> Result<Json<ApplicationView>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let removed = service.remove_application(&request.name)?;
    Ok(Json(ApplicationView::from(&removed)))
}

async fn add_point<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<AddPointRequest>,
) -> Result<(StatusCode, Json<PointView>), LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let point = service.add_point(NewPoint {
        date_earned: request.date_earned,
        employee_name: request.employee_name,
        application_name: request.application_name,
        description: request.description,
        prod_env: request.prod_env,
    })?;
    let names = service.directory()?;
    Ok((StatusCode::CREATED, Json(point_view(&point, &names))))
}

async fn employee_points<S, T>(
    State(service): State<Ledger<S, T>>,
    Query(query): Query<EmployeeRangeQuery>,
) -> Result<Json<EmployeeTotalView>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let total = service.employee_total(&query.employee_name, query.start_date, query.end_date)?;
    Ok(Json(EmployeeTotalView::from(&total)))
}

async fn all_employee_points<S, T>(
    State(service): State<Ledger<S, T>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<PointTotalsView>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let totals = service.all_totals(query.start_date, query.end_date)?;
    Ok(Json(PointTotalsView::from(&totals)))
}

async fn all_points<S, T>(
    State(service): State<Ledger<S, T>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<PointView>>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let points = service.points(query.start_date, query.end_date)?;
    let names = service.directory()?;
    Ok(Json(
        points.iter().map(|point| point_view(point, &names)).collect(),
    ))
}

async fn add_period<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<AddPeriodRequest>,
) -> Result<(StatusCode, Json<PeriodView>), LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let period = service.add_period(NewPeriod {
        periodname: request.period_name,
        startdate: request.period_start,
        enddate: request.period_end,
    })?;
    let names = service.directory()?;
    Ok((StatusCode::CREATED, Json(period_view(&period, &names))))
}

async fn all_periods<S, T>(
    State(service): State<Ledger<S, T>>,
) -> Result<Json<Vec<PeriodView>>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let periods = service.periods()?;
    let names = service.directory()?;
    Ok(Json(
        periods
            .iter()
            .map(|period| period_view(period, &names))
            .collect(),
    ))
}

async fn evaluate_period<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<PeriodNameRequest>,
) -> Result<Json<PeriodView>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let outcome = service.evaluate_period(&request.period_name)?;
    Ok(Json(outcome_view(&outcome)))
}

async fn unevaluate_period<S, T>(
    State(service): State<Ledger<S, T>>,
    Json(request): Json<PeriodNameRequest>,
) -> Result<Json<PeriodView>, LedgerError>
where
    S: EntityStore + 'static,
    T: TieBreaker + 'static,
{
    let period = service.unevaluate_period(&request.period_name)?;
    let names = service.directory()?;
    Ok(Json(period_view(&period, &names)))
}
