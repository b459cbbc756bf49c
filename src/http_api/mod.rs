use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    DerivedTask, PlanError, PlanSummary, ProjectBook, ProjectPlan, ProjectTemplate,
    ScheduleDeriver, ScheduleError, TemplateCatalog, WorkCalendar,
    schedule::{format_date, parse_date},
};

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<TemplateCatalog>,
    calendar_days: Arc<ScheduleDeriver>,
    working_days: Option<Arc<ScheduleDeriver>>,
    projects: Arc<RwLock<ProjectBook>>,
}

impl AppState {
    /// Requests count calendar days unless they ask for `"counting":
    /// "working"`, which needs `work_calendar`.
    pub fn new(catalog: TemplateCatalog, work_calendar: Option<WorkCalendar>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            calendar_days: Arc::new(ScheduleDeriver::new()),
            working_days: work_calendar
                .map(|calendar| Arc::new(ScheduleDeriver::with_work_calendar(calendar))),
            projects: Arc::new(RwLock::new(ProjectBook::new())),
        }
    }

    fn projects(&self) -> Arc<RwLock<ProjectBook>> {
        self.projects.clone()
    }

    fn deriver(&self, counting: Counting) -> Result<Arc<ScheduleDeriver>, ApiError> {
        match counting {
            Counting::Calendar => Ok(self.calendar_days.clone()),
            Counting::Working => self
                .working_days
                .clone()
                .ok_or_else(|| ApiError::invalid("working-day counting needs RENO_PLANNER_CALENDAR")),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TemplateCatalog::builtin().clone(), None)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Counting {
    #[default]
    Calendar,
    Working,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Conflict(String),
    Rejected(StatusCode, String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<PlanError> for ApiError {
    fn from(value: PlanError) -> Self {
        match value {
            PlanError::IdInUse { .. } => ApiError::Conflict(value.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => {
                warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, "invalid_request", message)
            }
            ApiError::Rejected(status, message) => {
                warn!(%status, %message, "malformed request");
                (status, "malformed_request", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct TemplateQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EndDatePayload {
    start_date: String,
    duration_days: i64,
    #[serde(default)]
    counting: Counting,
}

#[derive(Debug, Serialize)]
struct EndDateResponse {
    start_date: NaiveDate,
    duration_days: i64,
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct TasksPayload {
    start_date: String,
    #[serde(default)]
    counting: Counting,
}

#[derive(Debug, Deserialize)]
struct CreateProjectPayload {
    name: String,
    #[serde(default)]
    template_id: Option<String>,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    counting: Counting,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/templates", get(list_templates))
        .route("/templates/:id", get(get_template))
        .route("/templates/:id/tasks", post(generate_tasks))
        .route("/categories", get(list_categories))
        .route("/end-date", post(calculate_end_date))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/:id", get(get_project).delete(delete_project))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Json<Vec<ProjectTemplate>> {
    let templates = match query.category.as_deref() {
        Some(category) => state
            .catalog
            .list_by_category(category)
            .into_iter()
            .cloned()
            .collect(),
        None => state.catalog.list_all().to_vec(),
    };
    Json(templates)
}

async fn get_template(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ProjectTemplate>, ApiError> {
    let Path(template_id) = path?;
    state
        .catalog
        .get_template(&template_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("template '{template_id}' not found")))
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .catalog
            .categories()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect(),
    )
}

async fn calculate_end_date(
    State(state): State<AppState>,
    payload: Result<Json<EndDatePayload>, JsonRejection>,
) -> Result<Json<EndDateResponse>, ApiError> {
    let Json(payload) = payload?;
    let deriver = state.deriver(payload.counting)?;
    let start = parse_date(&payload.start_date)?;
    let end = deriver.end_date(start, payload.duration_days)?;
    Ok(Json(EndDateResponse {
        start_date: start,
        duration_days: payload.duration_days,
        end_date: format_date(end),
    }))
}

async fn generate_tasks(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<TasksPayload>, JsonRejection>,
) -> Result<Json<Vec<DerivedTask>>, ApiError> {
    let Path(template_id) = path?;
    let Json(payload) = payload?;
    let deriver = state.deriver(payload.counting)?;
    let template = state
        .catalog
        .get_template(&template_id)
        .ok_or_else(|| ApiError::not_found(format!("template '{template_id}' not found")))?;
    let tasks = deriver.generate_tasks_from_template(template, &payload.start_date)?;
    Ok(Json(tasks))
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<PlanSummary>> {
    let projects = state.projects();
    let summaries = projects.read().summaries();
    Json(summaries)
}

async fn get_project(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ProjectPlan>, ApiError> {
    let Path(project_id) = path?;
    let projects = state.projects();
    let plan = projects.read().get(project_id).cloned();
    plan.map(Json)
        .ok_or_else(|| ApiError::not_found(format!("project {project_id} not found")))
}

async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectPlan>), ApiError> {
    let Json(payload) = payload?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::invalid("project name must not be blank"));
    }
    let start = parse_date(&payload.start_date)?;

    let projects = state.projects();
    let created = match payload.template_id.as_deref() {
        Some(template_id) => {
            let template = state.catalog.get_template(template_id).ok_or_else(|| {
                ApiError::not_found(format!("template '{template_id}' not found"))
            })?;
            let deriver = state.deriver(payload.counting)?;
            let mut guard = projects.write();
            guard
                .create_from_template(payload.name.trim(), template, start, &deriver)?
                .clone()
        }
        None => {
            let end = payload
                .end_date
                .as_deref()
                .ok_or_else(|| ApiError::invalid("end_date is required without a template"))
                .and_then(|raw| parse_date(raw).map_err(ApiError::from))?;
            let mut guard = projects.write();
            guard.create_custom(payload.name.trim(), start, end)?.clone()
        }
    };

    info!(
        id = created.id,
        template = created.template_id.as_deref().unwrap_or("custom"),
        tasks = created.tasks.len(),
        "created project"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_project(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(project_id) = path?;
    let projects = state.projects();
    let removed = projects.write().remove(project_id);
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found(format!("project {project_id} not found"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taken_plan_id_is_a_conflict() {
        let response = ApiError::from(PlanError::IdInUse { id: 7 }).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
