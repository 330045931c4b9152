use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    fields::{optional_date, optional_text, page_params, required_date, required_text},
    tasks::{CreateTaskRequest, TaskResponse},
};
use crate::{
    db::dao::{NewProject, NewTask, ProjectPatch},
    db::entities::project,
    error::AppError,
    response::{ApiResult, JsonApiResponse, Pagination},
    services::{
        ServiceContext,
        project_service::{ProjectService, ProjectWithTasks},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<CreateTaskRequest>,
}

impl CreateProjectRequest {
    fn into_parts(self) -> Result<(NewProject, Vec<NewTask>), AppError> {
        let project = NewProject {
            name: required_text(self.name, "name")?,
            description: required_text(self.description, "description")?,
            start_date: required_date(self.start_date, "startDate")?,
        };
        let tasks = self
            .tasks
            .into_iter()
            .map(CreateTaskRequest::into_new_task)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((project, tasks))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
}

impl UpdateProjectRequest {
    fn into_patch(self) -> Result<ProjectPatch, AppError> {
        let patch = ProjectPatch {
            name: optional_text(self.name, "name")?,
            description: optional_text(self.description, "description")?,
            start_date: optional_date(self.start_date, "startDate")?,
        };
        if patch.is_empty() {
            return Err(AppError::bad_request("At least one field is required"));
        }
        Ok(patch)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskResponse>>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{project_id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .with_state(state)
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Vec<ProjectResponse>> {
    let (page, limit) = page_params(query.page, query.limit)?;
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());

    let service = project_service_from_state(state.as_ref());
    let result = service.list_projects(page, limit, search).await?;
    let pagination = Pagination::new(page, limit, result.total.unwrap_or_default());
    let projects = result.data.into_iter().map(ProjectResponse::from).collect();
    JsonApiResponse::paginated(projects, pagination)
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<ProjectResponse> {
    let service = project_service_from_state(state.as_ref());
    let project = service.get_project(project_id).await?;
    JsonApiResponse::ok(project.into())
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateProjectRequest>,
) -> ApiResult<ProjectResponse> {
    let (project, tasks) = body.into_parts()?;
    let service = project_service_from_state(state.as_ref());
    let created = service.create_project(project, tasks).await?;
    JsonApiResponse::created("Project created successfully", created.into())
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<UpdateProjectRequest>,
) -> ApiResult<ProjectResponse> {
    let patch = body.into_patch()?;
    let service = project_service_from_state(state.as_ref());
    let project = service.update_project(project_id, patch).await?;
    JsonApiResponse::ok_with_message("Project updated successfully", project.into())
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<()> {
    let service = project_service_from_state(state.as_ref());
    service.delete_project(project_id).await?;
    JsonApiResponse::message("Project deleted successfully")
}

impl From<project::Model> for ProjectResponse {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            start_date: model.start_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
            tasks: None,
        }
    }
}

impl From<ProjectWithTasks> for ProjectResponse {
    fn from(value: ProjectWithTasks) -> Self {
        let tasks = value.tasks.into_iter().map(TaskResponse::from).collect();
        Self {
            tasks: Some(tasks),
            ..Self::from(value.project)
        }
    }
}

fn project_service_from_state(state: &AppState) -> ProjectService {
    ServiceContext::from_state(state).project()
}
