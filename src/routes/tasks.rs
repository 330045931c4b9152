use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::{optional_date, optional_text, required_date, required_text};
use crate::{
    db::dao::{NewTask, TaskPatch},
    db::entities::task,
    error::AppError,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, task_service::TaskService},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_completed: Option<bool>,
}

impl CreateTaskRequest {
    pub(crate) fn into_new_task(self) -> Result<NewTask, AppError> {
        Ok(NewTask {
            title: required_text(self.title, "title")?,
            description: required_text(self.description, "description")?,
            due_date: required_date(self.due_date, "dueDate")?,
            is_completed: self.is_completed.unwrap_or(false),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_completed: Option<bool>,
}

impl UpdateTaskRequest {
    fn into_patch(self) -> Result<TaskPatch, AppError> {
        let patch = TaskPatch {
            title: optional_text(self.title, "title")?,
            description: optional_text(self.description, "description")?,
            due_date: optional_date(self.due_date, "dueDate")?,
            is_completed: self.is_completed,
        };
        if patch.is_empty() {
            return Err(AppError::bad_request("At least one field is required"));
        }
        Ok(patch)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTimeWithTimeZone,
    pub is_completed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/projects/{project_id}/tasks",
            get(list_tasks).post(create_task),
        )
        .route(
            "/projects/{project_id}/tasks/{task_id}",
            patch(update_task).put(update_task).delete(delete_task),
        )
        .route(
            "/projects/{project_id}/tasks/{task_id}/complete",
            patch(toggle_task),
        )
        .with_state(state)
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Vec<TaskResponse>> {
    let service = task_service_from_state(state.as_ref());
    let tasks = service.list_tasks(&project_id, query.completed).await?;
    JsonApiResponse::ok(tasks.into_iter().map(TaskResponse::from).collect())
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<TaskResponse> {
    let new_task = body.into_new_task()?;
    let service = task_service_from_state(state.as_ref());
    let task = service.create_task(&project_id, new_task).await?;
    JsonApiResponse::created("Task created successfully", task.into())
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateTaskRequest>,
) -> ApiResult<TaskResponse> {
    let patch = body.into_patch()?;
    let service = task_service_from_state(state.as_ref());
    let task = service.update_task(&project_id, &task_id, patch).await?;
    JsonApiResponse::ok_with_message("Task updated successfully", task.into())
}

async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<TaskResponse> {
    let service = task_service_from_state(state.as_ref());
    let task = service.toggle_completion(&project_id, &task_id).await?;
    let message = if task.is_completed {
        "Task marked as completed"
    } else {
        "Task marked as incomplete"
    };
    JsonApiResponse::ok_with_message(message, task.into())
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let service = task_service_from_state(state.as_ref());
    service.delete_task(&project_id, &task_id).await?;
    JsonApiResponse::message("Task deleted successfully")
}

impl From<task::Model> for TaskResponse {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            is_completed: model.is_completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn task_service_from_state(state: &AppState) -> TaskService {
    ServiceContext::from_state(state).task()
}
