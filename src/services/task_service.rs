use thiserror::Error;
use uuid::Uuid;

use crate::{
    db::dao::{DaoLayerError, NewTask, ProjectDao, TaskDao, TaskPatch},
    db::entities::{project, task},
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

/// Why a task-scoped request was refused. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskScopeError {
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Task not found")]
    TaskNotFound,
    #[error("Task does not belong to this project")]
    TaskNotInProject,
}

impl From<TaskScopeError> for AppError {
    fn from(err: TaskScopeError) -> Self {
        match err {
            TaskScopeError::ProjectNotFound | TaskScopeError::TaskNotFound => {
                AppError::not_found(err.to_string())
            }
            TaskScopeError::TaskNotInProject => AppError::forbidden(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct TaskService {
    task_dao: TaskDao,
    project_dao: ProjectDao,
}

impl TaskService {
    pub fn new(task_dao: TaskDao, project_dao: ProjectDao) -> Self {
        Self {
            task_dao,
            project_dao,
        }
    }

    pub async fn require_project(&self, project_id: &Uuid) -> Result<project::Model, AppError> {
        match self.project_dao.find_project(project_id).await {
            Ok(project) => Ok(project),
            Err(DaoLayerError::NotFound { .. }) => Err(TaskScopeError::ProjectNotFound.into()),
            Err(err) => Err(self.map_error(CrudOp::Find, err)),
        }
    }

    /// Project exists, then task exists, then task belongs to project. The
    /// first failing check wins and later reads are skipped.
    pub async fn require_task_in_project(
        &self,
        project_id: &Uuid,
        task_id: &Uuid,
    ) -> Result<task::Model, AppError> {
        self.require_project(project_id).await?;

        let task = match self.task_dao.find_task(task_id).await {
            Ok(task) => task,
            Err(DaoLayerError::NotFound { .. }) => return Err(TaskScopeError::TaskNotFound.into()),
            Err(err) => return Err(self.map_error(CrudOp::Find, err)),
        };

        if task.project_id != *project_id {
            tracing::debug!(%project_id, %task_id, owner = %task.project_id, "task outside project");
            return Err(TaskScopeError::TaskNotInProject.into());
        }

        Ok(task)
    }

    pub async fn list_tasks(
        &self,
        project_id: &Uuid,
        completed: Option<bool>,
    ) -> Result<Vec<task::Model>, AppError> {
        self.require_project(project_id).await?;
        self.task_dao
            .list_for_project(project_id, completed)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    pub async fn create_task(
        &self,
        project_id: &Uuid,
        task: NewTask,
    ) -> Result<task::Model, AppError> {
        self.require_project(project_id).await?;
        let task = CrudService::create(self, task.into_active_model(*project_id)).await?;
        tracing::info!(task_id = %task.id, %project_id, "task created");
        Ok(task)
    }

    pub async fn update_task(
        &self,
        project_id: &Uuid,
        task_id: &Uuid,
        patch: TaskPatch,
    ) -> Result<task::Model, AppError> {
        let task = self.require_task_in_project(project_id, task_id).await?;
        self.task_dao
            .update_task(task, patch)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    pub async fn toggle_completion(
        &self,
        project_id: &Uuid,
        task_id: &Uuid,
    ) -> Result<task::Model, AppError> {
        let task = self.require_task_in_project(project_id, task_id).await?;
        let done = !task.is_completed;
        self.task_dao
            .set_completed(task, done)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    pub async fn delete_task(&self, project_id: &Uuid, task_id: &Uuid) -> Result<(), AppError> {
        self.require_task_in_project(project_id, task_id).await?;
        CrudService::delete(self, *task_id).await?;
        tracing::info!(%task_id, %project_id, "task deleted");
        Ok(())
    }
}

impl CrudService for TaskService {
    type Dao = TaskDao;

    fn dao(&self) -> &Self::Dao {
        &self.task_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Failed to create task",
            find_failed: "Failed to load task",
            not_found: "Task not found",
            update_failed: "Failed to update task",
            delete_failed: "Failed to delete task",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{TaskScopeError, TaskService};
    use crate::{
        db::dao::{DaoBase, ProjectDao, TaskDao, TaskPatch},
        db::entities::{project, task},
        error::AppError,
    };

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn project_model(id: Uuid) -> project::Model {
        let now = ts();
        project::Model {
            id,
            name: "W".to_string(),
            description: "d".to_string(),
            start_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn task_model(id: Uuid, project_id: Uuid, is_completed: bool) -> task::Model {
        let now = ts();
        task::Model {
            id,
            project_id,
            title: "t1".to_string(),
            description: "d1".to_string(),
            due_date: now,
            is_completed,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(db: &DatabaseConnection) -> TaskService {
        TaskService::new(TaskDao::new(db), ProjectDao::new(db))
    }

    fn assert_scope_error(err: AppError, expected: TaskScopeError) {
        let message = expected.to_string();
        match (expected, err) {
            (TaskScopeError::TaskNotInProject, AppError::Forbidden(actual))
            | (TaskScopeError::ProjectNotFound, AppError::NotFound(actual))
            | (TaskScopeError::TaskNotFound, AppError::NotFound(actual)) => {
                assert_eq!(actual, message)
            }
            (expected, err) => panic!("expected {expected:?}, got {err:?}"),
        }
    }

    #[tokio::test]
    async fn missing_project_is_reported_without_reading_the_task() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<project::Model>::new()])
            .into_connection();

        let err = service(&db)
            .require_task_in_project(&Uuid::new_v4(), &Uuid::new_v4())
            .await
            .expect_err("project should be missing");

        assert_scope_error(err, TaskScopeError::ProjectNotFound);
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn missing_task_is_reported_after_project_check() {
        let project_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[project_model(project_id)]])
            .append_query_results([Vec::<task::Model>::new()])
            .into_connection();

        let err = service(&db)
            .require_task_in_project(&project_id, &Uuid::new_v4())
            .await
            .expect_err("task should be missing");

        assert_scope_error(err, TaskScopeError::TaskNotFound);
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn task_of_another_project_is_forbidden_not_missing() {
        let project_id = Uuid::new_v4();
        let task_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[project_model(project_id)]])
            .append_query_results([[task_model(task_id, Uuid::new_v4(), false)]])
            .into_connection();

        let err = service(&db)
            .require_task_in_project(&project_id, &task_id)
            .await
            .expect_err("task should be outside project");

        assert_scope_error(err, TaskScopeError::TaskNotInProject);
    }

    #[tokio::test]
    async fn matching_task_passes_the_chain() {
        let project_id = Uuid::new_v4();
        let task_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[project_model(project_id)]])
            .append_query_results([[task_model(task_id, project_id, false)]])
            .into_connection();

        let task = service(&db)
            .require_task_in_project(&project_id, &task_id)
            .await
            .expect("task should pass");
        assert_eq!(task.id, task_id);
    }

    #[tokio::test]
    async fn lookup_failures_are_internal_errors() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let err = service(&db)
            .require_task_in_project(&Uuid::new_v4(), &Uuid::new_v4())
            .await
            .expect_err("lookup should fail");
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn toggle_flips_completion() {
        let project_id = Uuid::new_v4();
        let task_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[project_model(project_id)]])
            .append_query_results([[task_model(task_id, project_id, true)]])
            .append_query_results([[task_model(task_id, project_id, false)]])
            .into_connection();

        let task = service(&db)
            .toggle_completion(&project_id, &task_id)
            .await
            .expect("toggle should succeed");
        assert!(!task.is_completed);
    }

    #[tokio::test]
    async fn update_is_refused_for_foreign_task() {
        let project_id = Uuid::new_v4();
        let task_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[project_model(project_id)]])
            .append_query_results([[task_model(task_id, Uuid::new_v4(), false)]])
            .into_connection();

        let patch = TaskPatch {
            title: Some("renamed".to_string()),
            ..Default::default()
        };
        let err = service(&db)
            .update_task(&project_id, &task_id, patch)
            .await
            .expect_err("update should be refused");

        assert_scope_error(err, TaskScopeError::TaskNotInProject);
        assert_eq!(db.into_transaction_log().len(), 2, "no write should be issued");
    }

    #[tokio::test]
    async fn delete_reports_task_removed_after_the_scope_check() {
        let project_id = Uuid::new_v4();
        let task_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[project_model(project_id)]])
            .append_query_results([[task_model(task_id, project_id, false)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = service(&db)
            .delete_task(&project_id, &task_id)
            .await
            .expect_err("delete should find nothing");
        assert!(matches!(err, AppError::NotFound(ref message) if message == "Task not found"));
    }
}
