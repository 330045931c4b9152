use uuid::Uuid;

use crate::{
    db::dao::{NewProject, NewTask, PaginatedResponse, ProjectDao, ProjectPatch, TaskDao},
    db::entities::{project, task},
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

#[derive(Debug, Clone)]
pub struct ProjectWithTasks {
    pub project: project::Model,
    pub tasks: Vec<task::Model>,
}

#[derive(Clone)]
pub struct ProjectService {
    project_dao: ProjectDao,
    task_dao: TaskDao,
}

impl ProjectService {
    pub fn new(project_dao: ProjectDao, task_dao: TaskDao) -> Self {
        Self {
            project_dao,
            task_dao,
        }
    }

    pub async fn list_projects(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<PaginatedResponse<project::Model>, AppError> {
        self.project_dao
            .search(page, limit, search)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    pub async fn get_project(&self, id: Uuid) -> Result<ProjectWithTasks, AppError> {
        let project = self.find_by_id(id).await?;
        let tasks = self
            .task_dao
            .list_for_project(&project.id, None)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        Ok(ProjectWithTasks { project, tasks })
    }

    pub async fn create_project(
        &self,
        project: NewProject,
        tasks: Vec<NewTask>,
    ) -> Result<ProjectWithTasks, AppError> {
        let (project, tasks) = self
            .project_dao
            .create_with_tasks(project, tasks)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))?;
        tracing::info!(project_id = %project.id, tasks = tasks.len(), "project created");
        Ok(ProjectWithTasks { project, tasks })
    }

    pub async fn update_project(
        &self,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<project::Model, AppError> {
        self.update(id, move |active| patch.apply(active)).await
    }

    /// Tasks go with the project through the foreign key cascade.
    pub async fn delete_project(&self, id: Uuid) -> Result<(), AppError> {
        self.delete(id).await?;
        tracing::info!(project_id = %id, "project deleted");
        Ok(())
    }
}

impl CrudService for ProjectService {
    type Dao = ProjectDao;

    fn dao(&self) -> &Self::Dao {
        &self.project_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Failed to create project",
            find_failed: "Failed to load project",
            not_found: "Project not found",
            update_failed: "Failed to update project",
            delete_failed: "Failed to delete project",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::ProjectService;
    use crate::{
        db::dao::{DaoBase, ProjectDao, ProjectPatch, TaskDao},
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

    fn task_model(project_id: Uuid, title: &str) -> task::Model {
        let now = ts();
        task::Model {
            id: Uuid::new_v4(),
            project_id,
            title: title.to_string(),
            description: "d".to_string(),
            due_date: now,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(db: &DatabaseConnection) -> ProjectService {
        ProjectService::new(ProjectDao::new(db), TaskDao::new(db))
    }

    #[tokio::test]
    async fn get_project_includes_its_tasks() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[project_model(id)]])
            .append_query_results([vec![task_model(id, "t1"), task_model(id, "t2")]])
            .into_connection();

        let found = service(&db).get_project(id).await.expect("project should load");
        assert_eq!(found.project.id, id);
        let titles: Vec<_> = found.tasks.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, ["t1", "t2"]);
    }

    #[tokio::test]
    async fn get_missing_project_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<project::Model>::new()])
            .into_connection();

        let err = service(&db)
            .get_project(Uuid::new_v4())
            .await
            .expect_err("project should be missing");
        assert!(matches!(err, AppError::NotFound(ref message) if message == "Project not found"));
    }

    #[tokio::test]
    async fn update_missing_project_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<project::Model>::new()])
            .into_connection();

        let patch = ProjectPatch {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        let err = service(&db)
            .update_project(Uuid::new_v4(), patch)
            .await
            .expect_err("project should be missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_project_applies_only_the_patch() {
        let id = Uuid::new_v4();
        let mut renamed = project_model(id);
        renamed.name = "renamed".to_string();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[project_model(id)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[renamed]])
            .into_connection();

        let patch = ProjectPatch {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        let updated = service(&db)
            .update_project(id, patch)
            .await
            .expect("update should succeed");
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.description, "d");
        assert_eq!(db.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn delete_missing_project_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = service(&db)
            .delete_project(Uuid::new_v4())
            .await
            .expect_err("project should be missing");
        assert!(matches!(err, AppError::NotFound(ref message) if message == "Project not found"));
    }

    #[tokio::test]
    async fn list_projects_rejects_zero_page() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();

        let err = service(&db)
            .list_projects(0, 10, None)
            .await
            .expect_err("page 0 should be rejected");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
