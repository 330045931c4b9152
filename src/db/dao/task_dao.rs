use sea_orm::{
    ColumnTrait, DatabaseConnection, Order, QueryFilter, Set, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::Task, task};

#[derive(Clone)]
pub struct TaskDao {
    db: DatabaseConnection,
}

impl DaoBase for TaskDao {
    type Entity = Task;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Column values for a task that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: DateTimeWithTimeZone,
    pub is_completed: bool,
}

impl NewTask {
    pub fn into_active_model(self, project_id: Uuid) -> task::ActiveModel {
        task::ActiveModel {
            project_id: Set(project_id),
            title: Set(self.title),
            description: Set(self.description),
            due_date: Set(self.due_date),
            is_completed: Set(self.is_completed),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.is_completed.is_none()
    }

    fn apply(self, active: &mut task::ActiveModel) {
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(due_date) = self.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(is_completed) = self.is_completed {
            active.is_completed = Set(is_completed);
        }
    }
}

impl TaskDao {
    /// All tasks of a project, oldest first.
    pub async fn list_for_project(
        &self,
        project_id: &Uuid,
        completed: Option<bool>,
    ) -> DaoResult<Vec<task::Model>> {
        let project_id = *project_id;
        self.find_all(Some((task::Column::CreatedAt, Order::Asc)), move |query| {
            let query = query.filter(task::Column::ProjectId.eq(project_id));
            match completed {
                Some(done) => query.filter(task::Column::IsCompleted.eq(done)),
                None => query,
            }
        })
        .await
    }

    pub async fn find_task(&self, id: &Uuid) -> DaoResult<task::Model> {
        self.find_by_id(*id).await
    }

    pub async fn update_task(&self, task: task::Model, patch: TaskPatch) -> DaoResult<task::Model> {
        self.update_model(task, move |active| patch.apply(active)).await
    }

    pub async fn set_completed(&self, task: task::Model, done: bool) -> DaoResult<task::Model> {
        self.update_model(task, move |active| {
            active.is_completed = Set(done);
        })
        .await
    }
}
