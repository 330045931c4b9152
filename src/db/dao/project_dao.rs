use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, QueryFilter, Select, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, ExprTrait, LikeExpr},
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, NewTask, PaginatedResponse, stamp_new};
use crate::db::entities::{prelude::Project, project, task};

const LIKE_ESCAPE: char = '\\';

#[derive(Clone)]
pub struct ProjectDao {
    db: DatabaseConnection,
}

impl DaoBase for ProjectDao {
    type Entity = Project;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub start_date: DateTimeWithTimeZone,
}

impl NewProject {
    fn into_active_model(self) -> project::ActiveModel {
        project::ActiveModel {
            name: Set(self.name),
            description: Set(self.description),
            start_date: Set(self.start_date),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTimeWithTimeZone>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.start_date.is_none()
    }

    pub fn apply(self, active: &mut project::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(start_date) = self.start_date {
            active.start_date = Set(start_date);
        }
    }
}

impl ProjectDao {
    /// Inserts the project and its initial tasks in one transaction. Any
    /// failed insert rolls the whole batch back.
    pub async fn create_with_tasks(
        &self,
        project: NewProject,
        tasks: Vec<NewTask>,
    ) -> DaoResult<(project::Model, Vec<task::Model>)> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        let mut active = project.into_active_model();
        stamp_new(&mut active);
        let project = active.insert(&txn).await.map_err(DaoLayerError::Db)?;

        let mut created = Vec::with_capacity(tasks.len());
        for task in tasks {
            let mut active = task.into_active_model(project.id);
            stamp_new(&mut active);
            created.push(active.insert(&txn).await.map_err(DaoLayerError::Db)?);
        }

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok((project, created))
    }

    /// Newest first. `search` matches name or description anywhere.
    pub async fn search(
        &self,
        page: u64,
        page_size: u64,
        search: Option<&str>,
    ) -> DaoResult<PaginatedResponse<project::Model>> {
        let condition = search.map(search_condition);
        let apply = move |query: Select<Project>| match condition {
            Some(condition) => query.filter(condition),
            None => query,
        };

        let mut response = self.find(page, page_size, None, apply.clone()).await?;
        response.total = Some(self.count(apply).await?);
        Ok(response)
    }

    pub async fn find_project(&self, id: &Uuid) -> DaoResult<project::Model> {
        self.find_by_id(*id).await
    }
}

fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term));
    Condition::any()
        .add(
            Expr::col(project::Column::Name)
                .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
        )
        .add(
            Expr::col(project::Column::Description)
                .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
        )
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '%' => escaped.push_str("\\%"),
            '_' => escaped.push_str("\\_"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
