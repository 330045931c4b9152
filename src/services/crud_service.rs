use sea_orm::{ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel, PrimaryKeyTrait};
use uuid::Uuid;

use crate::db::dao::{
    DaoBase, DaoLayerError, HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel,
};
use crate::error::AppError;

type CrudEntity<D> = <D as DaoBase>::Entity;
type CrudModel<D> = <CrudEntity<D> as EntityTrait>::Model;
type CrudActiveModel<D> = <CrudEntity<D> as EntityTrait>::ActiveModel;
type CrudKey<D> = <<CrudEntity<D> as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Client-facing messages per failed operation.
#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub create_failed: &'static str,
    pub find_failed: &'static str,
    pub not_found: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            create_failed: "Create failed",
            find_failed: "Find failed",
            not_found: "Resource not found",
            update_failed: "Update failed",
            delete_failed: "Delete failed",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

// Same bounds as `DaoBase`; they are not implied through `Self::Dao`.
#[async_trait::async_trait]
pub trait CrudService: Sync
where
    CrudModel<Self::Dao>: FromQueryResult + IntoActiveModel<CrudActiveModel<Self::Dao>> + Send + Sync,
    CrudActiveModel<Self::Dao>: ActiveModelTrait<Entity = CrudEntity<Self::Dao>>
        + HasIdActiveModel
        + TimestampedActiveModel
        + Send,
    CrudKey<Self::Dao>: From<Uuid> + Send + Sync,
    CrudEntity<Self::Dao>: HasCreatedAtColumn,
{
    type Dao: DaoBase;

    fn dao(&self) -> &Self::Dao;

    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        let errors = self.errors();
        match err {
            DaoLayerError::Db(db_err) => {
                let context = match op {
                    CrudOp::Create => errors.create_failed,
                    CrudOp::Find | CrudOp::List => errors.find_failed,
                    CrudOp::Update => errors.update_failed,
                    CrudOp::Delete => errors.delete_failed,
                };
                let message = format!("{context}. Please check the logs for more details");
                AppError::internal_with_source(message, db_err)
            }
            DaoLayerError::NotFound { .. } => AppError::not_found(errors.not_found),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
        }
    }

    async fn create<T>(&self, data: T) -> Result<CrudModel<Self::Dao>, AppError>
    where
        T: IntoActiveModel<CrudActiveModel<Self::Dao>> + Send,
    {
        self.dao()
            .create(data)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<CrudModel<Self::Dao>, AppError>
    where
        F: for<'a> FnOnce(&'a mut CrudActiveModel<Self::Dao>) + Send,
    {
        self.dao()
            .update(id, apply)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.dao()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }
}
