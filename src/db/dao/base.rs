use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel, Iterable,
    Order, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{
    HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel, stamp_new,
};
use super::error::{DaoLayerError, DaoResult};

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub total: Option<u64>,
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + HasIdActiveModel + TimestampedActiveModel + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    Self::Entity: HasCreatedAtColumn,
{
    type Entity: EntityTrait + Send + Sync;
    const MAX_PAGE_SIZE: u64 = 100;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    async fn create<T>(&self, data: T) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        T: IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    {
        let mut active = data.into_active_model();
        stamp_new(&mut active);
        active.insert(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or(DaoLayerError::NotFound {
            entity: std::any::type_name::<Self::Entity>(),
            id,
        })
    }

    async fn find<F>(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(<Self::Entity as EntityTrait>::Column, Order)>,
        apply: F,
    ) -> DaoResult<PaginatedResponse<<Self::Entity as EntityTrait>::Model>>
    where
        F: FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    {
        if page == 0 || page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(DaoLayerError::InvalidPagination { page, page_size });
        }

        let (column, direction) =
            order.unwrap_or((Self::Entity::created_at_column(), Order::Desc));
        let mut ordered = apply(Self::Entity::find()).order_by(column, direction.clone());
        // ids are time ordered, so ties on the sort column keep insertion order
        for key in <Self::Entity as EntityTrait>::PrimaryKey::iter() {
            ordered = ordered.order_by(key.into_column(), direction.clone());
        }
        // one extra row tells us whether another page exists
        let fetch_size = page_size.saturating_add(1);
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let mut data = ordered
            .limit(fetch_size)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        let has_next = data.len() > page_size as usize;
        if has_next {
            data.truncate(page_size as usize);
        }

        Ok(PaginatedResponse {
            data,
            page,
            page_size,
            has_next,
            total: None,
        })
    }

    /// Every matching row, fetched page by page.
    async fn find_all<F>(
        &self,
        order: Option<(<Self::Entity as EntityTrait>::Column, Order)>,
        apply: F,
    ) -> DaoResult<Vec<<Self::Entity as EntityTrait>::Model>>
    where
        F: Fn(Select<Self::Entity>) -> Select<Self::Entity> + Clone + Send + Sync,
    {
        let mut rows = Vec::new();
        let mut page = 1;
        loop {
            let mut response = self
                .find(page, Self::MAX_PAGE_SIZE, order.clone(), apply.clone())
                .await?;
            rows.append(&mut response.data);
            if !response.has_next {
                return Ok(rows);
            }
            page += 1;
        }
    }

    async fn count<F>(&self, apply: F) -> DaoResult<u64>
    where
        F: FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    {
        apply(Self::Entity::find())
            .count(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let model = self.find_by_id(id).await?;
        self.update_model(model, apply).await
    }

    /// Like `update`, for callers that already hold the current row.
    async fn update_model<F>(
        &self,
        model: <Self::Entity as EntityTrait>::Model,
        apply: F,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        active.update(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: std::any::type_name::<Self::Entity>(),
                id,
            });
        }

        Ok(id)
    }
}
