use sea_orm::{ActiveValue, entity::prelude::*};

use crate::db::dao::base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};

/// A unit of work. Rows are removed by the database when their project is
/// deleted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub project_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "DateTime")]
    pub due_date: DateTimeWithTimeZone,
    #[sea_orm(default_value = false)]
    pub is_completed: bool,
    #[sea_orm(column_type = "DateTime", default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "DateTime", default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "project_id", to = "id", on_delete = "Cascade")]
    pub project: HasOne<super::project::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl HasIdActiveModel for ActiveModel {
    fn set_id(&mut self, id: Uuid) {
        self.id = ActiveValue::Set(id);
    }
}

impl TimestampedActiveModel for ActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone) {
        self.created_at = ActiveValue::Set(ts);
    }

    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone) {
        self.updated_at = ActiveValue::Set(ts);
    }
}

impl HasCreatedAtColumn for Entity {
    fn created_at_column() -> Column {
        Column::CreatedAt
    }
}
