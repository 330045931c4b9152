use sea_orm::{ActiveValue, entity::prelude::*};

use crate::db::dao::base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "DateTime")]
    pub start_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "DateTime", default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "DateTime", default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(has_many)]
    pub tasks: HasMany<super::task::Entity>,
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
