use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait HasCreatedAtColumn: sea_orm::EntityTrait {
    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}

/// Assigns a fresh id and stamps both timestamps on a row about to be inserted.
/// Ids are UUID v7, which sort in creation order within the process.
pub fn stamp_new<A>(active: &mut A)
where
    A: HasIdActiveModel + TimestampedActiveModel,
{
    let now = chrono::Utc::now().fixed_offset();
    active.set_id(uuid::Uuid::now_v7());
    active.set_created_at(now);
    active.set_updated_at(now);
}
