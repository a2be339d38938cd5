use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
    fn updated_at(&self) -> Option<DateTimeWithTimeZone>;
}
