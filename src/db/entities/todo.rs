use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    pub content: String,
    pub title: String,
    pub description: String,
    pub date: DateTimeWithTimeZone,
}

impl ActiveModelBehavior for ActiveModel {}
