use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fleet_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: String,
    pub ping_format_id: i32,
    pub ping_group_id: Option<i32>,
    pub name: String,
    pub ping_cooldown: Option<i32>,
    pub ping_reminder: Option<i32>,
    pub max_pre_ping: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
