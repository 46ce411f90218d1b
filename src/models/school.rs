use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(300))", nullable)]
    pub address: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(20))", nullable)]
    pub phone: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub contact_email: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(50))", unique)]
    pub code: String,
    /// Weak reference to the assigned director. Kept without a foreign key
    /// constraint so an unassigned or removed director never blocks anything.
    pub director_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
