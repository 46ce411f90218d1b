use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A person known to the system: student, teacher, director or legal
/// guardian. One table with a role discriminator replaces four parallel
/// per-role tables with copy-pasted lookup logic.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "principals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(120))", unique)]
    pub email: String,
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub password_hash: String,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub role: String,
    pub school_id: Option<i32>,
    pub class_group_id: Option<i32>,
    /// For students: the principal id of their legal guardian.
    pub guardian_id: Option<i32>,
    pub active: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id"
    )]
    School,
    #[sea_orm(
        belongs_to = "super::class_group::Entity",
        from = "Column::ClassGroupId",
        to = "super::class_group::Column::Id"
    )]
    ClassGroup,
}

impl ActiveModelBehavior for ActiveModel {}

/// Role tag stored in `principals.role`, with the capability set each role
/// carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Director,
    Guardian,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Director => "director",
            Role::Guardian => "guardian",
        }
    }

    /// May open an incident conversation and file a report.
    pub fn can_report(&self) -> bool {
        matches!(self, Role::Student)
    }

    /// May list reports, see stats and change report status.
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Teacher | Role::Director)
    }

    /// May see the guardian-facing convivencia summary.
    pub fn can_guardian_view(&self) -> bool {
        matches!(self, Role::Guardian)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "director" => Ok(Role::Director),
            "guardian" => Ok(Role::Guardian),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

impl Model {
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}
