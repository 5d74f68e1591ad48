use sea_orm::entity::prelude::*;

use crate::models::status::{LockState, OnlineStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Caller-supplied stable identifier, distinct from `id`.
    #[sea_orm(unique)]
    pub device_id: String,

    pub name: String,

    pub os: Option<String>,

    pub device_type: Option<String>,

    pub engine: Option<String>,

    pub is_online: OnlineStatus,

    pub is_locked: LockState,

    /// PBKDF2-derived, written once at creation.
    pub device_secret: String,

    pub access_token_validate_seconds: Option<i64>,

    pub refresh_token_validate_seconds: Option<i64>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_on_device::Entity")]
    UserOnDevice,
    #[sea_orm(has_many = "super::grant_on_device::Entity")]
    GrantOnDevice,
}

impl Related<super::user_on_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserOnDevice.def()
    }
}

impl Related<super::grant_on_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GrantOnDevice.def()
    }
}

impl Related<super::grants::Entity> for Entity {
    fn to() -> RelationDef {
        super::grant_on_device::Relation::Grant.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::grant_on_device::Relation::Device.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
