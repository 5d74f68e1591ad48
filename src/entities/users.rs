use sea_orm::entity::prelude::*;

use crate::models::status::LockState;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Credential as handed over by the caller (already hashed).
    pub password: String,

    pub email: String,

    /// New accounts start locked until verified.
    pub is_locked: LockState,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_on_device::Entity")]
    UserOnDevice,
    #[sea_orm(has_many = "super::user_on_scope::Entity")]
    UserOnScope,
}

impl Related<super::user_on_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserOnDevice.def()
    }
}

impl Related<super::user_on_scope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserOnScope.def()
    }
}

impl Related<super::scopes::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_on_scope::Relation::Scope.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_on_scope::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
