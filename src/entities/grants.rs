use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "grants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grant_on_device::Entity")]
    GrantOnDevice,
}

impl Related<super::grant_on_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GrantOnDevice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
