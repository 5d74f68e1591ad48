use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scopes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_on_scope::Entity")]
    UserOnScope,
}

impl Related<super::user_on_scope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserOnScope.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
