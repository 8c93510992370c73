use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    /// Release year kept as a string, matching the inbound payload shape.
    pub year: String,

    pub genre: String,

    /// JSON array of {actor_name, character_name} objects.
    pub actors: String,

    pub image_url: String,

    pub created_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Reviews reference movies by bare id value; there is deliberately no
    // database-level foreign key, so dangling reviews are representable.
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
