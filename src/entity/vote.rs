//! Vote log entity.

use sea_orm::entity::prelude::*;

/// A single user's smash/pass choice on one creature.
///
/// A unique index on `(username, pokemon_id)` guarantees at most one row per
/// pair. Revotes update `smash` in place.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub pokemon_id: i32,
    /// `true` for smash, `false` for pass.
    pub smash: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pokemon::Entity",
        from = "Column::PokemonId",
        to = "super::pokemon::Column::Id",
        on_delete = "Cascade"
    )]
    Pokemon,
}

impl Related<super::pokemon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pokemon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
