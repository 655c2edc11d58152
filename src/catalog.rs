//! Creature catalog access.
//!
//! The catalog is written once by [`import`] from a JSON file and is read-only
//! afterwards, apart from the cached tallies owned by [`crate::tally`].

use std::path::Path;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entity::pokemon::{self, EvolutionStage};
use crate::entity::vote;
use crate::error::{Error, Result};

/// One creature as it appears in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCreature {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    #[serde(default)]
    pub evolution_stage: EvolutionStage,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub generation: Option<String>,
}

/// Which way a vote went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Smash,
    Pass,
}

impl Action {
    pub fn is_smash(self) -> bool {
        matches!(self, Action::Smash)
    }

    pub fn from_smash(smash: bool) -> Self {
        if smash {
            Action::Smash
        } else {
            Action::Pass
        }
    }
}

/// Creature as served to the voting client, name capitalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatureView {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub smash_count: i32,
    pub pass_count: i32,
    /// The requesting user's existing vote, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<Action>,
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<pokemon::Model> {
    pokemon::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::CreatureNotFound(id))
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<pokemon::Model>> {
    Ok(pokemon::Entity::find()
        .order_by_asc(pokemon::Column::Id)
        .all(db)
        .await?)
}

/// Looks up `id` and, when a user is given, their vote on it.
pub async fn view<C: ConnectionTrait>(
    db: &C,
    id: i32,
    username: Option<&str>,
) -> Result<CreatureView> {
    let creature = find(db, id).await?;

    let user_vote = match username {
        Some(username) => vote::Entity::find()
            .filter(vote::Column::Username.eq(username))
            .filter(vote::Column::PokemonId.eq(id))
            .one(db)
            .await?
            .map(|v| Action::from_smash(v.smash)),
        None => None,
    };

    Ok(CreatureView {
        id: creature.id,
        name: creature.display_name(),
        image_url: creature.image_url,
        smash_count: creature.smash_count,
        pass_count: creature.pass_count,
        user_vote,
    })
}

/// Inserts or updates creatures by external id. Cached tallies of existing
/// rows are left alone.
pub async fn upsert<C: ConnectionTrait>(db: &C, creatures: Vec<NewCreature>) -> Result<usize> {
    let count = creatures.len();
    if count == 0 {
        return Ok(0);
    }

    let models = creatures.into_iter().map(|c| pokemon::ActiveModel {
        id: Set(c.id),
        name: Set(c.name),
        image_url: Set(c.image_url),
        smash_count: Set(0),
        pass_count: Set(0),
        evolution_stage: Set(c.evolution_stage),
        shape: Set(c.shape),
        color: Set(c.color),
        generation: Set(c.generation),
    });

    pokemon::Entity::insert_many(models)
        .on_conflict(
            OnConflict::column(pokemon::Column::Id)
                .update_columns([
                    pokemon::Column::Name,
                    pokemon::Column::ImageUrl,
                    pokemon::Column::EvolutionStage,
                    pokemon::Column::Shape,
                    pokemon::Column::Color,
                    pokemon::Column::Generation,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;

    Ok(count)
}

/// Reads a JSON array of [`NewCreature`] and upserts it.
pub async fn import<C: ConnectionTrait>(db: &C, path: &Path) -> Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Import(format!("{}: {e}", path.display())))?;
    let creatures: Vec<NewCreature> = serde_json::from_str(&raw)
        .map_err(|e| Error::Import(format!("{}: {e}", path.display())))?;

    let imported = upsert(db, creatures).await?;
    tracing::info!(imported, path = %path.display(), "imported catalog");
    Ok(imported)
}
