//! Choosing which creature to show a user next.
//!
//! Both policies only ever offer creatures the user has not voted on yet.

use std::collections::HashSet;
use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entity::{pokemon, vote};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Lowest unvoted id first.
    Sequential,
    /// Uniformly random among unvoted creatures.
    #[default]
    Random,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(SelectionPolicy::Sequential),
            "random" => Ok(SelectionPolicy::Random),
            other => Err(format!("expected `sequential` or `random`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// External id of the creature to show.
    Next(i32),
    /// Nothing left to vote on. The sequential policy suggests where to start
    /// browsing again.
    AllVoted { restart_at: Option<i32> },
}

#[async_trait]
pub trait Selector: Send + Sync + Debug {
    async fn select(&self, db: &DatabaseConnection, username: &str) -> Result<Selection>;
}

/// Scans external ids `1..=catalog_size` in order.
///
/// Ids missing from the catalog table are skipped, so every id offered can be
/// looked up.
#[derive(Debug, Clone, Copy)]
pub struct Sequential {
    pub catalog_size: i32,
}

#[async_trait]
impl Selector for Sequential {
    async fn select(&self, db: &DatabaseConnection, username: &str) -> Result<Selection> {
        let voted = voted_ids(db, username).await?;
        let ids = catalog_ids(db, Some(self.catalog_size)).await?;
        Ok(first_unvoted(&ids, &voted))
    }
}

fn first_unvoted(ids: &[i32], voted: &HashSet<i32>) -> Selection {
    match ids.iter().find(|id| !voted.contains(id)) {
        Some(&id) => Selection::Next(id),
        None => Selection::AllVoted { restart_at: Some(1) },
    }
}

/// Samples uniformly from the creatures in the catalog the user has not
/// voted on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Random;

#[async_trait]
impl Selector for Random {
    async fn select(&self, db: &DatabaseConnection, username: &str) -> Result<Selection> {
        let voted = voted_ids(db, username).await?;
        let available: Vec<i32> = catalog_ids(db, None)
            .await?
            .into_iter()
            .filter(|id| !voted.contains(id))
            .collect();

        let picked = available.choose(&mut rand::thread_rng()).copied();
        Ok(match picked {
            Some(id) => Selection::Next(id),
            None => Selection::AllVoted { restart_at: None },
        })
    }
}

pub fn for_policy(policy: SelectionPolicy, catalog_size: i32) -> Arc<dyn Selector> {
    match policy {
        SelectionPolicy::Sequential => Arc::new(Sequential { catalog_size }),
        SelectionPolicy::Random => Arc::new(Random),
    }
}

// Catalog ids in ascending order, optionally capped at `max_id`.
async fn catalog_ids(db: &DatabaseConnection, max_id: Option<i32>) -> Result<Vec<i32>> {
    let mut query = pokemon::Entity::find()
        .select_only()
        .column(pokemon::Column::Id)
        .order_by_asc(pokemon::Column::Id);
    if let Some(max_id) = max_id {
        query = query.filter(pokemon::Column::Id.between(1, max_id));
    }
    Ok(query.into_tuple::<i32>().all(db).await?)
}

async fn voted_ids(db: &DatabaseConnection, username: &str) -> Result<HashSet<i32>> {
    let ids = vote::Entity::find()
        .select_only()
        .column(vote::Column::PokemonId)
        .filter(vote::Column::Username.eq(username))
        .into_tuple::<i32>()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}
