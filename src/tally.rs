//! Cached smash/pass counters.
//!
//! `pokemon.smash_count` and `pokemon.pass_count` are a cache over the vote
//! log, never a source of truth. [`recompute`] rewrites one creature's cache
//! from live vote rows and is called by the vote recorder inside its
//! transaction; [`recompute_all`] repairs drift across the whole catalog.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::entity::{pokemon, vote};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub smash_count: i32,
    pub pass_count: i32,
}

impl From<&pokemon::Model> for Tally {
    fn from(creature: &pokemon::Model) -> Self {
        Self {
            smash_count: creature.smash_count,
            pass_count: creature.pass_count,
        }
    }
}

/// Outcome of a catalog-wide [`recompute_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    pub processed: usize,
    /// Creatures whose cached counters disagreed with the vote log.
    pub corrected: usize,
}

/// Counts live vote rows for one creature.
pub async fn count<C: ConnectionTrait>(db: &C, pokemon_id: i32) -> Result<Tally> {
    let smash = count_choice(db, pokemon_id, true).await?;
    let pass = count_choice(db, pokemon_id, false).await?;
    Ok(Tally {
        smash_count: smash,
        pass_count: pass,
    })
}

async fn count_choice<C: ConnectionTrait>(db: &C, pokemon_id: i32, smash: bool) -> Result<i32> {
    let n = vote::Entity::find()
        .filter(vote::Column::PokemonId.eq(pokemon_id))
        .filter(vote::Column::Smash.eq(smash))
        .count(db)
        .await?;
    Ok(i32::try_from(n).unwrap_or(i32::MAX))
}

/// Rewrites one creature's cached counters from the vote log and returns them.
pub async fn recompute<C: ConnectionTrait>(db: &C, pokemon_id: i32) -> Result<Tally> {
    let tally = count(db, pokemon_id).await?;
    store(db, pokemon_id, tally).await?;
    debug!(pokemon_id, ?tally, "recomputed tally");
    Ok(tally)
}

async fn store<C: ConnectionTrait>(db: &C, pokemon_id: i32, tally: Tally) -> Result<()> {
    pokemon::Entity::update_many()
        .col_expr(pokemon::Column::SmashCount, Expr::value(tally.smash_count))
        .col_expr(pokemon::Column::PassCount, Expr::value(tally.pass_count))
        .filter(pokemon::Column::Id.eq(pokemon_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Recomputes every creature in one transaction.
pub async fn recompute_all(db: &DatabaseConnection) -> Result<RecomputeReport> {
    let txn = db.begin().await?;
    let creatures = catalog::list(&txn).await?;
    let total = creatures.len();
    let mut report = RecomputeReport::default();

    for creature in &creatures {
        let live = count(&txn, creature.id).await?;
        let cached = Tally::from(creature);
        if live != cached {
            warn!(
                pokemon_id = creature.id,
                ?cached,
                ?live,
                "cached tally drifted from vote log"
            );
            store(&txn, creature.id, live).await?;
            report.corrected += 1;
        }

        report.processed += 1;
        if report.processed % 10 == 0 {
            info!("Processed {}/{} pokemon...", report.processed, total);
        }
    }

    txn.commit().await?;
    info!(
        processed = report.processed,
        corrected = report.corrected,
        "recalculated all pokemon stats"
    );
    Ok(report)
}
