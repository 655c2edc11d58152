//! Vote recording.
//!
//! [`record_vote`] writes or flips a user's vote and refreshes the creature's
//! cached tally through [`tally::recompute`] inside the same transaction, so
//! the counters never drift from the vote log on the normal path.
//!
//! The first statement of every vote transaction is a write to the creature
//! row. On Postgres that holds the row lock until commit, so concurrent votes
//! on one creature count in turn. On SQLite it takes the database write lock
//! before any read, which lets the busy timeout apply instead of failing a
//! shared-to-write lock upgrade.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{self, Action};
use crate::entity::{pokemon, vote};
use crate::error::{Error, Result};
use crate::tally::{self, Tally};

/// What a call to [`record_vote`] did to the vote log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChange {
    /// First vote by this user on this creature.
    Created,
    /// The stored choice was reversed.
    Flipped,
    /// The user had already cast this choice; nothing was written.
    Unchanged,
    /// A concurrent request inserted this user's vote first.
    AlreadyVoted,
}

impl VoteChange {
    pub fn is_noop(self) -> bool {
        matches!(self, VoteChange::Unchanged | VoteChange::AlreadyVoted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub change: VoteChange,
    pub tally: Tally,
}

/// Records `username`'s `action` on creature `pokemon_id`.
///
/// Fails with [`crate::Error::CreatureNotFound`] for unknown ids. Revoting the same
/// choice is a no-op that reports the current counts.
pub async fn record_vote(
    db: &DatabaseConnection,
    username: &str,
    pokemon_id: i32,
    action: Action,
) -> Result<VoteOutcome> {
    let smash = action.is_smash();
    let txn = db.begin().await?;

    claim(&txn, pokemon_id).await?;
    let creature = catalog::find(&txn, pokemon_id).await?;
    let existing = vote::Entity::find()
        .filter(vote::Column::Username.eq(username))
        .filter(vote::Column::PokemonId.eq(pokemon_id))
        .one(&txn)
        .await?;

    let change = match existing {
        Some(current) if current.smash == smash => {
            txn.commit().await?;
            debug!(%username, pokemon_id, ?action, "vote unchanged");
            return Ok(VoteOutcome {
                change: VoteChange::Unchanged,
                tally: Tally::from(&creature),
            });
        }
        Some(current) => {
            let mut active_model = current.into_active_model();
            active_model.smash = Set(smash);
            active_model.update(&txn).await?;
            VoteChange::Flipped
        }
        None => {
            if !insert_vote(&txn, username, pokemon_id, smash).await? {
                txn.rollback().await?;
                return already_voted(db, username, pokemon_id).await;
            }
            VoteChange::Created
        }
    };

    let tally = tally::recompute(&txn, pokemon_id).await?;
    txn.commit().await?;

    info!(%username, pokemon_id, ?action, ?change, ?tally, "recorded vote");
    Ok(VoteOutcome { change, tally })
}

// No-op update of the creature row; zero matched rows means it doesn't exist.
async fn claim<C: ConnectionTrait>(db: &C, pokemon_id: i32) -> Result<()> {
    let claimed = pokemon::Entity::update_many()
        .col_expr(
            pokemon::Column::SmashCount,
            Expr::col(pokemon::Column::SmashCount).into(),
        )
        .filter(pokemon::Column::Id.eq(pokemon_id))
        .exec(db)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(Error::CreatureNotFound(pokemon_id));
    }
    Ok(())
}

/// Inserts a first vote. `Ok(false)` means the pair already has a vote.
async fn insert_vote<C: ConnectionTrait>(
    db: &C,
    username: &str,
    pokemon_id: i32,
    smash: bool,
) -> Result<bool> {
    let model = vote::ActiveModel {
        username: Set(username.to_string()),
        pokemon_id: Set(pokemon_id),
        smash: Set(smash),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    match model.insert(db).await {
        Ok(_) => Ok(true),
        Err(err) if is_unique_violation(&err) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Lost the race against a concurrent first vote; report the winner's counts.
async fn already_voted(
    db: &DatabaseConnection,
    username: &str,
    pokemon_id: i32,
) -> Result<VoteOutcome> {
    info!(%username, pokemon_id, "concurrent vote already recorded");
    let creature = catalog::find(db, pokemon_id).await?;
    Ok(VoteOutcome {
        change: VoteChange::AlreadyVoted,
        tally: Tally::from(&creature),
    })
}

/// Human-readable note for no-op votes.
pub fn noop_message(change: VoteChange, action: Action) -> Option<String> {
    let choice = match action {
        Action::Smash => "smash",
        Action::Pass => "pass",
    };
    match change {
        VoteChange::Unchanged => Some(format!("Already voted {choice} on this pokemon")),
        VoteChange::AlreadyVoted => Some("Already voted on this pokemon".to_string()),
        VoteChange::Created | VoteChange::Flipped => None,
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectOptions, Database, PaginatorTrait};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::catalog::NewCreature;
    use crate::entity::pokemon::EvolutionStage;
    use crate::migration::Migrator;

    async fn setup() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        catalog::upsert(
            &db,
            vec![NewCreature {
                id: 25,
                name: "pikachu".to_string(),
                image_url: "25.png".to_string(),
                evolution_stage: EvolutionStage::Middle,
                shape: None,
                color: None,
                generation: None,
            }],
        )
        .await
        .unwrap();
        db
    }

    fn vote_row(username: &str, smash: bool) -> vote::ActiveModel {
        vote::ActiveModel {
            username: Set(username.to_string()),
            pokemon_id: Set(25),
            smash: Set(smash),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }

    #[test]
    fn only_noops_carry_a_message() {
        assert!(noop_message(VoteChange::Created, Action::Smash).is_none());
        assert!(noop_message(VoteChange::Flipped, Action::Pass).is_none());
        assert_eq!(
            noop_message(VoteChange::Unchanged, Action::Pass).as_deref(),
            Some("Already voted pass on this pokemon")
        );
        assert!(VoteChange::AlreadyVoted.is_noop());
    }

    #[test]
    fn other_errors_are_not_unique_violations() {
        let err = DbErr::Custom("not a constraint".into());
        assert!(!is_unique_violation(&err));
    }

    #[tokio::test]
    async fn duplicate_vote_rows_are_unique_violations() {
        let db = setup().await;
        vote_row("ash", true).insert(&db).await.unwrap();

        let err = vote_row("ash", false).insert(&db).await.unwrap_err();
        assert!(is_unique_violation(&err), "{err:?}");
    }

    #[tokio::test]
    async fn insert_reports_an_existing_vote() {
        let db = setup().await;

        assert!(insert_vote(&db, "ash", 25, true).await.unwrap());
        assert!(!insert_vote(&db, "ash", 25, false).await.unwrap());
        assert!(insert_vote(&db, "misty", 25, false).await.unwrap());
        assert_eq!(vote::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn lost_insert_race_reports_already_voted() {
        let db = setup().await;
        vote_row("ash", true).insert(&db).await.unwrap();
        tally::recompute(&db, 25).await.unwrap();

        let outcome = already_voted(&db, "ash", 25).await.unwrap();
        assert_eq!(outcome.change, VoteChange::AlreadyVoted);
        assert_eq!(
            outcome.tally,
            Tally {
                smash_count: 1,
                pass_count: 0
            }
        );
    }

    #[tokio::test]
    async fn claiming_an_unknown_creature_fails() {
        let db = setup().await;

        assert!(claim(&db, 25).await.is_ok());
        assert!(matches!(
            claim(&db, 26).await,
            Err(Error::CreatureNotFound(26))
        ));
    }
}
