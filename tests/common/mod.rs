#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use smashpass::catalog::{self, NewCreature};
use smashpass::entity::pokemon::EvolutionStage;
use smashpass::migration::Migrator;

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// [`setup`] plus creatures `1..=count`.
pub async fn setup_with_catalog(count: i32) -> DatabaseConnection {
    let db = setup().await;
    catalog::upsert(&db, (1..=count).map(creature).collect())
        .await
        .expect("seed catalog");
    db
}

pub fn creature(id: i32) -> NewCreature {
    let (evolution_stage, shape, color) = match id % 4 {
        0 => (EvolutionStage::First, Some("quadruped"), Some("green")),
        1 => (EvolutionStage::Middle, Some("upright"), Some("red")),
        2 => (EvolutionStage::Last, Some("wings"), None),
        _ => (EvolutionStage::NoEvolution, None, Some("blue")),
    };

    NewCreature {
        id,
        name: format!("Creature{id}"),
        image_url: format!("https://img.example/{id}.png"),
        evolution_stage,
        shape: shape.map(str::to_string),
        color: color.map(str::to_string),
        generation: Some("generation-i".to_string()),
    }
}
