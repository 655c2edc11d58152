//! Creature catalog entity.
//!
//! Each row is one creature keyed by its stable external catalog id. The
//! `smash_count` and `pass_count` columns are a cache over the `vote` table and
//! are only ever written by [`crate::tally`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a creature sits in its evolution chain.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvolutionStage {
    #[sea_orm(string_value = "FIRST")]
    First,
    #[sea_orm(string_value = "MIDDLE")]
    Middle,
    #[sea_orm(string_value = "LAST")]
    Last,
    /// The creature does not evolve.
    #[default]
    #[sea_orm(string_value = "NONE")]
    #[serde(rename = "NONE")]
    NoEvolution,
}

/// Sea-ORM entity model representing one catalog creature.
///
/// # Database Schema
///
/// | Column          | Type              | Description                          |
/// |-----------------|-------------------|--------------------------------------|
/// | id              | INTEGER (PK)      | External catalog id                  |
/// | name            | VARCHAR(100)      | Display name                         |
/// | image_url       | TEXT              | Artwork URL                          |
/// | smash_count     | INTEGER           | Cached number of smash votes         |
/// | pass_count      | INTEGER           | Cached number of pass votes          |
/// | evolution_stage | VARCHAR(10)       | `FIRST`, `MIDDLE`, `LAST` or `NONE`  |
/// | shape           | VARCHAR(50) NULL  | Body shape                           |
/// | color           | VARCHAR(20) NULL  | Primary color                        |
/// | generation      | VARCHAR(20) NULL  | Generation the creature debuted in   |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pokemon")]
pub struct Model {
    /// The external catalog id. Stable across re-imports.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    pub smash_count: i32,
    pub pass_count: i32,
    pub evolution_stage: EvolutionStage,
    pub shape: Option<String>,
    pub color: Option<String>,
    pub generation: Option<String>,
}

impl Model {
    /// Name as shown to voters: first letter upper case, the rest lower case.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    pub fn total_votes(&self) -> i32 {
        self.smash_count + self.pass_count
    }

    /// Share of cached votes that are smashes, rounded to two decimals.
    pub fn smash_percentage(&self) -> f64 {
        let total = self.total_votes();
        if total == 0 {
            return 0.0;
        }
        (f64::from(self.smash_count) / f64::from(total) * 10_000.0).round() / 100.0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
