//! Read-only reporting over the vote log.
//!
//! Counts here are always computed from vote rows, not from the cached
//! tallies on `pokemon`.
//!
//! "Most smashes" and "most passes" break ties by taking the
//! lexicographically smallest username among the users sharing the highest
//! count.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::catalog;
use crate::entity::pokemon::{self, EvolutionStage};
use crate::entity::vote;
use crate::error::Result;

/// Bucket for creatures missing a metadata field.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCount {
    pub username: String,
    pub count: usize,
}

/// One creature's row in the global gallery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatureStats {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub smash_count: usize,
    pub pass_count: usize,
    pub pending_count: usize,
    /// Percentages of all known users, one decimal.
    pub smash_rate: f64,
    pub pass_rate: f64,
    pub pending_rate: f64,
    pub smash_users: Vec<String>,
    pub pass_users: Vec<String>,
    pub pending_users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gallery {
    /// Every username that has voted at least once, sorted.
    pub usernames: Vec<String>,
    pub total_users: usize,
    pub most_smashes: Option<UserCount>,
    pub most_passes: Option<UserCount>,
    pub pokemon: Vec<CreatureStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatureRef {
    pub id: i32,
    pub name: String,
    pub image_url: String,
}

impl From<&pokemon::Model> for CreatureRef {
    fn from(creature: &pokemon::Model) -> Self {
        Self {
            id: creature.id,
            name: creature.name.clone(),
            image_url: creature.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub count: usize,
    pub pokemon: Vec<CreatureRef>,
}

impl Bucket {
    fn push(&mut self, creature: &pokemon::Model) {
        self.count += 1;
        self.pokemon.push(CreatureRef::from(creature));
    }
}

/// Per-user breakdown. The groupings only cover creatures the user smashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub username: String,
    pub total_votes: usize,
    pub smash_count: usize,
    pub pass_count: usize,
    /// Always holds all four stages, empty or not.
    pub evolution: BTreeMap<EvolutionStage, Bucket>,
    pub shape: BTreeMap<String, Bucket>,
    pub color: BTreeMap<String, Bucket>,
    pub generation: BTreeMap<String, Bucket>,
}

#[derive(Default)]
struct Voters {
    smash: Vec<String>,
    pass: Vec<String>,
}

pub async fn gallery<C: ConnectionTrait>(db: &C) -> Result<Gallery> {
    let creatures = catalog::list(db).await?;
    let votes = vote::Entity::find()
        .order_by_asc(vote::Column::Id)
        .all(db)
        .await?;

    let mut by_creature: HashMap<i32, Voters> = HashMap::new();
    let mut smashes: BTreeMap<String, usize> = BTreeMap::new();
    let mut passes: BTreeMap<String, usize> = BTreeMap::new();
    let mut usernames = BTreeSet::new();

    for v in votes {
        let voters = by_creature.entry(v.pokemon_id).or_default();
        if v.smash {
            *smashes.entry(v.username.clone()).or_default() += 1;
            voters.smash.push(v.username.clone());
        } else {
            *passes.entry(v.username.clone()).or_default() += 1;
            voters.pass.push(v.username.clone());
        }
        usernames.insert(v.username);
    }

    let usernames: Vec<String> = usernames.into_iter().collect();
    let total_users = usernames.len();

    let pokemon = creatures
        .into_iter()
        .map(|creature| {
            let voters = by_creature.remove(&creature.id).unwrap_or_default();
            let pending_users: Vec<String> = usernames
                .iter()
                .filter(|u| !voters.smash.contains(*u) && !voters.pass.contains(*u))
                .cloned()
                .collect();

            CreatureStats {
                id: creature.id,
                name: creature.display_name(),
                image_url: creature.image_url,
                smash_count: voters.smash.len(),
                pass_count: voters.pass.len(),
                pending_count: pending_users.len(),
                smash_rate: rate(voters.smash.len(), total_users),
                pass_rate: rate(voters.pass.len(), total_users),
                pending_rate: rate(pending_users.len(), total_users),
                smash_users: voters.smash,
                pass_users: voters.pass,
                pending_users,
            }
        })
        .collect();

    Ok(Gallery {
        usernames,
        total_users,
        most_smashes: top_user(&smashes),
        most_passes: top_user(&passes),
        pokemon,
    })
}

/// Breakdown for one username. Unknown usernames produce all-zero stats.
pub async fn user_stats<C: ConnectionTrait>(db: &C, username: &str) -> Result<UserStats> {
    let votes = vote::Entity::find()
        .filter(vote::Column::Username.eq(username))
        .find_also_related(pokemon::Entity)
        .order_by_asc(vote::Column::Id)
        .all(db)
        .await?;

    let mut stats = UserStats {
        username: username.to_string(),
        total_votes: votes.len(),
        smash_count: 0,
        pass_count: 0,
        evolution: [
            EvolutionStage::First,
            EvolutionStage::Middle,
            EvolutionStage::Last,
            EvolutionStage::NoEvolution,
        ]
        .into_iter()
        .map(|stage| (stage, Bucket::default()))
        .collect(),
        shape: BTreeMap::new(),
        color: BTreeMap::new(),
        generation: BTreeMap::new(),
    };

    for (v, creature) in votes {
        if !v.smash {
            stats.pass_count += 1;
            continue;
        }
        stats.smash_count += 1;

        // The foreign key cascades, so a vote without its creature is unreachable.
        let Some(creature) = creature else { continue };

        stats
            .evolution
            .entry(creature.evolution_stage)
            .or_default()
            .push(&creature);
        for (groups, key) in [
            (&mut stats.shape, &creature.shape),
            (&mut stats.color, &creature.color),
            (&mut stats.generation, &creature.generation),
        ] {
            let key = key.as_deref().unwrap_or(UNKNOWN).to_string();
            groups.entry(key).or_default().push(&creature);
        }
    }

    Ok(stats)
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

// BTreeMap iterates by username, and only a strictly greater count replaces
// the leader.
fn top_user(counts: &BTreeMap<String, usize>) -> Option<UserCount> {
    let mut best: Option<(&String, usize)> = None;
    for (username, &count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((username, count));
        }
    }
    best.map(|(username, count)| UserCount {
        username: username.clone(),
        count,
    })
}
