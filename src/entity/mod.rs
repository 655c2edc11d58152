//! Database entity models for smashpass.
//!
//! These Sea-ORM entities define the relational schema: the creature catalog
//! with its cached tallies, the vote log, and the session table used by
//! [`DbSessionStore`](crate::DbSessionStore).

/// Creature catalog entries and their cached smash/pass counters.
pub mod pokemon;

/// Session records persisted by the `tower-sessions` store.
pub mod session;

/// One smash/pass vote per (username, creature) pair.
pub mod vote;
