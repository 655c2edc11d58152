mod common;

use smashpass::catalog::Action;
use smashpass::entity::pokemon::EvolutionStage;
use smashpass::recorder::record_vote;
use smashpass::stats::{self, UserCount};

#[tokio::test]
async fn gallery_and_user_stats_reflect_votes() {
    let db = common::setup_with_catalog(6).await;
    record_vote(&db, "ash", 1, Action::Smash).await.unwrap();
    record_vote(&db, "ash", 4, Action::Pass).await.unwrap();

    let gallery = stats::gallery(&db).await.unwrap();
    let first = &gallery.pokemon[0];
    let fourth = &gallery.pokemon[3];

    assert_eq!(gallery.pokemon.len(), 6);
    assert_eq!(first.id, 1);
    assert!(first.smash_count >= 1);
    assert!(first.smash_users.contains(&"ash".to_string()));
    assert_eq!(fourth.id, 4);
    assert!(fourth.pass_count >= 1);
    assert!(fourth.pass_users.contains(&"ash".to_string()));

    let ash = stats::user_stats(&db, "ash").await.unwrap();
    assert_eq!(ash.total_votes, 2);
    assert_eq!(ash.smash_count, 1);
    assert_eq!(ash.pass_count, 1);
}

#[tokio::test]
async fn pending_users_and_rates() {
    let db = common::setup_with_catalog(3).await;
    record_vote(&db, "ash", 1, Action::Smash).await.unwrap();
    record_vote(&db, "misty", 1, Action::Pass).await.unwrap();
    record_vote(&db, "brock", 2, Action::Smash).await.unwrap();

    let gallery = stats::gallery(&db).await.unwrap();

    assert_eq!(gallery.usernames, vec!["ash", "brock", "misty"]);
    assert_eq!(gallery.total_users, 3);

    let first = &gallery.pokemon[0];
    assert_eq!(first.pending_users, vec!["brock"]);
    assert_eq!(first.smash_rate, 33.3);
    assert_eq!(first.pass_rate, 33.3);
    assert_eq!(first.pending_rate, 33.3);

    let third = &gallery.pokemon[2];
    assert_eq!(third.smash_count + third.pass_count, 0);
    assert_eq!(third.pending_count, 3);
    assert_eq!(third.pending_rate, 100.0);
}

#[tokio::test]
async fn most_smashes_and_passes_break_ties_by_username() {
    let db = common::setup_with_catalog(4).await;
    for id in [1, 2] {
        record_vote(&db, "misty", id, Action::Smash).await.unwrap();
        record_vote(&db, "brock", id, Action::Smash).await.unwrap();
    }
    record_vote(&db, "ash", 1, Action::Pass).await.unwrap();

    let gallery = stats::gallery(&db).await.unwrap();

    assert_eq!(
        gallery.most_smashes,
        Some(UserCount {
            username: "brock".to_string(),
            count: 2
        })
    );
    assert_eq!(
        gallery.most_passes,
        Some(UserCount {
            username: "ash".to_string(),
            count: 1
        })
    );
}

#[tokio::test]
async fn empty_store_has_no_leaders() {
    let db = common::setup_with_catalog(2).await;

    let gallery = stats::gallery(&db).await.unwrap();

    assert_eq!(gallery.total_users, 0);
    assert_eq!(gallery.most_smashes, None);
    assert_eq!(gallery.pokemon[0].smash_rate, 0.0);
}

#[tokio::test]
async fn user_breakdown_groups_smashed_creatures() {
    let db = common::setup_with_catalog(8).await;
    // Fixture metadata cycles on id % 4.
    for id in [1, 2, 3, 5] {
        record_vote(&db, "ash", id, Action::Smash).await.unwrap();
    }
    record_vote(&db, "ash", 4, Action::Pass).await.unwrap();

    let ash = stats::user_stats(&db, "ash").await.unwrap();

    assert_eq!(ash.total_votes, 5);
    assert_eq!(ash.smash_count, 4);
    assert_eq!(ash.evolution[&EvolutionStage::Middle].count, 2);
    assert_eq!(ash.evolution[&EvolutionStage::Last].count, 1);
    assert_eq!(ash.evolution[&EvolutionStage::NoEvolution].count, 1);
    assert_eq!(ash.evolution[&EvolutionStage::First].count, 0);

    let middle_ids: Vec<i32> = ash.evolution[&EvolutionStage::Middle]
        .pokemon
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(middle_ids, vec![1, 5]);

    assert_eq!(ash.shape["upright"].count, 2);
    assert_eq!(ash.shape["unknown"].count, 1);
    assert_eq!(ash.color["unknown"].count, 1);
    assert_eq!(ash.generation["generation-i"].count, 4);
    assert!(!ash.shape.contains_key("quadruped"));
}

#[tokio::test]
async fn unknown_user_gets_zero_counts() {
    let db = common::setup_with_catalog(3).await;
    record_vote(&db, "ash", 1, Action::Smash).await.unwrap();

    let nobody = stats::user_stats(&db, "nobody").await.unwrap();

    assert_eq!(nobody.total_votes, 0);
    assert_eq!(nobody.smash_count, 0);
    assert_eq!(nobody.pass_count, 0);
    assert_eq!(nobody.evolution.len(), 4);
    assert!(nobody.evolution.values().all(|b| b.count == 0));
    assert!(nobody.shape.is_empty());
    assert!(nobody.color.is_empty());
    assert!(nobody.generation.is_empty());
}
