//! Integration tests for the mining state machine driven through whole
//! blocks: prospecting, starting and stopping, shared depletion, drops and
//! the conservation law.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::arithmetic_side_effects,
    clippy::new_without_default,
    clippy::indexing_slicing
)]

mod common;

use common::{DEPOSIT, Node, RATE, create};
use lode_types::{Coord, Resource};
use serde_json::json;

const HOME: Coord = Coord::new(0, 0);

/// Two characters in the same region, one prospected deposit.
fn prospected_node() -> Node {
    let mut node = Node::new();
    node.mine_block(
        vec![create("domob", "a", 0, 0), create("andy", "b", 1, 0)],
        Vec::new(),
    );
    node.mine_block(Vec::new(), vec![(1, json!({"prospect": {}}))]);
    assert_eq!(node.remaining_at(HOME), DEPOSIT);
    node
}

fn assert_conserved(node: &Node) {
    let snap = node.snapshot();
    let carried: u64 = snap
        .characters
        .iter()
        .filter_map(|c| c.inventory.get(&Resource::RawA))
        .sum();
    let loot = snap.ground_loot_total(Resource::RawA);
    assert_eq!(
        carried + loot,
        DEPOSIT - node.remaining_at(HOME),
        "conservation broken at height {}",
        node.height()
    );
}

#[test]
fn observed_mining_scenario() {
    let mut node = prospected_node();

    // One character mines alone for a block.
    node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
    assert!(node.is_mining(1));
    assert!(!node.is_mining(2));
    assert_eq!(node.carried(1, Resource::RawA), RATE);

    // An empty waypoint list stops mining.
    node.mine_block(Vec::new(), vec![(1, json!({"wp": []}))]);
    assert!(!node.is_mining(1));
    assert_eq!(node.carried(1, Resource::RawA), RATE);

    // Both mine, dropping everything each block, until the region is empty.
    let mut blocks = 0;
    while node.remaining_at(HOME) > 0 {
        let drop_all = |id: u64| {
            let carried = node.carried(id, Resource::RawA);
            if carried == 0 {
                json!({"mine": {}})
            } else {
                json!({"mine": {}, "drop": {"f": {"raw a": carried}}})
            }
        };
        let moves = vec![(1, drop_all(1)), (2, drop_all(2))];
        node.mine_block(Vec::new(), moves);
        assert_conserved(&node);
        blocks += 1;
        assert!(blocks < 100, "region never depleted");
    }

    // Depletion stopped both miners in the same block.
    assert!(!node.is_mining(1));
    assert!(!node.is_mining(2));
    let region = node.state.map.region_id_for(HOME);
    let view = node.snapshot();
    assert!(view.region(region).is_some_and(|r| r.resource.is_none()));

    // Drop whatever is still carried.
    let moves = [1, 2]
        .into_iter()
        .filter_map(|id| {
            let carried = node.carried(id, Resource::RawA);
            (carried > 0).then(|| (id, json!({"drop": {"f": {"raw a": carried}}})))
        })
        .collect();
    node.mine_block(Vec::new(), moves);

    let snap = node.snapshot();
    assert_eq!(snap.ground_loot_total(Resource::RawA), DEPOSIT);
    assert!(snap.characters.iter().all(|c| c.inventory.is_empty()));
}

#[test]
fn reissuing_mine_keeps_mining() {
    let mut node = prospected_node();
    for n in 1..=3 {
        node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
        assert!(node.is_mining(1));
        assert_eq!(node.carried(1, Resource::RawA), RATE * n);
    }
}

#[test]
fn mining_continues_without_reissuing() {
    let mut node = prospected_node();
    node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
    node.mine_block(Vec::new(), Vec::new());
    assert!(node.is_mining(1));
    assert_eq!(node.carried(1, Resource::RawA), 2 * RATE);
}

#[test]
fn movement_stops_mining() {
    let mut node = prospected_node();
    node.mine_block(
        Vec::new(),
        vec![(1, json!({"mine": {}})), (2, json!({"mine": {}}))],
    );
    assert!(node.is_mining(1) && node.is_mining(2));

    // A walk inside the same region still stops mining.
    node.mine_block(
        Vec::new(),
        vec![(1, json!({"wp": [{"x": 2, "y": 2}, {"x": 3, "y": 3}]}))],
    );
    assert!(!node.is_mining(1));
    assert!(node.is_mining(2));

    // Still walking: mine is not honoured.
    node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
    assert!(!node.is_mining(1));

    // Arrived: mining can resume.
    node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
    assert!(node.is_mining(1));
    let snap = node.snapshot();
    let me = snap.character(lode_types::CharacterId(1)).expect("exists");
    assert_eq!(me.position, Coord::new(3, 3));
    assert!(me.waypoints.is_empty());
}

#[test]
fn waypoints_cancel_mine_in_the_same_move() {
    let mut node = prospected_node();
    node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
    assert!(node.is_mining(1));

    node.mine_block(Vec::new(), vec![(1, json!({"wp": [], "mine": {}}))]);
    assert!(!node.is_mining(1));
    assert_eq!(node.carried(1, Resource::RawA), RATE);
    assert_eq!(node.remaining_at(HOME), DEPOSIT - RATE);

    // An idle character sending both stays idle as well.
    node.mine_block(Vec::new(), vec![(2, json!({"mine": {}, "wp": []}))]);
    assert!(!node.is_mining(2));
    assert_eq!(node.carried(2, Resource::RawA), 0);
}

#[test]
fn mining_a_foreign_region_is_ignored() {
    let mut node = prospected_node();
    node.mine_block(vec![create("domob", "far", 55, 55)], Vec::new());
    node.mine_block(Vec::new(), vec![(3, json!({"mine": {}}))]);
    assert!(!node.is_mining(3));
    assert_eq!(node.remaining_at(HOME), DEPOSIT);
}

#[test]
fn prospecting_an_active_deposit_is_ignored() {
    let mut node = prospected_node();
    node.mine_block(Vec::new(), vec![(2, json!({"prospect": {}}))]);
    let region = node.state.map.region_id_for(HOME);
    let record = node.state.regions.record(region).expect("prospected");
    assert_eq!(record.prospection.character, lode_types::CharacterId(1));
    assert_eq!(record.remaining, DEPOSIT);
}

#[test]
fn depleted_region_can_be_prospected_again() {
    let mut node = prospected_node();
    while node.remaining_at(HOME) > 0 {
        node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
    }
    node.mine_block(Vec::new(), vec![(2, json!({"prospect": {}}))]);
    assert_eq!(node.remaining_at(HOME), DEPOSIT);
    assert_eq!(node.carried(1, Resource::RawA), DEPOSIT);
}

#[test]
fn pickup_moves_loot_between_characters() {
    let mut node = prospected_node();
    node.mine_block(Vec::new(), vec![(1, json!({"mine": {}}))]);
    node.mine_block(
        Vec::new(),
        vec![(1, json!({"wp": [], "drop": {"f": {"raw a": 4}}}))],
    );
    // Character 2 stands at (1, 0); walk over to the loot first.
    node.mine_block(Vec::new(), vec![(2, json!({"wp": [{"x": 0, "y": 0}]}))]);
    node.mine_block(Vec::new(), vec![(2, json!({"pu": {"f": {"raw a": 50}}}))]);

    assert_eq!(node.carried(1, Resource::RawA), RATE - 4);
    assert_eq!(node.carried(2, Resource::RawA), 4);
    assert_eq!(node.snapshot().ground_loot_total(Resource::RawA), 0);
    assert_conserved(&node);
}
