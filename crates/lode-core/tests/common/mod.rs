//! Shared harness for the block-processing integration tests.

#![allow(dead_code)]

use lode_core::{BlockRules, ChainContext, ChainError, GameState, StepMovement, parse_move};
use lode_types::{
    BlockHash, BlockInput, ChainUpdate, CharacterId, Coord, CreateCharacter, GameStateSnapshot,
    Resource,
};
use lode_world::{RegionMap, SeededProspector};
use serde_json::Value;

/// Per-block extraction rate used by every test.
pub const RATE: u64 = 10;

/// Every prospect finds exactly this much `raw a`.
pub const DEPOSIT: u64 = 100;

/// A node: state plus chain context plus the fixed rules.
pub struct Node {
    pub state: GameState,
    pub chain: ChainContext,
    prospector: SeededProspector,
    branch: String,
}

impl Node {
    pub fn new() -> Self {
        Self::with_undo_depth(100)
    }

    pub fn with_undo_depth(undo_depth: u64) -> Self {
        let map = RegionMap::new(10).expect("valid region size");
        Self {
            state: GameState::new(map),
            chain: ChainContext::new(0, hash("main", 0), undo_depth),
            prospector: SeededProspector::new(7, vec![Resource::RawA], DEPOSIT, DEPOSIT),
            branch: "main".to_owned(),
        }
    }

    /// Hash naming follows the branch so that reorged blocks differ.
    pub fn switch_branch(&mut self, name: &str) {
        self.branch = name.to_owned();
    }

    pub fn height(&self) -> u64 {
        self.chain.tip().height
    }

    /// Build the next block on the current tip and attach it.
    pub fn mine_block(&mut self, creates: Vec<CreateCharacter>, moves: Vec<(u64, Value)>) {
        let block = self.next_block(creates, moves);
        let rules = BlockRules {
            rate: RATE,
            prospector: &self.prospector,
            movement: &StepMovement,
        };
        self.chain
            .attach(&mut self.state, &block, &rules)
            .expect("block attaches");
    }

    /// Build (without applying) the next block on the current tip.
    pub fn next_block(&self, creates: Vec<CreateCharacter>, moves: Vec<(u64, Value)>) -> BlockInput {
        let tip = self.chain.tip();
        let height = tip.height + 1;
        BlockInput {
            height,
            hash: hash(&self.branch, height),
            parent: tip.hash.clone(),
            creates,
            moves: moves
                .into_iter()
                .map(|(id, doc)| {
                    let id = CharacterId(id);
                    (id, parse_move(height, id, &doc))
                })
                .collect(),
        }
    }

    pub fn apply_update(&mut self, update: &ChainUpdate) {
        self.try_apply_update(update).expect("update applies");
    }

    pub fn try_apply_update(&mut self, update: &ChainUpdate) -> Result<(), ChainError> {
        let rules = BlockRules {
            rate: RATE,
            prospector: &self.prospector,
            movement: &StepMovement,
        };
        self.chain.apply_update(&mut self.state, update, &rules)
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        let tip = self.chain.tip();
        self.state.snapshot(tip.height, &tip.hash, RATE)
    }

    pub fn is_mining(&self, id: u64) -> bool {
        self.snapshot()
            .character(CharacterId(id))
            .expect("character exists")
            .mining
            .active
    }

    pub fn carried(&self, id: u64, resource: Resource) -> u64 {
        self.snapshot()
            .character(CharacterId(id))
            .and_then(|c| c.inventory.get(&resource).copied())
            .unwrap_or(0)
    }

    pub fn remaining_at(&self, coord: Coord) -> u64 {
        self.state.regions.remaining(self.state.map.region_id_for(coord))
    }
}

pub fn hash(branch: &str, height: u64) -> BlockHash {
    BlockHash::new(format!("{branch}-{height}"))
}

pub fn create(owner: &str, name: &str, x: i32, y: i32) -> CreateCharacter {
    CreateCharacter {
        owner: owner.to_owned(),
        name: name.to_owned(),
        position: Coord::new(x, y),
    }
}
