//! Boundary parsing of move documents and chain updates.
//!
//! Moves arrive as JSON objects such as
//! `{"mine": {}, "drop": {"f": {"raw a": 5}}}`. They are converted here,
//! once, into the closed [`CharacterMove`] type. A malformed part of a move
//! is dropped with a warning; the remaining parts are still honoured.
//!
//! Chain updates use the same JSON shape as [`ChainUpdate`] except that
//! each move is an untyped document. [`WireUpdate::into_update`] turns them
//! into typed updates.

use lode_types::{
    BlockHash, BlockInput, ChainUpdate, CharacterId, CharacterMove, Coord, CreateCharacter,
    Directive, FungibleMap, Resource,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// One character's untyped move within a block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireMove {
    /// The character issuing the move.
    pub character: CharacterId,
    /// The raw move document.
    #[serde(rename = "move")]
    pub document: Value,
}

/// A block as it arrives from the chain-follow collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireBlock {
    /// Block height.
    pub height: u64,
    /// Block hash.
    pub hash: BlockHash,
    /// Parent block hash.
    pub parent: BlockHash,
    /// Characters created in this block.
    #[serde(default)]
    pub creates: Vec<CreateCharacter>,
    /// Raw moves, in transaction order.
    #[serde(default)]
    pub moves: Vec<WireMove>,
}

/// A chain-follow signal with untyped moves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireUpdate {
    /// Hash of the new best block.
    pub best_hash: BlockHash,
    /// Whether the blocks replace part of the current chain.
    #[serde(default)]
    pub reorg: bool,
    /// Blocks to apply, oldest first.
    #[serde(default)]
    pub blocks: Vec<WireBlock>,
}

impl WireBlock {
    /// Parse every move document of the block.
    pub fn into_block(self) -> BlockInput {
        let height = self.height;
        let moves = self
            .moves
            .into_iter()
            .map(|m| (m.character, parse_move(height, m.character, &m.document)))
            .filter(|(_, mv)| !mv.is_empty())
            .collect();
        BlockInput {
            height: self.height,
            hash: self.hash,
            parent: self.parent,
            creates: self.creates,
            moves,
        }
    }
}

impl WireUpdate {
    /// Parse every block of the update.
    pub fn into_update(self) -> ChainUpdate {
        ChainUpdate {
            best_hash: self.best_hash,
            reorg: self.reorg,
            blocks: self.blocks.into_iter().map(WireBlock::into_block).collect(),
        }
    }
}

/// Parse one move document into a [`CharacterMove`].
///
/// `height` and `character` are only used for log context.
pub fn parse_move(height: u64, character: CharacterId, document: &Value) -> CharacterMove {
    let mut mv = CharacterMove::new();
    let Some(fields) = document.as_object() else {
        warn!(height, %character, "Move is not a JSON object, ignoring");
        return mv;
    };

    for (key, value) in fields {
        let directive = match key.as_str() {
            "prospect" => unit_directive(value, Directive::Prospect),
            "mine" => unit_directive(value, Directive::Mine),
            "wp" => parse_waypoints(value).map(Directive::Waypoints),
            "drop" => parse_fungible(height, character, value).map(Directive::Drop),
            "pu" => parse_fungible(height, character, value).map(Directive::Pickup),
            other => {
                debug!(height, %character, key = other, "Ignoring unrelated move field");
                continue;
            }
        };
        match directive {
            Some(directive) => mv.push(directive),
            None => warn!(height, %character, key = key.as_str(), "Malformed move part dropped"),
        }
    }
    mv
}

/// `{"mine": {}}` style directives carry an empty object.
fn unit_directive(value: &Value, directive: Directive) -> Option<Directive> {
    value.as_object().filter(|o| o.is_empty()).map(|_| directive)
}

fn parse_waypoints(value: &Value) -> Option<Vec<Coord>> {
    serde_json::from_value(value.clone()).ok()
}

/// `{"f": {"raw a": 5}}`. Unknown types and non-positive amounts are
/// skipped; an empty list is treated as malformed.
fn parse_fungible(height: u64, character: CharacterId, value: &Value) -> Option<FungibleMap> {
    let items: &Map<String, Value> = value.as_object()?.get("f")?.as_object()?;
    let mut out = FungibleMap::new();
    for (name, amount) in items {
        let resource = Resource::from_name(name);
        let amount = amount.as_u64().filter(|a| *a > 0);
        match (resource, amount) {
            (Some(resource), Some(amount)) => {
                out.insert(resource, amount);
            }
            _ => warn!(height, %character, item = name.as_str(), "Invalid fungible entry skipped"),
        }
    }
    (!out.is_empty()).then_some(out)
}
