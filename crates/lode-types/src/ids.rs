//! Type-safe identifier wrappers.
//!
//! Every entity the processor tracks has a strongly-typed ID so that
//! character and region identifiers can never be mixed up at compile time.
//! Unlike wall-clock based identifiers, all IDs here are plain integers
//! derived from consensus data (creation order, map coordinates), so two
//! nodes processing the same chain always assign the same IDs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Return the inner integer value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a character, assigned in creation order.
    CharacterId
}

define_id! {
    /// Stable identifier for a region (a cell of the world map).
    ///
    /// Derived from coordinates by the region map; all coordinates inside
    /// the same cell resolve to the same id.
    RegionId
}

impl CharacterId {
    /// The id given to the very first character ever created.
    pub const FIRST: Self = Self(1);

    /// Return the id following this one, or `None` on overflow.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

/// Hash of a block on the followed chain.
///
/// Treated as an opaque string; the processor only compares hashes for
/// equality to decide whether a block attaches to the current tip.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct BlockHash(pub String);

impl BlockHash {
    /// Wrap a hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }
}

impl core::fmt::Display for BlockHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
