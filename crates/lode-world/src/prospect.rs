//! Prospecting outcomes.
//!
//! What a prospector finds is decided by a [`Prospector`]. The default
//! [`SeededProspector`] is a pure function of the world seed, the region id
//! and the block height, so every node finds the same deposit.
//!
//! # Determinism
//!
//! The outcome is drawn from a `xorshift64` generator seeded from
//! `(world_seed, region, height)`. No process-local randomness is involved.

use lode_types::{RegionId, Resource};

/// A prospecting result: deposit type and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    /// The resource found.
    pub resource: Resource,
    /// Units found.
    pub amount: u64,
}

/// Decides what is found when a region is prospected.
pub trait Prospector {
    /// The deposit found in `region` by a prospection confirmed at `height`.
    ///
    /// Returns `None` if nothing is found.
    fn prospect(&self, region: RegionId, height: u64) -> Option<Deposit>;
}

/// Deterministic prospector drawing from a configured resource list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededProspector {
    world_seed: u64,
    resources: Vec<Resource>,
    min_amount: u64,
    max_amount: u64,
}

impl SeededProspector {
    /// Create a prospector.
    ///
    /// Amounts are drawn uniformly from `min_amount..=max_amount`; if the
    /// bounds are swapped they are reordered.
    pub fn new(world_seed: u64, resources: Vec<Resource>, min_amount: u64, max_amount: u64) -> Self {
        let (min_amount, max_amount) = if min_amount <= max_amount {
            (min_amount, max_amount)
        } else {
            (max_amount, min_amount)
        };
        Self {
            world_seed,
            resources,
            min_amount,
            max_amount,
        }
    }
}

impl Prospector for SeededProspector {
    fn prospect(&self, region: RegionId, height: u64) -> Option<Deposit> {
        let count = u64::try_from(self.resources.len()).ok()?;
        if count == 0 || self.max_amount == 0 {
            return None;
        }

        let first = deterministic_random(self.world_seed, region.into_inner(), height);
        let second = deterministic_random(first, region.into_inner(), height);

        let index = usize::try_from(first.checked_rem(count)?).ok()?;
        let resource = *self.resources.get(index)?;

        let span = self.max_amount.checked_sub(self.min_amount)?;
        let offset = match span.checked_add(1) {
            Some(width) => second.checked_rem(width)?,
            // Full u64 range.
            None => second,
        };
        let amount = self.min_amount.checked_add(offset)?.max(1);

        Some(Deposit { resource, amount })
    }
}

/// Deterministic pseudo-random number generator using `xorshift64`.
///
/// Mixes the seed, region and height so that each `(seed, region, height)`
/// triple yields its own value. The same inputs always produce the same
/// output.
const fn deterministic_random(seed: u64, region: u64, height: u64) -> u64 {
    // 0x517cc1b727220a95 and 0x9e3779b97f4a7c15 are well-known mixing constants.
    let mut state = seed
        .wrapping_add(region.wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add(height.wrapping_mul(0x517c_c1b7_2722_0a95));

    if state == 0 {
        state = 0xdead_beef_cafe_babe;
    }

    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;

    state
}
