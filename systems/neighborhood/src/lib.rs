#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Neighbor selection strategies consulted once per visited cell.
//!
//! Every strategy yields offsets whose components lie in `-1..=1`. The zero
//! offset is a legal outcome for the random strategies; a cell that picks
//! itself simply finds nothing to do.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rock_paper_core::{NeighborMode, Offset};

/// Clockwise ring of the eight Moore offsets replayed by [`FixedCycle`].
pub const CLOCKWISE_RING: [Offset; 8] = [
    Offset::new(1, 1),
    Offset::new(1, 0),
    Offset::new(1, -1),
    Offset::new(0, -1),
    Offset::new(-1, -1),
    Offset::new(-1, 0),
    Offset::new(-1, 1),
    Offset::new(0, 1),
];

const RING_MASK: usize = CLOCKWISE_RING.len() - 1;

/// Active neighbor strategy.
#[derive(Clone, Debug)]
pub enum NeighborPicker {
    /// Fresh uniform draw per visit.
    UniformRandom(UniformRandom),
    /// Shared cursor over [`CLOCKWISE_RING`].
    FixedCycle(FixedCycle),
    /// Shared cursor over a pool sampled once.
    PreRandomCycle(PreRandomCycle),
}

impl NeighborPicker {
    /// Builds the strategy for `mode`.
    ///
    /// `pool_size` only affects [`NeighborMode::PreRandomCycle`]. `seed` feeds
    /// both random strategies; without one they draw from OS entropy.
    #[must_use]
    pub fn for_mode(mode: NeighborMode, pool_size: u32, seed: Option<u64>) -> Self {
        match mode {
            NeighborMode::UniformRandom => Self::UniformRandom(UniformRandom::new(seeded_rng(seed))),
            NeighborMode::FixedCycle => Self::FixedCycle(FixedCycle::default()),
            NeighborMode::PreRandomCycle => {
                let mut rng = seeded_rng(seed);
                Self::PreRandomCycle(PreRandomCycle::sample(pool_size, &mut rng))
            }
        }
    }

    /// Mode implemented by this picker.
    #[must_use]
    pub const fn mode(&self) -> NeighborMode {
        match self {
            Self::UniformRandom(_) => NeighborMode::UniformRandom,
            Self::FixedCycle(_) => NeighborMode::FixedCycle,
            Self::PreRandomCycle(_) => NeighborMode::PreRandomCycle,
        }
    }

    /// Offset for the next visited cell.
    pub fn next_offset(&mut self) -> Offset {
        match self {
            Self::UniformRandom(picker) => picker.next_offset(),
            Self::FixedCycle(picker) => picker.next_offset(),
            Self::PreRandomCycle(picker) => picker.next_offset(),
        }
    }
}

/// Draws `dx` and `dy` independently and uniformly from `-1..=1`.
pub fn sample_offset<R: Rng>(rng: &mut R) -> Offset {
    Offset::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1))
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Uniform draw over the nine offsets, self included.
#[derive(Clone, Debug)]
pub struct UniformRandom {
    rng: ChaCha8Rng,
}

impl UniformRandom {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Draws the next offset.
    pub fn next_offset(&mut self) -> Offset {
        sample_offset(&mut self.rng)
    }
}

/// Deterministic walk around [`CLOCKWISE_RING`], one step per visit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedCycle {
    cursor: usize,
}

impl FixedCycle {
    /// Starts the walk at `cursor` (taken modulo the ring length).
    #[must_use]
    pub const fn starting_at(cursor: usize) -> Self {
        Self {
            cursor: cursor & RING_MASK,
        }
    }

    /// Ring position that the next visit will use.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the offset at the cursor and advances it.
    pub fn next_offset(&mut self) -> Offset {
        let offset = CLOCKWISE_RING[self.cursor];
        self.cursor = (self.cursor + 1) & RING_MASK;
        offset
    }
}

/// Pool of offsets sampled once and replayed cyclically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreRandomCycle {
    pool: Vec<Offset>,
    cursor: usize,
    mask: usize,
}

impl PreRandomCycle {
    /// Samples a pool of `size` offsets from `rng`.
    ///
    /// Sizes that are not a power of two are rounded up to the next one so the
    /// cursor can wrap with a mask.
    #[must_use]
    pub fn sample<R: Rng>(size: u32, rng: &mut R) -> Self {
        let len = usize::try_from(size.max(1).next_power_of_two()).unwrap_or(1);
        let pool: Vec<Offset> = (0..len).map(|_| sample_offset(rng)).collect();
        Self {
            pool,
            cursor: 0,
            mask: len - 1,
        }
    }

    /// Sampled offsets in replay order.
    #[must_use]
    pub fn pool(&self) -> &[Offset] {
        &self.pool
    }

    /// Returns the offset at the cursor and advances it.
    pub fn next_offset(&mut self) -> Offset {
        let offset = self.pool[self.cursor];
        self.cursor = (self.cursor + 1) & self.mask;
        offset
    }
}
