#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure pattern painter that proposes the initial population of the grid.
//!
//! The painter never touches the grid itself. It emits [`Placement`] values
//! for interior cells only; the world clears its buffers and stores them.

use std::{
    f64::consts::{PI, TAU},
    num::NonZeroU32,
};

use rand::Rng;
use rock_paper_core::{Cell, CellCoord, GridDimensions, InitialPattern, Species};

/// Single cell proposed by the painter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Interior location to populate.
    pub cell: CellCoord,
    /// State to store at the location.
    pub state: Cell,
}

/// Paints initial patterns into placement lists.
#[derive(Clone, Debug, Default)]
pub struct Seeding {
    occupied: Vec<bool>,
}

impl Seeding {
    /// Creates a painter with empty scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `out` and fills it with the placements for `pattern`.
    ///
    /// Every placement starts at `level`. `rng` is only consulted by
    /// [`InitialPattern::ScatterPoints`].
    pub fn paint<R: Rng>(
        &mut self,
        pattern: InitialPattern,
        dimensions: GridDimensions,
        level: NonZeroU32,
        rng: &mut R,
        out: &mut Vec<Placement>,
    ) {
        out.clear();
        match pattern {
            InitialPattern::Sectors => sectors(dimensions, level, out),
            InitialPattern::ScatterPoints { count } => {
                self.scatter(dimensions, count, level, rng, out);
            }
        }
    }

    /// Performs `count` placement attempts at random interior cells.
    ///
    /// An attempt that lands on a cell painted earlier in the same pass is
    /// dropped without retrying, so fewer than `count` points may result.
    fn scatter<R: Rng>(
        &mut self,
        dimensions: GridDimensions,
        count: u32,
        level: NonZeroU32,
        rng: &mut R,
        out: &mut Vec<Placement>,
    ) {
        self.occupied.clear();
        self.occupied.resize(dimensions.cell_count(), false);

        for _ in 0..count {
            let column = rng.gen_range(1..dimensions.width() - 1);
            let row = rng.gen_range(1..dimensions.height() - 1);
            let cell = CellCoord::new(column, row);
            let Some(index) = dimensions.index(cell) else {
                continue;
            };
            if self.occupied[index] {
                continue;
            }
            self.occupied[index] = true;

            let species = Species::LIVING[rng.gen_range(0..Species::LIVING.len())];
            out.push(Placement {
                cell,
                state: Cell::living(species, level),
            });
        }
    }
}

/// Splits the interior into three contiguous angular sectors around the centre.
fn sectors(dimensions: GridDimensions, level: NonZeroU32, out: &mut Vec<Placement>) {
    let centre_column = f64::from(dimensions.width() - 1) / 2.0;
    let centre_row = f64::from(dimensions.height() - 1) / 2.0;
    let sector_count = Species::LIVING.len();

    out.reserve(dimensions.interior_count());
    for cell in dimensions.interior() {
        let dx = f64::from(cell.column()) - centre_column;
        let dy = f64::from(cell.row()) - centre_row;
        let turn = (dy.atan2(dx) + PI) / TAU;
        let sector = ((turn * sector_count as f64) as usize).min(sector_count - 1);
        out.push(Placement {
            cell,
            state: Cell::living(Species::LIVING[sector], level),
        });
    }
}
