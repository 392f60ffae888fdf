#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Predation rules that decide the next state of one cell.
//!
//! A rule reads the current generation through a [`GridView`] and writes the
//! pending generation through a [`GridWriter`]. It never reads what it wrote.
//! Besides the visited cell a successful strike also rewrites the level of the
//! striking neighbor; when several cells are struck by the same neighbor in
//! one tick, the write made last in row-major visiting order wins.

use std::num::NonZeroU32;

use rock_paper_core::{Algorithm, Cell, CellCoord, GridView, GridWriter, RuleParams};

/// Closed set of predation rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredationRule {
    /// Kills strengthen the predator; no aging and no maturity gate.
    Random,
    /// Cells age down to the edible level before they become vulnerable.
    Waves,
}

impl From<Algorithm> for PredationRule {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Random => Self::Random,
            Algorithm::Waves => Self::Waves,
        }
    }
}

impl PredationRule {
    /// Algorithm tag implemented by this rule.
    #[must_use]
    pub const fn algorithm(self) -> Algorithm {
        match self {
            Self::Random => Algorithm::Random,
            Self::Waves => Algorithm::Waves,
        }
    }

    /// Resolves the interaction between `cell` and `neighbor`.
    ///
    /// Both coordinates are read from `read`; every mutation lands in `write`.
    pub fn apply(
        self,
        cell: CellCoord,
        neighbor: CellCoord,
        read: &GridView<'_>,
        write: &mut GridWriter<'_>,
        params: &RuleParams,
    ) {
        match self {
            Self::Random => random(cell, neighbor, read, write, params),
            Self::Waves => waves(cell, neighbor, read, write, params),
        }
    }
}

fn random(
    cell: CellCoord,
    neighbor: CellCoord,
    read: &GridView<'_>,
    write: &mut GridWriter<'_>,
    params: &RuleParams,
) {
    let own = read.cell(cell);
    let other = read.cell(neighbor);

    // Empty or unset neighbors cannot prey on anything.
    if other.level() == 0 {
        return;
    }

    if own.is_empty() {
        write.set(cell, other);
        return;
    }

    if own.species().is_prey_of(other.species()) {
        write.set(cell, Cell::living(other.species(), params.initial_level()));
        let bumped = NonZeroU32::MIN.saturating_add(other.level());
        write.update(neighbor, |pending| pending.with_level(bumped));
    }
}

fn waves(
    cell: CellCoord,
    neighbor: CellCoord,
    read: &GridView<'_>,
    write: &mut GridWriter<'_>,
    params: &RuleParams,
) {
    let own = read.cell(cell);

    // Too young to be eaten: level strictly exceeds the edible level, which is
    // at least one, so aging by one keeps the cell alive.
    if own.level() > params.edible_level() {
        write.set(cell, own.aged());
        return;
    }

    let other = read.cell(neighbor);
    if other.level() == 0 {
        return;
    }

    if own.is_empty() {
        write.set(cell, other);
        return;
    }

    let outranked = !params.young_banquet() || other.level() > own.level();
    if own.species().is_prey_of(other.species()) && outranked {
        let initial = params.initial_level();
        write.set(cell, Cell::living(other.species(), initial));
        write.update(neighbor, |pending| pending.with_level(initial));
    } else {
        write.set(cell, own.aged());
    }
}
