#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rock Paper automaton.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems read the grid exclusively through [`GridView`] and write
//! the next generation exclusively through [`GridWriter`].

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest admissible grid side; anything narrower leaves no interior.
pub const MIN_GRID_SIDE: u32 = 3;

/// Level assigned to freshly colonized or captured cells unless configured otherwise.
pub const DEFAULT_INITIAL_LEVEL: u32 = 30;

/// Level at or below which a cell becomes vulnerable under the waves rule.
pub const DEFAULT_EDIBLE_LEVEL: u32 = 10;

/// Number of offsets sampled into the pre-random neighbor pool.
pub const DEFAULT_POOL_SIZE: u32 = 128;

/// Placement attempts performed by the scatter pattern by default.
pub const DEFAULT_SCATTER_POINTS: u32 = 1_000;

const DEFAULT_GRID_WIDTH: u32 = 320;
const DEFAULT_GRID_HEIGHT: u32 = 180;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the world from the provided configuration.
    ///
    /// Both buffers are recreated, so the grid starts out empty.
    Configure {
        /// Configuration the world should adopt.
        config: EngineConfig,
    },
    /// Advances the automaton by one generation unless the world is paused.
    Tick,
    /// Selects the predation rule used from the next tick onward.
    SetAlgorithm {
        /// Rule variant to activate.
        algorithm: Algorithm,
    },
    /// Selects the neighbor strategy used from the next tick onward.
    SetNeighborMode {
        /// Strategy to activate.
        mode: NeighborMode,
    },
    /// Changes the level given to colonized and captured cells.
    SetInitialLevel {
        /// New initial level; must be positive.
        level: u32,
    },
    /// Changes the level at or below which cells become edible under the waves rule.
    SetEdibleLevel {
        /// New edible level; must be positive.
        level: u32,
    },
    /// Toggles the requirement that predators outrank their prey.
    SetYoungBanquetMode {
        /// Whether young banquet mode is active.
        enabled: bool,
    },
    /// Clears the grid and paints an initial pattern into it.
    PaintPattern {
        /// Pattern to paint.
        pattern: InitialPattern,
    },
    /// Turns subsequent ticks into no-ops.
    Pause,
    /// Re-enables ticking after a pause.
    Resume,
    /// Overwrites a single interior cell of the current generation.
    InjectCell {
        /// Interior location to overwrite.
        cell: CellCoord,
        /// Validated state to store.
        state: Cell,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that a full generation was computed and became current.
    GenerationAdvanced {
        /// Number of generations computed since the world was configured.
        generation: u64,
    },
    /// Confirms that the world adopted a new configuration.
    Configured {
        /// Width of the rebuilt grid.
        width: u32,
        /// Height of the rebuilt grid.
        height: u32,
    },
    /// Reports that a configuration or level change was refused.
    ConfigurationRejected {
        /// Specific reason the change failed.
        reason: ConfigError,
    },
    /// Announces the predation rule that will drive the next tick.
    AlgorithmChanged {
        /// Newly active rule.
        algorithm: Algorithm,
    },
    /// Announces the neighbor strategy that will drive the next tick.
    NeighborModeChanged {
        /// Newly active strategy.
        mode: NeighborMode,
    },
    /// Announces the rule parameters that will drive the next tick.
    RuleParamsChanged {
        /// Parameters now in effect.
        params: RuleParams,
    },
    /// Confirms that an initial pattern was painted.
    PatternPainted {
        /// Pattern that was painted.
        pattern: InitialPattern,
        /// Number of interior cells that received a species.
        placed: u32,
    },
    /// Announces that ticking was paused or resumed.
    RunStateChanged {
        /// Whether ticks are now ignored.
        paused: bool,
    },
    /// Confirms that a cell was overwritten through injection.
    CellInjected {
        /// Location that was overwritten.
        cell: CellCoord,
        /// State now stored at the location.
        state: Cell,
    },
    /// Reports that a cell injection was refused.
    CellInjectionRejected {
        /// Location provided in the request.
        cell: CellCoord,
        /// Specific reason the injection failed.
        reason: InjectionError,
    },
}

/// Occupant of a cell.
///
/// The three living species form a closed predation cycle: rock eats
/// scissors, scissors eats paper, paper eats rock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Species {
    /// Unoccupied cell.
    #[default]
    Empty,
    /// Preys on scissors, preyed upon by paper.
    Rock,
    /// Preys on rock, preyed upon by scissors.
    Paper,
    /// Preys on paper, preyed upon by rock.
    Scissors,
}

impl Species {
    /// Living species in cycle order; each entry eats the one that follows it.
    pub const LIVING: [Species; 3] = [Species::Rock, Species::Scissors, Species::Paper];

    /// Reports whether the species marks an unoccupied cell.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Species that preys on this one. Empty cells have no predator.
    #[must_use]
    pub const fn predator(self) -> Option<Species> {
        match self {
            Self::Empty => None,
            Self::Rock => Some(Self::Paper),
            Self::Paper => Some(Self::Scissors),
            Self::Scissors => Some(Self::Rock),
        }
    }

    /// Species this one preys on. Empty cells prey on nothing.
    #[must_use]
    pub const fn prey(self) -> Option<Species> {
        match self {
            Self::Empty => None,
            Self::Rock => Some(Self::Scissors),
            Self::Paper => Some(Self::Rock),
            Self::Scissors => Some(Self::Paper),
        }
    }

    /// Reports whether `other` is the predator of this species.
    #[must_use]
    pub fn is_prey_of(self, other: Species) -> bool {
        self.predator() == Some(other)
    }

    /// Compact numeric tag used at raw injection boundaries.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Rock => 1,
            Self::Paper => 2,
            Self::Scissors => 3,
        }
    }
}

impl TryFrom<u8> for Species {
    type Error = CellError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Rock),
            2 => Ok(Self::Paper),
            3 => Ok(Self::Scissors),
            _ => Err(CellError::InvalidSpecies { tag }),
        }
    }
}

/// State of a single grid cell.
///
/// An empty cell always has level zero and a living cell always has a
/// positive level. The fields are private so every constructor upholds that.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    species: Species,
    level: u32,
}

impl Cell {
    /// The unoccupied cell.
    pub const EMPTY: Cell = Cell {
        species: Species::Empty,
        level: 0,
    };

    /// Creates a cell after checking the level against the species.
    pub const fn new(species: Species, level: u32) -> Result<Self, CellError> {
        match (species, level) {
            (Species::Empty, 0) => Ok(Self::EMPTY),
            (Species::Empty, _) => Err(CellError::InvalidLevel { species, level }),
            (_, 0) => Err(CellError::InvalidLevel { species, level }),
            _ => Ok(Self { species, level }),
        }
    }

    /// Creates a living cell at the provided level.
    ///
    /// Passing [`Species::Empty`] yields [`Cell::EMPTY`].
    #[must_use]
    pub const fn living(species: Species, level: NonZeroU32) -> Self {
        if species.is_empty() {
            Self::EMPTY
        } else {
            Self {
                species,
                level: level.get(),
            }
        }
    }

    /// Occupant of the cell.
    #[must_use]
    pub const fn species(&self) -> Species {
        self.species
    }

    /// Strength of the cell; zero only for empty cells.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Reports whether the cell is unoccupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Same species at a new level. Empty cells stay empty.
    #[must_use]
    pub const fn with_level(self, level: NonZeroU32) -> Self {
        Self::living(self.species, level)
    }

    /// Same species one level weaker, never dropping below one.
    #[must_use]
    pub const fn aged(self) -> Self {
        if self.level > 1 {
            Self {
                species: self.species,
                level: self.level - 1,
            }
        } else {
            self
        }
    }

    /// Same species one level stronger. Empty cells stay empty.
    #[must_use]
    pub const fn strengthened(self) -> Self {
        if self.species.is_empty() {
            self
        } else {
            Self {
                species: self.species,
                level: self.level.saturating_add(1),
            }
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Coordinate displaced by `offset`, or `None` when it would underflow.
    #[must_use]
    pub fn offset_by(self, offset: Offset) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(i32::from(offset.dx()))?;
        let row = self.row.checked_add_signed(i32::from(offset.dy()))?;
        Some(Self::new(column, row))
    }
}

/// Displacement from a cell to one of its Moore neighbors (or itself).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    dx: i8,
    dy: i8,
}

impl Offset {
    /// The offset that points a cell at itself.
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    /// Creates an offset from components already known to lie in `-1..=1`.
    ///
    /// # Panics
    ///
    /// Panics when either component is outside `-1..=1`. Use
    /// [`Offset::try_new`] for values that are not known to be in range.
    #[must_use]
    pub const fn new(dx: i8, dy: i8) -> Self {
        match Self::try_new(dx, dy) {
            Ok(offset) => offset,
            Err(_) => panic!("offset components must lie in -1..=1"),
        }
    }

    /// Creates an offset, refusing components outside `-1..=1`.
    pub const fn try_new(dx: i8, dy: i8) -> Result<Self, OffsetError> {
        if is_unit(dx) && is_unit(dy) {
            Ok(Self { dx, dy })
        } else {
            Err(OffsetError::OutOfRange { dx, dy })
        }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> i8 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> i8 {
        self.dy
    }
}

impl TryFrom<(i8, i8)> for Offset {
    type Error = OffsetError;

    fn try_from((dx, dy): (i8, i8)) -> Result<Self, Self::Error> {
        Self::try_new(dx, dy)
    }
}

const fn is_unit(value: i8) -> bool {
    value >= -1 && value <= 1
}

/// Validated grid dimensions with a guaranteed non-empty interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Validates the provided dimensions.
    pub const fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::InvalidDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells, border included.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Flat index of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Reports whether the cell lies on the one-cell frame around the grid.
    #[must_use]
    pub const fn is_border(&self, cell: CellCoord) -> bool {
        self.contains(cell)
            && (cell.column() == 0
                || cell.row() == 0
                || cell.column() == self.width - 1
                || cell.row() == self.height - 1)
    }

    /// Reports whether the cell lies strictly inside the border.
    #[must_use]
    pub const fn is_interior(&self, cell: CellCoord) -> bool {
        self.contains(cell) && !self.is_border(cell)
    }

    /// Interior cells in row-major visiting order.
    pub fn interior(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (1..self.height - 1)
            .flat_map(move |row| (1..width - 1).map(move |column| CellCoord::new(column, row)))
    }

    /// Number of interior cells.
    #[must_use]
    pub const fn interior_count(&self) -> usize {
        (self.width as usize - 2) * (self.height as usize - 2)
    }
}

/// Read-only view into one generation of the grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    dimensions: GridDimensions,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], dimensions: GridDimensions) -> Self {
        Self { cells, dimensions }
    }

    /// State of the provided cell. Coordinates outside the grid read as empty.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Cell {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Cell::EMPTY)
    }

    /// Iterator over all cells in row-major order, border included.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + 'a {
        self.cells.iter().copied()
    }

    /// Underlying row-major cell slice.
    #[must_use]
    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    /// Dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }
}

/// Write access to the generation under construction.
#[derive(Debug)]
pub struct GridWriter<'a> {
    cells: &'a mut [Cell],
    dimensions: GridDimensions,
}

impl<'a> GridWriter<'a> {
    /// Wraps the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a mut [Cell], dimensions: GridDimensions) -> Self {
        Self { cells, dimensions }
    }

    /// Stores `state` at the provided cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, cell: CellCoord, state: Cell) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = state;
        }
    }

    /// Replaces the pending state of the provided cell with `f(pending)`.
    pub fn update<F>(&mut self, cell: CellCoord, f: F)
    where
        F: FnOnce(Cell) -> Cell,
    {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = f(*slot);
        }
    }

    /// Pending state of the provided cell.
    #[must_use]
    pub fn pending(&self, cell: CellCoord) -> Cell {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Cell::EMPTY)
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Cell> {
        let index = self.dimensions.index(cell)?;
        self.cells.get_mut(index)
    }
}

/// Closed set of predation rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Fast, noisy dynamics where strength accumulates with kills.
    #[default]
    Random,
    /// Maturity-gated dynamics that produce travelling fronts.
    Waves,
}

impl Algorithm {
    /// Canonical tag accepted by [`FromStr`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Waves => "waves",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Algorithm {
    type Err = TagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "random" => Ok(Self::Random),
            "waves" => Ok(Self::Waves),
            other => Err(TagError::UnknownAlgorithm(other.to_owned())),
        }
    }
}

/// Closed set of neighbor selection strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeighborMode {
    /// Fresh uniform draw for every visited cell.
    #[default]
    UniformRandom,
    /// Fixed clockwise ring of the eight Moore offsets.
    FixedCycle,
    /// Pool of offsets sampled once and replayed cyclically.
    PreRandomCycle,
}

impl NeighborMode {
    /// Canonical tag accepted by [`FromStr`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::UniformRandom => "uniform-random",
            Self::FixedCycle => "fixed-cycle",
            Self::PreRandomCycle => "pre-random-cycle",
        }
    }
}

impl fmt::Display for NeighborMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NeighborMode {
    type Err = TagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "uniform-random" => Ok(Self::UniformRandom),
            "fixed-cycle" => Ok(Self::FixedCycle),
            "pre-random-cycle" => Ok(Self::PreRandomCycle),
            other => Err(TagError::UnknownNeighborMode(other.to_owned())),
        }
    }
}

/// Shapes the pattern painter can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    /// Three angular sectors around the grid centre.
    #[default]
    Sectors,
    /// Sparse random points on an empty grid.
    Scatter,
}

impl FromStr for PatternKind {
    type Err = TagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "sectors" => Ok(Self::Sectors),
            "scatter" => Ok(Self::Scatter),
            other => Err(TagError::UnknownPattern(other.to_owned())),
        }
    }
}

/// Initial pattern painted before the tick loop starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitialPattern {
    /// Every interior cell belongs to one of three contiguous angular sectors.
    Sectors,
    /// Up to `count` single-species points on an otherwise empty grid.
    ScatterPoints {
        /// Number of placement attempts.
        count: u32,
    },
}

impl InitialPattern {
    /// Builds the pattern for `kind`; `count` only matters for scatter.
    #[must_use]
    pub const fn from_kind(kind: PatternKind, count: u32) -> Self {
        match kind {
            PatternKind::Sectors => Self::Sectors,
            PatternKind::Scatter => Self::ScatterPoints { count },
        }
    }
}

/// Parameters read by the predation rule on every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuleParams {
    initial_level: NonZeroU32,
    edible_level: NonZeroU32,
    young_banquet: bool,
}

impl RuleParams {
    /// Validates the provided parameters.
    pub fn new(initial_level: u32, edible_level: u32, young_banquet: bool) -> Result<Self, ConfigError> {
        let initial_level = NonZeroU32::new(initial_level).ok_or(ConfigError::InvalidInitialLevel)?;
        let edible_level = NonZeroU32::new(edible_level).ok_or(ConfigError::InvalidEdibleLevel)?;
        Ok(Self {
            initial_level,
            edible_level,
            young_banquet,
        })
    }

    /// Level assigned to colonized and captured cells.
    #[must_use]
    pub const fn initial_level(&self) -> NonZeroU32 {
        self.initial_level
    }

    /// Level at or below which a cell may be eaten under the waves rule.
    #[must_use]
    pub const fn edible_level(&self) -> u32 {
        self.edible_level.get()
    }

    /// Whether a predator must outrank its prey.
    #[must_use]
    pub const fn young_banquet(&self) -> bool {
        self.young_banquet
    }
}

/// Complete configuration of an automaton run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Number of grid columns, border included.
    pub width: u32,
    /// Number of grid rows, border included.
    pub height: u32,
    /// Level assigned to colonized and captured cells.
    pub initial_level: u32,
    /// Level at or below which a cell may be eaten under the waves rule.
    pub edible_level: u32,
    /// Active predation rule.
    pub algorithm: Algorithm,
    /// Active neighbor strategy.
    pub neighbor_mode: NeighborMode,
    /// Whether a predator must outrank its prey under the waves rule.
    pub young_banquet: bool,
    /// Size of the pre-random offset pool; must be a power of two.
    pub pool_size: u32,
    /// Seed for every random draw. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            initial_level: DEFAULT_INITIAL_LEVEL,
            edible_level: DEFAULT_EDIBLE_LEVEL,
            algorithm: Algorithm::default(),
            neighbor_mode: NeighborMode::default(),
            young_banquet: false,
            pool_size: DEFAULT_POOL_SIZE,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Validated grid dimensions.
    pub fn dimensions(&self) -> Result<GridDimensions, ConfigError> {
        GridDimensions::new(self.width, self.height)
    }

    /// Validated rule parameters.
    pub fn rule_params(&self) -> Result<RuleParams, ConfigError> {
        RuleParams::new(self.initial_level, self.edible_level, self.young_banquet)
    }

    /// Checks every field, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.dimensions()?;
        let _ = self.rule_params()?;
        if self.pool_size == 0 || !self.pool_size.is_power_of_two() {
            return Err(ConfigError::InvalidPoolSize {
                size: self.pool_size,
            });
        }
        Ok(())
    }
}

/// Reasons a configuration may be refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigError {
    /// A grid side is shorter than [`MIN_GRID_SIDE`].
    #[error("grid of {width}x{height} cells has no interior; both sides must be at least {}", MIN_GRID_SIDE)]
    InvalidDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The initial level was zero.
    #[error("initial level must be positive")]
    InvalidInitialLevel,
    /// The edible level was zero.
    #[error("edible level must be positive")]
    InvalidEdibleLevel,
    /// The offset pool size is not a non-zero power of two.
    #[error("offset pool size {size} is not a non-zero power of two")]
    InvalidPoolSize {
        /// Requested pool size.
        size: u32,
    },
}

/// Reasons a cell state may be refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellError {
    /// The numeric tag does not name a species.
    #[error("species tag {tag} is not part of the species set")]
    InvalidSpecies {
        /// Offending tag.
        tag: u8,
    },
    /// The level contradicts the species (zero for a living cell or non-zero for an empty one).
    #[error("level {level} is not valid for species {species:?}")]
    InvalidLevel {
        /// Species that was supplied.
        species: Species,
        /// Level that was supplied.
        level: u32,
    },
}

/// Reasons an offset may be refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum OffsetError {
    /// A component lies outside `-1..=1`.
    #[error("offset ({dx}, {dy}) leaves the Moore neighborhood")]
    OutOfRange {
        /// Supplied horizontal component.
        dx: i8,
        /// Supplied vertical component.
        dy: i8,
    },
}

/// Reasons a cell injection may be refused by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjectionError {
    /// The coordinate lies outside the grid.
    #[error("cell {0:?} lies outside the grid")]
    OutOfBounds(CellCoord),
    /// The coordinate lies on the permanently empty border.
    #[error("cell {0:?} lies on the border")]
    Border(CellCoord),
}

/// Reasons a textual variant tag may be refused.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum TagError {
    /// The tag does not name a predation rule.
    #[error("unknown algorithm `{0}`; expected `random` or `waves`")]
    UnknownAlgorithm(String),
    /// The tag does not name a neighbor strategy.
    #[error("unknown neighbor mode `{0}`; expected `uniform-random`, `fixed-cycle` or `pre-random-cycle`")]
    UnknownNeighborMode(String),
    /// The tag does not name an initial pattern.
    #[error("unknown pattern `{0}`; expected `sectors` or `scatter`")]
    UnknownPattern(String),
}

#[cfg(test)]
mod tests {
    use super::{
        Algorithm, Cell, CellCoord, CellError, ConfigError, EngineConfig, GridDimensions,
        NeighborMode, Offset, OffsetError, PatternKind, RuleParams, Species, TagError,
    };
    use std::num::NonZeroU32;

    #[test]
    fn predation_cycle_is_closed() {
        for species in Species::LIVING {
            let predator = species.predator().expect("living species has a predator");
            assert_eq!(predator.prey(), Some(species));
            assert!(species.is_prey_of(predator));
            assert_ne!(predator, species);
        }
        assert_eq!(Species::Empty.predator(), None);
        assert_eq!(Species::Empty.prey(), None);
    }

    #[test]
    fn cycle_order_matches_living_listing() {
        let living = Species::LIVING;
        for index in 0..living.len() {
            let next = living[(index + 1) % living.len()];
            assert_eq!(living[index].prey(), Some(next));
        }
    }

    #[test]
    fn cell_constructor_enforces_level_sentinel() {
        assert_eq!(Cell::new(Species::Empty, 0), Ok(Cell::EMPTY));
        assert_eq!(
            Cell::new(Species::Empty, 4),
            Err(CellError::InvalidLevel {
                species: Species::Empty,
                level: 4
            })
        );
        assert_eq!(
            Cell::new(Species::Rock, 0),
            Err(CellError::InvalidLevel {
                species: Species::Rock,
                level: 0
            })
        );
        let rock = Cell::new(Species::Rock, 7).expect("valid cell");
        assert_eq!(rock.species(), Species::Rock);
        assert_eq!(rock.level(), 7);
    }

    #[test]
    fn species_tags_reject_unknown_values() {
        for species in [Species::Empty, Species::Rock, Species::Paper, Species::Scissors] {
            assert_eq!(Species::try_from(species.tag()), Ok(species));
        }
        assert_eq!(
            Species::try_from(9),
            Err(CellError::InvalidSpecies { tag: 9 })
        );
    }

    #[test]
    fn level_helpers_never_break_the_sentinel() {
        let one = Cell::new(Species::Paper, 1).expect("valid cell");
        assert_eq!(one.aged().level(), 1);
        assert_eq!(Cell::EMPTY.aged(), Cell::EMPTY);
        assert_eq!(Cell::EMPTY.strengthened(), Cell::EMPTY);
        let level = NonZeroU32::new(12).expect("non-zero");
        assert_eq!(Cell::EMPTY.with_level(level), Cell::EMPTY);
        assert_eq!(one.with_level(level).level(), 12);
        assert_eq!(one.strengthened().level(), 2);
    }

    #[test]
    fn tags_parse_and_reject_unknown_variants() {
        assert_eq!("waves".parse::<Algorithm>(), Ok(Algorithm::Waves));
        assert_eq!(
            "chaos".parse::<Algorithm>(),
            Err(TagError::UnknownAlgorithm("chaos".to_owned()))
        );
        assert_eq!(
            "pre-random-cycle".parse::<NeighborMode>(),
            Ok(NeighborMode::PreRandomCycle)
        );
        assert_eq!(
            "spiral".parse::<NeighborMode>(),
            Err(TagError::UnknownNeighborMode("spiral".to_owned()))
        );
        assert_eq!("scatter".parse::<PatternKind>(), Ok(PatternKind::Scatter));
        for mode in [
            NeighborMode::UniformRandom,
            NeighborMode::FixedCycle,
            NeighborMode::PreRandomCycle,
        ] {
            assert_eq!(mode.to_string().parse::<NeighborMode>(), Ok(mode));
        }
    }

    #[test]
    fn dimensions_require_an_interior() {
        assert_eq!(
            GridDimensions::new(2, 10),
            Err(ConfigError::InvalidDimension {
                width: 2,
                height: 10
            })
        );
        let dimensions = GridDimensions::new(3, 3).expect("smallest grid");
        assert_eq!(dimensions.interior().collect::<Vec<_>>(), vec![CellCoord::new(1, 1)]);
    }

    #[test]
    fn interior_is_visited_in_row_major_order() {
        let dimensions = GridDimensions::new(4, 4).expect("valid grid");
        let visited: Vec<_> = dimensions.interior().collect();
        assert_eq!(
            visited,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
            ]
        );
        assert_eq!(visited.len(), dimensions.interior_count());
        assert!(dimensions.is_border(CellCoord::new(3, 2)));
        assert!(!dimensions.is_border(CellCoord::new(4, 2)));
        assert!(!dimensions.contains(CellCoord::new(4, 2)));
    }

    #[test]
    fn offsets_displace_within_unsigned_space() {
        let origin = CellCoord::new(0, 5);
        assert_eq!(origin.offset_by(Offset::new(-1, 0)), None);
        assert_eq!(origin.offset_by(Offset::new(1, -1)), Some(CellCoord::new(1, 4)));
    }

    #[test]
    fn offsets_outside_the_neighborhood_are_refused() {
        assert_eq!(
            Offset::try_new(5, -9),
            Err(OffsetError::OutOfRange { dx: 5, dy: -9 })
        );
        assert_eq!(Offset::try_from((0, 2)), Err(OffsetError::OutOfRange { dx: 0, dy: 2 }));
        assert_eq!(Offset::try_from((-1, 1)), Ok(Offset::new(-1, 1)));
        assert_eq!(Offset::try_new(0, 0), Ok(Offset::ZERO));
    }

    #[test]
    #[should_panic(expected = "offset components must lie in -1..=1")]
    fn unchecked_offset_constructor_panics_out_of_range() {
        let _ = Offset::new(2, 0);
    }

    #[test]
    fn config_validation_reports_first_violation() {
        let mut config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));

        config.pool_size = 96;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPoolSize { size: 96 }));

        config.edible_level = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidEdibleLevel));

        config.width = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimension { width: 1, .. })
        ));
    }

    #[test]
    fn rule_params_reject_zero_levels() {
        assert_eq!(RuleParams::new(0, 5, false), Err(ConfigError::InvalidInitialLevel));
        assert_eq!(RuleParams::new(5, 0, false), Err(ConfigError::InvalidEdibleLevel));
        let params = RuleParams::new(15, 5, true).expect("valid params");
        assert_eq!(params.initial_level().get(), 15);
        assert_eq!(params.edible_level(), 5);
        assert!(params.young_banquet());
    }

    #[test]
    fn engine_config_round_trips_through_bincode() {
        let config = EngineConfig {
            algorithm: Algorithm::Waves,
            neighbor_mode: NeighborMode::FixedCycle,
            seed: Some(7),
            ..EngineConfig::default()
        };
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: EngineConfig = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }
}
