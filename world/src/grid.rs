use rock_paper_core::{Cell, CellCoord, ConfigError, GridDimensions, GridView, GridWriter};

/// Pair of equally sized cell buffers with alternating read and write roles.
///
/// Reads always observe the front buffer and writes always land in the back
/// buffer. [`GridState::swap`] flips the roles by toggling an index.
#[derive(Clone, Debug)]
pub struct GridState {
    dimensions: GridDimensions,
    buffers: [Vec<Cell>; 2],
    front: usize,
}

impl GridState {
    /// Allocates an empty grid; both sides must be at least three cells.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        GridDimensions::new(width, height).map(Self::with_dimensions)
    }

    /// Allocates an empty grid with already validated dimensions.
    #[must_use]
    pub fn with_dimensions(dimensions: GridDimensions) -> Self {
        let count = dimensions.cell_count();
        Self {
            dimensions,
            buffers: [vec![Cell::EMPTY; count], vec![Cell::EMPTY; count]],
            front: 0,
        }
    }

    /// Dimensions shared by both buffers.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// State of `cell` in the readable buffer; outside the grid reads as empty.
    #[must_use]
    pub fn read(&self, cell: CellCoord) -> Cell {
        self.view().cell(cell)
    }

    /// Stores `state` at `cell` in the writable buffer.
    pub fn write(&mut self, cell: CellCoord, state: Cell) {
        let back = self.front ^ 1;
        if let Some(index) = self.dimensions.index(cell) {
            self.buffers[back][index] = state;
        }
    }

    /// Exchanges the roles of the two buffers.
    pub fn swap(&mut self) {
        self.front ^= 1;
    }

    /// Read-only view of the readable buffer.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.buffers[self.front], self.dimensions)
    }

    /// Seeds the writable buffer from the readable one and lends out both.
    ///
    /// Cells the caller leaves alone therefore carry over unchanged once the
    /// buffers are swapped.
    pub fn begin_generation(&mut self) -> (GridView<'_>, GridWriter<'_>) {
        let dimensions = self.dimensions;
        let (first, second) = self.buffers.split_at_mut(1);
        let (front, back) = if self.front == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        };
        back.copy_from_slice(front);
        (GridView::new(front, dimensions), GridWriter::new(back, dimensions))
    }

    /// Overwrites `cell` in the readable buffer, bypassing the tick pass.
    pub(crate) fn overwrite_current(&mut self, cell: CellCoord, state: Cell) {
        if let Some(index) = self.dimensions.index(cell) {
            self.buffers[self.front][index] = state;
        }
    }

    /// Empties every cell of both buffers.
    pub(crate) fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(Cell::EMPTY);
        }
    }
}
