#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population census that publishes per-species tallies on a fixed cadence.

use rock_paper_core::{Event, GridView, Species};

/// Cell count and accumulated level of one species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpeciesTally {
    /// Number of cells held by the species.
    pub cells: u64,
    /// Sum of the levels of those cells.
    pub level_sum: u64,
}

impl SpeciesTally {
    /// Average level across the species' cells, or zero when it holds none.
    #[must_use]
    pub fn mean_level(&self) -> f64 {
        if self.cells == 0 {
            0.0
        } else {
            self.level_sum as f64 / self.cells as f64
        }
    }
}

/// Snapshot of the population at one generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CensusReport {
    /// Generation the report describes.
    pub generation: u64,
    /// Number of empty cells, border included.
    pub empty: u64,
    /// Tally of rock cells.
    pub rock: SpeciesTally,
    /// Tally of paper cells.
    pub paper: SpeciesTally,
    /// Tally of scissors cells.
    pub scissors: SpeciesTally,
}

impl CensusReport {
    /// Counts every cell visible through `view`.
    #[must_use]
    pub fn from_view(generation: u64, view: &GridView<'_>) -> Self {
        let mut report = Self {
            generation,
            ..Self::default()
        };
        for cell in view.iter() {
            let tally = match cell.species() {
                Species::Empty => {
                    report.empty += 1;
                    continue;
                }
                Species::Rock => &mut report.rock,
                Species::Paper => &mut report.paper,
                Species::Scissors => &mut report.scissors,
            };
            tally.cells += 1;
            tally.level_sum += u64::from(cell.level());
        }
        report
    }

    /// Tally for `species`; empty cells report zero levels.
    #[must_use]
    pub fn tally(&self, species: Species) -> SpeciesTally {
        match species {
            Species::Empty => SpeciesTally {
                cells: self.empty,
                level_sum: 0,
            },
            Species::Rock => self.rock,
            Species::Paper => self.paper,
            Species::Scissors => self.scissors,
        }
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn living(&self) -> u64 {
        self.rock.cells + self.paper.cells + self.scissors.cells
    }

    /// Species holding the most cells, ties resolved in cycle order.
    #[must_use]
    pub fn dominant(&self) -> Option<Species> {
        let mut best: Option<(Species, u64)> = None;
        for species in Species::LIVING {
            let cells = self.tally(species).cells;
            if cells == 0 {
                continue;
            }
            if best.map_or(true, |(_, most)| cells > most) {
                best = Some((species, cells));
            }
        }
        best.map(|(species, _)| species)
    }
}

/// Event-driven census that reports every `interval` generations.
///
/// A freshly painted pattern is reported on the next call regardless of the
/// cadence so that observers always see the starting population.
#[derive(Debug)]
pub struct Census {
    interval: u64,
    generation: u64,
    last_report: Option<CensusReport>,
}

impl Default for Census {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Census {
    /// Creates a census reporting every `interval` generations; zero means every generation.
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            generation: 0,
            last_report: None,
        }
    }

    /// Returns the last report published by the census, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&CensusReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and publishes at most one report into `out`.
    pub fn handle(&mut self, events: &[Event], view: &GridView<'_>, out: &mut Vec<CensusReport>) {
        let mut due = false;

        for event in events {
            match event {
                Event::GenerationAdvanced { generation } => {
                    self.generation = *generation;
                    if generation % self.interval == 0 {
                        due = true;
                    }
                }
                Event::Configured { .. } => self.generation = 0,
                Event::PatternPainted { .. } => due = true,
                _ => {}
            }
        }

        if !due {
            return;
        }

        let report = CensusReport::from_view(self.generation, view);
        self.last_report = Some(report);
        out.push(report);
    }
}

#[cfg(test)]
mod tests {
    use super::{Census, CensusReport};
    use rock_paper_core::{Cell, Event, GridDimensions, GridView, InitialPattern, Species};

    fn grid(cells: &[(usize, Species, u32)]) -> (Vec<Cell>, GridDimensions) {
        let dimensions = GridDimensions::new(4, 4).expect("valid grid");
        let mut buffer = vec![Cell::EMPTY; dimensions.cell_count()];
        for &(index, species, level) in cells {
            buffer[index] = Cell::new(species, level).expect("valid cell");
        }
        (buffer, dimensions)
    }

    #[test]
    fn report_tallies_species_and_levels() {
        let (buffer, dimensions) = grid(&[
            (5, Species::Rock, 10),
            (6, Species::Rock, 20),
            (9, Species::Paper, 3),
        ]);
        let report = CensusReport::from_view(4, &GridView::new(&buffer, dimensions));
        assert_eq!(report.generation, 4);
        assert_eq!(report.empty, 13);
        assert_eq!(report.rock.cells, 2);
        assert!((report.rock.mean_level() - 15.0).abs() < f64::EPSILON);
        assert_eq!(report.paper.cells, 1);
        assert_eq!(report.scissors.cells, 0);
        assert_eq!(report.scissors.mean_level(), 0.0);
        assert_eq!(report.living(), 3);
        assert_eq!(report.dominant(), Some(Species::Rock));
    }

    #[test]
    fn empty_grid_has_no_dominant_species() {
        let (buffer, dimensions) = grid(&[]);
        let report = CensusReport::from_view(0, &GridView::new(&buffer, dimensions));
        assert_eq!(report.dominant(), None);
        assert_eq!(report.tally(Species::Empty).cells, 16);
    }

    #[test]
    fn census_follows_its_cadence() {
        let (buffer, dimensions) = grid(&[(5, Species::Scissors, 1)]);
        let view = GridView::new(&buffer, dimensions);
        let mut census = Census::new(3);
        let mut reports = Vec::new();

        for generation in 1..=7 {
            census.handle(&[Event::GenerationAdvanced { generation }], &view, &mut reports);
        }

        let generations: Vec<_> = reports.iter().map(|report| report.generation).collect();
        assert_eq!(generations, vec![3, 6]);
        assert_eq!(census.last_report().map(|report| report.generation), Some(6));
    }

    #[test]
    fn painting_forces_a_report() {
        let (buffer, dimensions) = grid(&[]);
        let view = GridView::new(&buffer, dimensions);
        let mut census = Census::new(100);
        let mut reports = Vec::new();

        census.handle(
            &[Event::PatternPainted {
                pattern: InitialPattern::Sectors,
                placed: 0,
            }],
            &view,
            &mut reports,
        );
        census.handle(&[Event::GenerationAdvanced { generation: 1 }], &view, &mut reports);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].generation, 0);
    }
}
