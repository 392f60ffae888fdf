#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative automaton state management for Rock Paper.

mod grid;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rock_paper_core::{
    Command, ConfigError, EngineConfig, Event, InitialPattern, InjectionError, RuleParams,
};
use rock_paper_system_neighborhood::NeighborPicker;
use rock_paper_system_predation::PredationRule;
use rock_paper_system_seeding::{Placement, Seeding};
use tracing::{debug, warn};

pub use grid::GridState;

/// Mixed into the configured seed so the painter and the neighbor picker draw
/// from unrelated streams.
const PATTERN_SEED_SALT: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Represents the authoritative automaton state.
#[derive(Clone, Debug)]
pub struct World {
    config: EngineConfig,
    params: RuleParams,
    grid: GridState,
    rule: PredationRule,
    picker: NeighborPicker,
    seeding: Seeding,
    placements: Vec<Placement>,
    pattern_rng: ChaCha8Rng,
    paused: bool,
    generation: u64,
}

impl World {
    /// Creates an empty world from `config`.
    ///
    /// Fails when any configured value is out of range, most notably when a
    /// grid side is shorter than three cells.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dimensions = config.dimensions()?;
        let params = config.rule_params()?;
        let pattern_rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed ^ PATTERN_SEED_SALT),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            params,
            grid: GridState::with_dimensions(dimensions),
            rule: PredationRule::from(config.algorithm),
            picker: NeighborPicker::for_mode(config.neighbor_mode, config.pool_size, config.seed),
            seeding: Seeding::new(),
            placements: Vec::new(),
            pattern_rng,
            paused: false,
            generation: 0,
            config,
        })
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.paused {
            return;
        }

        let (read, mut write) = self.grid.begin_generation();
        for cell in read.dimensions().interior() {
            let offset = self.picker.next_offset();
            let Some(neighbor) = cell.offset_by(offset) else {
                continue;
            };
            self.rule.apply(cell, neighbor, &read, &mut write, &self.params);
        }
        self.grid.swap();

        self.generation = self.generation.saturating_add(1);
        out_events.push(Event::GenerationAdvanced {
            generation: self.generation,
        });
    }

    fn set_rule_params(&mut self, params: Result<RuleParams, ConfigError>, out_events: &mut Vec<Event>) {
        match params {
            Ok(params) => {
                self.params = params;
                self.config.initial_level = params.initial_level().get();
                self.config.edible_level = params.edible_level();
                self.config.young_banquet = params.young_banquet();
                debug!(?params, "rule parameters updated");
                out_events.push(Event::RuleParamsChanged { params });
            }
            Err(reason) => {
                warn!(%reason, "rejected rule parameter change");
                out_events.push(Event::ConfigurationRejected { reason });
            }
        }
    }

    fn paint(&mut self, pattern: InitialPattern, out_events: &mut Vec<Event>) {
        self.grid.clear();
        self.seeding.paint(
            pattern,
            self.grid.dimensions(),
            self.params.initial_level(),
            &mut self.pattern_rng,
            &mut self.placements,
        );
        for placement in &self.placements {
            self.grid.overwrite_current(placement.cell, placement.state);
        }

        let placed = u32::try_from(self.placements.len()).unwrap_or(u32::MAX);
        debug!(?pattern, placed, "painted initial pattern");
        out_events.push(Event::PatternPainted { pattern, placed });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure { config } => match World::new(config) {
            Ok(rebuilt) => {
                let dimensions = rebuilt.grid.dimensions();
                debug!(
                    width = dimensions.width(),
                    height = dimensions.height(),
                    algorithm = %rebuilt.config.algorithm,
                    neighbor_mode = %rebuilt.config.neighbor_mode,
                    "world reconfigured"
                );
                *world = rebuilt;
                out_events.push(Event::Configured {
                    width: dimensions.width(),
                    height: dimensions.height(),
                });
            }
            Err(reason) => {
                warn!(%reason, "rejected configuration");
                out_events.push(Event::ConfigurationRejected { reason });
            }
        },
        Command::Tick => world.tick(out_events),
        Command::SetAlgorithm { algorithm } => {
            world.rule = PredationRule::from(algorithm);
            world.config.algorithm = algorithm;
            out_events.push(Event::AlgorithmChanged { algorithm });
        }
        Command::SetNeighborMode { mode } => {
            if world.picker.mode() != mode {
                world.picker =
                    NeighborPicker::for_mode(mode, world.config.pool_size, world.config.seed);
            }
            world.config.neighbor_mode = mode;
            out_events.push(Event::NeighborModeChanged { mode });
        }
        Command::SetInitialLevel { level } => {
            let params = RuleParams::new(level, world.params.edible_level(), world.params.young_banquet());
            world.set_rule_params(params, out_events);
        }
        Command::SetEdibleLevel { level } => {
            let params = RuleParams::new(
                world.params.initial_level().get(),
                level,
                world.params.young_banquet(),
            );
            world.set_rule_params(params, out_events);
        }
        Command::SetYoungBanquetMode { enabled } => {
            let params = RuleParams::new(
                world.params.initial_level().get(),
                world.params.edible_level(),
                enabled,
            );
            world.set_rule_params(params, out_events);
        }
        Command::PaintPattern { pattern } => world.paint(pattern, out_events),
        Command::Pause => {
            world.paused = true;
            out_events.push(Event::RunStateChanged { paused: true });
        }
        Command::Resume => {
            world.paused = false;
            out_events.push(Event::RunStateChanged { paused: false });
        }
        Command::InjectCell { cell, state } => {
            let dimensions = world.grid.dimensions();
            let rejection = if !dimensions.contains(cell) {
                Some(InjectionError::OutOfBounds(cell))
            } else if dimensions.is_border(cell) {
                Some(InjectionError::Border(cell))
            } else {
                None
            };

            match rejection {
                Some(reason) => {
                    warn!(%reason, "rejected cell injection");
                    out_events.push(Event::CellInjectionRejected { cell, reason });
                }
                None => {
                    world.grid.overwrite_current(cell, state);
                    out_events.push(Event::CellInjected { cell, state });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use rock_paper_core::{EngineConfig, GridDimensions, GridView, RuleParams};

    /// Read-only view of the current generation for rendering and analysis.
    #[must_use]
    pub fn snapshot(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Configuration currently in effect, including runtime changes.
    #[must_use]
    pub fn config(world: &World) -> &EngineConfig {
        &world.config
    }

    /// Rule parameters the next tick will use.
    #[must_use]
    pub fn rule_params(world: &World) -> RuleParams {
        world.params
    }

    /// Dimensions of the grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.grid.dimensions()
    }

    /// Reports whether ticks are currently ignored.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Number of generations computed since the world was configured.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rock_paper_core::{Algorithm, Cell, CellCoord, NeighborMode, Species};

    fn small_config() -> EngineConfig {
        EngineConfig {
            width: 6,
            height: 5,
            seed: Some(3),
            ..EngineConfig::default()
        }
    }

    fn world() -> World {
        World::new(small_config()).expect("valid configuration")
    }

    #[test]
    fn new_rejects_degenerate_dimensions() {
        let config = EngineConfig {
            width: 2,
            ..small_config()
        };
        assert!(matches!(
            World::new(config),
            Err(ConfigError::InvalidDimension { width: 2, height: 5 })
        ));
    }

    #[test]
    fn new_world_starts_empty_and_running() {
        let world = world();
        assert!(query::snapshot(&world).iter().all(|cell| cell == Cell::EMPTY));
        assert!(!query::is_paused(&world));
        assert_eq!(query::generation(&world), 0);
        assert_eq!(query::dimensions(&world).cell_count(), 30);
    }

    #[test]
    fn configure_rebuilds_or_rejects() {
        let mut world = world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Configure {
                config: EngineConfig {
                    width: 12,
                    height: 9,
                    ..small_config()
                },
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::Configured { width: 12, height: 9 }]);
        assert_eq!(query::dimensions(&world).width(), 12);

        events.clear();
        apply(
            &mut world,
            Command::Configure {
                config: EngineConfig {
                    height: 1,
                    ..small_config()
                },
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ConfigurationRejected {
                reason: ConfigError::InvalidDimension { width: 6, height: 1 }
            }]
        );
        assert_eq!(query::dimensions(&world).width(), 12, "rejected config leaves world intact");
    }

    #[test]
    fn tick_advances_generation_and_reports_it() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            events,
            vec![
                Event::GenerationAdvanced { generation: 1 },
                Event::GenerationAdvanced { generation: 2 },
            ]
        );
    }

    #[test]
    fn paused_world_ignores_ticks() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PaintPattern {
                pattern: InitialPattern::Sectors,
            },
            &mut events,
        );
        let before: Vec<_> = query::snapshot(&world).iter().collect();

        events.clear();
        apply(&mut world, Command::Pause, &mut events);
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(events, vec![Event::RunStateChanged { paused: true }]);
        assert!(query::is_paused(&world));
        assert_eq!(query::generation(&world), 0);
        assert_eq!(query::snapshot(&world).iter().collect::<Vec<_>>(), before);

        events.clear();
        apply(&mut world, Command::Resume, &mut events);
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            events,
            vec![
                Event::RunStateChanged { paused: false },
                Event::GenerationAdvanced { generation: 1 },
            ]
        );
    }

    #[test]
    fn level_setters_update_params_and_reject_zero() {
        let mut world = world();
        let mut events = Vec::new();

        apply(&mut world, Command::SetInitialLevel { level: 15 }, &mut events);
        apply(&mut world, Command::SetEdibleLevel { level: 4 }, &mut events);
        apply(&mut world, Command::SetYoungBanquetMode { enabled: true }, &mut events);
        apply(&mut world, Command::SetEdibleLevel { level: 0 }, &mut events);

        let params = query::rule_params(&world);
        assert_eq!(params.initial_level().get(), 15);
        assert_eq!(params.edible_level(), 4);
        assert!(params.young_banquet());
        assert_eq!(query::config(&world).edible_level, 4);
        assert_eq!(
            events.last(),
            Some(&Event::ConfigurationRejected {
                reason: ConfigError::InvalidEdibleLevel
            })
        );
    }

    #[test]
    fn level_changes_do_not_touch_existing_cells() {
        let mut world = world();
        let mut events = Vec::new();
        let cell = CellCoord::new(2, 2);
        let state = Cell::new(Species::Paper, 30).expect("valid cell");
        apply(&mut world, Command::InjectCell { cell, state }, &mut events);
        apply(&mut world, Command::SetInitialLevel { level: 5 }, &mut events);
        assert_eq!(query::snapshot(&world).cell(cell), state);
    }

    #[test]
    fn variant_switches_are_recorded_in_config() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetAlgorithm {
                algorithm: Algorithm::Waves,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetNeighborMode {
                mode: NeighborMode::FixedCycle,
            },
            &mut events,
        );
        let config = query::config(&world);
        assert_eq!(config.algorithm, Algorithm::Waves);
        assert_eq!(config.neighbor_mode, NeighborMode::FixedCycle);
        assert_eq!(world.picker.mode(), NeighborMode::FixedCycle);
        assert_eq!(world.rule, PredationRule::Waves);
    }

    #[test]
    fn injection_rejects_border_and_outside_cells() {
        let mut world = world();
        let mut events = Vec::new();
        let state = Cell::new(Species::Rock, 2).expect("valid cell");

        apply(
            &mut world,
            Command::InjectCell {
                cell: CellCoord::new(0, 2),
                state,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::InjectCell {
                cell: CellCoord::new(6, 2),
                state,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::CellInjectionRejected {
                    cell: CellCoord::new(0, 2),
                    reason: InjectionError::Border(CellCoord::new(0, 2)),
                },
                Event::CellInjectionRejected {
                    cell: CellCoord::new(6, 2),
                    reason: InjectionError::OutOfBounds(CellCoord::new(6, 2)),
                },
            ]
        );
        assert!(query::snapshot(&world).iter().all(|cell| cell == Cell::EMPTY));
    }

    #[test]
    fn painting_reports_placed_cells() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PaintPattern {
                pattern: InitialPattern::Sectors,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::PatternPainted {
                pattern: InitialPattern::Sectors,
                placed: 12,
            }]
        );
        let view = query::snapshot(&world);
        let living = view.iter().filter(|cell| !cell.is_empty()).count();
        assert_eq!(living, 12);
    }
}
