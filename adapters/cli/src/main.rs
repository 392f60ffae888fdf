#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Rock Paper automaton headlessly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use rock_paper_core::{
    Algorithm, Command, EngineConfig, Event, InitialPattern, NeighborMode, PatternKind, Species,
    DEFAULT_SCATTER_POINTS,
};
use rock_paper_system_census::{Census, CensusReport};
use rock_paper_world::{self as world, query, World};
use tracing::{debug, info, warn};

/// Largest seed a TOML config file can hold; TOML integers are signed 64-bit.
const MAX_SEED: u64 = i64::MAX as u64;

/// Runs a cyclic predation automaton and logs population reports.
#[derive(Debug, Parser)]
#[command(name = "rock-paper", version)]
struct CliArgs {
    /// TOML file with an engine configuration; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of grid columns, border included.
    #[arg(long)]
    width: Option<u32>,
    /// Number of grid rows, border included.
    #[arg(long)]
    height: Option<u32>,
    /// Predation rule: `random` or `waves`.
    #[arg(long)]
    algorithm: Option<Algorithm>,
    /// Neighbor strategy: `uniform-random`, `fixed-cycle` or `pre-random-cycle`.
    #[arg(long)]
    neighbor_mode: Option<NeighborMode>,
    /// Level given to colonized and captured cells.
    #[arg(long)]
    initial_level: Option<u32>,
    /// Level at or below which cells become edible under the waves rule.
    #[arg(long)]
    edible_level: Option<u32>,
    /// Require predators to outrank their prey under the waves rule.
    #[arg(long)]
    young_banquet: bool,
    /// Seed for every random draw, at most 2^63 - 1; omit for OS entropy.
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=MAX_SEED))]
    seed: Option<u64>,
    /// Initial pattern: `sectors` or `scatter`.
    #[arg(long, default_value = "sectors")]
    pattern: PatternKind,
    /// Placement attempts for the scatter pattern.
    #[arg(long, default_value_t = DEFAULT_SCATTER_POINTS)]
    points: u32,
    /// Number of generations to compute.
    #[arg(long, default_value_t = 100)]
    generations: u64,
    /// Publish a census report every this many generations.
    #[arg(long, default_value_t = 10)]
    report_every: u64,
    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl CliArgs {
    /// Loads the configuration file, if any, and applies flag overrides.
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => EngineConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(mode) = self.neighbor_mode {
            config.neighbor_mode = mode;
        }
        if let Some(level) = self.initial_level {
            config.initial_level = level;
        }
        if let Some(level) = self.edible_level {
            config.edible_level = level;
        }
        if self.young_banquet {
            config.young_banquet = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }

    fn initial_pattern(&self) -> InitialPattern {
        InitialPattern::from_kind(self.pattern, self.points)
    }
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_config(contents: &str) -> Result<EngineConfig> {
    toml::from_str(contents).context("failed to parse engine config toml contents")
}

fn render_config(config: &EngineConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to render engine config as toml")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Drives the world through `generations` ticks, forwarding events to the census.
fn run(
    config: EngineConfig,
    pattern: InitialPattern,
    generations: u64,
    census: &mut Census,
) -> Result<(World, Vec<CensusReport>)> {
    let mut world = World::new(config).context("failed to build world")?;
    let mut reports = Vec::new();
    let mut events = Vec::new();

    world::apply(&mut world, Command::PaintPattern { pattern }, &mut events);
    for event in &events {
        if let Event::PatternPainted { placed, .. } = event {
            info!(?pattern, placed, "painted initial pattern");
        }
    }
    publish(&world, census, &events, &mut reports);

    for _ in 0..generations {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        publish(&world, census, &events, &mut reports);
    }

    Ok((world, reports))
}

fn publish(world: &World, census: &mut Census, events: &[Event], reports: &mut Vec<CensusReport>) {
    let first_new = reports.len();
    census.handle(events, &query::snapshot(world), reports);
    for report in &reports[first_new..] {
        log_report(report);
    }
}

fn log_report(report: &CensusReport) {
    debug!(
        generation = report.generation,
        rock_level = report.rock.mean_level(),
        paper_level = report.paper.mean_level(),
        scissors_level = report.scissors.mean_level(),
        "mean levels"
    );
    info!(
        generation = report.generation,
        rock = report.rock.cells,
        paper = report.paper.cells,
        scissors = report.scissors.cells,
        empty = report.empty,
        "census"
    );
}

fn summary_line(report: &CensusReport) -> String {
    let dominant = report
        .dominant()
        .map_or("none", species_name);
    format!(
        "generation {}: rock {} paper {} scissors {} empty {} (dominant: {dominant})",
        report.generation, report.rock.cells, report.paper.cells, report.scissors.cells, report.empty
    )
}

fn species_name(species: Species) -> &'static str {
    match species {
        Species::Empty => "empty",
        Species::Rock => "rock",
        Species::Paper => "paper",
        Species::Scissors => "scissors",
    }
}

/// Entry point for the Rock Paper command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = args.engine_config()?;
    if args.print_config {
        print!("{}", render_config(&config)?);
        return Ok(());
    }
    info!(
        width = config.width,
        height = config.height,
        algorithm = %config.algorithm,
        neighbor_mode = %config.neighbor_mode,
        seed = ?config.seed,
        "starting automaton"
    );

    let mut census = Census::new(args.report_every);
    let (world, _) = run(config, args.initial_pattern(), args.generations, &mut census)?;

    let final_report = CensusReport::from_view(query::generation(&world), &query::snapshot(&world));
    if final_report.living() == 0 {
        warn!("no living cells remain");
    }
    println!("{}", summary_line(&final_report));
    Ok(())
}
