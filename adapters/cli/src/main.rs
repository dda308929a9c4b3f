#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots and drives the Gridlock experience.
//!
//! The adapter owns the outer loop the engine deliberately excludes: it maps
//! typed input onto commands, pumps the hostile-AI system once per accepted
//! player action, advances effect timers once per rendered frame, and draws
//! the world as a glyph grid.

mod render;

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridlock_core::{CellCoord, Command, Direction, Event};
use gridlock_system_bootstrap::{Bootstrap, FieldPlan};
use gridlock_system_hostile_ai::{Config as AiConfig, HostileAi};
use gridlock_world::{self as world, query, World, WorldConfig};

const AI_SEED_SALT: u64 = 0x7c3a_9d01_5e6b_22e4;

const HELP_TEXT: &str = "\
move: w/a/s/d   shoot: W/A/S/D   next round: n   quit: q
time only advances when you act; three shots without a move overheats you";

/// Command-line arguments accepted by the Gridlock binary.
#[derive(Debug, Parser)]
#[command(name = "gridlock", about = "Turn-based grid combat in the terminal")]
struct Args {
    /// Number of grid columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Number of grid rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Walls scattered across each field.
    #[arg(long)]
    walls: Option<u32>,
    /// Explosive charges scattered across each field.
    #[arg(long)]
    explosives: Option<u32>,
    /// Hostiles placed on each field.
    #[arg(long)]
    hostiles: Option<u32>,
    /// Master seed for field generation and the hostile tie-break.
    #[arg(long)]
    seed: Option<u64>,
    /// Path to a TOML file with tunable overrides.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Tunables loaded from the optional TOML file; arguments override them.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Tunables {
    columns: Option<u32>,
    rows: Option<u32>,
    walls: Option<u32>,
    explosives: Option<u32>,
    hostiles: Option<u32>,
    seed: Option<u64>,
    player_start: Option<CellCoord>,
    effect_lifetime_ticks: Option<u32>,
    overheat_threshold: Option<u32>,
}

#[derive(Clone, Copy, Debug)]
struct Settings {
    world: WorldConfig,
    plan: FieldPlan,
}

impl Settings {
    fn resolve(args: &Args) -> Result<Self> {
        let tunables = match &args.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Tunables::default(),
        };

        let world_defaults = WorldConfig::default();
        let world = WorldConfig {
            columns: args.columns.or(tunables.columns).unwrap_or(world_defaults.columns),
            rows: args.rows.or(tunables.rows).unwrap_or(world_defaults.rows),
            player_start: tunables.player_start.unwrap_or(world_defaults.player_start),
            effect_lifetime_ticks: tunables
                .effect_lifetime_ticks
                .unwrap_or(world_defaults.effect_lifetime_ticks),
            overheat_threshold: tunables
                .overheat_threshold
                .unwrap_or(world_defaults.overheat_threshold),
            rng_seed: args.seed.or(tunables.seed).unwrap_or(world_defaults.rng_seed),
        };

        let plan_defaults = FieldPlan::default();
        let plan = FieldPlan {
            walls: args.walls.or(tunables.walls).unwrap_or(plan_defaults.walls),
            explosives: args
                .explosives
                .or(tunables.explosives)
                .unwrap_or(plan_defaults.explosives),
            hostiles: args
                .hostiles
                .or(tunables.hostiles)
                .unwrap_or(plan_defaults.hostiles),
        };

        let cells = u64::from(world.columns) * u64::from(world.rows);
        let requested =
            u64::from(plan.walls) + u64::from(plan.explosives) + u64::from(plan.hostiles);
        ensure!(
            requested + 1 <= cells,
            "field of {requested} entities plus the player does not fit a \
             {}x{} grid",
            world.columns,
            world.rows,
        );

        Ok(Self { world, plan })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Move(Direction),
    Fire(Direction),
    NewRound,
    Quit,
}

fn parse_action(input: &str) -> Option<Action> {
    match input {
        "w" => Some(Action::Move(Direction::North)),
        "s" => Some(Action::Move(Direction::South)),
        "a" => Some(Action::Move(Direction::West)),
        "d" => Some(Action::Move(Direction::East)),
        "W" => Some(Action::Fire(Direction::North)),
        "S" => Some(Action::Fire(Direction::South)),
        "A" => Some(Action::Fire(Direction::West)),
        "D" => Some(Action::Fire(Direction::East)),
        "n" => Some(Action::NewRound),
        "q" => Some(Action::Quit),
        _ => None,
    }
}

/// Runs one global hostile turn: snapshot, decide, replay the commands.
fn enemy_turn(world: &mut World, ai: &mut HostileAi, pending: &mut Vec<Event>) {
    let hostiles = query::hostile_view(world);
    let player = query::player(world);
    let mut commands = Vec::new();
    ai.handle(
        pending,
        &hostiles,
        player,
        |cell| query::is_floor_only(world, cell),
        &mut commands,
    );
    pending.clear();
    for command in commands {
        world::apply(world, command, pending);
    }
}

fn report_round_end(world: &World) {
    if let Some(outcome) = query::outcome(world) {
        let player = query::player(world);
        info!(?outcome, score = player.score, "round ended");
        println!("round over: {outcome:?} — score {}", player.score);
        println!("press n for the next round, q to quit");
    }
}

fn start_round(
    world: &mut World,
    commands: Vec<Command>,
    pending: &mut Vec<Event>,
) -> Result<()> {
    let before = pending.len();
    for command in commands {
        world::apply(world, command, pending);
    }
    for event in &pending[before..] {
        if let Event::FieldRejected { reason } = event {
            return Err(anyhow::Error::new(*reason)).context("generating the field");
        }
    }
    info!(hostiles = query::remaining_hostiles(world), "round started");
    Ok(())
}

fn run(settings: Settings) -> Result<()> {
    let mut world = World::with_config(settings.world);
    let bootstrap = Bootstrap;
    let mut ai = HostileAi::new(AiConfig::new(settings.world.rng_seed ^ AI_SEED_SALT));
    let mut pending: Vec<Event> = Vec::new();

    println!("{}", bootstrap.welcome_banner(&world));
    println!("{HELP_TEXT}");
    start_round(
        &mut world,
        bootstrap.opening_commands(settings.world.columns, settings.world.rows, settings.plan),
        &mut pending,
    )?;
    print!("{}", render::frame(&world));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading input")?;
        let Some(action) = parse_action(line.trim()) else {
            println!("{HELP_TEXT}");
            continue;
        };

        match action {
            Action::Quit => break,
            Action::NewRound => {
                if query::is_round_active(&world) {
                    println!("a round is already running");
                    continue;
                }
                start_round(
                    &mut world,
                    bootstrap.next_round_commands(settings.plan),
                    &mut pending,
                )?;
            }
            Action::Move(direction) | Action::Fire(direction) => {
                if !query::is_round_active(&world) {
                    println!("the round is over — press n to start the next one");
                    continue;
                }
                let command = match action {
                    Action::Move(_) => Command::MovePlayer { direction },
                    _ => Command::PlayerFire { direction },
                };
                let before = pending.len();
                world::apply(&mut world, command, &mut pending);
                let accepted = pending[before..].iter().any(|event| {
                    matches!(event, Event::PlayerMoved { .. } | Event::ShotFired { .. })
                });
                if accepted && query::is_round_active(&world) {
                    enemy_turn(&mut world, &mut ai, &mut pending);
                }
                world::apply(&mut world, Command::AdvanceEffects, &mut pending);
                report_round_end(&world);
            }
        }
        print!("{}", render::frame(&world));
    }

    Ok(())
}

/// Entry point for the Gridlock command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let settings = Settings::resolve(&args)?;
    run(settings)
}
