#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gridlock.
//!
//! The world owns the grid, the player, the hostile roster, the transient
//! effects, and the seedable RNG. All mutation flows through [`apply`];
//! adapters and systems read back through [`query`]. Commands that carry a
//! hostile identifier tolerate stale ids, so decision systems may plan a whole
//! turn against one snapshot and replay it even when earlier commands in the
//! batch removed some of the actors involved.

mod effects;
mod generator;
mod grid;

use gridlock_core::{
    Blocker, CellCoord, Command, Direction, EffectKind, Event, HostileId, MoveRejection,
    RoundOutcome, Shooter, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use effects::Effect;
use grid::Grid;

const DEFAULT_GRID_COLUMNS: u32 = 15;
const DEFAULT_GRID_ROWS: u32 = 15;
const DEFAULT_PLAYER_START: CellCoord = CellCoord::new(2, 4);
const DEFAULT_EFFECT_LIFETIME_TICKS: u32 = 10;
const DEFAULT_OVERHEAT_THRESHOLD: u32 = 3;
const FIELD_GENERATION_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Tunable parameters a driver may override at construction time.
#[derive(Clone, Copy, Debug)]
pub struct WorldConfig {
    /// Number of cell columns laid out in the grid.
    pub columns: u32,
    /// Number of cell rows laid out in the grid.
    pub rows: u32,
    /// Cell the player occupies when a round begins.
    pub player_start: CellCoord,
    /// Rendering ticks a freshly spawned transient effect lives for.
    pub effect_lifetime_ticks: u32,
    /// Heat value at which the round ends in an overheat loss.
    pub overheat_threshold: u32,
    /// Seed for the world RNG used by field generation.
    pub rng_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            player_start: DEFAULT_PLAYER_START,
            effect_lifetime_ticks: DEFAULT_EFFECT_LIFETIME_TICKS,
            overheat_threshold: DEFAULT_OVERHEAT_THRESHOLD,
            rng_seed: FIELD_GENERATION_SEED,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    facing: Direction,
    heat: u32,
    score: u32,
    alive: bool,
}

#[derive(Clone, Copy, Debug)]
struct Hostile {
    id: HostileId,
    cell: CellCoord,
    facing: Direction,
}

/// Represents the authoritative Gridlock world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    grid: Grid,
    hostiles: Vec<Hostile>,
    player: Player,
    effects: Vec<Effect>,
    rng: ChaCha8Rng,
    next_hostile_id: u32,
    round_active: bool,
    outcome: Option<RoundOutcome>,
}

impl World {
    /// Creates a new world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a new world using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let start = clamp_to_grid(config.player_start, config.columns, config.rows);
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(config.columns, config.rows),
            hostiles: Vec::new(),
            player: Player {
                cell: start,
                facing: Direction::North,
                heat: 0,
                score: 0,
                alive: true,
            },
            effects: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            next_hostile_id: 0,
            round_active: false,
            outcome: None,
            config,
        }
    }

    fn hostile_index(&self, id: HostileId) -> Option<usize> {
        self.hostiles.iter().position(|hostile| hostile.id == id)
    }

    fn allocate_hostile_id(&mut self) -> HostileId {
        let id = HostileId::new(self.next_hostile_id);
        self.next_hostile_id = self.next_hostile_id.wrapping_add(1);
        id
    }

    fn spawn_effect(&mut self, cell: CellCoord, kind: EffectKind, orientation: Direction) {
        self.effects.push(Effect {
            cell,
            kind,
            orientation,
            remaining_ticks: self.config.effect_lifetime_ticks,
        });
    }

    fn end_round(&mut self, outcome: RoundOutcome, out_events: &mut Vec<Event>) {
        if self.round_active {
            self.round_active = false;
            self.outcome = Some(outcome);
            out_events.push(Event::RoundEnded { outcome });
        }
    }

    fn kill_player_if_at(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.round_active && self.player.alive && self.player.cell == cell {
            self.player.alive = false;
            self.end_round(RoundOutcome::PlayerKilled, out_events);
        }
    }

    fn check_victory(&mut self, out_events: &mut Vec<Event>) {
        if self.round_active && self.hostiles.is_empty() {
            self.end_round(RoundOutcome::Victory, out_events);
        }
    }

    fn check_player_collision(&mut self, out_events: &mut Vec<Event>) {
        if self.round_active
            && self.player.alive
            && matches!(self.grid.blocker(self.player.cell), Some(Blocker::Hostile(_)))
        {
            self.player.alive = false;
            self.end_round(RoundOutcome::PlayerKilled, out_events);
        }
    }

    fn drop_from_roster(&mut self, id: HostileId, credit_player: bool, out_events: &mut Vec<Event>) {
        if let Some(index) = self.hostile_index(id) {
            let hostile = self.hostiles.remove(index);
            out_events.push(Event::HostileDestroyed {
                hostile: hostile.id,
                cell: hostile.cell,
            });
            if credit_player {
                self.player.score += 1;
            }
        }
    }

    /// Resolves a hitscan ray cell-by-cell away from `origin`.
    ///
    /// The first blocking occupant absorbs the ray entirely; traversed empty
    /// cells receive the shooter's laser flavor. A hostile ray checks the live
    /// player position ahead of the grid because the player is not a grid
    /// occupant.
    fn fire_ray(
        &mut self,
        shooter: Shooter,
        origin: CellCoord,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        out_events.push(Event::ShotFired {
            shooter,
            origin,
            direction,
        });
        let (laser, ash) = match shooter {
            Shooter::Player => (EffectKind::LaserBeam, EffectKind::AshPuff),
            Shooter::Hostile(_) => (EffectKind::EnemyLaserBeam, EffectKind::EnemyAshPuff),
        };
        let credit_player = matches!(shooter, Shooter::Player);
        let hostile_shot = matches!(shooter, Shooter::Hostile(_));

        let mut cursor = origin;
        loop {
            let Some(next) = cursor
                .step(direction)
                .filter(|cell| self.grid.contains(*cell))
            else {
                break;
            };

            if hostile_shot && self.player.alive && self.player.cell == next {
                self.spawn_effect(next, EffectKind::EnemyAshPuff, direction);
                self.kill_player_if_at(next, out_events);
                break;
            }

            match self.grid.blocker(next) {
                Some(Blocker::Wall) => {
                    let _ = self.grid.clear(next);
                    self.spawn_effect(next, ash, direction);
                    out_events.push(Event::WallDestroyed { cell: next });
                    break;
                }
                Some(Blocker::Hostile(id)) => {
                    let _ = self.grid.clear(next);
                    self.drop_from_roster(id, credit_player, out_events);
                    self.spawn_effect(next, ash, direction);
                    break;
                }
                Some(Blocker::Explosive) => {
                    self.explode(next, credit_player, out_events);
                    break;
                }
                None => {
                    self.spawn_effect(next, laser, direction);
                    cursor = next;
                }
            }
        }
    }

    /// Detonates the explosive at `center` and scorches its 3x3 neighborhood.
    ///
    /// The center is cleared and ash-covered before the scan. A neighboring
    /// explosive chains: it detonates recursively and the current scan stops
    /// at that branch instead of flood-filling. Cells holding only bare floor
    /// are skipped by the terrain pass; the player-death check covers every
    /// cell of the clamped neighborhood.
    fn explode(&mut self, center: CellCoord, credit_player: bool, out_events: &mut Vec<Event>) {
        if let Some(Blocker::Hostile(id)) = self.grid.blocker(center) {
            self.drop_from_roster(id, credit_player, out_events);
        }
        let _ = self.grid.clear(center);
        effects::sweep_cell(&mut self.effects, center);
        self.spawn_effect(center, EffectKind::ExplosionAsh, Direction::North);
        out_events.push(Event::ExplosiveDetonated { cell: center });
        self.kill_player_if_at(center, out_events);

        let (columns, rows) = self.grid.dimensions();
        let column_end = center
            .column()
            .saturating_add(1)
            .min(columns.saturating_sub(1));
        let row_end = center.row().saturating_add(1).min(rows.saturating_sub(1));

        for row in center.row().saturating_sub(1)..=row_end {
            for column in center.column().saturating_sub(1)..=column_end {
                let cell = CellCoord::new(column, row);
                if cell == center {
                    continue;
                }
                self.kill_player_if_at(cell, out_events);

                let blocker = self.grid.blocker(cell);
                if blocker.is_none() && !effects::cell_has_effects(&self.effects, cell) {
                    continue;
                }

                match blocker {
                    Some(Blocker::Explosive) => {
                        self.explode(cell, credit_player, out_events);
                        return;
                    }
                    Some(Blocker::Hostile(id)) => {
                        let _ = self.grid.clear(cell);
                        self.drop_from_roster(id, credit_player, out_events);
                    }
                    Some(Blocker::Wall) => {
                        let _ = self.grid.clear(cell);
                    }
                    None => {}
                }

                effects::sweep_cell(&mut self.effects, cell);
                self.spawn_effect(cell, EffectKind::ExplosionAsh, Direction::North);
            }
        }
    }

    fn try_step_hostile(
        &mut self,
        index: usize,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let hostile = self.hostiles[index];
        let Some(target) = hostile
            .cell
            .step(direction)
            .filter(|cell| self.grid.contains(*cell))
        else {
            return false;
        };
        if self.grid.blocker(target).is_some() {
            return false;
        }

        let _ = self.grid.clear(hostile.cell);
        self.grid.place(target, Blocker::Hostile(hostile.id));
        let entry = &mut self.hostiles[index];
        entry.cell = target;
        entry.facing = direction;
        out_events.push(Event::HostileStepped {
            hostile: hostile.id,
            from: hostile.cell,
            to: target,
            facing: direction,
        });
        true
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { columns, rows } => {
            world.config.columns = columns;
            world.config.rows = rows;
            world.grid = Grid::new(columns, rows);
            world.hostiles.clear();
            world.effects.clear();
            world.round_active = false;
            world.outcome = None;
            world.player.cell = clamp_to_grid(world.config.player_start, columns, rows);
            out_events.push(Event::GridConfigured { columns, rows });
        }
        Command::GenerateField {
            walls,
            explosives,
            hostiles,
        } => {
            let (columns, rows) = world.grid.dimensions();
            match generator::sample_layout(
                &mut world.rng,
                columns,
                rows,
                world.player.cell,
                walls,
                explosives,
                hostiles,
            ) {
                Ok(layout) => {
                    world.grid = Grid::new(columns, rows);
                    world.effects.clear();
                    world.hostiles.clear();
                    for cell in layout.walls {
                        world.grid.place(cell, Blocker::Wall);
                    }
                    for cell in layout.explosives {
                        world.grid.place(cell, Blocker::Explosive);
                    }
                    for cell in layout.hostiles {
                        let id = world.allocate_hostile_id();
                        world.grid.place(cell, Blocker::Hostile(id));
                        world.hostiles.push(Hostile {
                            id,
                            cell,
                            facing: Direction::South,
                        });
                    }
                    out_events.push(Event::FieldGenerated {
                        walls,
                        explosives,
                        hostiles,
                    });
                }
                Err(reason) => out_events.push(Event::FieldRejected { reason }),
            }
        }
        Command::BeginRound => {
            if !world.player.alive {
                world.player.score = 0;
                world.player.alive = true;
            }
            world.player.cell =
                clamp_to_grid(world.config.player_start, world.config.columns, world.config.rows);
            world.player.facing = Direction::North;
            world.player.heat = 0;
            world.round_active = true;
            world.outcome = None;
            out_events.push(Event::RoundStarted);
        }
        Command::MovePlayer { direction } => {
            if !world.round_active {
                return;
            }
            let Some(target) = world
                .player
                .cell
                .step(direction)
                .filter(|cell| world.grid.contains(*cell))
            else {
                out_events.push(Event::PlayerMoveRejected {
                    direction,
                    reason: MoveRejection::OutOfBounds,
                });
                return;
            };
            if world.grid.blocker(target).is_some() {
                out_events.push(Event::PlayerMoveRejected {
                    direction,
                    reason: MoveRejection::Blocked,
                });
                return;
            }
            let from = world.player.cell;
            world.player.cell = target;
            world.player.facing = direction;
            world.player.heat = 0;
            out_events.push(Event::PlayerMoved {
                from,
                to: target,
                facing: direction,
            });
        }
        Command::PlayerFire { direction } => {
            if !world.round_active {
                return;
            }
            world.fire_ray(Shooter::Player, world.player.cell, direction, out_events);
            world.check_victory(out_events);
            if world.round_active {
                world.player.heat += 1;
                if world.player.heat >= world.config.overheat_threshold {
                    world.end_round(RoundOutcome::Overheated, out_events);
                }
            }
        }
        Command::StepHostile {
            hostile,
            toward,
            fallback,
        } => {
            if !world.round_active {
                return;
            }
            let Some(index) = world.hostile_index(hostile) else {
                return;
            };
            let mut stepped = world.try_step_hostile(index, toward, out_events);
            if !stepped {
                if let Some(direction) = fallback {
                    stepped = world.try_step_hostile(index, direction, out_events);
                }
            }
            if stepped {
                world.check_player_collision(out_events);
            }
        }
        Command::HostileFire { hostile, direction } => {
            if !world.round_active {
                return;
            }
            let Some(index) = world.hostile_index(hostile) else {
                return;
            };
            let origin = world.hostiles[index].cell;
            world.fire_ray(Shooter::Hostile(hostile), origin, direction, out_events);
            world.check_victory(out_events);
        }
        Command::BreachCell { hostile, cell } => {
            if !world.round_active {
                return;
            }
            if world.hostile_index(hostile).is_none() || !world.grid.contains(cell) {
                return;
            }
            match world.grid.blocker(cell) {
                Some(Blocker::Explosive) => world.explode(cell, false, out_events),
                Some(Blocker::Hostile(id)) => {
                    let _ = world.grid.clear(cell);
                    world.drop_from_roster(id, false, out_events);
                    effects::sweep_cell(&mut world.effects, cell);
                    world.spawn_effect(cell, EffectKind::EnemyAshPuff, Direction::North);
                }
                Some(Blocker::Wall) | None => {
                    let _ = world.grid.clear(cell);
                    effects::sweep_cell(&mut world.effects, cell);
                    world.spawn_effect(cell, EffectKind::EnemyAshPuff, Direction::North);
                }
            }
            out_events.push(Event::CellBreached { hostile, cell });
            world.check_victory(out_events);
        }
        Command::AdvanceEffects => effects::advance(&mut world.effects),
    }
}

fn clamp_to_grid(cell: CellCoord, columns: u32, rows: u32) -> CellCoord {
    CellCoord::new(
        cell.column().min(columns.saturating_sub(1)),
        cell.row().min(rows.saturating_sub(1)),
    )
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{effects, World};
    use gridlock_core::{
        Blocker, CellCoord, EffectSnapshot, EffectView, HostileSnapshot, HostileView,
        OccupancyView, PlayerSnapshot, RoundOutcome,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Reports whether a round is currently being played.
    #[must_use]
    pub fn is_round_active(world: &World) -> bool {
        world.round_active
    }

    /// Terminal outcome of the most recently finished round, if any.
    #[must_use]
    pub fn outcome(world: &World) -> Option<RoundOutcome> {
        world.outcome
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            facing: world.player.facing,
            heat: world.player.heat,
            score: world.player.score,
            alive: world.player.alive,
        }
    }

    /// Number of hostiles still registered in the roster.
    #[must_use]
    pub fn remaining_hostiles(world: &World) -> usize {
        world.hostiles.len()
    }

    /// Captures a read-only view of every live hostile.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        HostileView::from_snapshots(
            world
                .hostiles
                .iter()
                .map(|hostile| HostileSnapshot {
                    id: hostile.id,
                    cell: hostile.cell,
                    facing: hostile.facing,
                })
                .collect(),
        )
    }

    /// Exposes a read-only view of the dense blocking-occupant grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        let (columns, rows) = world.grid.dimensions();
        OccupancyView::new(world.grid.cells(), columns, rows)
    }

    /// Captures every live transient effect in layering order.
    #[must_use]
    pub fn effect_view(world: &World) -> EffectView {
        EffectView::from_snapshots(world.effects.iter().map(effects::Effect::snapshot).collect())
    }

    /// Contents of a single cell captured for presentation or inspection.
    #[derive(Clone, Debug)]
    pub struct CellSnapshot {
        /// Blocking occupant currently holding the cell, if any.
        pub blocker: Option<Blocker>,
        /// Transient effects overlaying the cell in layering order.
        pub effects: Vec<EffectSnapshot>,
    }

    /// Captures the contents of one cell, or `None` outside the grid.
    #[must_use]
    pub fn cell_snapshot(world: &World, cell: CellCoord) -> Option<CellSnapshot> {
        if !world.grid.contains(cell) {
            return None;
        }
        Some(CellSnapshot {
            blocker: world.grid.blocker(cell),
            effects: world
                .effects
                .iter()
                .filter(|effect| effect.cell == cell)
                .map(effects::Effect::snapshot)
                .collect(),
        })
    }

    /// Reports whether the cell holds nothing beyond the permanent floor.
    ///
    /// Cells outside the grid are never bare floor.
    #[must_use]
    pub fn is_floor_only(world: &World, cell: CellCoord) -> bool {
        world.grid.contains(cell)
            && world.grid.blocker(cell).is_none()
            && !effects::cell_has_effects(&world.effects, cell)
    }
}

/// Direct placement helpers for tests, bypassing random generation.
///
/// Callers are responsible for targeting free in-bounds cells; the helpers
/// assert both so a broken fixture fails loudly.
#[cfg(any(test, feature = "field_scaffolding"))]
pub mod scaffolding {
    use super::{Blocker, CellCoord, Hostile, HostileId, World};
    use gridlock_core::Direction;

    /// Places a wall on a free cell.
    pub fn place_wall(world: &mut World, cell: CellCoord) {
        assert_free(world, cell);
        world.grid.place(cell, Blocker::Wall);
    }

    /// Places an explosive charge on a free cell.
    pub fn place_explosive(world: &mut World, cell: CellCoord) {
        assert_free(world, cell);
        world.grid.place(cell, Blocker::Explosive);
    }

    /// Places a hostile on a free cell and registers it in the roster.
    pub fn place_hostile(world: &mut World, cell: CellCoord) -> HostileId {
        assert_free(world, cell);
        let id = world.allocate_hostile_id();
        world.grid.place(cell, Blocker::Hostile(id));
        world.hostiles.push(Hostile {
            id,
            cell,
            facing: Direction::South,
        });
        id
    }

    /// Moves the player to an arbitrary in-bounds cell.
    pub fn set_player_cell(world: &mut World, cell: CellCoord) {
        assert!(world.grid.contains(cell), "cell {cell:?} outside the grid");
        world.player.cell = cell;
    }

    fn assert_free(world: &World, cell: CellCoord) {
        assert!(world.grid.contains(cell), "cell {cell:?} outside the grid");
        assert!(
            world.grid.blocker(cell).is_none(),
            "cell {cell:?} already blocked"
        );
    }
}
