#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridlock engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Gridlock.";

/// Cardinal directions used for movement, facing, and shot rays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Canonical facing angle in degrees: north 0, west 90, south 180,
    /// east 270.
    #[must_use]
    pub const fn angle_degrees(self) -> u16 {
        match self {
            Self::North => 0,
            Self::West => 90,
            Self::South => 180,
            Self::East => 270,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the northern edge; rows grow southward.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
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

    /// Returns the neighboring cell one step along `direction`.
    ///
    /// `None` means the step left the grid through the north or west edge;
    /// the east and south bounds belong to the grid and are checked there.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => match self.row.checked_sub(1) {
                Some(row) => Some(Self::new(self.column, row)),
                None => None,
            },
            Direction::South => Some(Self::new(self.column, self.row + 1)),
            Direction::East => Some(Self::new(self.column + 1, self.row)),
            Direction::West => match self.column.checked_sub(1) {
                Some(column) => Some(Self::new(column, self.row)),
                None => None,
            },
        }
    }
}

/// Unique identifier assigned to a hostile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HostileId(u32);

impl HostileId {
    /// Creates a new hostile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Blocking occupant stored in a grid cell.
///
/// A cell holds at most one blocker at any time; the permanent floor beneath
/// it and any transient effects above it never block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Blocker {
    /// Destructible, immobile obstacle.
    Wall,
    /// Destructible, immobile charge that detonates when destroyed.
    Explosive,
    /// Mobile hostile agent, registered in the roster under its identifier.
    Hostile(HostileId),
}

/// Origin of a hitscan ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shooter {
    /// The player fired the shot.
    Player,
    /// The identified hostile fired the shot.
    Hostile(HostileId),
}

/// Short-lived visual overlay spawned by shots and explosions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Beam segment left along the path of a player shot.
    LaserBeam,
    /// Beam segment left along the path of a hostile shot.
    EnemyLaserBeam,
    /// Ash left where a player shot destroyed an obstacle.
    AshPuff,
    /// Ash left where a hostile shot or breach strike landed.
    EnemyAshPuff,
    /// Ash left on every cell an explosion touched.
    ExplosionAsh,
}

impl EffectKind {
    /// Number of animation frames the effect cycles through while alive.
    #[must_use]
    pub const fn frame_count(self) -> u32 {
        match self {
            Self::LaserBeam | Self::EnemyLaserBeam => 4,
            Self::AshPuff | Self::EnemyAshPuff | Self::ExplosionAsh => 5,
        }
    }
}

/// Reasons a movement request may be rejected without mutating the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The target cell lies outside the grid bounds.
    OutOfBounds,
    /// The target cell is held by a blocking occupant.
    Blocked,
}

/// Failure surfaced when field generation cannot satisfy the request.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    /// The requested entity counts exceed the free cells available.
    #[error("requested {requested} placements but only {available} cells are free")]
    CapacityExceeded {
        /// Total walls, explosives, and hostiles requested.
        requested: usize,
        /// Free cells available after excluding the player's cell.
        available: usize,
    },
}

/// Terminal result of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Every hostile was eliminated.
    Victory,
    /// The player was caught by a shot, an explosion, or a hostile.
    PlayerKilled,
    /// The player fired too many consecutive shots without moving.
    Overheated,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the grid with the provided dimensions, clearing all content.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
    },
    /// Populates the grid with randomly placed obstacles and hostiles.
    GenerateField {
        /// Number of walls to place.
        walls: u32,
        /// Number of explosive charges to place.
        explosives: u32,
        /// Number of hostiles to place and register in the roster.
        hostiles: u32,
    },
    /// Resets the player onto the field and activates the round.
    BeginRound,
    /// Requests that the player advance a single step.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Fires the player's hitscan ray.
    PlayerFire {
        /// Direction the ray travels away from the player.
        direction: Direction,
    },
    /// Requests that a hostile advance a single step, with a fallback axis.
    StepHostile {
        /// Identifier of the hostile attempting to move.
        hostile: HostileId,
        /// Preferred direction of travel.
        toward: Direction,
        /// Alternative direction tried when the preferred step is rejected.
        fallback: Option<Direction>,
    },
    /// Fires a hostile's hitscan ray.
    HostileFire {
        /// Identifier of the firing hostile.
        hostile: HostileId,
        /// Direction the ray travels away from the hostile.
        direction: Direction,
    },
    /// Destroys whatever occupies a cell to clear an approach lane.
    BreachCell {
        /// Identifier of the hostile performing the strike.
        hostile: HostileId,
        /// Cell whose occupant is destroyed.
        cell: CellCoord,
    },
    /// Advances every transient effect by one rendering tick.
    AdvanceEffects,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was rebuilt with new dimensions.
    GridConfigured {
        /// Number of cell columns in the rebuilt grid.
        columns: u32,
        /// Number of cell rows in the rebuilt grid.
        rows: u32,
    },
    /// Confirms that the field was populated as requested.
    FieldGenerated {
        /// Number of walls placed.
        walls: u32,
        /// Number of explosive charges placed.
        explosives: u32,
        /// Number of hostiles placed.
        hostiles: u32,
    },
    /// Reports that field generation was refused and the world untouched.
    FieldRejected {
        /// Specific reason the generation failed.
        reason: GenerationError,
    },
    /// Announces that a round became active.
    RoundStarted,
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Facing adopted by the player after the move.
        facing: Direction,
    },
    /// Reports that a player movement request was rejected.
    PlayerMoveRejected {
        /// Direction of the attempted step.
        direction: Direction,
        /// Specific reason the step failed.
        reason: MoveRejection,
    },
    /// Announces that a hitscan ray was fired.
    ShotFired {
        /// Origin of the ray.
        shooter: Shooter,
        /// Cell the ray was fired from.
        origin: CellCoord,
        /// Direction the ray traveled.
        direction: Direction,
    },
    /// Reports that a wall was destroyed by a ray.
    WallDestroyed {
        /// Cell the wall occupied.
        cell: CellCoord,
    },
    /// Reports that a hostile was destroyed and removed from the roster.
    HostileDestroyed {
        /// Identifier of the destroyed hostile.
        hostile: HostileId,
        /// Cell the hostile occupied.
        cell: CellCoord,
    },
    /// Reports that an explosive charge detonated.
    ExplosiveDetonated {
        /// Cell at the center of the detonation.
        cell: CellCoord,
    },
    /// Reports that a hostile forcibly cleared a cell.
    CellBreached {
        /// Identifier of the hostile that struck.
        hostile: HostileId,
        /// Cell that was cleared.
        cell: CellCoord,
    },
    /// Confirms that a hostile moved between two cells.
    HostileStepped {
        /// Identifier of the hostile that advanced.
        hostile: HostileId,
        /// Cell the hostile occupied before moving.
        from: CellCoord,
        /// Cell the hostile occupies after completing the move.
        to: CellCoord,
        /// Facing adopted by the hostile after the move.
        facing: Direction,
    },
    /// Announces that the round ended with the provided outcome.
    RoundEnded {
        /// Terminal result of the round.
        outcome: RoundOutcome,
    },
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Direction the player is facing.
    pub facing: Direction,
    /// Consecutive shots fired since the last move.
    pub heat: u32,
    /// Hostiles destroyed by the player across the current life.
    pub score: u32,
    /// Indicates whether the player survived the round so far.
    pub alive: bool,
}

/// Immutable representation of a single hostile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostileSnapshot {
    /// Unique identifier assigned to the hostile.
    pub id: HostileId,
    /// Grid cell currently occupied by the hostile.
    pub cell: CellCoord,
    /// Direction the hostile is facing.
    pub facing: Direction,
}

/// Read-only snapshot describing every live hostile, ordered by identifier.
#[derive(Clone, Debug, Default)]
pub struct HostileView {
    snapshots: Vec<HostileSnapshot>,
}

impl HostileView {
    /// Creates a new hostile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HostileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live hostiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the roster was empty when the view was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HostileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of one transient effect used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectSnapshot {
    /// Cell the effect overlays.
    pub cell: CellCoord,
    /// Visual kind of the effect.
    pub kind: EffectKind,
    /// Orientation inherited from the shot or strike that spawned it.
    pub orientation: Direction,
    /// Rendering ticks left before the effect expires.
    pub remaining_ticks: u32,
    /// Animation frame derived from the remaining lifetime.
    pub animation_frame: u32,
}

/// Read-only snapshot of every live transient effect.
///
/// Snapshots keep their insertion order, which is the layering order a
/// renderer should draw them in, back to front.
#[derive(Clone, Debug, Default)]
pub struct EffectView {
    snapshots: Vec<EffectSnapshot>,
}

impl EffectView {
    /// Creates a new effect view preserving the provided layering order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EffectSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in layering order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EffectSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense blocking-occupant grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<Blocker>],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<Blocker>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the blocker occupying the provided cell, if any.
    #[must_use]
    pub fn blocker(&self, cell: CellCoord) -> Option<Blocker> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell lies inside the grid and holds no blocker.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some_and(|index| {
            self.cells.get(index).copied().flatten().is_none()
        })
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Option<Blocker>> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
