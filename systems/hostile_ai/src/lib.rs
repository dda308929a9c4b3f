#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic hostile decision system: engage, fire, breach, or approach.
//!
//! The system decides once per live hostile per global turn, reading only
//! immutable snapshots and emitting commands the world validates. Aim state
//! (engaged, miss cooldown, locked direction) is private per-hostile
//! bookkeeping; the world's events feed back into it on the next turn.

use gridlock_core::{CellCoord, Command, Direction, Event, HostileId, HostileView, PlayerSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the hostile AI system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tie-break seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that decides one action per live hostile per global turn.
#[derive(Debug)]
pub struct HostileAi {
    rng: ChaCha8Rng,
    aims: Vec<AimState>,
}

#[derive(Clone, Copy, Debug)]
struct AimState {
    hostile: HostileId,
    engaged: bool,
    missed_last_shot: bool,
    aim: Option<Direction>,
}

impl AimState {
    fn new(hostile: HostileId) -> Self {
        Self {
            hostile,
            engaged: false,
            missed_last_shot: false,
            aim: None,
        }
    }
}

impl HostileAi {
    /// Creates a new hostile AI system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            aims: Vec::new(),
        }
    }

    /// Consumes the previous turn's events and fresh snapshots, emitting one
    /// command per live hostile.
    ///
    /// The `is_floor_only` closure should mirror the world's
    /// `query::is_floor_only` so the system can recognize blocked approach
    /// lanes; transient effects count as blockage for that purpose.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        hostiles: &HostileView,
        player: PlayerSnapshot,
        is_floor_only: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        for event in events {
            match event {
                Event::RoundStarted => self.aims.clear(),
                Event::HostileStepped { hostile, .. } => {
                    if let Some(aim) = self.aim_mut(*hostile) {
                        aim.missed_last_shot = false;
                    }
                }
                _ => {}
            }
        }

        self.sync_roster(hostiles);

        if !player.alive {
            return;
        }

        for snapshot in hostiles.iter() {
            let dx = i64::from(player.cell.column()) - i64::from(snapshot.cell.column());
            let dy = i64::from(player.cell.row()) - i64::from(snapshot.cell.row());
            if dx == 0 && dy == 0 {
                continue;
            }

            let Some(index) = self.aims.iter().position(|aim| aim.hostile == snapshot.id)
            else {
                continue;
            };
            let entry = &mut self.aims[index];

            // Sharing a row or column always re-arms the hostile, overriding
            // the miss cooldown: the player cannot hide on an open lane.
            if dx == 0 || dy == 0 {
                entry.engaged = true;
                entry.missed_last_shot = false;
                entry.aim = Some(if dx == 0 {
                    vertical_toward(dy)
                } else {
                    horizontal_toward(dx)
                });
            } else if !entry.missed_last_shot {
                if dx.abs() <= 1 {
                    entry.engaged = true;
                    entry.aim = Some(vertical_toward(dy));
                } else if dy.abs() <= 1 {
                    entry.engaged = true;
                    entry.aim = Some(horizontal_toward(dx));
                }
            }

            if entry.engaged && !entry.missed_last_shot {
                entry.engaged = false;
                entry.missed_last_shot = true;
                if let Some(direction) = entry.aim {
                    out.push(Command::HostileFire {
                        hostile: snapshot.id,
                        direction,
                    });
                }
                continue;
            }

            let vertical_lane = direction_of_row(dy).and_then(|d| snapshot.cell.step(d));
            let horizontal_lane = direction_of_column(dx).and_then(|d| snapshot.cell.step(d));
            if let (Some(vertical), Some(horizontal)) = (vertical_lane, horizontal_lane) {
                if !is_floor_only(vertical) && !is_floor_only(horizontal) {
                    out.push(Command::BreachCell {
                        hostile: snapshot.id,
                        cell: vertical,
                    });
                    continue;
                }
            }

            let (toward, fallback) =
                match (direction_of_column(dx), direction_of_row(dy)) {
                    (Some(horizontal), Some(vertical)) => {
                        if dx.abs() > dy.abs() {
                            (horizontal, Some(vertical))
                        } else if dy.abs() > dx.abs() {
                            (vertical, Some(horizontal))
                        } else if self.rng.gen::<bool>() {
                            (horizontal, Some(vertical))
                        } else {
                            (vertical, Some(horizontal))
                        }
                    }
                    (Some(horizontal), None) => (horizontal, None),
                    (None, Some(vertical)) => (vertical, None),
                    (None, None) => continue,
                };
            out.push(Command::StepHostile {
                hostile: snapshot.id,
                toward,
                fallback,
            });
        }
    }

    fn aim_mut(&mut self, hostile: HostileId) -> Option<&mut AimState> {
        self.aims.iter_mut().find(|aim| aim.hostile == hostile)
    }

    fn sync_roster(&mut self, hostiles: &HostileView) {
        self.aims
            .retain(|aim| hostiles.iter().any(|snapshot| snapshot.id == aim.hostile));
        for snapshot in hostiles.iter() {
            if !self.aims.iter().any(|aim| aim.hostile == snapshot.id) {
                self.aims.push(AimState::new(snapshot.id));
            }
        }
    }
}

fn vertical_toward(dy: i64) -> Direction {
    if dy > 0 {
        Direction::South
    } else {
        Direction::North
    }
}

fn horizontal_toward(dx: i64) -> Direction {
    if dx > 0 {
        Direction::East
    } else {
        Direction::West
    }
}

fn direction_of_row(dy: i64) -> Option<Direction> {
    match dy.signum() {
        1 => Some(Direction::South),
        -1 => Some(Direction::North),
        _ => None,
    }
}

fn direction_of_column(dx: i64) -> Option<Direction> {
    match dx.signum() {
        1 => Some(Direction::East),
        -1 => Some(Direction::West),
        _ => None,
    }
}
