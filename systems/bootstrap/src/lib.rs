#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Gridlock experience.

use gridlock_core::Command;
use gridlock_world::{query, World};

/// Field composition requested when a round opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldPlan {
    /// Number of walls scattered across the field.
    pub walls: u32,
    /// Number of explosive charges scattered across the field.
    pub explosives: u32,
    /// Number of hostiles placed and registered in the roster.
    pub hostiles: u32,
}

impl Default for FieldPlan {
    fn default() -> Self {
        Self {
            walls: 10,
            explosives: 10,
            hostiles: 5,
        }
    }
}

/// Produces the command batches that open and advance the experience.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Commands that size the grid, start the first round, and populate the
    /// field.
    ///
    /// Generation runs after `BeginRound` so the free-cell sampling reserves
    /// the player's round-start cell rather than a stale position.
    #[must_use]
    pub fn opening_commands(&self, columns: u32, rows: u32, plan: FieldPlan) -> Vec<Command> {
        vec![
            Command::ConfigureGrid { columns, rows },
            Command::BeginRound,
            Command::GenerateField {
                walls: plan.walls,
                explosives: plan.explosives,
                hostiles: plan.hostiles,
            },
        ]
    }

    /// Commands that advance to the next level on the existing grid.
    ///
    /// The score is untouched; only a round that begins after a player death
    /// resets it.
    #[must_use]
    pub fn next_round_commands(&self, plan: FieldPlan) -> Vec<Command> {
        vec![
            Command::BeginRound,
            Command::GenerateField {
                walls: plan.walls,
                explosives: plan.explosives,
                hostiles: plan.hostiles,
            },
        ]
    }
}
