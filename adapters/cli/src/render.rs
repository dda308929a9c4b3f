//! Glyph-grid renderer for the terminal adapter.

use gridlock_core::{Blocker, CellCoord, Direction, EffectKind};
use gridlock_world::{query, World};

/// Renders the world as one text frame: the glyph grid plus a status line.
pub(crate) fn frame(world: &World) -> String {
    let (columns, rows) = query::dimensions(world);
    let player = query::player(world);
    let occupancy = query::occupancy_view(world);

    let cell_count = columns as usize * rows as usize;
    let mut overlay: Vec<Option<char>> = vec![None; cell_count];
    for effect in query::effect_view(world).iter() {
        let index = effect.cell.row() as usize * columns as usize + effect.cell.column() as usize;
        if let Some(slot) = overlay.get_mut(index) {
            // Later effects layer above earlier ones.
            *slot = Some(effect_glyph(effect.kind, effect.orientation));
        }
    }

    let mut out = String::with_capacity(cell_count + rows as usize + 64);
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let glyph = if player.cell == cell {
                if player.alive {
                    '@'
                } else {
                    'x'
                }
            } else if let Some(blocker) = occupancy.blocker(cell) {
                match blocker {
                    Blocker::Wall => '#',
                    Blocker::Explosive => 'o',
                    Blocker::Hostile(_) => 'e',
                }
            } else if let Some(glyph) = overlay[row as usize * columns as usize + column as usize]
            {
                glyph
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "heat {}  score {}  hostiles {}",
        player.heat,
        player.score,
        query::remaining_hostiles(world),
    ));
    if let Some(outcome) = query::outcome(world) {
        out.push_str(&format!("  round over: {outcome:?}"));
    }
    out.push('\n');
    out
}

fn effect_glyph(kind: EffectKind, orientation: Direction) -> char {
    let vertical = matches!(orientation, Direction::North | Direction::South);
    match kind {
        EffectKind::LaserBeam => {
            if vertical {
                '|'
            } else {
                '-'
            }
        }
        EffectKind::EnemyLaserBeam => {
            if vertical {
                '!'
            } else {
                '='
            }
        }
        EffectKind::AshPuff | EffectKind::EnemyAshPuff => ',',
        EffectKind::ExplosionAsh => '*',
    }
}
