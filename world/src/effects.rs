//! Transient-effect lifecycle: spawn, per-tick decay, removal.

use gridlock_core::{CellCoord, Direction, EffectKind, EffectSnapshot};

/// Live transient overlay stored in insertion order across the whole grid.
///
/// Insertion order is layering order; a renderer draws earlier entries first.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Effect {
    pub(crate) cell: CellCoord,
    pub(crate) kind: EffectKind,
    pub(crate) orientation: Direction,
    pub(crate) remaining_ticks: u32,
}

impl Effect {
    pub(crate) fn snapshot(&self) -> EffectSnapshot {
        EffectSnapshot {
            cell: self.cell,
            kind: self.kind,
            orientation: self.orientation,
            remaining_ticks: self.remaining_ticks,
            animation_frame: self.remaining_ticks % self.kind.frame_count(),
        }
    }
}

/// Decrements every effect's timer and removes the ones that expired.
pub(crate) fn advance(effects: &mut Vec<Effect>) {
    for effect in effects.iter_mut() {
        effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
    }
    effects.retain(|effect| effect.remaining_ticks > 0);
}

/// Removes every effect overlaying the provided cell.
pub(crate) fn sweep_cell(effects: &mut Vec<Effect>, cell: CellCoord) {
    effects.retain(|effect| effect.cell != cell);
}

/// Reports whether any effect overlays the provided cell.
pub(crate) fn cell_has_effects(effects: &[Effect], cell: CellCoord) -> bool {
    effects.iter().any(|effect| effect.cell == cell)
}
