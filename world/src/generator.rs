//! Random field layout sampling with an explicit capacity bound.

use gridlock_core::{CellCoord, GenerationError};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Placement plan produced by one sampling pass.
#[derive(Clone, Debug, Default)]
pub(crate) struct FieldLayout {
    pub(crate) walls: Vec<CellCoord>,
    pub(crate) explosives: Vec<CellCoord>,
    pub(crate) hostiles: Vec<CellCoord>,
}

/// Samples non-conflicting positions for the requested entity counts.
///
/// Every cell except `reserved` (the player's cell) is a candidate. Cells are
/// drawn without replacement from a shuffled free list, so the pass is bounded
/// by construction: when the request does not fit, the caller gets
/// [`GenerationError::CapacityExceeded`] instead of an endless resample loop.
pub(crate) fn sample_layout(
    rng: &mut ChaCha8Rng,
    columns: u32,
    rows: u32,
    reserved: CellCoord,
    walls: u32,
    explosives: u32,
    hostiles: u32,
) -> Result<FieldLayout, GenerationError> {
    let mut free: Vec<CellCoord> = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            if cell != reserved {
                free.push(cell);
            }
        }
    }

    let requested = walls as usize + explosives as usize + hostiles as usize;
    if requested > free.len() {
        return Err(GenerationError::CapacityExceeded {
            requested,
            available: free.len(),
        });
    }

    free.shuffle(rng);
    let mut drawn = free.into_iter();
    Ok(FieldLayout {
        walls: drawn.by_ref().take(walls as usize).collect(),
        explosives: drawn.by_ref().take(explosives as usize).collect(),
        hostiles: drawn.by_ref().take(hostiles as usize).collect(),
    })
}
