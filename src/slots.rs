//! The fixed 3x3x3 slot grid.
//!
//! Slots are the 27 spatial positions of the puzzle. Coordinates are centered
//! on the core, so every component is one of -1, 0 or 1, and the linear index
//! is x-minor: `idx = (x + 1) + (y + 1) * 3 + (z + 1) * 9`.

use crate::state::PieceState;

/// A centered 3D coordinate, each component in `-1..=1`.
pub type Coord = (i32, i32, i32);

/// One of the 27 fixed positions, `0..SLOT_COUNT`.
pub type Slot = usize;

/// Number of slots (and pieces) in the puzzle.
pub const SLOT_COUNT: usize = 27;

/// The core slot at the origin.
pub const CORE: Slot = slot_index(0, 0, 0);

/// Converts centered coordinates to a slot index.
#[inline(always)]
pub const fn slot_index(x: i32, y: i32, z: i32) -> Slot {
    ((x + 1) + (y + 1) * 3 + (z + 1) * 9) as Slot
}

/// Converts a slot index back to centered coordinates.
#[inline(always)]
pub const fn slot_coord(slot: Slot) -> Coord {
    (
        (slot % 3) as i32 - 1,
        ((slot / 3) % 3) as i32 - 1,
        (slot / 9) as i32 - 1,
    )
}

/// What a slot is, from how many of its coordinates sit on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Core,
    Center,
    Edge,
    Corner,
}

/// Classifies a slot by counting its nonzero coordinates.
pub const fn kind(slot: Slot) -> SlotKind {
    let (x, y, z) = slot_coord(slot);
    match (x != 0) as u8 + (y != 0) as u8 + (z != 0) as u8 {
        0 => SlotKind::Core,
        1 => SlotKind::Center,
        2 => SlotKind::Edge,
        _ => SlotKind::Corner,
    }
}

/// Formats the slot -> piece table as text.
///
/// Shows the three z-layers side by side. Within a layer rows run from top
/// (y = 1) to bottom (y = -1) and columns from x = -1 to x = 1.
pub fn format_state(state: &PieceState) -> String {
    const LAYER_GAP: &str = "   ";

    let mut output = String::new();

    let header: Vec<String> = (-1..=1).map(|z| format!("z={:<6}", z)).collect();
    output.push_str(header.join(LAYER_GAP).trim_end());
    output.push('\n');

    for y in (-1..=1).rev() {
        let row: Vec<String> = (-1..=1)
            .map(|z| {
                (-1..=1)
                    .map(|x| format!("{:>2}", state.piece_at(slot_index(x, y, z))))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        output.push_str(row.join(LAYER_GAP).trim_end());
        output.push('\n');
    }

    output
}
