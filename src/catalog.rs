//! The static move table.
//!
//! Nine slice moves each rotate one layer of the grid. Their rings cannot be
//! derived from anything simpler: they encode which slots are adjacent and in
//! which order, so they are written out by hand. The three axis moves turn the
//! whole puzzle and are defined as three parallel slice turns.

use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::Axis;
use crate::slots::Slot;

/// Number of slots cyclically permuted by a slice turn.
pub const RING_LEN: usize = 8;

/// One layer of the puzzle and how it turns.
#[derive(Debug, PartialEq, Eq)]
pub struct SliceDef {
    pub letter: char,
    pub axis: Axis,
    /// Signed angle of the lowercase turn about the positive axis.
    pub degrees: i32,
    /// Whether the lowercase turn runs the ring forward (see `PieceState::turn_ring`).
    pub forward: bool,
    /// Corner and edge slots, alternating, in turning order.
    pub ring: [Slot; RING_LEN],
    /// The slot on the axis, which never moves.
    pub center: Slot,
}

impl SliceDef {
    /// Whether a turn by `degrees` runs the ring forward.
    #[inline]
    pub const fn runs_forward(&self, degrees: i32) -> bool {
        (degrees == self.degrees) == self.forward
    }

    /// Whether this is one of the three middle layers.
    pub fn is_middle(&self) -> bool {
        MIDDLE_SLICES.contains(&self.letter)
    }

    /// Every slot in this layer, ring first, center last.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.ring.iter().copied().chain(std::iter::once(self.center))
    }
}

/// A whole-puzzle turn.
#[derive(Debug, PartialEq, Eq)]
pub struct AxisDef {
    pub letter: char,
    pub axis: Axis,
    /// Signed angle of the lowercase turn about the positive axis.
    pub degrees: i32,
    /// Component slices, each flagged `true` when it turns in the opposite
    /// letter case to the axis move itself.
    pub components: [(char, bool); 3],
}

/// A resolved catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDef {
    Slice(&'static SliceDef),
    Axis(&'static AxisDef),
}

impl MoveDef {
    pub fn axis(&self) -> Axis {
        match self {
            MoveDef::Slice(slice) => slice.axis,
            MoveDef::Axis(axis) => axis.axis,
        }
    }

    /// Signed angle of the lowercase turn.
    pub fn degrees(&self) -> i32 {
        match self {
            MoveDef::Slice(slice) => slice.degrees,
            MoveDef::Axis(axis) => axis.degrees,
        }
    }
}

/// Letters of the three middle layers.
pub const MIDDLE_SLICES: [char; 3] = ['m', 'e', 's'];

/// All slice letters, grouped by axis.
pub const SLICE_LETTERS: [char; 9] = ['l', 'm', 'r', 'u', 'e', 'd', 'f', 's', 'b'];

/// All axis move letters.
pub const AXIS_LETTERS: [char; 3] = ['x', 'y', 'z'];

pub const SLICES: [SliceDef; 9] = [
    SliceDef {
        letter: 'l',
        axis: Axis::X,
        degrees: 90,
        forward: true,
        ring: [0, 9, 18, 21, 24, 15, 6, 3],
        center: 12,
    },
    SliceDef {
        letter: 'm',
        axis: Axis::X,
        degrees: 90,
        forward: false,
        ring: [1, 4, 7, 16, 25, 22, 19, 10],
        center: 13,
    },
    SliceDef {
        letter: 'r',
        axis: Axis::X,
        degrees: -90,
        forward: true,
        ring: [26, 23, 20, 11, 2, 5, 8, 17],
        center: 14,
    },
    SliceDef {
        letter: 'u',
        axis: Axis::Y,
        degrees: -90,
        forward: false,
        ring: [6, 7, 8, 17, 26, 25, 24, 15],
        center: 16,
    },
    SliceDef {
        letter: 'e',
        axis: Axis::Y,
        degrees: 90,
        forward: false,
        ring: [3, 12, 21, 22, 23, 14, 5, 4],
        center: 13,
    },
    SliceDef {
        letter: 'd',
        axis: Axis::Y,
        degrees: 90,
        forward: false,
        ring: [18, 19, 20, 11, 2, 1, 0, 9],
        center: 10,
    },
    SliceDef {
        letter: 'f',
        axis: Axis::Z,
        degrees: -90,
        forward: true,
        ring: [24, 21, 18, 19, 20, 23, 26, 25],
        center: 22,
    },
    SliceDef {
        letter: 's',
        axis: Axis::Z,
        degrees: -90,
        forward: true,
        ring: [9, 10, 11, 14, 17, 16, 15, 12],
        center: 13,
    },
    SliceDef {
        letter: 'b',
        axis: Axis::Z,
        degrees: 90,
        forward: true,
        ring: [0, 3, 6, 7, 8, 5, 2, 1],
        center: 4,
    },
];

/// Axis moves follow the outer slice on the positive side: x turns like r,
/// y like u, z like f.
pub const AXES: [AxisDef; 3] = [
    AxisDef {
        letter: 'x',
        axis: Axis::X,
        degrees: -90,
        components: [('l', true), ('m', true), ('r', false)],
    },
    AxisDef {
        letter: 'y',
        axis: Axis::Y,
        degrees: -90,
        components: [('u', false), ('e', true), ('d', true)],
    },
    AxisDef {
        letter: 'z',
        axis: Axis::Z,
        degrees: -90,
        components: [('f', false), ('s', false), ('b', true)],
    },
];

/// Resolves a move letter of either case.
pub fn lookup(letter: char) -> PuzzleResult<MoveDef> {
    let lower = letter.to_ascii_lowercase();
    if let Some(slice) = slice(lower) {
        return Ok(MoveDef::Slice(slice));
    }
    AXES.iter()
        .find(|def| def.letter == lower)
        .map(MoveDef::Axis)
        .ok_or_else(|| PuzzleError::UnknownMove(letter.to_string()))
}

/// Finds a slice by its lowercase letter.
pub fn slice(letter: char) -> Option<&'static SliceDef> {
    SLICES.iter().find(|def| def.letter == letter)
}

/// The middle slice gripped together with an outer slice in a two-layer turn.
pub fn adjacent(letter: char) -> Option<&'static SliceDef> {
    match letter.to_ascii_lowercase() {
        'l' | 'r' => slice('m'),
        'u' | 'd' => slice('e'),
        'f' | 'b' => slice('s'),
        _ => None,
    }
}
