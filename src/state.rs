//! The slot -> piece permutation and per-piece orientation.
//!
//! Pieces are identified by the slot they occupy when the puzzle is solved.
//! `current` is the only permutation that ever changes; `fixed` is set once at
//! construction and gives the stable identity -> home slot view used for
//! coloring.

use crate::catalog::{SliceDef, RING_LEN};
use crate::geometry::{self, Rotation, IDENTITY};
use crate::slots::{Slot, SLOT_COUNT};

/// Stable identity of one of the 27 pieces.
pub type PieceId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceState {
    /// Home slot of each piece, indexed by piece.
    fixed: [Slot; SLOT_COUNT],
    /// Occupant of each slot, indexed by slot.
    current: [PieceId; SLOT_COUNT],
    /// Accumulated rotation of each piece, indexed by piece.
    orientation: [Rotation; SLOT_COUNT],
}

impl Default for PieceState {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceState {
    /// Creates a solved puzzle: every piece home, none rotated.
    pub fn new() -> Self {
        let identity: [usize; SLOT_COUNT] = std::array::from_fn(|i| i);
        Self {
            fixed: identity,
            current: identity,
            orientation: [IDENTITY; SLOT_COUNT],
        }
    }

    /// Returns the puzzle to its solved arrangement.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn piece_at(&self, slot: Slot) -> PieceId {
        self.current[slot]
    }

    /// The slot a piece occupied when the puzzle was solved.
    #[inline]
    pub fn home_slot(&self, piece: PieceId) -> Slot {
        self.fixed[piece]
    }

    /// The slot a piece currently occupies.
    pub fn slot_of(&self, piece: PieceId) -> Slot {
        self.current
            .iter()
            .position(|&occupant| occupant == piece)
            .unwrap_or(self.fixed[piece])
    }

    #[inline]
    pub fn orientation(&self, piece: PieceId) -> Rotation {
        self.orientation[piece]
    }

    /// The slot -> piece table.
    pub fn occupants(&self) -> &[PieceId; SLOT_COUNT] {
        &self.current
    }

    /// Cycles the occupants of a ring by two positions.
    ///
    /// Corners and edges alternate around a ring, so a quarter turn moves every
    /// occupant two places. Running forward, the occupant of `ring[i + 2]` moves
    /// into `ring[i]` and the first two wrap to the end; running backward is the
    /// exact reverse.
    pub fn turn_ring(&mut self, ring: &[Slot; RING_LEN], forward: bool) {
        let slots = &mut self.current;
        if forward {
            let first = slots[ring[0]];
            let second = slots[ring[1]];
            for i in 0..RING_LEN - 2 {
                slots[ring[i]] = slots[ring[i + 2]];
            }
            slots[ring[6]] = first;
            slots[ring[7]] = second;
        } else {
            let last = slots[ring[7]];
            let second_last = slots[ring[6]];
            for i in (0..RING_LEN - 2).rev() {
                slots[ring[i + 2]] = slots[ring[i]];
            }
            slots[ring[1]] = last;
            slots[ring[0]] = second_last;
        }
    }

    /// Turns one slice by a signed quarter turn.
    ///
    /// Every piece in the layer, the center included, has the quarter turn
    /// composed into its orientation. The ring occupants, the pieces whose slot
    /// changes, are appended to `moved`.
    pub fn turn_slice(&mut self, slice: &SliceDef, degrees: i32, moved: &mut Vec<PieceId>) {
        let quarter = slice.axis.quarter_turn(degrees);
        for slot in slice.slots() {
            let piece = self.current[slot];
            self.orientation[piece] = geometry::compose(quarter, self.orientation[piece]);
        }
        moved.extend(slice.ring.iter().map(|&slot| self.current[slot]));
        self.turn_ring(&slice.ring, slice.runs_forward(degrees));
    }

    /// Whether every slot holds exactly one piece and every piece one slot.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; SLOT_COUNT];
        for &piece in &self.current {
            if piece >= SLOT_COUNT || seen[piece] {
                return false;
            }
            seen[piece] = true;
        }
        true
    }

    /// Whether every piece is home, ignoring orientation.
    pub fn is_home(&self) -> bool {
        self.current
            .iter()
            .enumerate()
            .all(|(slot, &piece)| self.fixed[piece] == slot)
    }

    /// Whether every piece is home and unrotated.
    pub fn is_solved(&self) -> bool {
        self.is_home() && self.orientation.iter().all(|&r| r == IDENTITY)
    }
}
