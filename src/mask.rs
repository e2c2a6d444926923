//! Selection masks for highlighting.
//!
//! A pattern picks, for each home slot, which of the piece's outward faces
//! are colored; the rest are drawn neutral. Masks are pure functions of the
//! pattern and do not depend on the puzzle state.

use std::fmt;
use std::str::FromStr;

use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::Axis;
use crate::shape::PYRAMORPHIX_APEXES;
use crate::slots::{kind, slot_coord, Slot, SlotKind, SLOT_COUNT};

/// One of the six faces of a piece, in +x, -x, +y, -y, +z, -z order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    pub const fn axis(self) -> Axis {
        match self {
            Face::PosX | Face::NegX => Axis::X,
            Face::PosY | Face::NegY => Axis::Y,
            Face::PosZ | Face::NegZ => Axis::Z,
        }
    }

    /// +1 or -1, the side of the axis this face looks toward.
    pub const fn sign(self) -> i32 {
        match self {
            Face::PosX | Face::PosY | Face::PosZ => 1,
            _ => -1,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    #[inline]
    pub const fn with(self, face: Face) -> Self {
        Self(self.0 | face.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn faces(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |&face| self.contains(face))
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }
}

/// The faces of a slot that lie on the outside of the puzzle.
pub fn exterior_faces(slot: Slot) -> FaceMask {
    let coord = slot_coord(slot);
    Face::ALL
        .into_iter()
        .filter(|face| face.axis().component(coord) == face.sign())
        .fold(FaceMask::EMPTY, FaceMask::with)
}

/// Named highlight patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    All,
    None,
    Centers,
    Edges,
    Corners,
    TopLayer,
    MiddleLayer,
    BottomLayer,
    /// Only the upward faces of the top layer.
    TopFace,
    TopEdges,
    TopCorners,
    /// Top center and edges.
    TopCross,
    /// The four corners that become the pyramorphix tips.
    Apexes,
}

impl Pattern {
    pub const ALL: [Pattern; 13] = [
        Pattern::All,
        Pattern::None,
        Pattern::Centers,
        Pattern::Edges,
        Pattern::Corners,
        Pattern::TopLayer,
        Pattern::MiddleLayer,
        Pattern::BottomLayer,
        Pattern::TopFace,
        Pattern::TopEdges,
        Pattern::TopCorners,
        Pattern::TopCross,
        Pattern::Apexes,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Pattern::All => "all",
            Pattern::None => "none",
            Pattern::Centers => "centers",
            Pattern::Edges => "edges",
            Pattern::Corners => "corners",
            Pattern::TopLayer => "top-layer",
            Pattern::MiddleLayer => "middle-layer",
            Pattern::BottomLayer => "bottom-layer",
            Pattern::TopFace => "top-face",
            Pattern::TopEdges => "top-edges",
            Pattern::TopCorners => "top-corners",
            Pattern::TopCross => "top-cross",
            Pattern::Apexes => "apexes",
        }
    }

    fn selects(self, slot: Slot) -> bool {
        let (_, y, _) = slot_coord(slot);
        let slot_kind = kind(slot);
        match self {
            Pattern::All => true,
            Pattern::None => false,
            Pattern::Centers => slot_kind == SlotKind::Center,
            Pattern::Edges => slot_kind == SlotKind::Edge,
            Pattern::Corners => slot_kind == SlotKind::Corner,
            Pattern::TopLayer | Pattern::TopFace => y == 1,
            Pattern::MiddleLayer => y == 0,
            Pattern::BottomLayer => y == -1,
            Pattern::TopEdges => y == 1 && slot_kind == SlotKind::Edge,
            Pattern::TopCorners => y == 1 && slot_kind == SlotKind::Corner,
            Pattern::TopCross => y == 1 && slot_kind != SlotKind::Corner,
            Pattern::Apexes => PYRAMORPHIX_APEXES.contains(&slot),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = PuzzleError;

    fn from_str(text: &str) -> PuzzleResult<Self> {
        let wanted = text.trim().to_ascii_lowercase();
        Pattern::ALL
            .into_iter()
            .find(|pattern| pattern.name() == wanted)
            .ok_or_else(|| PuzzleError::UnknownPattern(text.to_string()))
    }
}

/// Computes the colored faces of every home slot for a pattern.
pub fn compute_mask(pattern: Pattern) -> [FaceMask; SLOT_COUNT] {
    std::array::from_fn(|slot| {
        if !pattern.selects(slot) {
            return FaceMask::EMPTY;
        }
        let faces = exterior_faces(slot);
        match pattern {
            Pattern::TopFace => faces
                .faces()
                .filter(|&face| face == Face::PosY)
                .fold(FaceMask::EMPTY, FaceMask::with),
            _ => faces,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{slot_index, CORE};

    fn colored_slots(mask: &[FaceMask; SLOT_COUNT]) -> Vec<Slot> {
        (0..SLOT_COUNT).filter(|&s| !mask[s].is_empty()).collect()
    }

    #[test]
    fn test_exterior_face_counts() {
        assert_eq!(exterior_faces(CORE).len(), 0);
        for slot in 0..SLOT_COUNT {
            let expected = match kind(slot) {
                SlotKind::Core => 0,
                SlotKind::Center => 1,
                SlotKind::Edge => 2,
                SlotKind::Corner => 3,
            };
            assert_eq!(exterior_faces(slot).len(), expected, "slot {slot}");
        }
        let corner = exterior_faces(slot_index(1, 1, 1));
        assert!(corner.contains(Face::PosX) && corner.contains(Face::PosY) && corner.contains(Face::PosZ));
        assert!(!corner.contains(Face::NegY));
    }

    #[test]
    fn test_all_colors_54_stickers() {
        let mask = compute_mask(Pattern::All);
        let stickers: u32 = mask.iter().map(|m| m.len()).sum();
        assert_eq!(stickers, 54);
    }

    #[test]
    fn test_none_colors_nothing() {
        assert!(compute_mask(Pattern::None).iter().all(|m| m.is_empty()));
    }

    #[test]
    fn test_top_edges() {
        let mask = compute_mask(Pattern::TopEdges);
        assert_eq!(colored_slots(&mask), vec![7, 15, 17, 25]);
        assert_eq!(mask[7], exterior_faces(7));
    }

    #[test]
    fn test_top_face_only_colors_upward_faces() {
        let mask = compute_mask(Pattern::TopFace);
        assert_eq!(colored_slots(&mask).len(), 9);
        for face_mask in mask.iter().filter(|m| !m.is_empty()) {
            assert_eq!(face_mask.faces().collect::<Vec<_>>(), vec![Face::PosY]);
        }
    }

    #[test]
    fn test_top_cross_and_apexes() {
        let cross = compute_mask(Pattern::TopCross);
        assert_eq!(colored_slots(&cross), vec![7, 15, 16, 17, 25]);

        let apexes = compute_mask(Pattern::Apexes);
        assert_eq!(colored_slots(&apexes), vec![2, 6, 18, 26]);
    }

    #[test]
    fn test_layers_partition_the_puzzle() {
        let total: usize = [Pattern::TopLayer, Pattern::MiddleLayer, Pattern::BottomLayer]
            .into_iter()
            .map(|p| compute_mask(p).iter().map(|m| m.len() as usize).sum::<usize>())
            .sum();
        assert_eq!(total, 54);
    }

    #[test]
    fn test_mask_is_deterministic() {
        for pattern in Pattern::ALL {
            assert_eq!(compute_mask(pattern), compute_mask(pattern), "{pattern}");
        }
    }

    #[test]
    fn test_pattern_names_parse() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.name().parse::<Pattern>(), Ok(pattern));
        }
        assert_eq!(
            "stripes".parse::<Pattern>(),
            Err(PuzzleError::UnknownPattern("stripes".to_string()))
        );
    }
}
