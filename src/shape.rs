//! Structural shape states and the transitions between them.
//!
//! A shape change is not a permutation: it is an ordered list of cosmetic
//! steps (scaling layers in or out, morphing corners) played one after the
//! other, after which the shape flag flips. While a reduced shape is active the
//! middle slices are not physically present and may not be turned.

use std::fmt;
use std::str::FromStr;

use crate::catalog::{self, MIDDLE_SLICES, SLICE_LETTERS};
use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::Axis;
use crate::slots::{kind, SlotKind, SLOT_COUNT};
use crate::state::PieceId;

/// Home slots of the corners that become the tips of the pyramorphix.
///
/// They form an even-parity tetrahedron: (1,1,1), (-1,1,-1), (-1,-1,1), (1,-1,-1).
pub const PYRAMORPHIX_APEXES: [usize; 4] = [26, 6, 18, 2];

/// Slice letters present when the middle layers are gone.
const OUTER_SLICES: [char; 6] = ['l', 'r', 'u', 'd', 'f', 'b'];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeState {
    Standard3x3,
    Reduced2x2,
    Pyramorphix,
    ReducedPyramorphix,
}

impl ShapeState {
    pub const ALL: [ShapeState; 4] = [
        ShapeState::Standard3x3,
        ShapeState::Reduced2x2,
        ShapeState::Pyramorphix,
        ShapeState::ReducedPyramorphix,
    ];

    /// Whether the middle layers are removed.
    pub const fn is_reduced(self) -> bool {
        matches!(self, ShapeState::Reduced2x2 | ShapeState::ReducedPyramorphix)
    }

    pub const fn is_pyramorphix(self) -> bool {
        matches!(self, ShapeState::Pyramorphix | ShapeState::ReducedPyramorphix)
    }

    /// Slice letters a shuffle may draw from.
    pub fn shuffle_letters(self) -> &'static [char] {
        if self.is_reduced() {
            &OUTER_SLICES
        } else {
            &SLICE_LETTERS
        }
    }

    /// Checks that a move only involves slices present in this shape.
    ///
    /// Axis moves turn the whole puzzle and are legal in every shape.
    pub fn check_move(self, letter: char, wide: bool) -> PuzzleResult<()> {
        if !self.is_reduced() {
            return Ok(());
        }
        let letter = letter.to_ascii_lowercase();
        if MIDDLE_SLICES.contains(&letter) {
            return Err(PuzzleError::IllegalInShape { letter, shape: self });
        }
        if wide {
            if let Some(middle) = catalog::adjacent(letter) {
                return Err(PuzzleError::IllegalInShape {
                    letter: middle.letter,
                    shape: self,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for ShapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeState::Standard3x3 => "3x3",
            ShapeState::Reduced2x2 => "2x2",
            ShapeState::Pyramorphix => "pyramorphix",
            ShapeState::ReducedPyramorphix => "2x2-pyramorphix",
        })
    }
}

impl FromStr for ShapeState {
    type Err = PuzzleError;

    fn from_str(text: &str) -> PuzzleResult<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "3x3" | "standard" | "cube" => Ok(ShapeState::Standard3x3),
            "2x2" | "reduced" => Ok(ShapeState::Reduced2x2),
            "pyramorphix" | "pyra" => Ok(ShapeState::Pyramorphix),
            "2x2-pyramorphix" | "reduced-pyramorphix" | "pyra2x2" => {
                Ok(ShapeState::ReducedPyramorphix)
            }
            _ => Err(PuzzleError::UnknownShape(text.to_string())),
        }
    }
}

/// One cosmetic sub-operation of a shape transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeStep {
    /// Shrink the middle-layer pieces out of sight.
    ScaleMiddlesIn,
    /// Grow the corners until they fill a 2x2 cube.
    ScaleCornersOut,
    /// Shrink the corners back to unit size.
    ScaleCornersIn,
    /// Grow the middle-layer pieces back.
    ScaleMiddlesOut,
    /// Apply the corner morph targets and stand the puzzle on a vertex.
    MorphToPyramorphix,
    /// Undo the corner morph.
    MorphToCube,
}

impl ShapeStep {
    /// Home slots of the pieces this step animates.
    pub fn pieces(self) -> Vec<PieceId> {
        let corners = |piece: &PieceId| kind(*piece) == SlotKind::Corner;
        match self {
            ShapeStep::ScaleMiddlesIn | ShapeStep::ScaleMiddlesOut => {
                (0..SLOT_COUNT).filter(|p| !corners(p)).collect()
            }
            ShapeStep::ScaleCornersOut | ShapeStep::ScaleCornersIn => {
                (0..SLOT_COUNT).filter(corners).collect()
            }
            ShapeStep::MorphToPyramorphix | ShapeStep::MorphToCube => (0..SLOT_COUNT).collect(),
        }
    }

    /// Whole-puzzle tilt played with the step, as an axis and signed angle.
    pub const fn tilt(self) -> Option<(Axis, i32)> {
        match self {
            ShapeStep::MorphToPyramorphix => Some((Axis::Y, 45)),
            ShapeStep::MorphToCube => Some((Axis::Y, -45)),
            _ => None,
        }
    }
}

use ShapeState::*;
use ShapeStep::*;

const REDUCE: &[ShapeStep] = &[ScaleMiddlesIn, ScaleCornersOut];
const EXPAND: &[ShapeStep] = &[ScaleCornersIn, ScaleMiddlesOut];
const MORPH: &[ShapeStep] = &[MorphToPyramorphix];
const UNMORPH: &[ShapeStep] = &[MorphToCube];
const REDUCE_AND_MORPH: &[ShapeStep] = &[ScaleMiddlesIn, ScaleCornersOut, MorphToPyramorphix];
const UNMORPH_AND_EXPAND: &[ShapeStep] = &[MorphToCube, ScaleCornersIn, ScaleMiddlesOut];

/// The steps leading from one shape to another, if that edge exists.
///
/// There is no edge between `Reduced2x2` and `Pyramorphix`.
pub fn transition_path(from: ShapeState, to: ShapeState) -> Option<&'static [ShapeStep]> {
    match (from, to) {
        (Standard3x3, Reduced2x2) | (Pyramorphix, ReducedPyramorphix) => Some(REDUCE),
        (Reduced2x2, Standard3x3) | (ReducedPyramorphix, Pyramorphix) => Some(EXPAND),
        (Reduced2x2, ReducedPyramorphix) | (Standard3x3, Pyramorphix) => Some(MORPH),
        (ReducedPyramorphix, Reduced2x2) | (Pyramorphix, Standard3x3) => Some(UNMORPH),
        (Standard3x3, ReducedPyramorphix) => Some(REDUCE_AND_MORPH),
        (ReducedPyramorphix, Standard3x3) => Some(UNMORPH_AND_EXPAND),
        _ => None,
    }
}

/// Tracks the active shape and any transition in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeController {
    current: ShapeState,
    target: Option<ShapeState>,
}

impl Default for ShapeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeController {
    pub fn new() -> Self {
        Self {
            current: Standard3x3,
            target: None,
        }
    }

    pub fn current(&self) -> ShapeState {
        self.current
    }

    /// The shape being transitioned to, if any.
    pub fn target(&self) -> Option<ShapeState> {
        self.target
    }

    pub fn in_transition(&self) -> bool {
        self.target.is_some()
    }

    /// Starts a transition, returning its steps.
    ///
    /// Returns `Ok(None)` when already in `to`.
    pub fn begin(&mut self, to: ShapeState) -> PuzzleResult<Option<&'static [ShapeStep]>> {
        if self.current == to {
            return Ok(None);
        }
        let steps = transition_path(self.current, to).ok_or(
            PuzzleError::UnsupportedShapeTransition {
                from: self.current,
                to,
            },
        )?;
        self.target = Some(to);
        Ok(Some(steps))
    }

    /// Completes the transition in progress, flipping the shape flag.
    pub fn settle(&mut self) -> Option<ShapeState> {
        let to = self.target.take()?;
        self.current = to;
        Some(to)
    }

    /// Drops an unfinished transition, staying in the original shape.
    pub fn abandon(&mut self) {
        self.target = None;
    }
}
