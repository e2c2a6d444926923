//! 3D rotation utilities.
//!
//! A cube has 24 possible orientations in 3D space (the rotation group of a cube).
//! These are the 6 ways to choose which face points up, times 4 rotations around
//! the vertical axis. Piece orientations are stored as an index into this table.

use std::sync::OnceLock;

use crate::slots::Coord;

/// Index into [`ROTATIONS`].
pub type Rotation = u8;

/// The rotation that leaves every coordinate in place.
pub const IDENTITY: Rotation = 0;

/// Number of proper rotations of a cube.
pub const NUM_ROTATIONS: usize = 24;

/// All 24 rotation functions for a cube.
///
/// Organized as 6 face-up choices x 4 rotations around vertical:
/// - Rotations 0-3: +Z face up
/// - Rotations 4-7: +Y face up
/// - Rotations 8-11: -Z face up
/// - Rotations 12-15: -Y face up
/// - Rotations 16-19: +X face up
/// - Rotations 20-23: -X face up
///
/// The quarter turns used by slice moves live at fixed indices, see
/// [`Axis::quarter_turn`].
pub const ROTATIONS: [fn(Coord) -> Coord; NUM_ROTATIONS] = [
    // +Z face up (identity orientation), rotate around Z axis
    |(x, y, z)| (x, y, z),      // 0 degrees
    |(x, y, z)| (-y, x, z),     // 90 degrees
    |(x, y, z)| (-x, -y, z),    // 180 degrees
    |(x, y, z)| (y, -x, z),     // 270 degrees
    // +Y face up, rotate around Y axis
    |(x, y, z)| (x, -z, y),
    |(x, y, z)| (z, x, y),
    |(x, y, z)| (-x, z, y),
    |(x, y, z)| (-z, -x, y),
    // -Z face up, rotate around Z axis
    |(x, y, z)| (x, -y, -z),
    |(x, y, z)| (y, x, -z),
    |(x, y, z)| (-x, y, -z),
    |(x, y, z)| (-y, -x, -z),
    // -Y face up, rotate around Y axis
    |(x, y, z)| (x, z, -y),
    |(x, y, z)| (-z, x, -y),
    |(x, y, z)| (-x, -z, -y),
    |(x, y, z)| (z, -x, -y),
    // +X face up, rotate around X axis
    |(x, y, z)| (z, y, -x),
    |(x, y, z)| (-y, z, -x),
    |(x, y, z)| (-z, -y, -x),
    |(x, y, z)| (y, -z, -x),
    // -X face up, rotate around X axis
    |(x, y, z)| (-z, y, x),
    |(x, y, z)| (-y, -z, x),
    |(x, y, z)| (z, -y, x),
    |(x, y, z)| (y, z, x),
];

/// One of the three principal axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the coordinate component along this axis.
    #[inline]
    pub const fn component(self, (x, y, z): Coord) -> i32 {
        match self {
            Axis::X => x,
            Axis::Y => y,
            Axis::Z => z,
        }
    }

    /// Unit vector along the positive axis.
    pub const fn unit(self) -> Coord {
        match self {
            Axis::X => (1, 0, 0),
            Axis::Y => (0, 1, 0),
            Axis::Z => (0, 0, 1),
        }
    }

    /// The quarter turn about this axis with the given signed angle.
    ///
    /// Positive angles are counter-clockwise looking down the positive axis
    /// toward the origin (right-hand rule).
    pub const fn quarter_turn(self, degrees: i32) -> Rotation {
        match (self, degrees > 0) {
            (Axis::X, true) => 4,
            (Axis::X, false) => 12,
            (Axis::Y, true) => 16,
            (Axis::Y, false) => 20,
            (Axis::Z, true) => 1,
            (Axis::Z, false) => 3,
        }
    }
}

/// Applies a rotation to a coordinate.
#[inline]
pub fn rotate(rotation: Rotation, coord: Coord) -> Coord {
    ROTATIONS[rotation as usize](coord)
}

/// Returns the rotation equivalent to applying `inner` then `outer`.
pub fn compose(outer: Rotation, inner: Rotation) -> Rotation {
    composition_table()[outer as usize][inner as usize]
}

fn composition_table() -> &'static [[Rotation; NUM_ROTATIONS]; NUM_ROTATIONS] {
    static TABLE: OnceLock<[[Rotation; NUM_ROTATIONS]; NUM_ROTATIONS]> = OnceLock::new();
    TABLE.get_or_init(|| {
        // a coordinate with distinct magnitudes is moved differently by every rotation
        const PROBE: Coord = (1, 2, 3);

        let mut table = [[IDENTITY; NUM_ROTATIONS]; NUM_ROTATIONS];
        for (outer, row) in table.iter_mut().enumerate() {
            for (inner, cell) in row.iter_mut().enumerate() {
                let target = ROTATIONS[outer](ROTATIONS[inner](PROBE));
                *cell = ROTATIONS
                    .iter()
                    .position(|candidate| candidate(PROBE) == target)
                    .map_or(IDENTITY, |found| found as Rotation);
            }
        }
        table
    })
}
