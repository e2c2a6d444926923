//! Move tokens: a letter, its turning sense, and the two-layer grip modifier.
//!
//! Written forms are a single letter, lowercase for a clockwise turn seen from
//! the face the letter names and uppercase for the opposite sense, optionally
//! followed by `w` to grip the adjacent middle slice too (`rw`, `Fw`).

use std::fmt;
use std::str::FromStr;

use crate::catalog::MoveDef;
use crate::error::{PuzzleError, PuzzleResult};

/// Turning sense, encoded by letter case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sense {
    /// Lowercase letter.
    Clockwise,
    /// Uppercase letter.
    CounterClockwise,
}

impl Sense {
    pub const fn flipped(self) -> Self {
        match self {
            Sense::Clockwise => Sense::CounterClockwise,
            Sense::CounterClockwise => Sense::Clockwise,
        }
    }

    /// Applies this sense to the signed angle of a lowercase turn.
    pub const fn signed(self, degrees: i32) -> i32 {
        match self {
            Sense::Clockwise => degrees,
            Sense::CounterClockwise => -degrees,
        }
    }
}

/// One requested turn.
///
/// The letter is stored lowercase; whether it names a real move is only
/// checked when the token is resolved against the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveToken {
    pub letter: char,
    pub sense: Sense,
    pub wide: bool,
}

impl MoveToken {
    /// Builds a token from a cased letter.
    pub fn new(letter: char) -> Self {
        let sense = if letter.is_ascii_uppercase() {
            Sense::CounterClockwise
        } else {
            Sense::Clockwise
        };
        Self {
            letter: letter.to_ascii_lowercase(),
            sense,
            wide: false,
        }
    }

    /// The same turn gripping the adjacent middle slice as well.
    pub fn widened(self) -> Self {
        Self { wide: true, ..self }
    }

    /// The turn that undoes this one.
    pub fn inverse(self) -> Self {
        Self {
            sense: self.sense.flipped(),
            ..self
        }
    }

    /// The letter with its case restored.
    pub fn cased_letter(&self) -> char {
        match self.sense {
            Sense::Clockwise => self.letter,
            Sense::CounterClockwise => self.letter.to_ascii_uppercase(),
        }
    }

    /// Signed angle of this turn about the resolved move's axis.
    pub fn degrees(&self, def: &MoveDef) -> i32 {
        self.sense.signed(def.degrees())
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cased_letter())?;
        if self.wide {
            f.write_str("w")?;
        }
        Ok(())
    }
}

impl FromStr for MoveToken {
    type Err = PuzzleError;

    fn from_str(text: &str) -> PuzzleResult<Self> {
        let mut chars = text.trim().chars();
        let token = match (chars.next(), chars.next(), chars.next()) {
            (Some(letter), None, _) if letter.is_ascii_alphabetic() => MoveToken::new(letter),
            (Some(letter), Some('w'), None) if letter.is_ascii_alphabetic() => {
                MoveToken::new(letter).widened()
            }
            _ => return Err(PuzzleError::UnknownMove(text.to_string())),
        };
        Ok(token)
    }
}

/// Parses a whitespace-separated move sequence such as `"r U rw x"`.
pub fn parse_sequence(text: &str) -> PuzzleResult<Vec<MoveToken>> {
    text.split_whitespace().map(str::parse).collect()
}
