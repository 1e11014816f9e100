//! Board square identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const RANK_DIGITS: &str = "12345678";
const FILE_LETTERS: &str = "abcdefgh";

/// A square on the board, 0-indexed by rank and file.
///
/// Values outside `0..=7` are allowed so that offset arithmetic (ray casting,
/// knight jumps) can step past the edge; such coordinates compare normally but
/// never hold a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub rank: i8,
    pub file: i8,
}

impl Coordinate {
    pub const fn new(rank: i8, file: i8) -> Self {
        Self { rank, file }
    }

    /// Builds a coordinate from a PGN rank digit (`'1'..='8'`) and file letter
    /// (`'a'..='h'`).
    pub fn from_chars(rank: char, file: char) -> Result<Self> {
        match (rank_index(rank), file_index(file)) {
            (Some(r), Some(f)) => Ok(Self::new(r, f)),
            _ => Err(Error::InvalidCoordinate { rank, file }),
        }
    }

    pub fn in_bounds(&self) -> bool {
        (0..8).contains(&self.rank) && (0..8).contains(&self.file)
    }

    pub fn offset(&self, d_rank: i8, d_file: i8) -> Self {
        Self::new(self.rank + d_rank, self.file + d_file)
    }
}

/// 0-indexed rank for a PGN rank digit.
pub(crate) fn rank_index(c: char) -> Option<i8> {
    RANK_DIGITS.find(c).map(|i| i as i8)
}

/// 0-indexed file for a PGN file letter.
pub(crate) fn file_index(c: char) -> Option<i8> {
    FILE_LETTERS.find(c).map(|i| i as i8)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_bounds() {
            write!(
                f,
                "{}{}",
                (b'a' + self.file as u8) as char,
                (b'1' + self.rank as u8) as char
            )
        } else {
            write!(f, "({},{})", self.rank, self.file)
        }
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    /// Parses algebraic form, e.g. `"e4"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::from_chars(rank, file),
            (file, rank, _) => Err(Error::InvalidCoordinate {
                rank: rank.unwrap_or(' '),
                file: file.unwrap_or(' '),
            }),
        }
    }
}
