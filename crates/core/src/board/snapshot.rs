//! Frozen board states, one per ply

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::view::write_grid;
use super::{BoardView, PieceSnapshot};

/// Immutable board state compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pieces: BTreeSet<PieceSnapshot>,
}

impl BoardSnapshot {
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, piece: &PieceSnapshot) -> bool {
        self.pieces.contains(piece)
    }

    /// Pieces present here but not in `earlier`.
    pub fn added_since<'a>(&'a self, earlier: &'a BoardSnapshot) -> impl Iterator<Item = &'a PieceSnapshot> {
        self.pieces.difference(&earlier.pieces)
    }

    /// Pieces present in `earlier` but gone here.
    pub fn removed_since<'a>(&'a self, earlier: &'a BoardSnapshot) -> impl Iterator<Item = &'a PieceSnapshot> {
        earlier.pieces.difference(&self.pieces)
    }
}

impl FromIterator<PieceSnapshot> for BoardSnapshot {
    fn from_iter<I: IntoIterator<Item = PieceSnapshot>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

impl BoardView for BoardSnapshot {
    type Piece = PieceSnapshot;

    fn pieces(&self) -> impl Iterator<Item = &PieceSnapshot> {
        self.pieces.iter()
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(self, f)
    }
}
