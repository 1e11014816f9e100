//! Resolved moves

use super::{Coordinate, PieceId, PieceType};

/// One piece moving to one square. Castling is two of these.
///
/// A move refers to its piece by handle, so it is only meaningful against the
/// board it was resolved on and is consumed by [`Board::accept_move`].
///
/// [`Board::accept_move`]: super::Board::accept_move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub piece: PieceId,
    pub destination: Coordinate,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub promotion: Option<PieceType>,
    pub is_capture: bool,
}

impl Move {
    /// A quiet move: no capture, promotion, or check.
    pub fn quiet(piece: PieceId, destination: Coordinate) -> Self {
        Self {
            piece,
            destination,
            is_check: false,
            is_checkmate: false,
            promotion: None,
            is_capture: false,
        }
    }
}
