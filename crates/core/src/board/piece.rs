//! Pieces, piece types and players

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Coordinate;
use crate::error::{Error, Result};

/// Type of a chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::King,
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Pawn,
    ];

    /// Letter used in SAN; pawns have none.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PieceType::King => "K",
            PieceType::Queen => "Q",
            PieceType::Rook => "R",
            PieceType::Bishop => "B",
            PieceType::Knight => "N",
            PieceType::Pawn => "",
        }
    }

    /// Letter used when rendering a board (uppercase).
    pub fn letter(&self) -> char {
        match self {
            PieceType::Pawn => 'P',
            other => other.abbreviation().chars().next().unwrap_or('?'),
        }
    }

    /// Piece named by a leading SAN letter. `'P'` is not a SAN prefix.
    pub fn from_san_letter(c: char) -> Option<Self> {
        match c {
            'K' => Some(PieceType::King),
            'Q' => Some(PieceType::Queen),
            'R' => Some(PieceType::Rook),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opponent(&self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Rank the player's king and rooks start on.
    pub fn back_rank(&self) -> i8 {
        match self {
            Player::White => 0,
            Player::Black => 7,
        }
    }

    /// Rank delta of a pawn advance.
    pub fn forward(&self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

/// Read access shared by live pieces and frozen snapshots.
pub trait PieceView {
    fn kind(&self) -> PieceType;
    fn owner(&self) -> Player;
    fn position(&self) -> Coordinate;

    fn matches(&self, kind: PieceType, owner: Player) -> bool {
        self.kind() == kind && self.owner() == owner
    }
}

/// Stable handle to a piece on a live [`Board`](super::Board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u32);

/// A piece in play.
///
/// Position and (for pawns) type change as moves are applied, so equality
/// and hashing go by identity only.
#[derive(Debug, Clone)]
pub struct Piece {
    id: PieceId,
    kind: PieceType,
    owner: Player,
    position: Coordinate,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceType, owner: Player, position: Coordinate) -> Self {
        Self {
            id,
            kind,
            owner,
            position,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub(crate) fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub(crate) fn promote(&mut self, kind: PieceType) -> Result<()> {
        if self.kind != PieceType::Pawn {
            return Err(Error::IllegalState(format!(
                "only pawns can be promoted, found {:?} at {}",
                self.kind, self.position
            )));
        }
        self.kind = kind;
        Ok(())
    }

    pub fn snapshot(&self) -> PieceSnapshot {
        PieceSnapshot::new(self.kind, self.owner, self.position)
    }
}

impl PieceView for Piece {
    fn kind(&self) -> PieceType {
        self.kind
    }

    fn owner(&self) -> Player {
        self.owner
    }

    fn position(&self) -> Coordinate {
        self.position
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Frozen copy of a piece, compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub kind: PieceType,
    pub owner: Player,
    pub position: Coordinate,
}

impl PieceSnapshot {
    pub fn new(kind: PieceType, owner: Player, position: Coordinate) -> Self {
        Self {
            kind,
            owner,
            position,
        }
    }
}

impl PieceView for PieceSnapshot {
    fn kind(&self) -> PieceType {
        self.kind
    }

    fn owner(&self) -> Player {
        self.owner
    }

    fn position(&self) -> Coordinate {
        self.position
    }
}
