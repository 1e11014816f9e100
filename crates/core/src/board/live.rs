//! The mutable board a game is played out on

use std::fmt;

use super::view::write_grid;
use super::{BoardSnapshot, BoardView, Coordinate, Move, Piece, PieceId, PieceType, PieceView, Player};
use crate::error::{Error, Result};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Pieces in play, mutated in place as moves are accepted.
#[derive(Debug, Clone)]
pub struct Board {
    pieces: Vec<Piece>,
}

impl Board {
    /// Standard starting position.
    pub fn new() -> Self {
        let mut layout = Vec::with_capacity(32);
        for owner in [Player::White, Player::Black] {
            let back = owner.back_rank();
            let pawns = back + owner.forward();
            for (file, kind) in BACK_RANK.iter().enumerate() {
                layout.push((*kind, owner, Coordinate::new(back, file as i8)));
                layout.push((PieceType::Pawn, owner, Coordinate::new(pawns, file as i8)));
            }
        }
        Self::with_layout(layout)
    }

    /// Board holding exactly the given pieces.
    pub fn from_pieces<I>(pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PieceType, Player, Coordinate)>,
    {
        let board = Self::with_layout(pieces);
        for (i, piece) in board.pieces.iter().enumerate() {
            let at = piece.position();
            if !at.in_bounds() {
                return Err(Error::IllegalState(format!("piece placed off the board at {}", at)));
            }
            if board.pieces[..i].iter().any(|p| p.position() == at) {
                return Err(Error::IllegalState(format!("two pieces placed on {}", at)));
            }
        }
        Ok(board)
    }

    fn with_layout<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = (PieceType, Player, Coordinate)>,
    {
        let pieces = pieces
            .into_iter()
            .enumerate()
            .map(|(i, (kind, owner, at))| Piece::new(PieceId(i as u32), kind, owner, at))
            .collect();
        Self { pieces }
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn index_of(&self, id: PieceId) -> Option<usize> {
        self.pieces.iter().position(|p| p.id() == id)
    }

    fn index_at(&self, at: Coordinate) -> Option<usize> {
        self.pieces.iter().position(|p| p.position() == at)
    }

    fn missing(id: PieceId) -> Error {
        Error::IllegalState(format!("piece {:?} is not on the board", id))
    }

    /// Finds the single piece a SAN move refers to.
    ///
    /// Candidates are narrowed by the optional disambiguating rank and file,
    /// then, only if several remain, by dropping those whose move would leave
    /// their own king in check.
    pub fn resolve_moving_piece(
        &mut self,
        kind: PieceType,
        owner: Player,
        destination: Coordinate,
        rank: Option<i8>,
        file: Option<i8>,
        is_capture: bool,
    ) -> Result<PieceId> {
        let mut ids: Vec<PieceId> = self
            .candidates(kind, owner, destination, is_capture)
            .into_iter()
            .filter(|p| rank.map_or(true, |r| p.position().rank == r))
            .filter(|p| file.map_or(true, |f| p.position().file == f))
            .map(Piece::id)
            .collect();

        if ids.len() > 1 {
            let mut legal = Vec::with_capacity(ids.len());
            for id in ids {
                if !self.exposes_king(id, destination, is_capture)? {
                    legal.push(id);
                }
            }
            ids = legal;
        }

        match ids.as_slice() {
            [id] => Ok(*id),
            [] => Err(Error::NoSuchMove {
                piece: kind,
                owner,
                destination,
            }),
            _ => Err(Error::AmbiguousMove {
                piece: kind,
                owner,
                destination,
                candidates: ids.len(),
            }),
        }
    }

    /// Tries the move in place and reports whether it leaves the mover's king
    /// in check. The board is restored before returning.
    fn exposes_king(&mut self, id: PieceId, destination: Coordinate, is_capture: bool) -> Result<bool> {
        let (owner, origin) = {
            let piece = self.piece(id).ok_or_else(|| Self::missing(id))?;
            (piece.owner(), piece.position())
        };

        let captured = if is_capture {
            self.index_at(destination)
                .map(|i| (i, self.pieces.remove(i)))
        } else {
            None
        };

        let in_check = match self.index_of(id) {
            Some(i) => {
                self.pieces[i].set_position(destination);
                let in_check = self.is_king_in_check(owner);
                self.pieces[i].set_position(origin);
                in_check
            }
            None => Err(Self::missing(id)),
        };

        if let Some((i, piece)) = captured {
            self.pieces.insert(i, piece);
        }
        in_check
    }

    /// Applies a resolved move: removes the captured piece (en passant
    /// included), relocates the mover and promotes it if asked.
    ///
    /// The board is left untouched when an error is returned.
    pub fn accept_move(&mut self, mv: &Move) -> Result<()> {
        let (kind, owner) = {
            let piece = self.piece(mv.piece).ok_or_else(|| Self::missing(mv.piece))?;
            (piece.kind(), piece.owner())
        };

        if !mv.destination.in_bounds() {
            return Err(Error::IllegalState(format!("move off the board to {}", mv.destination)));
        }
        if mv.promotion.is_some() && kind != PieceType::Pawn {
            return Err(Error::IllegalState(format!("{:?} cannot be promoted", kind)));
        }

        let captured = if mv.is_capture {
            let index = match self.index_at(mv.destination) {
                Some(i) => i,
                None => self.en_passant_victim(kind, owner, mv.destination)?,
            };
            if self.pieces[index].owner() == owner {
                return Err(Error::IllegalState(format!(
                    "{} cannot capture its own piece on {}",
                    owner, mv.destination
                )));
            }
            Some(index)
        } else {
            if self.index_at(mv.destination).is_some() {
                return Err(Error::IllegalState(format!(
                    "{} is occupied but the move is not a capture",
                    mv.destination
                )));
            }
            None
        };

        if let Some(index) = captured {
            self.pieces.remove(index);
        }
        let index = self.index_of(mv.piece).ok_or_else(|| Self::missing(mv.piece))?;
        let piece = &mut self.pieces[index];
        piece.set_position(mv.destination);
        if let Some(promotion) = mv.promotion {
            piece.promote(promotion)?;
        }
        Ok(())
    }

    /// Index of the pawn taken en passant by a capture onto the empty
    /// `destination`.
    fn en_passant_victim(&self, kind: PieceType, owner: Player, destination: Coordinate) -> Result<usize> {
        if kind != PieceType::Pawn {
            return Err(Error::IllegalState(format!(
                "{:?} captures on empty square {}",
                kind, destination
            )));
        }
        let behind = destination.offset(-owner.forward(), 0);
        self.pieces
            .iter()
            .position(|p| p.position() == behind && p.matches(PieceType::Pawn, owner.opponent()))
            .ok_or_else(|| {
                Error::IllegalState(format!(
                    "no pawn on {} to capture en passant on {}",
                    behind, destination
                ))
            })
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.pieces.iter().map(Piece::snapshot).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView for Board {
    type Piece = Piece;

    fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(self, f)
    }
}
