//! Move generation and check detection shared by live boards and snapshots

use std::fmt;

use super::{Coordinate, PieceType, PieceView, Player};
use crate::error::{Error, Result};

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (2, -1),
    (2, 1),
    (-1, -2),
    (1, -2),
    (-1, 2),
    (1, 2),
];

const STRAIGHT: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Read-only board queries.
///
/// All reachability questions are asked backwards from a target square: which
/// pieces of a given type and owner could land here in one move.
pub trait BoardView {
    type Piece: PieceView + 'static;

    fn pieces(&self) -> impl Iterator<Item = &Self::Piece>;

    fn piece_at(&self, at: Coordinate) -> Option<&Self::Piece> {
        if !at.in_bounds() {
            return None;
        }
        self.pieces().find(|p| p.position() == at)
    }

    fn king(&self, owner: Player) -> Option<&Self::Piece> {
        self.pieces().find(|p| p.matches(PieceType::King, owner))
    }

    fn count(&self, kind: PieceType, owner: Player) -> usize {
        self.pieces().filter(|p| p.matches(kind, owner)).count()
    }

    /// Pieces of `kind` owned by `owner` that could move to `target`,
    /// ignoring whose turn it is and whether the move exposes their king.
    fn candidates(
        &self,
        kind: PieceType,
        owner: Player,
        target: Coordinate,
        is_capture: bool,
    ) -> Vec<&Self::Piece> {
        match kind {
            PieceType::King => at_offsets(self, target, &KING_OFFSETS, kind, owner),
            PieceType::Knight => at_offsets(self, target, &KNIGHT_OFFSETS, kind, owner),
            PieceType::Rook => ray_hits(self, target, &STRAIGHT, kind, owner),
            PieceType::Bishop => ray_hits(self, target, &DIAGONAL, kind, owner),
            PieceType::Queen => {
                let mut hits = ray_hits(self, target, &STRAIGHT, kind, owner);
                hits.extend(ray_hits(self, target, &DIAGONAL, kind, owner));
                hits
            }
            PieceType::Pawn => pawns(self, target, owner, is_capture),
        }
    }

    fn is_threatened_by(&self, at: Coordinate, player: Player) -> bool {
        PieceType::ALL
            .iter()
            .any(|&kind| !self.candidates(kind, player, at, true).is_empty())
    }

    fn is_king_in_check(&self, owner: Player) -> Result<bool> {
        let king = self
            .king(owner)
            .ok_or_else(|| Error::IllegalState(format!("no {} king on the board", owner)))?;
        Ok(self.is_threatened_by(king.position(), owner.opponent()))
    }
}

fn at_offsets<'a, B: BoardView + ?Sized>(
    board: &'a B,
    target: Coordinate,
    offsets: &[(i8, i8)],
    kind: PieceType,
    owner: Player,
) -> Vec<&'a B::Piece> {
    offsets
        .iter()
        .filter_map(|&(dr, df)| board.piece_at(target.offset(dr, df)))
        .filter(|p| p.matches(kind, owner))
        .collect()
}

fn ray_hits<'a, B: BoardView + ?Sized>(
    board: &'a B,
    target: Coordinate,
    directions: &[(i8, i8)],
    kind: PieceType,
    owner: Player,
) -> Vec<&'a B::Piece> {
    directions
        .iter()
        .filter_map(|&(dr, df)| first_hit(board, target, dr, df))
        .filter(|p| p.matches(kind, owner))
        .collect()
}

/// First occupied square walking from `from` (exclusive) in one direction.
fn first_hit<B: BoardView + ?Sized>(
    board: &B,
    from: Coordinate,
    d_rank: i8,
    d_file: i8,
) -> Option<&B::Piece> {
    let mut square = from.offset(d_rank, d_file);
    while square.in_bounds() {
        if let Some(piece) = board.piece_at(square) {
            return Some(piece);
        }
        square = square.offset(d_rank, d_file);
    }
    None
}

fn pawns<'a, B: BoardView + ?Sized>(
    board: &'a B,
    target: Coordinate,
    owner: Player,
    is_capture: bool,
) -> Vec<&'a B::Piece> {
    let back = -owner.forward();
    let is_pawn = |p: &&B::Piece| p.matches(PieceType::Pawn, owner);

    if is_capture {
        return [1, -1]
            .iter()
            .filter_map(|&df| board.piece_at(target.offset(back, df)))
            .filter(is_pawn)
            .collect();
    }

    // A pawn directly behind the target shadows any pawn two squares back,
    // and so does any other piece standing in between.
    match board.piece_at(target.offset(back, 0)) {
        Some(near) if is_pawn(&near) => vec![near],
        Some(_) => Vec::new(),
        None => board
            .piece_at(target.offset(2 * back, 0))
            .filter(is_pawn)
            .into_iter()
            .collect(),
    }
}

/// Renders the board with rank 8 at the top, White in uppercase.
pub(crate) fn write_grid<B: BoardView + ?Sized>(board: &B, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    const RULE: &str = "_________________";

    let mut grid = [[' '; 8]; 8];
    for piece in board.pieces() {
        let at = piece.position();
        if !at.in_bounds() {
            continue;
        }
        let letter = piece.kind().letter();
        grid[at.rank as usize][at.file as usize] = match piece.owner() {
            Player::White => letter,
            Player::Black => letter.to_ascii_lowercase(),
        };
    }

    for row in grid.iter().rev() {
        writeln!(f, "{}", RULE)?;
        for square in row {
            write!(f, "|{}", square)?;
        }
        writeln!(f, "|")?;
    }
    write!(f, "{}", RULE)
}
