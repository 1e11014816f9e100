//! Standard Algebraic Notation: parsing tokens and resolving them on a board

use std::fmt;
use std::str::FromStr;

use crate::board::{file_index, rank_index, Board, BoardView, Coordinate, Move, PieceId, PieceType, PieceView, Player};
use crate::error::{Error, Result};

/// A move in Standard Algebraic Notation, without check suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum San {
    Normal {
        piece: PieceType,
        file: Option<i8>,
        rank: Option<i8>,
        capture: bool,
        destination: Coordinate,
        promotion: Option<PieceType>,
    },
    CastleShort,
    CastleLong,
}

/// A `San` with its check and checkmate suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanPlus {
    pub san: San,
    pub check: bool,
    pub checkmate: bool,
}

/// Parses `token` and resolves it against `board` for `player`.
pub fn resolve(token: &str, player: Player, board: &mut Board) -> Result<Vec<Move>> {
    token.parse::<SanPlus>()?.to_moves(player, board)
}

impl SanPlus {
    /// Resolves the notation into the move(s) it denotes on `board`: one for
    /// an ordinary move, king then rook for castling.
    pub fn to_moves(&self, player: Player, board: &mut Board) -> Result<Vec<Move>> {
        match self.san {
            San::Normal {
                piece,
                file,
                rank,
                capture,
                destination,
                promotion,
            } => {
                let id = board.resolve_moving_piece(piece, player, destination, rank, file, capture)?;
                Ok(vec![Move {
                    piece: id,
                    destination,
                    is_check: self.check,
                    is_checkmate: self.checkmate,
                    promotion,
                    is_capture: capture,
                }])
            }
            San::CastleShort => self.castle(player, board, 7, 6, 5),
            San::CastleLong => self.castle(player, board, 0, 2, 3),
        }
    }

    fn castle(&self, player: Player, board: &Board, rook_file: i8, king_to: i8, rook_to: i8) -> Result<Vec<Move>> {
        let rank = player.back_rank();
        let king = castling_piece(board, Coordinate::new(rank, 4), PieceType::King, player)?;
        let rook = castling_piece(board, Coordinate::new(rank, rook_file), PieceType::Rook, player)?;

        let (low, high) = (rook_file.min(4) + 1, rook_file.max(4));
        if let Some(blocker) = (low..high).find_map(|file| board.piece_at(Coordinate::new(rank, file))) {
            return Err(Error::IllegalCastle(format!(
                "{} blocks {} from castling",
                blocker.position(),
                player
            )));
        }

        // The king never gives check itself; the suffix belongs to the rook.
        Ok(vec![
            Move::quiet(king, Coordinate::new(rank, king_to)),
            Move {
                is_check: self.check,
                is_checkmate: self.checkmate,
                ..Move::quiet(rook, Coordinate::new(rank, rook_to))
            },
        ])
    }
}

fn castling_piece(board: &Board, at: Coordinate, kind: PieceType, owner: Player) -> Result<PieceId> {
    match board.piece_at(at) {
        Some(piece) if piece.matches(kind, owner) => Ok(piece.id()),
        Some(piece) => Err(Error::IllegalCastle(format!(
            "expected {} {:?} on {}, found {} {:?}",
            owner,
            kind,
            at,
            piece.owner(),
            piece.kind()
        ))),
        None => Err(Error::IllegalCastle(format!("no {} {:?} on {}", owner, kind, at))),
    }
}

fn strip_check(s: &str) -> (&str, bool, bool) {
    if let Some(rest) = s.strip_suffix('+') {
        (rest, true, false)
    } else if let Some(rest) = s.strip_suffix('#') {
        (rest, false, true)
    } else {
        (s, false, false)
    }
}

impl FromStr for SanPlus {
    type Err = Error;

    fn from_str(token: &str) -> Result<SanPlus> {
        let invalid = |reason| Error::InvalidSan {
            san: token.to_string(),
            reason,
        };

        if !token.is_ascii() {
            return Err(invalid("unexpected non-ASCII character"));
        }

        if token.starts_with('O') {
            let (body, check, checkmate) = strip_check(token);
            let san = match body {
                "O-O" => San::CastleShort,
                "O-O-O" => San::CastleLong,
                _ => return Err(invalid("unrecognised castling move")),
            };
            return Ok(SanPlus { san, check, checkmate });
        }

        let (piece, rest) = match token.chars().next().and_then(PieceType::from_san_letter) {
            Some(piece) => (piece, &token[1..]),
            None => (PieceType::Pawn, token),
        };

        let (rest, check, checkmate) = strip_check(rest);
        if rest.contains(|c: char| c == '+' || c == '#') {
            return Err(invalid("check marker must be the last character"));
        }

        let (rest, promotion) = match rest.split_once('=') {
            None => (rest, None),
            Some(_) if piece != PieceType::Pawn => return Err(invalid("only pawns can be promoted")),
            Some((head, promoted)) => match promoted {
                "Q" => (head, Some(PieceType::Queen)),
                "R" => (head, Some(PieceType::Rook)),
                "B" => (head, Some(PieceType::Bishop)),
                "N" => (head, Some(PieceType::Knight)),
                _ => return Err(invalid("promotion must be one of Q, R, B, N")),
            },
        };

        if rest.len() < 2 {
            return Err(invalid("missing destination square"));
        }
        let (head, square) = rest.split_at(rest.len() - 2);
        let (head, capture) = match head.strip_suffix('x') {
            Some(head) => (head, true),
            None => (head, false),
        };
        if head.contains('x') {
            return Err(invalid("capture marker must directly precede the destination"));
        }

        let square = square.as_bytes();
        let destination = Coordinate::from_chars(square[1] as char, square[0] as char)?;

        let (file, rank) = match *head.as_bytes() {
            [] => (None, None),
            [c] => match (file_index(c as char), rank_index(c as char)) {
                (Some(file), _) => (Some(file), None),
                (_, Some(rank)) => (None, Some(rank)),
                _ => return Err(invalid("disambiguation must be a file or a rank")),
            },
            [f, r] => match (file_index(f as char), rank_index(r as char)) {
                (Some(file), Some(rank)) => (Some(file), Some(rank)),
                _ => return Err(invalid("disambiguation must be a file followed by a rank")),
            },
            _ => return Err(invalid("too many characters before the destination")),
        };

        Ok(SanPlus {
            san: San::Normal {
                piece,
                file,
                rank,
                capture,
                destination,
                promotion,
            },
            check,
            checkmate,
        })
    }
}

impl FromStr for San {
    type Err = Error;

    fn from_str(token: &str) -> Result<San> {
        token.parse::<SanPlus>().map(|plus| plus.san)
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            San::Normal {
                piece,
                file,
                rank,
                capture,
                destination,
                promotion,
            } => {
                write!(f, "{}", piece.abbreviation())?;
                if let Some(file) = file {
                    write!(f, "{}", (b'a' + *file as u8) as char)?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", (b'1' + *rank as u8) as char)?;
                }
                if *capture {
                    write!(f, "x")?;
                }
                write!(f, "{}", destination)?;
                if let Some(promotion) = promotion {
                    write!(f, "={}", promotion.abbreviation())?;
                }
                Ok(())
            }
            San::CastleShort => write!(f, "O-O"),
            San::CastleLong => write!(f, "O-O-O"),
        }
    }
}

impl fmt::Display for SanPlus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.checkmate {
            write!(f, "{}#", self.san)
        } else if self.check {
            write!(f, "{}+", self.san)
        } else {
            write!(f, "{}", self.san)
        }
    }
}
