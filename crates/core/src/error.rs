//! Error types for pgn-replay-core

use thiserror::Error;

use crate::board::{Coordinate, PieceType, Player};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid coordinate: rank {rank:?}, file {file:?}")]
    InvalidCoordinate { rank: char, file: char },

    #[error("invalid SAN move {san:?}: {reason}")]
    InvalidSan { san: String, reason: &'static str },

    #[error("no {owner} {piece:?} can move to {destination}")]
    NoSuchMove {
        piece: PieceType,
        owner: Player,
        destination: Coordinate,
    },

    #[error("{candidates} {owner} {piece:?} pieces can move to {destination}")]
    AmbiguousMove {
        piece: PieceType,
        owner: Player,
        destination: Coordinate,
        candidates: usize,
    },

    #[error("illegal castle: {0}")]
    IllegalCastle(String),

    #[error("illegal board state: {0}")]
    IllegalState(String),

    #[error("expected move number \"{expected}.\", found {found:?}")]
    MoveNumberMismatch { expected: u32, found: String },

    #[error("blank line inside move text")]
    UnexpectedBlankLine,

    #[error("game is already over, unexpected token {token:?}")]
    GameAlreadyOver { token: String },

    #[error("malformed metadata: {0}")]
    MetadataFormat(String),

    #[error("input ended in the middle of a game")]
    UnexpectedEndOfInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}{}: {source}", token_suffix(.token))]
    AtLine {
        line: usize,
        token: Option<String>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the line number and offending token, unless already attached.
    pub(crate) fn at_line(self, line: usize, token: Option<&str>) -> Self {
        match self {
            located @ Error::AtLine { .. } => located,
            other => Error::AtLine {
                line,
                token: token.map(str::to_string),
                source: Box::new(other),
            },
        }
    }

    /// Returns the underlying error, looking through any line context.
    pub fn root(&self) -> &Error {
        match self {
            Error::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

fn token_suffix(token: &Option<String>) -> String {
    token
        .as_ref()
        .map(|t| format!(" at {:?}", t))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
