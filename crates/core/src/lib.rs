//! PGN Replay Core Library
//!
//! Reads PGN text and replays every game on a board, keeping one
//! [`BoardSnapshot`] per ply.

pub mod board;
pub mod error;
pub mod parser;

pub use board::{Board, BoardSnapshot, BoardView, Coordinate, PieceSnapshot, PieceType, Player};
pub use error::{Error, Result};
pub use parser::{parse, parse_file, parse_str, parse_with_options, Game, GameConverter, GameReader, ParserOptions};
