//! PGN parsing: tags, move text and SAN

mod game;
mod pgn;
pub mod san;

pub use game::{Game, GameBuilder, Metadata, TokenState};
pub use pgn::{parse, parse_file, parse_str, parse_with_options, GameConverter, GameReader, ParserOptions};
pub use san::{San, SanPlus};
