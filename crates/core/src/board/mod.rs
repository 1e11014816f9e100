//! Board representation: squares, pieces, move generation

mod coordinate;
mod live;
mod moves;
mod piece;
mod snapshot;
mod view;

pub use coordinate::Coordinate;
pub(crate) use coordinate::{file_index, rank_index};
pub use live::Board;
pub use moves::Move;
pub use piece::{Piece, PieceId, PieceSnapshot, PieceType, PieceView, Player};
pub use snapshot::BoardSnapshot;
pub use view::BoardView;
