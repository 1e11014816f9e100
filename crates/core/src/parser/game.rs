//! Reconstructed games and the state machine that builds them

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::san;
use crate::board::{Board, BoardSnapshot, Player};
use crate::error::{Error, Result};

/// PGN tag pairs in the order they appeared. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: String) -> Result<()> {
        if self.get(&key).is_some() {
            return Err(Error::MetadataFormat(format!("duplicate tag {:?}", key)));
        }
        self.entries.push((key, value));
        Ok(())
    }
}

/// A fully parsed game: one board state per ply, its tags and its winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board_states: Vec<BoardSnapshot>,
    metadata: Metadata,
    winner: Option<Player>,
}

impl Game {
    /// Board after each ply; index 0 is the position after White's first move.
    pub fn board_states(&self) -> &[BoardSnapshot] {
        &self.board_states
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// `None` for a draw.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn ply_count(&self) -> usize {
        self.board_states.len()
    }

    pub fn final_board(&self) -> Option<&BoardSnapshot> {
        self.board_states.last()
    }

    /// The PGN result token for this game.
    pub fn result(&self) -> &'static str {
        match self.winner {
            Some(Player::White) => "1-0",
            Some(Player::Black) => "0-1",
            None => "1/2-1/2",
        }
    }

    pub fn summary(&self) -> String {
        let white = self.metadata.get("White").unwrap_or("Unknown");
        let black = self.metadata.get("Black").unwrap_or("Unknown");
        format!("{} vs {} - {}", white, black, self.result())
    }
}

/// What the builder expects next in the move text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    ExpectingMoveNumber,
    ExpectingWhiteMove,
    ExpectingBlackMove,
    Finished,
}

/// Folds move-text tokens into a [`Game`], replaying each move on a live
/// board.
#[derive(Debug, Clone)]
pub struct GameBuilder {
    board: Board,
    history: Vec<BoardSnapshot>,
    metadata: Metadata,
    winner: Option<Player>,
    state: TokenState,
    move_number: u32,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            history: Vec::new(),
            metadata: Metadata::default(),
            winner: None,
            state: TokenState::ExpectingMoveNumber,
            move_number: 1,
        }
    }

    pub fn state(&self) -> TokenState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == TokenState::Finished
    }

    /// True once any tag or token has been taken in.
    pub fn is_started(&self) -> bool {
        !self.metadata.is_empty() || self.move_number > 1 || self.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.metadata.insert(key.into(), value.into())
    }

    /// Takes one whitespace-free token of move text and returns the state
    /// reached.
    pub fn feed(&mut self, token: &str) -> Result<TokenState> {
        if self.is_finished() {
            return Err(Error::GameAlreadyOver {
                token: token.to_string(),
            });
        }

        let winner = match token {
            "1-0" => Some(Player::White),
            "0-1" => Some(Player::Black),
            "1/2-1/2" => None,
            _ => return self.advance(token),
        };
        self.winner = winner;
        self.state = TokenState::Finished;
        Ok(self.state)
    }

    fn advance(&mut self, token: &str) -> Result<TokenState> {
        self.state = match self.state {
            TokenState::ExpectingMoveNumber => {
                if token != format!("{}.", self.move_number) {
                    return Err(Error::MoveNumberMismatch {
                        expected: self.move_number,
                        found: token.to_string(),
                    });
                }
                self.move_number += 1;
                TokenState::ExpectingWhiteMove
            }
            TokenState::ExpectingWhiteMove => {
                self.play(token, Player::White)?;
                TokenState::ExpectingBlackMove
            }
            TokenState::ExpectingBlackMove => {
                self.play(token, Player::Black)?;
                TokenState::ExpectingMoveNumber
            }
            TokenState::Finished => {
                return Err(Error::GameAlreadyOver {
                    token: token.to_string(),
                })
            }
        };
        Ok(self.state)
    }

    fn play(&mut self, token: &str, player: Player) -> Result<()> {
        for mv in san::resolve(token, player, &mut self.board)? {
            self.board.accept_move(&mv)?;
        }
        self.history.push(self.board.snapshot());
        trace!(ply = self.history.len(), %player, san = token, "ply accepted");
        Ok(())
    }

    /// Hands over the finished game. Fails if no result token was seen.
    pub fn finish(self) -> Result<Game> {
        if !self.is_finished() {
            return Err(Error::IllegalState(format!(
                "game has no result after {} plies",
                self.history.len()
            )));
        }
        debug!(plies = self.history.len(), winner = ?self.winner, "game finished");
        Ok(Game {
            board_states: self.history,
            metadata: self.metadata,
            winner: self.winner,
        })
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardView, Coordinate, PieceType, PieceView};

    fn play_all(builder: &mut GameBuilder, text: &str) -> Result<TokenState> {
        let mut state = builder.state();
        for token in text.split_whitespace() {
            state = builder.feed(token)?;
        }
        Ok(state)
    }

    #[test]
    fn test_state_transitions() {
        let mut builder = GameBuilder::new();
        assert_eq!(builder.state(), TokenState::ExpectingMoveNumber);
        assert_eq!(builder.feed("1.").unwrap(), TokenState::ExpectingWhiteMove);
        assert_eq!(builder.feed("e4").unwrap(), TokenState::ExpectingBlackMove);
        assert_eq!(builder.feed("e5").unwrap(), TokenState::ExpectingMoveNumber);
        assert_eq!(builder.feed("2.").unwrap(), TokenState::ExpectingWhiteMove);
        assert_eq!(builder.feed("0-1").unwrap(), TokenState::Finished);

        let game = builder.finish().unwrap();
        assert_eq!(game.winner(), Some(Player::Black));
        assert_eq!(game.ply_count(), 2);
        assert_eq!(game.result(), "0-1");
    }

    #[test]
    fn test_four_ply_draw() {
        let mut builder = GameBuilder::new();
        play_all(&mut builder, "1. e4 e5 2. Nf3 Nc6 1/2-1/2").unwrap();
        let game = builder.finish().unwrap();

        assert_eq!(game.winner(), None);
        assert_eq!(game.board_states().len(), 4);

        let last = game.final_board().unwrap();
        let knight = last.piece_at(Coordinate::new(2, 5)).unwrap();
        assert_eq!((knight.kind(), knight.owner()), (PieceType::Knight, Player::White));
        let knight = last.piece_at(Coordinate::new(5, 2)).unwrap();
        assert_eq!((knight.kind(), knight.owner()), (PieceType::Knight, Player::Black));

        let start = Board::new().snapshot();
        let moved: Vec<String> = last.removed_since(&start).map(|p| p.position.to_string()).collect();
        assert_eq!(moved.len(), 4);
        for square in ["e2", "e7", "g1", "b8"] {
            assert!(moved.contains(&square.to_string()), "{} should have moved", square);
        }
    }

    #[test]
    fn test_move_number_mismatch() {
        let mut builder = GameBuilder::new();
        assert!(matches!(
            builder.feed("2."),
            Err(Error::MoveNumberMismatch { expected: 1, .. })
        ));

        let mut builder = GameBuilder::new();
        let err = play_all(&mut builder, "1. e4 e5 3. Nf3").unwrap_err();
        assert!(matches!(err, Error::MoveNumberMismatch { expected: 2, .. }));

        let mut builder = GameBuilder::new();
        assert!(matches!(
            builder.feed("1"),
            Err(Error::MoveNumberMismatch { .. })
        ));
    }

    #[test]
    fn test_input_after_result() {
        let mut builder = GameBuilder::new();
        play_all(&mut builder, "1. d4 1-0").unwrap();
        assert!(matches!(
            builder.feed("d5"),
            Err(Error::GameAlreadyOver { .. })
        ));
        assert!(matches!(
            builder.feed("0-1"),
            Err(Error::GameAlreadyOver { .. })
        ));
    }

    #[test]
    fn test_result_may_end_any_state() {
        let mut builder = GameBuilder::new();
        assert_eq!(play_all(&mut builder, "1-0").unwrap(), TokenState::Finished);
        assert_eq!(builder.finish().unwrap().ply_count(), 0);

        let mut builder = GameBuilder::new();
        assert_eq!(play_all(&mut builder, "1. e4 1/2-1/2").unwrap(), TokenState::Finished);
    }

    #[test]
    fn test_finish_requires_result() {
        let mut builder = GameBuilder::new();
        play_all(&mut builder, "1. e4 e5").unwrap();
        assert!(matches!(builder.finish(), Err(Error::IllegalState(_))));
    }

    #[test]
    fn test_duplicate_metadata() {
        let mut builder = GameBuilder::new();
        assert!(!builder.is_started());
        builder.add_metadata("White", "Alice").unwrap();
        assert!(builder.is_started());
        assert!(matches!(
            builder.add_metadata("White", "Bob"),
            Err(Error::MetadataFormat(_))
        ));
    }

    #[test]
    fn test_each_ply_changes_one_move_worth() {
        let text = "1. e4 d5 2. exd5 Qxd5 3. Nc3 Qa5 4. d4 Nf6 5. Nf3 Bf5 \
                    6. Bc4 e6 7. Bd2 c6 8. Qe2 Bb4 9. O-O-O Nbd7 10. a3 O-O 1-0";
        let mut builder = GameBuilder::new();
        play_all(&mut builder, text).unwrap();
        let game = builder.finish().unwrap();

        let sans: Vec<&str> = text
            .split_whitespace()
            .filter(|t| !t.ends_with('.') && *t != "1-0")
            .collect();
        assert_eq!(game.ply_count(), sans.len());

        let mut previous = Board::new().snapshot();
        for (san, state) in sans.iter().zip(game.board_states()) {
            let added = state.added_since(&previous).count();
            let removed = state.removed_since(&previous).count();
            if san.starts_with('O') {
                assert_eq!((added, removed), (2, 2), "{}", san);
            } else if san.contains('x') {
                assert_eq!((added, removed), (1, 2), "{}", san);
            } else {
                assert_eq!((added, removed), (1, 1), "{}", san);
            }
            previous = state.clone();
        }

        let last = game.final_board().unwrap();
        assert_eq!(last.piece_at("c1".parse().unwrap()).unwrap().kind(), PieceType::King);
        assert_eq!(last.piece_at("d1".parse().unwrap()).unwrap().kind(), PieceType::Rook);
        assert_eq!(last.piece_at("g8".parse().unwrap()).unwrap().kind(), PieceType::King);
        assert_eq!(last.piece_at("f8".parse().unwrap()).unwrap().kind(), PieceType::Rook);
    }

    #[test]
    fn test_en_passant_in_game() {
        let mut builder = GameBuilder::new();
        play_all(&mut builder, "1. e4 a6 2. e5 d5 3. exd6 1-0").unwrap();
        let game = builder.finish().unwrap();
        let last = game.final_board().unwrap();

        assert_eq!(last.len(), 31);
        assert!(last.piece_at("d5".parse().unwrap()).is_none());
        assert_eq!(last.count(PieceType::Pawn, Player::Black), 7);
        let pawn = last.piece_at("d6".parse().unwrap()).unwrap();
        assert_eq!(pawn.owner(), Player::White);
    }

    #[test]
    fn test_illegal_move_fails_fast() {
        let mut builder = GameBuilder::new();
        let err = play_all(&mut builder, "1. e4 e5 2. Ke3").unwrap_err();
        assert!(matches!(err, Error::NoSuchMove { .. }));
    }
}
