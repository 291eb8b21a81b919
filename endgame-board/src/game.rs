//! Implements game-level Othello logic.
//!
//! For correctness, this higher-level interface is preferred, but for
//! performance you may use [`Board`] or [`crate::bitboard`] directly.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::location::{Location, ParseLocationError};
use crate::utils;
use derive_more::{Display, Error, From};
use std::fmt;

/// One of the two players in a game.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Player {
    Black,
    White,
}

impl Default for Player {
    /// Gets the starting player (black).
    fn default() -> Self {
        Self::Black
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    /// Gets the other player.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

#[derive(Debug, Display, Error, PartialEq)]
#[display(fmt = "invalid player string")]
pub struct ParsePlayerError;

impl std::str::FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "b" | "black" => Ok(Player::Black),
            "o" | "w" | "white" => Ok(Player::White),
            _ => Err(ParsePlayerError),
        }
    }
}

/// An action in an Othello game: place a piece or pass.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Move {
    Piece(Location),
    Pass,
}

impl From<Location> for Move {
    fn from(loc: Location) -> Self {
        Move::Piece(loc)
    }
}

impl Move {
    #[inline]
    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }

    /// The location played, or `None` for a pass.
    #[inline]
    pub fn location(self) -> Option<Location> {
        match self {
            Move::Piece(loc) => Some(loc),
            Move::Pass => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Piece(loc) => write!(f, "{}", loc),
            Move::Pass => f.write_str("PASS"),
        }
    }
}

#[derive(Debug, Display, Error, PartialEq, From)]
#[display(fmt = "invalid move string")]
pub struct ParseMoveError(ParseLocationError);

/// Parse a move from string notation ("A4"; "PASS").
impl std::str::FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") || s == "--" {
            return Ok(Move::Pass);
        }
        Ok(Move::Piece(s.parse()?))
    }
}

/// The move attempted was not legal in the given position.
#[derive(Debug, Display, Error, PartialEq)]
#[display(fmt = "illegal move {} for {}", mv, player)]
pub struct IllegalMoveError {
    pub mv: Move,
    pub player: Player,
}

/// The complete state of an Othello game: the board and who is to move.
/// `board` is stored from the perspective of `active_player`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Game {
    pub board: Board,
    pub active_player: Player,
}

impl Default for Game {
    /// Gets the starting position with Black to move.
    fn default() -> Self {
        Self::new(Board::new(), Player::Black)
    }
}

impl Game {
    /// Construct a game from a board as seen by `active_player`.
    pub const fn new(board: Board, active_player: Player) -> Self {
        Self {
            board,
            active_player,
        }
    }

    /// Construct a game from absolute colour bitboards.
    pub fn from_colors(black: Bitboard, white: Bitboard, active_player: Player) -> Self {
        let board = match active_player {
            Player::Black => Board::from_bitboards(black, white),
            Player::White => Board::from_bitboards(white, black),
        };
        Self::new(board, active_player)
    }

    /// Black's pieces.
    pub fn black(&self) -> Bitboard {
        match self.active_player {
            Player::Black => self.board.active,
            Player::White => self.board.opponent,
        }
    }

    /// White's pieces.
    pub fn white(&self) -> Bitboard {
        match self.active_player {
            Player::Black => self.board.opponent,
            Player::White => self.board.active,
        }
    }

    /// Play `mv` for the active player, checking that it is legal.
    pub fn apply_move(self, mv: Move) -> Result<Self, IllegalMoveError> {
        let moves = self.board.get_moves();
        let legal = match mv {
            Move::Pass => moves.is_empty(),
            Move::Piece(loc) => moves.contains(loc),
        };

        if !legal {
            return Err(IllegalMoveError {
                mv,
                player: self.active_player,
            });
        }

        let board = match mv {
            Move::Pass => self.board.pass(),
            Move::Piece(loc) => self.board.make_move(loc),
        };
        Ok(Self::new(board, !self.active_player))
    }

    /// Whether neither player can move.
    pub fn is_finished(&self) -> bool {
        self.board.is_finished()
    }

    /// The player ahead on discs, or `None` for a tie.
    pub fn winner(&self) -> Option<Player> {
        let score = self.board.score_absolute_difference();
        if score > 0 {
            Some(self.active_player)
        } else if score < 0 {
            Some(!self.active_player)
        } else {
            None
        }
    }

    fn pieces(&self) -> impl Iterator<Item = char> {
        match self.active_player {
            Player::Black => self.board.pieces('x', 'o'),
            Player::White => self.board.pieces('o', 'x'),
        }
    }

    /// One-line snapshot: 64 locations (`x` black, `o` white, `.` empty)
    /// followed by the colour to move.
    pub fn to_compact_string(&self) -> String {
        let mut snapshot = utils::format_compact(self.pieces());
        snapshot.push(match self.active_player {
            Player::Black => 'x',
            Player::White => 'o',
        });
        snapshot
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        utils::format_grid(
            self.pieces().map(|c| match c {
                'x' => 'X',
                'o' => 'O',
                other => other,
            }),
            f,
        )?;
        write!(f, "\n{} to move", self.active_player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn apply_legal_and_illegal() {
        let game = Game::default();
        let next = game.apply_move("F5".parse().unwrap()).unwrap();
        assert_eq!(next.active_player, Player::White);
        assert_eq!(next.black().count_occupied(), 4);
        assert_eq!(next.white().count_occupied(), 1);

        assert_eq!(
            game.apply_move(Move::Pass),
            Err(IllegalMoveError {
                mv: Move::Pass,
                player: Player::Black
            })
        );
        assert!(game.apply_move("A1".parse().unwrap()).is_err());
    }

    #[test]
    fn parse_moves_and_players() {
        assert_eq!("pass".parse::<Move>(), Ok(Move::Pass));
        assert_eq!("PASS".parse::<Move>(), Ok(Move::Pass));
        assert_eq!(
            "c4".parse::<Move>(),
            Ok(Move::Piece(Location::from_coords(3, 2)))
        );
        assert!("Z9".parse::<Move>().is_err());
        assert_eq!("X".parse::<Player>(), Ok(Player::Black));
        assert_eq!("white".parse::<Player>(), Ok(Player::White));
        assert_eq!("?".parse::<Player>(), Err(ParsePlayerError));
    }

    #[test]
    fn colors_follow_the_mover() {
        let game = Game::default().pass();
        assert_eq!(game.active_player, Player::White);
        assert_eq!(game.black(), Game::default().black());
        let rebuilt = Game::from_colors(game.black(), game.white(), Player::White);
        assert_eq!(rebuilt, game);
    }

    #[test]
    fn compact_string_marks_mover() {
        let snapshot = Game::default().to_compact_string();
        assert_eq!(snapshot.len(), 65);
        assert!(snapshot.ends_with('x'));
        assert_eq!(&snapshot[27..29], "ox");
    }

    #[test]
    fn winner_by_discs() {
        assert_eq!(Game::default().winner(), None);
        let game = Game::from_colors(Bitboard::from(0xffu64), Bitboard::from(1u64 << 63), Player::White);
        assert_eq!(game.winner(), Some(Player::Black));
    }
}
