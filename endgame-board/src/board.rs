//! Relative Othello positions: the side to move against its opponent.
//!
//! [`Board`] never records colours, only whose turn it is implicitly: after
//! [`Board::make_move`] or [`Board::pass`] the two bitboards trade places.
//! This is what negamax search wants, and it keeps every operation `Copy`.

use crate::bitboard::{self, Bitboard, BLACK_START, WHITE_START};
use crate::location::{Location, LocationList};
use crate::{utils, NUM_SPACES};
use derive_more::{Display, Error};
use std::fmt;

/// A pair of bitboards storing a position as seen by the player to move.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Board {
    pub active: Bitboard,
    pub opponent: Bitboard,
}

impl Default for Board {
    /// The starting position, from Black's perspective.
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The Othello starting position from Black's perspective.
    pub const fn new() -> Self {
        Self {
            active: BLACK_START,
            opponent: WHITE_START,
        }
    }

    pub const fn from_bitboards(active: Bitboard, opponent: Bitboard) -> Self {
        Self { active, opponent }
    }

    /// Hand the move to the opponent without placing a piece.
    #[inline]
    pub fn pass(self) -> Self {
        Self {
            active: self.opponent,
            opponent: self.active,
        }
    }

    /// Alias for [`Board::pass`], for call sites that change perspective
    /// rather than play a move.
    #[inline]
    pub fn swap_players(self) -> Self {
        self.pass()
    }

    /// Get a mask of the legal moves for the active player.
    #[inline]
    pub fn move_mask(self) -> Bitboard {
        bitboard::get_move_mask(self.active, self.opponent)
    }

    /// Get the legal moves for the active player.
    #[inline]
    pub fn get_moves(self) -> LocationList {
        self.move_mask().into()
    }

    /// Whether the active player can place a piece.
    #[inline]
    pub fn has_moves(self) -> bool {
        !self.move_mask().is_empty()
    }

    /// Make a move for the active player, returning the board from the
    /// opponent's perspective. `loc` must be a legal move.
    #[inline]
    pub fn make_move(self, loc: Location) -> Self {
        let (active, opponent) = bitboard::apply_move(self.active, self.opponent, loc.into());
        Self {
            active: opponent,
            opponent: active,
        }
    }

    /// Whether neither player can move.
    #[inline]
    pub fn is_finished(self) -> bool {
        !self.has_moves() && !self.pass().has_moves()
    }

    /// Score a board as: # my pieces - # opponent pieces.
    #[inline]
    pub fn score_absolute_difference(self) -> i8 {
        bitboard::score_absolute_difference(self.active, self.opponent)
    }

    /// Score a board as: # my spaces - # opponent spaces, where empty spaces are scored for the winner.
    #[inline]
    pub fn score_winner_gets_empties(self) -> i8 {
        bitboard::score_winner_gets_empties(self.active, self.opponent)
    }

    /// Get a mask indicating where the occupied spaces are.
    #[inline]
    pub fn occupied_mask(self) -> Bitboard {
        self.active | self.opponent
    }

    /// Get a mask indicating where the empty spaces are.
    #[inline]
    pub fn empty_mask(self) -> Bitboard {
        !self.occupied_mask()
    }

    #[inline]
    pub fn count_empties(self) -> u8 {
        self.occupied_mask().count_empty()
    }

    /// A 64-bit fingerprint of the position, stable across runs.
    pub fn hash_key(self) -> u64 {
        mix64(u64::from(self.active) ^ mix64(u64::from(self.opponent).rotate_left(17)))
    }

    /// Characters for each location in row-major order from A1.
    pub(crate) fn pieces(self, active: char, opponent: char) -> impl Iterator<Item = char> {
        self.active
            .into_iter()
            .zip(self.opponent.into_iter())
            .map(move |pair| match pair {
                (true, _) => active,
                (_, true) => opponent,
                _ => '.',
            })
    }

    /// One-line snapshot: `x` for the active player, `o` for the opponent.
    pub fn to_compact_string(self) -> String {
        utils::format_compact(self.pieces('x', 'o'))
    }
}

/// The splitmix64 finalizer.
const fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        utils::format_grid(self.pieces('#', 'O'), f)
    }
}

#[derive(Debug, Display, Error, PartialEq)]
pub enum ParseBoardError {
    #[display(fmt = "expected 64 board characters, found {}", _0)]
    WrongLength(#[error(not(source))] usize),
    #[display(fmt = "unrecognized board character {:?}", _0)]
    BadCharacter(#[error(not(source))] char),
}

/// Parse a board in FFO notation: 64 characters in row-major order from A1,
/// `X` for the active player, `O` for the opponent and `-` for an empty space.
impl std::str::FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length != NUM_SPACES {
            return Err(ParseBoardError::WrongLength(length));
        }

        let mut active = 0u64;
        let mut opponent = 0u64;
        for (offset, c) in s.chars().enumerate() {
            let bit = 1u64 << (NUM_SPACES - 1 - offset);
            match c {
                'X' | 'x' | '*' => active |= bit,
                'O' | 'o' => opponent |= bit,
                '-' | '.' => {}
                other => return Err(ParseBoardError::BadCharacter(other)),
            }
        }

        Ok(Self::from_bitboards(active.into(), opponent.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FFO: &str = "---------------------------OX------XO---------------------------";

    #[test]
    fn parse_start() {
        let board: Board = START_FFO.parse().unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(board.count_empties(), 60);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "XO".parse::<Board>(),
            Err(ParseBoardError::WrongLength(2))
        );
        let bad = START_FFO.replacen('-', "?", 1);
        assert_eq!(
            bad.parse::<Board>(),
            Err(ParseBoardError::BadCharacter('?'))
        );
    }

    #[test]
    fn compact_round_trip() {
        let board = Board::new().make_move("D3".parse().unwrap());
        let snapshot = board.to_compact_string();
        assert_eq!(snapshot.len(), 64);
        assert_eq!(snapshot.parse::<Board>().unwrap(), board);
    }

    #[test]
    fn make_move_swaps_perspective() {
        let board = Board::new();
        let next = board.make_move("D3".parse().unwrap());
        assert_eq!(next.active.count_occupied(), 1);
        assert_eq!(next.opponent.count_occupied(), 4);
        assert_eq!(next.score_absolute_difference(), -3);
        assert_eq!(next.count_empties(), 59);
    }

    #[test]
    fn finished_board() {
        let full = Board::from_bitboards(Bitboard::from(u64::MAX), Bitboard::default());
        assert!(full.is_finished());
        assert_eq!(full.score_winner_gets_empties(), 64);
        assert!(!Board::new().is_finished());
    }

    #[test]
    fn hash_distinguishes_perspective() {
        let board = Board::new();
        assert_eq!(board.hash_key(), Board::new().hash_key());
        assert_ne!(board.hash_key(), board.pass().hash_key());
    }
}
