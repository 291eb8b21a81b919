//! The position model consumed by search code.
//!
//! Searchers only ever talk to positions through this trait, so the same
//! search runs on a bare relative [`Board`] or on a colour-aware [`Game`].

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::game::Game;
use crate::location::Location;

pub trait Position: Copy {
    /// Legal moves for the player to move.
    fn legal_moves(&self) -> Bitboard;

    /// The position after the player to move plays `loc`, which must be legal.
    fn make_move(&self, loc: Location) -> Self;

    /// The position after the player to move passes.
    fn pass(&self) -> Self;

    /// Final disc differential from the mover's point of view, with the
    /// empty spaces awarded to the winner. Only meaningful once the game is over.
    fn final_value(&self) -> i8;

    fn empty_count(&self) -> u8;

    /// Locations with no disc on them.
    fn empty_mask(&self) -> Bitboard;

    /// Fingerprint used to label positions in search traces.
    fn hash_key(&self) -> u64;

    /// Single-line text form used in search traces.
    fn snapshot(&self) -> String;

    #[inline]
    fn has_any_legal_move(&self) -> bool {
        !self.legal_moves().is_empty()
    }

    #[inline]
    fn has_any_player_any_legal_move(&self) -> bool {
        self.has_any_legal_move() || self.pass().has_any_legal_move()
    }
}

impl Position for Board {
    #[inline]
    fn legal_moves(&self) -> Bitboard {
        self.move_mask()
    }

    #[inline]
    fn make_move(&self, loc: Location) -> Self {
        Board::make_move(*self, loc)
    }

    #[inline]
    fn pass(&self) -> Self {
        Board::pass(*self)
    }

    #[inline]
    fn final_value(&self) -> i8 {
        self.score_winner_gets_empties()
    }

    #[inline]
    fn empty_count(&self) -> u8 {
        self.count_empties()
    }

    #[inline]
    fn empty_mask(&self) -> Bitboard {
        Board::empty_mask(*self)
    }

    fn hash_key(&self) -> u64 {
        Board::hash_key(*self)
    }

    fn snapshot(&self) -> String {
        self.to_compact_string()
    }
}

impl Position for Game {
    #[inline]
    fn legal_moves(&self) -> Bitboard {
        self.board.move_mask()
    }

    #[inline]
    fn make_move(&self, loc: Location) -> Self {
        Game::new(self.board.make_move(loc), !self.active_player)
    }

    #[inline]
    fn pass(&self) -> Self {
        Game::new(self.board.pass(), !self.active_player)
    }

    #[inline]
    fn final_value(&self) -> i8 {
        self.board.score_winner_gets_empties()
    }

    #[inline]
    fn empty_count(&self) -> u8 {
        self.board.count_empties()
    }

    #[inline]
    fn empty_mask(&self) -> Bitboard {
        self.board.empty_mask()
    }

    fn hash_key(&self) -> u64 {
        // Relative boards already differ by perspective; fold in the colour too.
        self.board.hash_key() ^ (self.active_player as u64).wrapping_mul(0x9e3779b97f4a7c15)
    }

    fn snapshot(&self) -> String {
        self.to_compact_string()
    }
}
