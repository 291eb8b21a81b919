//! Low-level bitboard operations.
//!
//! For efficiency, [`Bitboard`] operations are unchecked and may produce
//! inconsistent state if invalid data is passed.
//!
//! Under the hood, all these operations work on u64 bitboards. By convention,
//! the MSB is the upper-left of the board (A1), and uses row-major order.

use crate::bitops;
use crate::{utils, NUM_SPACES};
use derive_more::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, From, Into, Not,
};
use std::fmt::{self, Display, Formatter};

/// Holds a single bit per location on an Othello board.
/// Wraps [`u64`] for efficient bit-twiddling, but avoids mixing with numerics.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    Default,
    From,
    Into,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct Bitboard(pub u64);

/// Starting bitboard for Black.
pub const BLACK_START: Bitboard = Bitboard(0x0000000810000000);

/// Starting bitboard for White.
pub const WHITE_START: Bitboard = Bitboard(0x0000001008000000);

// Masks clearing the leftmost (A) and rightmost (H) columns.
const NOT_A_FILE: u64 = 0x7f7f7f7f7f7f7f7f;
const NOT_H_FILE: u64 = 0xfefefefefefefefe;
const FULL_MASK: u64 = 0xffffffffffffffff;

/// Shift amount for each of the eight directions, paired with a mask that
/// removes bits which wrapped around an edge after the shift.
/// Positive shifts move toward A1, negative shifts toward H8.
const DIRECTIONS: [(i32, u64); 8] = [
    (1, NOT_H_FILE),  // W
    (-1, NOT_A_FILE), // E
    (8, FULL_MASK),   // N
    (-8, FULL_MASK),  // S
    (9, NOT_H_FILE),  // NW
    (-9, NOT_A_FILE), // SE
    (7, NOT_A_FILE),  // NE
    (-7, NOT_H_FILE), // SW
];

impl Display for Bitboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        utils::format_grid(
            self.into_iter().map(|bit| match bit {
                false => '.',
                true => '#',
            }),
            f,
        )
    }
}

impl Bitboard {
    /// Count the number of occupied spaces in the bitboard.
    #[inline]
    pub fn count_occupied(self) -> u8 {
        bitops::popcount(self.0)
    }

    /// Count the number of empty spaces in the bitboard.
    #[inline]
    pub fn count_empty(self) -> u8 {
        NUM_SPACES as u8 - self.count_occupied()
    }

    /// Return true if this bitboard is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return true if every bit of `other` is also set in `self`.
    #[inline]
    pub fn contains(self, other: Bitboard) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Score a board as: # my pieces - # opponent pieces.
/// Faster than [`score_winner_gets_empties()`], but less common.
/// Undefined behavior if both players have a piece at the same location.
#[inline]
pub fn score_absolute_difference(active: Bitboard, opponent: Bitboard) -> i8 {
    (active.count_occupied() as i8) - (opponent.count_occupied() as i8)
}

/// Score a board as: # my spaces - # opponent spaces, where empty spaces are scored for the winner.
/// Undefined behavior if both players have a piece at the same location.
#[inline]
pub fn score_winner_gets_empties(active: Bitboard, opponent: Bitboard) -> i8 {
    let absolute_difference = score_absolute_difference(active, opponent);
    let empties = (active | opponent).count_empty() as i8;

    if absolute_difference.is_positive() {
        absolute_difference + empties
    } else if absolute_difference.is_negative() {
        absolute_difference - empties
    } else {
        0
    }
}

/// Flood `generator` one step at a time through `propagator` along `shift`.
/// Six steps suffice: a line holds at most six capturable discs.
#[inline]
fn flood(generator: u64, propagator: u64, shift: i32) -> u64 {
    let mut flood = propagator & bitops::signed_left_shift(generator, shift);
    flood |= propagator & bitops::signed_left_shift(flood, shift);
    flood |= propagator & bitops::signed_left_shift(flood, shift);
    flood |= propagator & bitops::signed_left_shift(flood, shift);
    flood |= propagator & bitops::signed_left_shift(flood, shift);
    flood |= propagator & bitops::signed_left_shift(flood, shift);
    flood
}

/// Compute a mask of the legal moves for the active player from
/// masks of the active player's pieces and the opponent's pieces.
/// Undefined behavior if an invalid Othello board is specified.
#[inline]
pub fn get_move_mask(active: Bitboard, opponent: Bitboard) -> Bitboard {
    let empties = !(active | opponent).0;
    let mut captures = 0;

    for &(shift, wrap_mask) in DIRECTIONS.iter() {
        // Runs of opponent pieces adjacent to one of ours, then one more step.
        let run = flood(active.0, opponent.0 & wrap_mask, shift);
        captures |= wrap_mask & bitops::signed_left_shift(run, shift);
    }

    Bitboard(empties & captures)
}

/// Compute the mask of opponent pieces flipped by playing `move_mask`.
/// `move_mask` must be one-hot and name an empty location.
#[inline]
pub fn get_flip_mask(active: Bitboard, opponent: Bitboard, move_mask: Bitboard) -> Bitboard {
    let mut flips = 0;

    for &(shift, wrap_mask) in DIRECTIONS.iter() {
        let run = flood(move_mask.0, opponent.0 & wrap_mask, shift);
        let closing = wrap_mask & bitops::signed_left_shift(run, shift) & active.0;

        // Only runs capped by one of our own pieces are captured.
        if closing != 0 {
            flips |= run;
        }
    }

    Bitboard(flips)
}

/// Compute an updated board after a given move is made, returning new bitboards
/// for the active player and the opponent. `move_mask` must be a one-hot bitboard
/// indicating the move location. Undefined behavior if an invalid Othello board
/// or `move_mask` is provided.
#[inline]
pub fn apply_move(
    active: Bitboard,
    opponent: Bitboard,
    move_mask: Bitboard,
) -> (Bitboard, Bitboard) {
    let flip_mask = get_flip_mask(active, opponent, move_mask);

    let new_active = (active ^ flip_mask) | move_mask;
    let new_opponent = opponent ^ flip_mask;

    (new_active, new_opponent)
}

/// Every location touching a location of `mask` in one of the eight
/// directions, excluding `mask` itself.
#[inline]
pub fn adjacent(mask: Bitboard) -> Bitboard {
    let mut neighbours = 0;
    for &(shift, wrap_mask) in DIRECTIONS.iter() {
        neighbours |= wrap_mask & bitops::signed_left_shift(mask.0, shift);
    }
    Bitboard(neighbours & !mask.0)
}

/// Iterator for the bits in a [`Bitboard`], starting from the MSB.
#[derive(Clone, Copy, Debug)]
pub struct Bits {
    remaining: usize,
    bitboard: Bitboard,
}

impl Iterator for Bits {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bitmask = Bitboard::from(1u64 << (self.remaining - 1));
        let bit = !(self.bitboard & bitmask).is_empty();
        self.remaining -= 1;

        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Bits {}

/// Iterate over the bits in row-major order.
impl IntoIterator for Bitboard {
    type Item = bool;
    type IntoIter = Bits;

    fn into_iter(self) -> Self::IntoIter {
        Bits {
            remaining: NUM_SPACES,
            bitboard: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;

    fn mask(names: &[&str]) -> Bitboard {
        names.iter().fold(Bitboard::default(), |acc, name| {
            acc | Bitboard::from(name.parse::<Location>().unwrap())
        })
    }

    #[test]
    fn start_moves() {
        let moves = get_move_mask(BLACK_START, WHITE_START);
        assert_eq!(moves, mask(&["D3", "C4", "F5", "E6"]));

        let moves = get_move_mask(WHITE_START, BLACK_START);
        assert_eq!(moves, mask(&["E3", "F4", "C5", "D6"]));
    }

    #[test]
    fn start_apply() {
        let (black, white) = apply_move(BLACK_START, WHITE_START, mask(&["D3"]));
        assert_eq!(black, mask(&["D3", "D4", "D5", "E4"]));
        assert_eq!(white, mask(&["E5"]));
    }

    #[test]
    fn no_wraparound_across_edges() {
        // H1 white, A2 black: shifting east from H1 would land on A2.
        let active = mask(&["A2"]);
        let opponent = mask(&["H1"]);
        assert!(get_move_mask(active, opponent).is_empty());

        // Horizontal capture along the bottom edge.
        let active = mask(&["A8"]);
        let opponent = mask(&["B8", "C8"]);
        assert_eq!(get_move_mask(active, opponent), mask(&["D8"]));
    }

    #[test]
    fn multi_direction_flips() {
        // Black plays D4 and captures along a row and a diagonal at once.
        let active = mask(&["B4", "B2"]);
        let opponent = mask(&["C4", "C3"]);
        assert_eq!(
            get_flip_mask(active, opponent, mask(&["D4"])),
            mask(&["C4", "C3"])
        );
    }

    #[test]
    fn uncapped_run_is_not_flipped() {
        let active = mask(&["A1"]);
        let opponent = mask(&["B1", "C1", "E1"]);
        assert_eq!(get_flip_mask(active, opponent, mask(&["D1"])), mask(&["B1", "C1"]));
    }

    #[test]
    fn scores() {
        let active = mask(&["A1", "A2", "A3"]);
        let opponent = mask(&["B1"]);
        assert_eq!(score_absolute_difference(active, opponent), 2);
        assert_eq!(score_winner_gets_empties(active, opponent), 62);
        assert_eq!(score_winner_gets_empties(opponent, active), -62);
        assert_eq!(score_winner_gets_empties(active, active), 0);
    }

    #[test]
    fn adjacent_stops_at_edges() {
        assert_eq!(adjacent(mask(&["A1"])), mask(&["B1", "A2", "B2"]));
        assert_eq!(adjacent(mask(&["H8"])), mask(&["G8", "H7", "G7"]));
        assert_eq!(
            adjacent(mask(&["H4", "A5"])),
            mask(&["G3", "H3", "G4", "G5", "H5", "A4", "B4", "B5", "A6", "B6"])
        );
        assert_eq!(adjacent(Bitboard::from(u64::MAX)), Bitboard::default());
    }

    #[test]
    fn bits_in_row_major_order() {
        let bits: Vec<bool> = mask(&["A1", "H8"]).into_iter().collect();
        assert_eq!(bits.len(), 64);
        assert!(bits[0] && bits[63]);
        assert_eq!(bits.iter().filter(|&&b| b).count(), 2);
    }
}
