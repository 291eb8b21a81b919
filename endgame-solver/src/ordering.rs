//! Move ordering for the exact search.
//!
//! Moves are visited cluster by cluster in a fixed strategic order, then
//! stably sorted by the mobility they leave the opponent ("fastest first").
//! Good ordering is what lets alpha-beta cut most of the tree.

use arrayvec::ArrayVec;
use endgame_board::bitboard::Bitboard;
use endgame_board::{bitops, Location, Position, NUM_SPACES};
use std::fmt;

/// The board partitioned into classes of squares, best first.
/// Each mask is symmetric under 180° rotation.
pub const PRIORITY_CLUSTERS: [u64; 10] = [
    0x0000001818000000, // D4, E4, E5, D5
    0x8100000000000081, // A1, H1, H8, A8
    0x2400810000810024, // C1, F1, F8, C8, A3, H3, H6, A6
    0x0000240000240000, // C3, F3, F6, C6
    0x1800008181000018, // D1, E1, E8, D8, A4, H4, H5, A5
    0x0000182424180000, // D3, E3, E6, D6, C4, F4, F5, C5
    0x0018004242001800, // D2, E2, E7, D7, B4, G4, G5, B5
    0x0024420000422400, // C2, F2, F7, C7, B3, G3, G6, B6
    0x4281000000008142, // B1, G1, G8, B8, A2, H2, H7, A7
    0x0042000000004200, // B2, G2, G7, B7
];

/// A candidate move and the number of replies it leaves the opponent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MoveListEntry {
    pub location: Location,
    pub mobility: u8,
}

/// Moves sorted by ascending opponent mobility. Equal mobilities keep
/// insertion order.
#[derive(Clone, Debug, Default)]
pub struct MoveList {
    entries: ArrayVec<MoveListEntry, NUM_SPACES>,
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert before the first entry with strictly greater mobility.
    pub fn insert(&mut self, entry: MoveListEntry) {
        let at = self
            .entries
            .iter()
            .position(|existing| existing.mobility > entry.mobility)
            .unwrap_or_else(|| self.entries.len());
        self.entries.insert(at, entry);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveListEntry> {
        self.entries.iter()
    }

    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.entries.iter().map(|entry| entry.location)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a MoveListEntry;
    type IntoIter = std::slice::Iter<'a, MoveListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Space-separated locations, best first.
impl fmt::Display for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = self
            .locations()
            .map(|loc| loc.to_string())
            .collect::<Vec<String>>()
            .join(" ");

        f.pad(&string)
    }
}

/// Order the legal moves `moves` of `position` for search.
/// Every legal move appears exactly once.
pub fn order_moves<P: Position>(position: &P, moves: Bitboard) -> MoveList {
    let mut move_list = MoveList::new();

    for &cluster in PRIORITY_CLUSTERS.iter() {
        let mut remaining = cluster & u64::from(moves);
        while remaining != 0 {
            let index = bitops::bitscan_ls1b_64(remaining);
            remaining &= !(1u64 << index);

            let location = Location::from_index(index);
            let replies = position.make_move(location).legal_moves();
            move_list.insert(MoveListEntry {
                location,
                mobility: bitops::popcount(replies.into()),
            });
        }
    }

    move_list
}

#[cfg(test)]
mod tests {
    use super::*;
    use endgame_board::{Board, LocationList};
    use rand::rngs::StdRng;
    use rand::seq::IteratorRandom;
    use rand::SeedableRng;

    fn entry(index: u8, mobility: u8) -> MoveListEntry {
        MoveListEntry {
            location: Location::from_index(index),
            mobility,
        }
    }

    #[test]
    fn clusters_partition_the_board() {
        let union = PRIORITY_CLUSTERS.iter().fold(0u64, |acc, &mask| acc | mask);
        let total: u32 = PRIORITY_CLUSTERS.iter().map(|mask| mask.count_ones()).sum();
        assert_eq!(union, u64::MAX);
        assert_eq!(total, 64);
        for mask in PRIORITY_CLUSTERS.iter() {
            assert_eq!(mask.reverse_bits(), *mask);
        }
    }

    #[test]
    fn insertion_is_stable() {
        let mut list = MoveList::new();
        list.insert(entry(1, 5));
        list.insert(entry(2, 3));
        list.insert(entry(3, 5));
        list.insert(entry(4, 0));
        list.insert(entry(5, 3));

        let order: Vec<u8> = list.locations().map(Location::to_index).collect();
        assert_eq!(order, vec![4, 2, 5, 1, 3]);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn opening_moves_in_scan_order() {
        // All four openings leave White three replies and share a cluster.
        let board = Board::new();
        let list = order_moves(&board, board.move_mask());
        assert_eq!(list.to_string(), "E6 F5 C4 D3");
        assert_eq!(format!("{:>13}", list), "  E6 F5 C4 D3");
        assert!(list.iter().all(|entry| entry.mobility == 3));
    }

    #[test]
    fn empty_move_set() {
        let board = Board::new();
        assert!(order_moves(&board, Bitboard::default()).is_empty());
    }

    /// Reference ordering: gather moves cluster by cluster, then stable sort.
    fn reference_order(board: &Board) -> Vec<(Location, u8)> {
        let moves = u64::from(board.move_mask());
        let mut gathered: Vec<(Location, u8)> = PRIORITY_CLUSTERS
            .iter()
            .flat_map(|&cluster| LocationList::from(Bitboard::from(cluster & moves)))
            .map(|loc| (loc, board.make_move(loc).move_mask().count_occupied()))
            .collect();
        gathered.sort_by_key(|&(_, mobility)| mobility);
        gathered
    }

    #[test]
    fn matches_reference_on_random_positions() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut board = Board::new();
            for _ in 0..20 {
                match board.get_moves().choose(&mut rng) {
                    Some(loc) => board = board.make_move(loc),
                    None => board = board.pass(),
                }
            }

            let list = order_moves(&board, board.move_mask());
            let actual: Vec<(Location, u8)> =
                list.iter().map(|e| (e.location, e.mobility)).collect();
            assert_eq!(actual, reference_order(&board));
            assert_eq!(list.len(), board.get_moves().len());
        }
    }
}
