//! Random playouts from a position.
//!
//! Sampling shares the position model and bit primitives with the exact
//! search but picks moves uniformly at random. It is useful for exercising
//! the move generator on deep lines and for rough estimates of a position.

use crate::ordering::{order_moves, MoveList};
use crate::solution::ExactSolution;
use crate::trace::{NodeVisit, NullObserver, SearchObserver};
use endgame_board::{bitops, Location, Move, Position};
use log::trace;
use rand::Rng;

/// Play `repeats` random games from `root`.
///
/// Every position entered counts as a node and every finished game as a
/// leaf. The outcome and principal variation describe the last game played;
/// with `repeats == 0` the solution is left empty.
pub fn sample<P: Position, R: Rng + ?Sized>(
    root: P,
    repeats: usize,
    rng: &mut R,
) -> ExactSolution<P> {
    sample_observed(root, repeats, rng, &mut NullObserver)
}

/// [`sample`], reporting every position entered to `observer`.
///
/// Call ids keep counting across playouts. Each playout starts again from
/// level 1 with a zero parent hash.
pub fn sample_observed<P, R, O>(
    root: P,
    repeats: usize,
    rng: &mut R,
    observer: &mut O,
) -> ExactSolution<P>
where
    P: Position,
    R: Rng + ?Sized,
    O: SearchObserver<P>,
{
    let mut solution = ExactSolution::new(root);

    for playout in 0..repeats {
        let mut position = root;
        let mut line = Vec::new();
        let mut parent_hash = 0;

        loop {
            solution.node_count += 1;

            let moves = position.legal_moves();
            if O::ENABLED {
                let hash = position.hash_key();
                let move_list = if moves.is_empty() {
                    MoveList::new()
                } else {
                    order_moves(&position, moves)
                };
                observer.visit(&NodeVisit {
                    call_id: solution.node_count,
                    hash,
                    parent_hash,
                    position: &position,
                    empty_count: position.empty_count(),
                    level: line.len() + 1,
                    is_leaf: !position.has_any_player_any_legal_move(),
                    moves: &move_list,
                });
                parent_hash = hash;
            }

            let moves = u64::from(moves);
            if moves != 0 {
                let loc = random_selection(moves, rng);
                line.push(Move::Piece(loc));
                position = position.make_move(loc);
                continue;
            }

            let passed = position.pass();
            if !passed.has_any_legal_move() {
                break;
            }
            line.push(Move::Pass);
            position = passed;
        }
        solution.leaf_count += 1;

        // `position` is scored for its mover; flip back to the root's mover.
        let value = position.final_value();
        solution.outcome = if line.len() % 2 == 0 { value } else { -value };
        trace!(
            "playout {}: {} plies, outcome {:+}",
            playout,
            line.len(),
            solution.outcome
        );
        solution.principal_variation = line;
    }

    if repeats > 0 {
        solution.materialize_final_position();
    }
    solution
}

/// Choose one location of the non-empty set `squares` uniformly.
fn random_selection<R: Rng + ?Sized>(mut squares: u64, rng: &mut R) -> Location {
    debug_assert!(squares != 0);
    let count = bitops::popcount(squares);
    let skip = rng.gen_range(0..count);
    for _ in 0..skip {
        squares ^= bitops::lowest_bit_set_64(squares);
    }
    Location::from_index(bitops::bitscan_ls1b_64(squares))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::replay;
    use endgame_board::bitboard::Bitboard;
    use endgame_board::{Board, Game};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn playouts_reach_the_end() {
        let mut rng = StdRng::seed_from_u64(42);
        let root = Game::default();
        let solution = sample(root, 20, &mut rng);

        assert_eq!(solution.leaf_count, 20);
        assert!(solution.node_count > solution.leaf_count);

        let end = solution.final_position.unwrap();
        assert!(end.is_finished());
        assert_eq!(end, replay(root, &solution.principal_variation));

        let sign = if solution.principal_variation.len() % 2 == 0 { 1 } else { -1 };
        assert_eq!(solution.outcome, sign * end.board.score_winner_gets_empties());
    }

    #[test]
    fn no_repeats() {
        let mut rng = StdRng::seed_from_u64(0);
        let solution = sample(Board::new(), 0, &mut rng);
        assert_eq!(solution.node_count, 0);
        assert!(solution.final_position.is_none());
    }

    #[test]
    fn selection_is_a_member() {
        let mut rng = StdRng::seed_from_u64(3);
        let squares = 0x8100_0000_0000_0081u64;
        for _ in 0..100 {
            let loc = random_selection(squares, &mut rng);
            assert_ne!(squares & u64::from(Bitboard::from(loc)), 0);
        }
        let single = 1u64 << 17;
        assert_eq!(random_selection(single, &mut rng), Location::from_index(17));
    }

    #[derive(Debug, Default)]
    struct Recorder {
        visits: Vec<(u64, u64, u64, usize, bool)>,
    }

    impl<P: Position> SearchObserver<P> for Recorder {
        fn visit(&mut self, visit: &NodeVisit<'_, P>) {
            self.visits.push((
                visit.call_id,
                visit.hash,
                visit.parent_hash,
                visit.level,
                visit.is_leaf,
            ));
        }
    }

    #[test]
    fn observer_sees_every_position() {
        let root = Board::new();
        let mut recorder = Recorder::default();
        let solution = sample_observed(root, 2, &mut StdRng::seed_from_u64(5), &mut recorder);

        let visits = &recorder.visits;
        assert_eq!(visits.len() as u64, solution.node_count);
        assert!(visits.iter().enumerate().all(|(i, visit)| visit.0 == i as u64 + 1));

        // Two playouts: each starts at the root and ends on a leaf.
        let starts: Vec<usize> = (0..visits.len()).filter(|&i| visits[i].3 == 1).collect();
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0], 0);
        assert_eq!(visits.iter().filter(|visit| visit.4).count(), 2);
        for &start in starts.iter() {
            assert_eq!(visits[start].1, root.hash_key());
            assert_eq!(visits[start].2, 0);
            if start > 0 {
                assert!(visits[start - 1].4);
            }
        }

        // Within a playout each parent is the previous position.
        for i in 1..visits.len() {
            if visits[i].3 > 1 {
                assert_eq!(visits[i].2, visits[i - 1].1);
                assert_eq!(visits[i].3, visits[i - 1].3 + 1);
            }
        }
    }

    #[test]
    fn observer_does_not_change_the_game() {
        let mut recorder = Recorder::default();
        let observed = sample_observed(Board::new(), 3, &mut StdRng::seed_from_u64(9), &mut recorder);
        let plain = sample(Board::new(), 3, &mut StdRng::seed_from_u64(9));
        assert_eq!(observed.principal_variation, plain.principal_variation);
        assert_eq!(observed.node_count, plain.node_count);
    }

    #[test]
    fn same_seed_same_game() {
        let first = sample(Board::new(), 3, &mut StdRng::seed_from_u64(9));
        let second = sample(Board::new(), 3, &mut StdRng::seed_from_u64(9));
        assert_eq!(first.principal_variation, second.principal_variation);
        assert_eq!(first.node_count, second.node_count);
    }
}
