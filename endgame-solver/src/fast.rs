//! A fail-soft exact solver tuned for the last stretch of the game.
//!
//! Empty squares are kept in a fixed best-to-worst order and labelled with
//! the region (connected group of empties) they belong to. How moves are
//! ordered depends on how many empties remain:
//!
//!  - above [`FastSolverConfig::fastest_first`], moves leaving the opponent
//!    the fewest replies come first;
//!  - down to [`FastSolverConfig::use_parity`], moves into regions holding an
//!    odd number of empties come first;
//!  - below that the fixed order is used as is, and the last two empties
//!    are scored without recursing.

use crate::line::LineTable;
use crate::node::SearchNode;
use crate::ordering::{MoveList, MoveListEntry};
use crate::solution::ExactSolution;
use arrayvec::ArrayVec;
use endgame_board::bitboard::{self, Bitboard};
use endgame_board::{bitops, Location, Move, Position, MAX_SCORE, NUM_SPACES};
use log::debug;

/// Below every reachable value.
const INFINITY: i8 = MAX_SCORE + 1;

/// Square classes from best to worst. Within a class squares are tried from
/// A1 towards H8.
pub const SQUARE_ORDER: [u64; 10] = [
    0x8100000000000081, // A1, H1, A8, H8
    0x2400810000810024, // C1, F1, A3, H3, A6, H6, C8, F8
    0x0000240000240000, // C3, F3, C6, F6
    0x1800008181000018, // D1, E1, A4, H4, A5, H5, D8, E8
    0x0000182424180000, // D3, E3, C4, F4, C5, F5, D6, E6
    0x0018004242001800, // D2, E2, B4, G4, B5, G5, D7, E7
    0x0024420000422400, // C2, F2, B3, G3, B6, G6, C7, F7
    0x4281000000008142, // B1, G1, A2, H2, A7, H7, B8, G8
    0x0042000000004200, // B2, G2, B7, G7
    0x0000001818000000, // D4, E4, D5, E5
];

/// Empties thresholds choosing the move ordering at each node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FastSolverConfig {
    /// At or below `max(use_parity, 2)` empties the fixed order is used.
    pub use_parity: u8,
    /// Above this many empties moves are sorted by opponent mobility.
    pub fastest_first: u8,
}

impl Default for FastSolverConfig {
    fn default() -> Self {
        Self {
            use_parity: 4,
            fastest_first: 7,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Stage {
    Fixed,
    Parity,
    FastestFirst,
}

/// Running best of a fail-soft node.
struct Best {
    value: i8,
    mv: Move,
    alpha: i8,
}

/// Exact solver using region parity and fastest-first ordering.
#[derive(Clone, Debug)]
pub struct FastSolver {
    config: FastSolverConfig,
    node_count: u64,
    leaf_count: u64,
    lines: LineTable,
    /// Empty squares of the root, best first.
    squares: ArrayVec<Location, NUM_SPACES>,
    /// Region bit of every empty square of the root, by square index.
    holes: [u64; NUM_SPACES],
}

impl Default for FastSolver {
    fn default() -> Self {
        Self::with_config(FastSolverConfig::default())
    }
}

impl FastSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FastSolverConfig) -> Self {
        Self {
            config,
            node_count: 0,
            leaf_count: 0,
            lines: LineTable::default(),
            squares: ArrayVec::new(),
            holes: [0; NUM_SPACES],
        }
    }

    pub fn config(&self) -> FastSolverConfig {
        self.config
    }

    /// Compute the exact value of `root` for the side to move.
    pub fn solve<P: Position>(&mut self, root: P) -> ExactSolution<P> {
        self.solve_window(root, -MAX_SCORE, MAX_SCORE)
    }

    /// Search `root` inside `(alpha, beta)`. Values at or beyond a bound are
    /// only bounds on the true value.
    pub fn solve_window<P: Position>(&mut self, root: P, alpha: i8, beta: i8) -> ExactSolution<P> {
        debug_assert!(alpha < beta);

        let empties = root.empty_count();
        let parity = self.prepare(root.empty_mask());
        debug!(
            "fast solve: {} empties in {} regions, window ({}, {})",
            empties,
            self.holes.iter().fold(0u64, |acc, &hole| acc | hole).count_ones(),
            alpha,
            beta
        );

        self.node_count = 0;
        self.leaf_count = 0;

        let node = self.search(root, 0, alpha, beta, empties, parity, false);

        let mut solution = ExactSolution::new(root);
        solution.outcome = node.value;
        solution.principal_variation = self.lines.root();
        solution.node_count = self.node_count;
        solution.leaf_count = self.leaf_count;
        solution.materialize_final_position();

        debug!(
            "fast solved: outcome {:+}, best move {}, {} nodes, {} leaves",
            solution.outcome,
            node.mv,
            solution.node_count,
            solution.leaf_count
        );
        solution
    }

    /// Order the empty squares and label their regions.
    /// Returns the region parity: the bits of regions with an odd count.
    fn prepare(&mut self, empty_mask: Bitboard) -> u64 {
        let empties = u64::from(empty_mask);

        self.squares.clear();
        for &class in SQUARE_ORDER.iter() {
            let mut remaining = class & empties;
            while remaining != 0 {
                let index = bitops::bitscan_ms1b_64(remaining);
                remaining ^= 1u64 << index;
                self.squares.push(Location::from_index(index));
            }
        }

        self.holes = [0; NUM_SPACES];
        let mut parity = 0;
        let mut hole = 1u64;
        let mut unlabelled = empties;
        while unlabelled != 0 {
            let region = region_of(bitops::lowest_bit_set_64(unlabelled), empties);
            unlabelled &= !region;

            let mut members = region;
            while members != 0 {
                self.holes[bitops::bitscan_ls1b_64(members) as usize] = hole;
                members ^= bitops::lowest_bit_set_64(members);
            }
            if bitops::popcount(region) % 2 == 1 {
                parity |= hole;
            }
            hole = hole.wrapping_shl(1);
        }
        parity
    }

    fn stage(&self, empties: u8) -> Stage {
        if empties > self.config.fastest_first {
            Stage::FastestFirst
        } else if empties <= self.config.use_parity.max(2) {
            Stage::Fixed
        } else {
            Stage::Parity
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn search<P: Position>(
        &mut self,
        position: P,
        depth: usize,
        alpha: i8,
        beta: i8,
        empties: u8,
        parity: u64,
        passed: bool,
    ) -> SearchNode {
        self.node_count += 1;
        self.lines.enter(depth);

        let moves = u64::from(position.legal_moves());
        if moves == 0 {
            let opponent = position.pass();
            if passed || !opponent.has_any_legal_move() {
                self.leaf_count += 1;
                return SearchNode::new(Move::Pass, position.final_value());
            }

            let mut node = self.search(opponent, depth + 1, -beta, -alpha, empties, parity, true);
            node.negate();
            node.mv = Move::Pass;
            self.lines.extend(depth, Move::Pass);
            return node;
        }

        let mut best = Best {
            value: -INFINITY,
            mv: Move::Pass,
            alpha,
        };
        let child = Child {
            depth,
            beta,
            empties,
            parity,
        };

        match self.stage(empties) {
            Stage::Fixed => {
                for i in 0..self.squares.len() {
                    let loc = self.squares[i];
                    if moves & u64::from(Bitboard::from(loc)) != 0
                        && self.try_move(&position, loc, &child, &mut best, true)
                    {
                        break;
                    }
                }
            }
            Stage::Parity => {
                'regions: for &mask in [parity, !parity].iter() {
                    for i in 0..self.squares.len() {
                        let loc = self.squares[i];
                        if moves & u64::from(Bitboard::from(loc)) == 0
                            || self.holes[loc.to_index() as usize] & mask == 0
                        {
                            continue;
                        }
                        if self.try_move(&position, loc, &child, &mut best, false) {
                            break 'regions;
                        }
                    }
                }
            }
            Stage::FastestFirst => {
                let mut move_list = MoveList::new();
                for &loc in self.squares.iter() {
                    if moves & u64::from(Bitboard::from(loc)) != 0 {
                        let replies = position.make_move(loc).legal_moves();
                        move_list.insert(MoveListEntry {
                            location: loc,
                            mobility: bitops::popcount(replies.into()),
                        });
                    }
                }
                for entry in move_list.iter() {
                    if self.try_move(&position, entry.location, &child, &mut best, false) {
                        break;
                    }
                }
            }
        }

        SearchNode::new(best.mv, best.value)
    }

    /// Play `loc`, score the result and fold it into `best`.
    /// Returns true on a beta cutoff.
    fn try_move<P: Position>(
        &mut self,
        position: &P,
        loc: Location,
        child: &Child,
        best: &mut Best,
        score_last_pair: bool,
    ) -> bool {
        let mv = Move::Piece(loc);
        let next = position.make_move(loc);

        let value = if score_last_pair && child.empties == 2 {
            let (value, line) = self.score_last_square(next, mv);
            if value > best.value {
                self.lines.set(child.depth, &line);
            }
            value
        } else {
            let hole = self.holes[loc.to_index() as usize];
            let value = -self
                .search(
                    next,
                    child.depth + 1,
                    -child.beta,
                    -best.alpha,
                    child.empties - 1,
                    child.parity ^ hole,
                    false,
                )
                .value;
            if value > best.value {
                self.lines.extend(child.depth, mv);
            }
            value
        };

        if value > best.value {
            best.value = value;
            best.mv = mv;
            if value > best.alpha {
                best.alpha = value;
                if value >= child.beta {
                    return true;
                }
            }
        }
        false
    }

    /// Score `next`, reached by `mv` and holding a single empty square,
    /// for the player who played `mv`.
    fn score_last_square<P: Position>(&mut self, next: P, mv: Move) -> (i8, ArrayVec<Move, 3>) {
        self.node_count += 1;
        self.leaf_count += 1;

        let last_mask = next.empty_mask();
        let last = Location::from_onehot_unchecked(last_mask);
        let mut line = ArrayVec::new();
        line.push(mv);

        if next.legal_moves().contains(last_mask) {
            line.push(Move::Piece(last));
            return (next.make_move(last).final_value(), line);
        }

        self.node_count += 1;
        let passed = next.pass();
        if passed.legal_moves().contains(last_mask) {
            line.push(Move::Pass);
            line.push(Move::Piece(last));
            return (-passed.make_move(last).final_value(), line);
        }

        (-next.final_value(), line)
    }
}

/// What a node passes down to each of its children.
struct Child {
    depth: usize,
    beta: i8,
    empties: u8,
    parity: u64,
}

/// The empties 8-connected to `seed` within `empties`.
fn region_of(seed: u64, empties: u64) -> u64 {
    let mut region = seed;
    loop {
        let grown = region | (u64::from(bitboard::adjacent(Bitboard::from(region))) & empties);
        if grown == region {
            return region;
        }
        region = grown;
    }
}

/// Solve `root` exactly with a fresh [`FastSolver`] in its default configuration.
pub fn solve_fast<P: Position>(root: P) -> ExactSolution<P> {
    FastSolver::new().solve(root)
}
