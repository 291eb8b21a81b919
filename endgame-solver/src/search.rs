//! Exact negamax search with fail-hard alpha-beta pruning.

use crate::line::LineTable;
use crate::node::SearchNode;
use crate::ordering::{order_moves, MoveList};
use crate::solution::ExactSolution;
use crate::trace::{NodeVisit, NullObserver, SearchObserver};
use endgame_board::{Move, Position, MAX_SCORE};
use log::debug;

/// Solves positions exactly, reporting each node to an observer.
///
/// The solver owns its counters and principal-variation table, so separate
/// solvers never interfere and one solver can be reused across positions.
#[derive(Debug, Default)]
pub struct Solver<O = NullObserver> {
    observer: O,
    node_count: u64,
    leaf_count: u64,
    lines: LineTable,
}

impl Solver<NullObserver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O> Solver<O> {
    pub fn with_observer(observer: O) -> Self {
        Self {
            observer,
            node_count: 0,
            leaf_count: 0,
            lines: LineTable::default(),
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Compute the exact game-theoretic value of `root` for the side to move.
    pub fn solve<P: Position>(&mut self, root: P) -> ExactSolution<P>
    where
        O: SearchObserver<P>,
    {
        self.solve_window(root, -MAX_SCORE, MAX_SCORE)
    }

    /// Search `root` inside the window `(achievable, cutoff)`.
    ///
    /// Values outside the window are clamped to its bounds: a result equal
    /// to `achievable` or `cutoff` is only a bound on the true value.
    pub fn solve_window<P: Position>(
        &mut self,
        root: P,
        achievable: i8,
        cutoff: i8,
    ) -> ExactSolution<P>
    where
        O: SearchObserver<P>,
    {
        debug_assert!(achievable < cutoff);
        debug!(
            "solving position with {} empties in window ({}, {})",
            root.empty_count(),
            achievable,
            cutoff
        );

        self.node_count = 0;
        self.leaf_count = 0;

        let node = self.search(root, 0, 0, achievable, cutoff);

        let mut solution = ExactSolution::new(root);
        solution.outcome = node.value;
        solution.principal_variation = self.lines.root();
        solution.node_count = self.node_count;
        solution.leaf_count = self.leaf_count;
        solution.materialize_final_position();

        debug!(
            "solved: outcome {:+}, best move {}, {} nodes, {} leaves",
            solution.outcome,
            node.mv,
            solution.node_count,
            solution.leaf_count
        );
        solution
    }

    fn search<P: Position>(
        &mut self,
        position: P,
        depth: usize,
        parent_hash: u64,
        achievable: i8,
        cutoff: i8,
    ) -> SearchNode
    where
        O: SearchObserver<P>,
    {
        self.node_count += 1;
        self.lines.enter(depth);

        let moves = position.legal_moves();
        let move_list = if moves.is_empty() {
            MoveList::new()
        } else {
            order_moves(&position, moves)
        };

        let hash = if O::ENABLED {
            let hash = position.hash_key();
            self.observer.visit(&NodeVisit {
                call_id: self.node_count,
                hash,
                parent_hash,
                position: &position,
                empty_count: position.empty_count(),
                level: depth + 1,
                is_leaf: !position.has_any_player_any_legal_move(),
                moves: &move_list,
            });
            hash
        } else {
            0
        };

        if move_list.is_empty() {
            let passed = position.pass();
            if !passed.has_any_legal_move() {
                self.leaf_count += 1;
                return SearchNode::new(Move::Pass, position.final_value());
            }

            let child = self.search(passed, depth + 1, hash, -cutoff, -achievable);
            self.lines.extend(depth, Move::Pass);
            return SearchNode::new(Move::Pass, -child.value);
        }

        let mut best = SearchNode::new(Move::Pass, achievable);
        for (i, entry) in move_list.iter().enumerate() {
            let mv = Move::Piece(entry.location);
            let child = self
                .search(position.make_move(entry.location), depth + 1, hash, -cutoff, -best.value)
                .negated();

            // The first move is kept even if it never beats `achievable`.
            if i == 0 {
                best.mv = mv;
            }
            if i == 0 || child.value > best.value {
                self.lines.extend(depth, mv);
            }
            if child.value > best.value {
                best = SearchNode::new(mv, child.value);
                if best.value >= cutoff {
                    break;
                }
            }
        }
        best
    }
}

/// Solve `root` exactly with a fresh, untraced solver.
pub fn solve<P: Position>(root: P) -> ExactSolution<P> {
    Solver::new().solve(root)
}

/// Solve `root` only as far as needed to tell a win from a loss or a draw.
/// Only the sign of the resulting outcome is meaningful.
pub fn solve_win_loss_draw<P: Position>(root: P) -> ExactSolution<P> {
    Solver::new().solve_window(root, -1, 1)
}
