//! The record handed back by a completed solve.

use endgame_board::{Move, Position};
use std::fmt;

/// Result and statistics of a search started from `solved_position`.
#[derive(Clone, Debug)]
pub struct ExactSolution<P> {
    /// The root position, copied at the start of the search.
    pub solved_position: P,
    /// Value of the root for the player to move there.
    pub outcome: i8,
    /// Best line from the root. Forced passes appear as [`Move::Pass`].
    pub principal_variation: Vec<Move>,
    /// Position reached by playing out the principal variation.
    pub final_position: Option<P>,
    pub node_count: u64,
    pub leaf_count: u64,
}

impl<P: Position> ExactSolution<P> {
    pub fn new(root: P) -> Self {
        Self {
            solved_position: root,
            outcome: 0,
            principal_variation: Vec::new(),
            final_position: None,
            node_count: 0,
            leaf_count: 0,
        }
    }

    /// The first move of the principal variation, or a pass if there is none.
    pub fn best_move(&self) -> Move {
        self.principal_variation
            .first()
            .copied()
            .unwrap_or(Move::Pass)
    }

    /// Replay the principal variation from the root and keep the result.
    pub(crate) fn materialize_final_position(&mut self) {
        self.final_position = Some(replay(self.solved_position, &self.principal_variation));
    }
}

/// Play `line` out from `root`. Every move must be legal in turn.
pub fn replay<P: Position>(root: P, line: &[Move]) -> P {
    line.iter().fold(root, |position, mv| match mv {
        Move::Piece(loc) => position.make_move(*loc),
        Move::Pass => position.pass(),
    })
}

impl<P> fmt::Display for ExactSolution<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self
            .principal_variation
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<String>>()
            .join(" ");

        writeln!(f, "outcome: {:+}", self.outcome)?;
        writeln!(f, "principal variation: {}", line)?;
        write!(
            f,
            "nodes: {}, leaves: {}",
            self.node_count, self.leaf_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endgame_board::Board;

    #[test]
    fn empty_solution() {
        let solution = ExactSolution::new(Board::new());
        assert_eq!(solution.best_move(), Move::Pass);
        assert!(solution.final_position.is_none());
        assert_eq!(
            solution.to_string(),
            "outcome: +0\nprincipal variation: \nnodes: 0, leaves: 0"
        );
    }

    #[test]
    fn replay_line() {
        let line = [
            Move::Piece("F5".parse().unwrap()),
            Move::Piece("D6".parse().unwrap()),
        ];
        let mut solution = ExactSolution::new(Board::new());
        solution.principal_variation = line.to_vec();
        solution.materialize_final_position();

        let expected = Board::new()
            .make_move("F5".parse().unwrap())
            .make_move("D6".parse().unwrap());
        assert_eq!(solution.final_position, Some(expected));
        assert_eq!(solution.best_move(), line[0]);
    }
}
