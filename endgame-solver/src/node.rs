//! The value carried up and down the search tree.

use endgame_board::Move;

/// A move paired with the negamax value it achieves, from the point of view
/// of the player to move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchNode {
    pub mv: Move,
    pub value: i8,
}

impl SearchNode {
    #[inline]
    pub fn new(mv: Move, value: i8) -> Self {
        debug_assert!((-64..=64).contains(&value));
        Self { mv, value }
    }

    /// The same node seen from the other player's side.
    #[inline]
    pub fn negated(self) -> Self {
        Self {
            mv: self.mv,
            value: -self.value,
        }
    }

    /// Flip the value in place.
    #[inline]
    pub fn negate(&mut self) {
        self.value = -self.value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endgame_board::Location;

    #[test]
    fn negation_keeps_move() {
        let mv = Move::Piece(Location::from_index(10));
        let node = SearchNode::new(mv, 12);
        assert_eq!(node.negated(), SearchNode::new(mv, -12));
        assert_eq!(node.negated().negated(), node);

        let mut extreme = SearchNode::new(Move::Pass, -64);
        extreme.negate();
        assert_eq!(extreme.value, 64);
        assert_eq!(extreme.mv, Move::Pass);
    }
}
