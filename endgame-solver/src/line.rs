//! Triangular principal-variation table shared by the exact searches.

use endgame_board::Move;

/// `lines[d]` holds the best line found so far from the node at depth `d`.
/// A node clears its own entry on entry and rebuilds it from the entry of
/// the child it just searched.
#[derive(Clone, Debug, Default)]
pub(crate) struct LineTable {
    lines: Vec<Vec<Move>>,
}

impl LineTable {
    /// Reset the line of a node being entered at `depth`.
    pub fn enter(&mut self, depth: usize) {
        if self.lines.len() <= depth {
            self.lines.resize_with(depth + 1, Vec::new);
        }
        self.lines[depth].clear();
    }

    /// Set the line at `depth` to `mv` followed by the line just returned
    /// from `depth + 1`.
    pub fn extend(&mut self, depth: usize, mv: Move) {
        let (parents, children) = self.lines.split_at_mut(depth + 1);
        let line = &mut parents[depth];
        line.clear();
        line.push(mv);
        if let Some(child_line) = children.first() {
            line.extend_from_slice(child_line);
        }
    }

    /// Overwrite the line at `depth` with a line computed without recursion.
    pub fn set(&mut self, depth: usize, moves: &[Move]) {
        let line = &mut self.lines[depth];
        line.clear();
        line.extend_from_slice(moves);
    }

    /// The line from the root of the last search.
    pub fn root(&self) -> Vec<Move> {
        self.lines.first().cloned().unwrap_or_default()
    }
}
