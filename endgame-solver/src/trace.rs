//! Observation of the search tree.
//!
//! A [`Solver`](crate::Solver) reports every node it enters to its
//! [`SearchObserver`], and [`sample_observed`](crate::sample_observed) every
//! position of its playouts. The default [`NullObserver`] switches reporting
//! off at compile time, so an untraced search does no extra work.
//! [`CsvTrace`] dumps the tree as semicolon-separated records for offline
//! inspection.

use crate::ordering::MoveList;
use endgame_board::Position;
use std::io::{self, Write};

/// Header line written by [`CsvTrace`].
pub const CSV_HEADER: &str =
    "CALL_ID;HASH;PARENT_HASH;GAME_POSITION;EMPTY_COUNT;LEVEL;IS_LEAF;MOVE_LIST";

/// Everything known about a node when the search enters it.
#[derive(Debug)]
pub struct NodeVisit<'a, P> {
    /// 1-based count of nodes entered so far in this solve.
    pub call_id: u64,
    pub hash: u64,
    /// Hash of the node this one was reached from, 0 at the root.
    pub parent_hash: u64,
    pub position: &'a P,
    pub empty_count: u8,
    /// Distance from the root, counting the root as 1.
    pub level: usize,
    /// Whether neither player can move.
    pub is_leaf: bool,
    /// Legal moves in search order, right-aligned in a 42-wide column.
    pub moves: &'a MoveList,
}

pub trait SearchObserver<P> {
    /// When false the solver skips building [`NodeVisit`]s altogether.
    const ENABLED: bool = true;

    fn visit(&mut self, visit: &NodeVisit<'_, P>);
}

/// An observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl<P> SearchObserver<P> for NullObserver {
    const ENABLED: bool = false;

    #[inline(always)]
    fn visit(&mut self, _visit: &NodeVisit<'_, P>) {}
}

/// Writes one CSV record per visited node.
///
/// I/O errors do not interrupt the search: the first one is kept and
/// reported by [`CsvTrace::finish`], and later records are dropped.
#[derive(Debug)]
pub struct CsvTrace<W: Write> {
    writer: W,
    error: Option<io::Error>,
    records: u64,
}

impl<W: Write> CsvTrace<W> {
    /// Start a trace on `writer`, beginning with [`CSV_HEADER`].
    pub fn new(mut writer: W) -> Self {
        let error = writeln!(writer, "{}", CSV_HEADER).err();
        Self {
            writer,
            error,
            records: 0,
        }
    }

    /// Number of node records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Flush and hand back the writer, or the first error seen.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<P: Position, W: Write> SearchObserver<P> for CsvTrace<W> {
    fn visit(&mut self, visit: &NodeVisit<'_, P>) {
        if self.error.is_some() {
            return;
        }

        let result = writeln!(
            self.writer,
            "{:8};{:016x};{:016x};{};{:2};{:2};{};{:>42}",
            visit.call_id,
            visit.hash,
            visit.parent_hash,
            visit.position.snapshot(),
            visit.empty_count,
            visit.level,
            if visit.is_leaf { "t" } else { "f" },
            visit.moves,
        );

        match result {
            Ok(()) => self.records += 1,
            Err(error) => self.error = Some(error),
        }
    }
}
