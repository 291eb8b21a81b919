//! Utilities for loading endgame positions in the format of the
//! [FFO endgame test suite](http://www.radagast.se/othello/ffotest.html).
//!
//! Each line holds a board, the colour to move, the best move and the
//! exact score for Black: `<64 chars> <X|O> <move> <score>`. The move is a
//! square index, `-1` for a pass, or algebraic notation.

use crate::game::{Game, Move, ParsePlayerError, Player};
use crate::{Board, Location, ParseBoardError};
use derive_more::{Display, Error};
use std::fs::File;
use std::io::{self, prelude::*};
use std::path::Path;

/// A single FFO endgame test position.
#[derive(Clone, Copy, Debug)]
pub struct FFOPosition {
    pub game: Game,
    pub best_move: Move,
    /// Exact score from the perspective of the player to move.
    pub score: i8,
}

#[derive(Debug, PartialEq, Error, Display)]
pub enum LoadFFOError {
    MissingBoard,
    CannotParseBoard,
    CannotParsePlayer,
    CannotParseMove,
    CannotParseScore,
    CannotReadFile,
}

impl From<ParsePlayerError> for LoadFFOError {
    fn from(_: ParsePlayerError) -> Self {
        LoadFFOError::CannotParsePlayer
    }
}

impl From<ParseBoardError> for LoadFFOError {
    fn from(_: ParseBoardError) -> Self {
        LoadFFOError::CannotParseBoard
    }
}

impl From<io::Error> for LoadFFOError {
    fn from(_: io::Error) -> Self {
        LoadFFOError::CannotReadFile
    }
}

/// Load all of the [`FFOPosition`]s in the file at `path`.
/// Blank lines and lines starting with `#` are skipped.
pub fn load_ffo_positions<P: AsRef<Path>>(path: P) -> Result<Vec<FFOPosition>, LoadFFOError> {
    let reader = io::BufReader::new(File::open(path)?);

    let mut positions = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        positions.push(line.parse()?);
    }
    Ok(positions)
}

fn parse_move(s: &str) -> Result<Move, LoadFFOError> {
    if let Ok(index) = s.parse::<i8>() {
        return match index {
            -1 => Ok(Move::Pass),
            0..=63 => Ok(Move::Piece(Location::from_index(index as u8))),
            _ => Err(LoadFFOError::CannotParseMove),
        };
    }
    s.parse().or(Err(LoadFFOError::CannotParseMove))
}

/// Parse the leading `<board> <X|O>` fields of an FFO line into a [`Game`].
/// Any later fields are ignored.
pub fn parse_game(ffo_string: &str) -> Result<Game, LoadFFOError> {
    let mut sections = ffo_string.split_whitespace();
    game_from_sections(&mut sections)
}

fn game_from_sections<'a, I>(sections: &mut I) -> Result<Game, LoadFFOError>
where
    I: Iterator<Item = &'a str>,
{
    let board_str = sections.next().ok_or(LoadFFOError::MissingBoard)?;

    let player: Player = sections
        .next()
        .ok_or(LoadFFOError::CannotParsePlayer)?
        .parse()?;

    let mut board: Board = board_str.parse()?;
    if player == Player::White {
        board = board.swap_players();
    }

    Ok(Game::new(board, player))
}

impl std::str::FromStr for FFOPosition {
    type Err = LoadFFOError;

    fn from_str(ffo_string: &str) -> Result<Self, Self::Err> {
        let mut sections = ffo_string.split_whitespace();

        let game = game_from_sections(&mut sections)?;

        let best_move = parse_move(sections.next().ok_or(LoadFFOError::CannotParseMove)?)?;

        let mut score: i8 = sections
            .next()
            .ok_or(LoadFFOError::CannotParseScore)?
            .parse()
            .or(Err(LoadFFOError::CannotParseScore))?;

        if game.active_player == Player::White {
            score = -score;
        }

        Ok(FFOPosition {
            game,
            best_move,
            score,
        })
    }
}
