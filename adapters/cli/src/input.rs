//! Line-oriented player commands read from the terminal or a script.

use std::str::{FromStr, SplitWhitespace};

use anyhow::{bail, Context, Result};
use token_grid_core::{CellId, Direction};

/// Single instruction typed by the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerInput {
    /// Step one cell in a cardinal direction.
    Move(Direction),
    /// Click an absolute cell.
    Click(CellId),
    /// Click the cell at an offset from the player.
    Tap {
        /// Row offset, positive northward.
        rows: i32,
        /// Column offset, positive eastward.
        columns: i32,
    },
    /// Shift the map view by a geographic delta without moving the player.
    Pan {
        /// Latitude delta in degrees.
        latitude: f64,
        /// Longitude delta in degrees.
        longitude: f64,
    },
    /// Snap the view back onto the player.
    Center,
    /// Redraw without changing anything.
    Look,
    /// End the session.
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub(crate) fn parse(line: &str) -> Result<Option<PlayerInput>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };

    let input = match keyword.to_ascii_lowercase().as_str() {
        "n" | "north" => PlayerInput::Move(Direction::North),
        "s" | "south" => PlayerInput::Move(Direction::South),
        "e" | "east" => PlayerInput::Move(Direction::East),
        "w" | "west" => PlayerInput::Move(Direction::West),
        "click" => {
            let row = argument(&mut words, "row")?;
            let column = argument(&mut words, "column")?;
            PlayerInput::Click(CellId::new(row, column))
        }
        "tap" => PlayerInput::Tap {
            rows: argument(&mut words, "row offset")?,
            columns: argument(&mut words, "column offset")?,
        },
        "pan" => PlayerInput::Pan {
            latitude: argument(&mut words, "latitude delta")?,
            longitude: argument(&mut words, "longitude delta")?,
        },
        "center" => PlayerInput::Center,
        "look" => PlayerInput::Look,
        "q" | "quit" | "exit" => PlayerInput::Quit,
        other => bail!("unknown command `{other}`"),
    };

    if let Some(extra) = words.next() {
        bail!("unexpected argument `{extra}` after `{keyword}`");
    }
    Ok(Some(input))
}

fn argument<T>(words: &mut SplitWhitespace<'_>, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let word = words
        .next()
        .with_context(|| format!("missing {name}"))?;
    word.parse()
        .with_context(|| format!("invalid {name} `{word}`"))
}
