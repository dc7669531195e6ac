#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Token Grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presenters to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;
mod geometry;

pub use config::{ConfigError, GameConfig, StorePolicy, ViewSpan};
pub use geometry::{GeoBounds, GeoPoint, GridGeometry};

/// Default side length of a single cell measured in degrees.
pub const DEFAULT_TILE_SIZE: f64 = 0.0001;

/// Default maximum Chebyshev distance at which the player may interact with a cell.
pub const DEFAULT_INTERACTION_RADIUS: u32 = 3;

/// Default token value that triggers victory once crafted.
pub const DEFAULT_VICTORY_VALUE: u32 = 8;

/// Upper bound on the number of cells a single window may cover.
pub const MAX_WINDOW_CELLS: u64 = 1 << 16;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Recomputes the visible window so it covers exactly the provided cells.
    UpdateWindow {
        /// Inclusive cell bounds that should be materialized.
        window: CellWindow,
    },
    /// Moves the player a single cell in the provided direction.
    MovePlayer {
        /// Direction of travel for the step.
        direction: Direction,
    },
    /// Places the player directly onto the provided cell.
    PlacePlayer {
        /// Cell the player should occupy.
        cell: CellId,
    },
    /// Reports that the player clicked a cell.
    ClickCell {
        /// Cell targeted by the click.
        cell: CellId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Announces that a cell entered the visible window.
    CellMaterialized {
        /// Cell that became visible.
        cell: CellId,
        /// Token value currently stored in the cell, if any.
        value: Option<TokenValue>,
    },
    /// Announces that a cell left the visible window.
    CellEvicted {
        /// Cell that stopped being visible.
        cell: CellId,
        /// Whether the cell displayed a token label when it was evicted.
        labeled: bool,
    },
    /// Summarises a window recomputation that changed the visible set.
    WindowChanged {
        /// Window that is now visible.
        window: CellWindow,
        /// Number of cells that entered the window.
        materialized: u32,
        /// Number of cells that left the window.
        evicted: u32,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellId,
        /// Cell the player occupies after moving.
        to: CellId,
    },
    /// Confirms that the player lifted a token out of a cell.
    TokenPickedUp {
        /// Cell that held the token.
        cell: CellId,
        /// Value of the token now held by the player.
        value: TokenValue,
    },
    /// Confirms that the held token merged into a matching cell token.
    TokenCrafted {
        /// Cell that absorbed the held token.
        cell: CellId,
        /// Doubled value now stored in the cell.
        value: TokenValue,
    },
    /// Reports the contents of the inventory slot after a pickup or craft.
    InventoryChanged {
        /// Token held by the player, if any.
        held: Option<TokenValue>,
    },
    /// Announces that a craft produced a value at or above the victory threshold.
    Victory {
        /// Value produced by the qualifying craft.
        value: TokenValue,
    },
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices (northward).
    North,
    /// Movement toward increasing column indices (eastward).
    East,
    /// Movement toward decreasing row indices (southward).
    South,
    /// Movement toward decreasing column indices (westward).
    West,
}

impl Direction {
    /// Row and column offsets applied by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

/// Identifier of a single cell on the infinite grid.
///
/// `row` grows northward with latitude and `column` grows eastward with
/// longitude. Ordering is row-major so iteration over cells is deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    row: i32,
    column: i32,
}

impl CellId {
    /// Creates a new cell identifier.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Computes the king-move distance between two cells.
    #[must_use]
    pub const fn chebyshev_distance(self, other: CellId) -> u32 {
        let rows = self.row.abs_diff(other.row);
        let columns = self.column.abs_diff(other.column);
        if rows > columns {
            rows
        } else {
            columns
        }
    }

    /// Returns the neighbouring cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the representable grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellId> {
        let (rows, columns) = direction.offset();
        self.offset(rows, columns)
    }

    /// Returns the cell displaced by the provided row and column deltas.
    #[must_use]
    pub fn offset(self, rows: i32, columns: i32) -> Option<CellId> {
        Some(CellId::new(
            self.row.checked_add(rows)?,
            self.column.checked_add(columns)?,
        ))
    }

    /// Canonical seed string used to derive the cell's token value.
    #[must_use]
    pub fn seed(&self) -> String {
        format!("cell({},{})", self.row, self.column)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Collectible token value; always a power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TokenValue(u32);

impl TokenValue {
    /// Smallest token value.
    pub const ONE: TokenValue = TokenValue(1);
    /// Token worth two.
    pub const TWO: TokenValue = TokenValue(2);
    /// Token worth four.
    pub const FOUR: TokenValue = TokenValue(4);
    /// Token worth eight.
    pub const EIGHT: TokenValue = TokenValue(8);

    /// Creates a token value, rejecting anything that is not a power of two.
    pub const fn new(value: u32) -> Result<Self, TokenValueError> {
        if value.is_power_of_two() {
            Ok(Self(value))
        } else {
            Err(TokenValueError::NotPowerOfTwo(value))
        }
    }

    /// Retrieves the numeric value of the token.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Value produced by merging two tokens of this value.
    ///
    /// Returns `None` when the doubled value would not fit.
    #[must_use]
    pub const fn doubled(self) -> Option<TokenValue> {
        match self.0.checked_mul(2) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl TryFrom<u32> for TokenValue {
    type Error = TokenValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TokenValue> for u32 {
    fn from(value: TokenValue) -> Self {
        value.0
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a raw integer cannot become a [`TokenValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TokenValueError {
    /// Token values must be powers of two.
    #[error("token value {0} is not a power of two")]
    NotPowerOfTwo(u32),
}

/// Inclusive rectangle of cells expressed as four edge indices.
///
/// A window whose north edge lies below its south edge, or whose east edge
/// lies west of its west edge, covers no cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellWindow {
    north: i32,
    south: i32,
    east: i32,
    west: i32,
}

impl CellWindow {
    /// Creates a window from its four inclusive edges.
    #[must_use]
    pub const fn new(north: i32, south: i32, east: i32, west: i32) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Creates a window extending `radius` cells around `center` in every direction.
    #[must_use]
    pub const fn around(center: CellId, radius: i32) -> Self {
        Self::new(
            center.row.saturating_add(radius),
            center.row.saturating_sub(radius),
            center.column.saturating_add(radius),
            center.column.saturating_sub(radius),
        )
    }

    /// Northernmost row included in the window.
    #[must_use]
    pub const fn north(&self) -> i32 {
        self.north
    }

    /// Southernmost row included in the window.
    #[must_use]
    pub const fn south(&self) -> i32 {
        self.south
    }

    /// Easternmost column included in the window.
    #[must_use]
    pub const fn east(&self) -> i32 {
        self.east
    }

    /// Westernmost column included in the window.
    #[must_use]
    pub const fn west(&self) -> i32 {
        self.west
    }

    /// Reports whether the window covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.north < self.south || self.east < self.west
    }

    /// Reports whether the provided cell lies inside the window.
    #[must_use]
    pub const fn contains(&self, cell: CellId) -> bool {
        cell.row >= self.south
            && cell.row <= self.north
            && cell.column >= self.west
            && cell.column <= self.east
    }

    /// Number of cells covered by the window.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let rows = u64::from(self.north.abs_diff(self.south)) + 1;
        let columns = u64::from(self.east.abs_diff(self.west)) + 1;
        rows.saturating_mul(columns)
    }

    /// Returns a copy of the window grown by `margin` cells on every side.
    #[must_use]
    pub const fn expanded(self, margin: i32) -> Self {
        Self::new(
            self.north.saturating_add(margin),
            self.south.saturating_sub(margin),
            self.east.saturating_add(margin),
            self.west.saturating_sub(margin),
        )
    }

    /// Iterates the covered cells south to north, west to east.
    pub fn cells(&self) -> impl Iterator<Item = CellId> {
        let window = *self;
        let rows = if window.is_empty() {
            1..=0
        } else {
            window.south..=window.north
        };
        rows.flat_map(move |row| {
            (window.west..=window.east).map(move |column| CellId::new(row, column))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CellId, CellWindow, Command, Direction, Event, TokenValue, TokenValueError};

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = CellId::new(1, 1);
        let destination = CellId::new(4, -2);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
    }

    #[test]
    fn chebyshev_distance_is_symmetric_across_extremes() {
        let samples = [
            CellId::new(0, 0),
            CellId::new(i32::MIN, i32::MAX),
            CellId::new(i32::MAX, i32::MIN),
            CellId::new(-7, 3),
            CellId::new(369_979, -1_220_571),
        ];
        for a in samples {
            for b in samples {
                assert_eq!(a.chebyshev_distance(b), b.chebyshev_distance(a));
            }
        }
        assert_eq!(
            CellId::new(i32::MIN, 0).chebyshev_distance(CellId::new(i32::MAX, 0)),
            u32::MAX
        );
    }

    #[test]
    fn seed_uses_literal_integers() {
        assert_eq!(CellId::new(-3, 12).seed(), "cell(-3,12)");
        assert_eq!(CellId::new(0, 0).seed(), "cell(0,0)");
    }

    #[test]
    fn step_follows_cardinal_offsets() {
        let origin = CellId::new(0, 0);
        assert_eq!(origin.step(Direction::North), Some(CellId::new(1, 0)));
        assert_eq!(origin.step(Direction::South), Some(CellId::new(-1, 0)));
        assert_eq!(origin.step(Direction::East), Some(CellId::new(0, 1)));
        assert_eq!(origin.step(Direction::West), Some(CellId::new(0, -1)));
        assert_eq!(CellId::new(i32::MAX, 0).step(Direction::North), None);
    }

    #[test]
    fn token_value_rejects_non_powers_of_two() {
        assert_eq!(TokenValue::new(4), Ok(TokenValue::FOUR));
        assert_eq!(TokenValue::new(0), Err(TokenValueError::NotPowerOfTwo(0)));
        assert_eq!(TokenValue::new(6), Err(TokenValueError::NotPowerOfTwo(6)));
    }

    #[test]
    fn doubling_stays_on_power_of_two_chain() {
        let mut value = TokenValue::ONE;
        while let Some(next) = value.doubled() {
            assert!(next.get().is_power_of_two());
            assert_eq!(next.get(), value.get() * 2);
            value = next;
        }
        assert_eq!(value.get(), 1 << 31);
    }

    #[test]
    fn window_iterates_inclusive_bounds_in_row_major_order() {
        let window = CellWindow::new(1, 0, 1, 0);
        let cells: Vec<CellId> = window.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellId::new(0, 0),
                CellId::new(0, 1),
                CellId::new(1, 0),
                CellId::new(1, 1),
            ]
        );
        assert_eq!(window.cell_count(), 4);
    }

    #[test]
    fn inverted_window_is_empty() {
        let window = CellWindow::new(-1, 0, 5, 0);
        assert!(window.is_empty());
        assert_eq!(window.cells().count(), 0);
        assert_eq!(window.cell_count(), 0);
        assert!(!window.contains(CellId::new(0, 0)));
    }

    #[test]
    fn window_around_center_covers_radius() {
        let window = CellWindow::around(CellId::new(10, -10), 2);
        assert_eq!(window.cell_count(), 25);
        assert!(window.contains(CellId::new(12, -8)));
        assert!(!window.contains(CellId::new(13, -8)));
        assert_eq!(window.expanded(1).cell_count(), 49);
    }

    #[test]
    fn commands_round_trip_through_bincode() {
        let command = Command::ClickCell {
            cell: CellId::new(-4, 9),
        };
        let bytes = bincode::serialize(&command).expect("serialize");
        let restored: Command = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, command);
    }

    #[test]
    fn event_rejects_corrupted_token_values() {
        let event = Event::Victory {
            value: TokenValue::EIGHT,
        };
        let mut bytes = bincode::serialize(&event).expect("serialize");
        let last = bytes.len() - 4;
        bytes[last] = 6;
        assert!(bincode::deserialize::<Event>(&bytes).is_err());
    }
}
