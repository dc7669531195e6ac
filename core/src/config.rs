//! Session configuration fixed when a game starts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    CellId, GeoPoint, GridGeometry, DEFAULT_INTERACTION_RADIUS, DEFAULT_TILE_SIZE,
    DEFAULT_VICTORY_VALUE, MAX_WINDOW_CELLS,
};

const DEFAULT_START: GeoPoint = GeoPoint::new(36.997936938057016, -122.05703507501151);
const DEFAULT_VIEW_SPAN: ViewSpan = ViewSpan::new(0.0012, 0.0024);

/// Lifecycle applied to cell records once they leave the visible window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorePolicy {
    /// Evicted cells keep their value, including crafted results.
    #[default]
    Persistent,
    /// Evicted cells are forgotten and regenerated from scratch on re-entry.
    Memoryless,
}

impl StorePolicy {
    /// Lower-case name used in configuration files and flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Persistent => "persistent",
            Self::Memoryless => "memoryless",
        }
    }
}

impl fmt::Display for StorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorePolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "persistent" => Ok(Self::Persistent),
            "memoryless" => Ok(Self::Memoryless),
            other => Err(ConfigError::UnknownStorePolicy(other.to_owned())),
        }
    }
}

/// Geographic extent of the map view in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewSpan {
    /// North-south extent.
    pub latitude: f64,
    /// East-west extent.
    pub longitude: f64,
}

impl ViewSpan {
    /// Creates a new view extent.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for ViewSpan {
    fn default() -> Self {
        DEFAULT_VIEW_SPAN
    }
}

/// Constants that govern a single game session.
///
/// Every field falls back to its default when omitted from a configuration
/// file. Values are fixed at session start and never reloaded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of a cell in degrees.
    pub tile_size: f64,
    /// Maximum Chebyshev distance at which cells accept clicks.
    pub interaction_radius: u32,
    /// Crafted value at or above which victory is announced.
    pub victory_value: u32,
    /// Lifecycle applied to evicted cells.
    pub store_policy: StorePolicy,
    /// Extra cells materialized beyond the viewport on every side.
    pub window_margin: u32,
    /// Geographic location where the player starts.
    pub start: GeoPoint,
    /// Extent of the map view centred on the player.
    pub view_span: ViewSpan,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            interaction_radius: DEFAULT_INTERACTION_RADIUS,
            victory_value: DEFAULT_VICTORY_VALUE,
            store_policy: StorePolicy::default(),
            window_margin: 0,
            start: DEFAULT_START,
            view_span: DEFAULT_VIEW_SPAN,
        }
    }
}

impl GameConfig {
    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if self.victory_value == 0 {
            return Err(ConfigError::InvalidVictoryValue(self.victory_value));
        }
        if !self.start.latitude.is_finite() || !self.start.longitude.is_finite() {
            return Err(ConfigError::InvalidStart(self.start));
        }
        let span = self.view_span;
        if !span.latitude.is_finite()
            || !span.longitude.is_finite()
            || span.latitude <= 0.0
            || span.longitude <= 0.0
        {
            return Err(ConfigError::InvalidViewSpan(span));
        }
        let cells = self.window_cell_bound();
        if cells > MAX_WINDOW_CELLS as f64 {
            return Err(ConfigError::ViewTooLarge {
                cells: cells as u64,
                limit: MAX_WINDOW_CELLS,
            });
        }
        Ok(())
    }

    // A view rectangle of `span` degrees touches at most `span / tile + 1` cells
    // per axis, one more when its edges straddle cell boundaries.
    fn window_cell_bound(&self) -> f64 {
        let margin = 2.0 * f64::from(self.window_margin);
        let rows = self.view_span.latitude / self.tile_size + margin + 2.0;
        let columns = self.view_span.longitude / self.tile_size + margin + 2.0;
        rows * columns
    }

    /// Grid geometry derived from the configured tile size.
    #[must_use]
    pub const fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.tile_size)
    }

    /// Cell containing the configured start location.
    #[must_use]
    pub fn start_cell(&self) -> CellId {
        self.geometry().cell_containing(self.start)
    }
}

/// Reasons a [`GameConfig`] is rejected at session start.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The tile size must be a positive, finite number of degrees.
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f64),
    /// The victory threshold must be positive.
    #[error("victory value must be at least 1, got {0}")]
    InvalidVictoryValue(u32),
    /// The start location must have finite coordinates.
    #[error("start location must be finite, got {0:?}")]
    InvalidStart(GeoPoint),
    /// The view extent must be positive and finite along both axes.
    #[error("view span must be positive and finite, got {0:?}")]
    InvalidViewSpan(ViewSpan),
    /// The view span and margin describe windows larger than the world accepts.
    #[error("view covers up to {cells} cells, more than the limit of {limit}")]
    ViewTooLarge {
        /// Estimated cells in the largest window the view can produce.
        cells: u64,
        /// Maximum cells per window.
        limit: u64,
    },
    /// The store policy name was not recognised.
    #[error("unknown store policy `{0}`; expected `persistent` or `memoryless`")]
    UnknownStorePolicy(String),
}
