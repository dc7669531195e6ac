//! Character-grid sink used by terminal adapters.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Write as _,
};

use glam::DVec2;
use token_grid_core::{CellId, CellWindow, GeoBounds, TokenValue};

use crate::RenderSink;

const CELL_WIDTH: usize = 3;

/// Render sink that keeps a character map of outlined cells and labels.
///
/// Rows are drawn north to south and columns west to east. The player is
/// drawn as `@`, labels as their value, cells within `radius` of the player as
/// `*`, and every other outlined cell as `.`.
#[derive(Clone, Debug, Default)]
pub struct TextCanvas {
    outlines: BTreeSet<CellId>,
    labels: BTreeMap<CellId, TokenValue>,
    player: Option<CellId>,
    view_center: Option<DVec2>,
    held: Option<TokenValue>,
    victory: Option<TokenValue>,
}

impl TextCanvas {
    /// Creates an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outlined cells.
    #[must_use]
    pub fn outline_count(&self) -> usize {
        self.outlines.len()
    }

    /// Label currently drawn on `cell`.
    #[must_use]
    pub fn label(&self, cell: CellId) -> Option<TokenValue> {
        self.labels.get(&cell).copied()
    }

    /// Map-space point the view is centred on.
    #[must_use]
    pub fn view_center(&self) -> Option<DVec2> {
        self.view_center
    }

    /// Line describing the inventory slot.
    #[must_use]
    pub fn inventory_line(&self) -> String {
        match self.held {
            Some(value) => format!("Holding: {value}"),
            None => "Holding: none".to_owned(),
        }
    }

    /// Victory value once a qualifying craft happened.
    #[must_use]
    pub fn victory_value(&self) -> Option<TokenValue> {
        self.victory
    }

    /// Draws the outlined cells, highlighting cells within `radius` of the player.
    #[must_use]
    pub fn render(&self, radius: u32) -> String {
        let Some(extent) = self.extent() else {
            return String::new();
        };

        let mut out = String::new();
        for row in (extent.south()..=extent.north()).rev() {
            for column in extent.west()..=extent.east() {
                let cell = CellId::new(row, column);
                let glyph = self.glyph(cell, radius);
                let _ = write!(out, "{glyph:>CELL_WIDTH$}");
            }
            out.push('\n');
        }
        out
    }

    /// Smallest window enclosing every outlined cell.
    #[must_use]
    pub fn extent(&self) -> Option<CellWindow> {
        let first = self.outlines.first()?;
        let last = self.outlines.last()?;
        let west = self.outlines.iter().map(CellId::column).min()?;
        let east = self.outlines.iter().map(CellId::column).max()?;
        Some(CellWindow::new(last.row(), first.row(), east, west))
    }

    fn glyph(&self, cell: CellId, radius: u32) -> String {
        if !self.outlines.contains(&cell) {
            return " ".to_owned();
        }
        if self.player == Some(cell) {
            return "@".to_owned();
        }
        if let Some(value) = self.labels.get(&cell) {
            return value.to_string();
        }
        let in_range = self
            .player
            .map_or(false, |player| player.chebyshev_distance(cell) <= radius);
        if in_range {
            "*".to_owned()
        } else {
            ".".to_owned()
        }
    }
}

impl RenderSink for TextCanvas {
    fn create_region_outline(&mut self, cell: CellId, _bounds: GeoBounds) {
        let _ = self.outlines.insert(cell);
    }

    fn remove_region_outline(&mut self, cell: CellId) {
        let _ = self.outlines.remove(&cell);
    }

    fn create_label(&mut self, cell: CellId, value: TokenValue, _anchor: DVec2) {
        let _ = self.labels.insert(cell, value);
    }

    fn remove_label(&mut self, cell: CellId) {
        let _ = self.labels.remove(&cell);
    }

    fn recenter_view(&mut self, position: CellId, center: DVec2) {
        self.player = Some(position);
        self.view_center = Some(center);
    }

    fn inventory_changed(&mut self, held: Option<TokenValue>) {
        self.held = held;
    }

    fn victory(&mut self, value: TokenValue) {
        self.victory = Some(value);
    }
}
