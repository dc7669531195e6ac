#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Token Grid adapters.
//!
//! The world never draws anything. It broadcasts events, and the [`Presenter`]
//! translates those events into fire-and-forget notifications on a
//! [`RenderSink`]. Sinks own every presentation handle (outlines, labels, the
//! view position); nothing flows back into the simulation.

mod text;

use glam::DVec2;
use token_grid_core::{CellId, Event, GeoBounds, GeoPoint, GridGeometry, TokenValue};

pub use text::TextCanvas;

/// Receiver of rendering notifications produced by the [`Presenter`].
pub trait RenderSink {
    /// Draws the outline of a newly visible cell.
    fn create_region_outline(&mut self, cell: CellId, bounds: GeoBounds);

    /// Removes the outline of a cell that left the view.
    fn remove_region_outline(&mut self, cell: CellId);

    /// Shows a token label centred on `anchor`.
    fn create_label(&mut self, cell: CellId, value: TokenValue, anchor: DVec2);

    /// Removes the token label of a cell.
    fn remove_label(&mut self, cell: CellId);

    /// Moves the player marker and centres the view on `center`.
    fn recenter_view(&mut self, position: CellId, center: DVec2);

    /// Updates the inventory display.
    fn inventory_changed(&mut self, held: Option<TokenValue>);

    /// Announces that the player won.
    fn victory(&mut self, value: TokenValue);
}

/// Converts a geographic point into a map-space vector (`x` = longitude, `y` = latitude).
#[must_use]
pub fn to_map_space(point: GeoPoint) -> DVec2 {
    DVec2::new(point.longitude, point.latitude)
}

/// Translates world events into rendering notifications.
#[derive(Clone, Copy, Debug)]
pub struct Presenter {
    geometry: GridGeometry,
}

impl Presenter {
    /// Creates a presenter that places labels using the provided geometry.
    #[must_use]
    pub const fn new(geometry: GridGeometry) -> Self {
        Self { geometry }
    }

    /// Map-space point where the label of `cell` is anchored.
    #[must_use]
    pub fn label_anchor(&self, cell: CellId) -> DVec2 {
        to_map_space(self.geometry.center_of(cell))
    }

    /// Places the player marker on `cell` and centres the view on it.
    pub fn recenter<S>(&self, cell: CellId, sink: &mut S)
    where
        S: RenderSink + ?Sized,
    {
        sink.recenter_view(cell, self.label_anchor(cell));
    }

    /// Forwards every event in order to `sink`.
    pub fn present<S>(&self, events: &[Event], sink: &mut S)
    where
        S: RenderSink + ?Sized,
    {
        for event in events {
            match *event {
                Event::CellMaterialized { cell, value } => {
                    sink.create_region_outline(cell, self.geometry.bounds_of(cell));
                    if let Some(value) = value {
                        sink.create_label(cell, value, self.label_anchor(cell));
                    }
                }
                Event::CellEvicted { cell, labeled } => {
                    if labeled {
                        sink.remove_label(cell);
                    }
                    sink.remove_region_outline(cell);
                }
                Event::TokenPickedUp { cell, .. } => sink.remove_label(cell),
                Event::TokenCrafted { cell, value } => {
                    sink.remove_label(cell);
                    sink.create_label(cell, value, self.label_anchor(cell));
                }
                Event::InventoryChanged { held } => sink.inventory_changed(held),
                Event::Victory { value } => sink.victory(value),
                Event::PlayerMoved { to, .. } => self.recenter(to, sink),
                Event::WindowChanged { .. } => {}
            }
        }
    }
}
