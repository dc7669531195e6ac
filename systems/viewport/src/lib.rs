#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure viewport system that turns map view changes into window commands.
//!
//! The map view is a geographic rectangle. It follows the player after every
//! move and can also be panned independently. Whenever the rectangle changes
//! in a way that touches a different set of cells, the system emits a single
//! [`Command::UpdateWindow`] covering those cells plus the configured margin.

use token_grid_core::{
    CellId, CellWindow, Command, Event, GameConfig, GeoBounds, GridGeometry, ViewSpan,
    MAX_WINDOW_CELLS,
};

/// Input snapshot distilled from adapter-provided view changes.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ViewportInput {
    /// New view rectangle after the user panned the map, if any.
    pub pan: Option<GeoBounds>,
    /// Indicates whether the view should snap back onto the player.
    pub recenter: bool,
}

impl ViewportInput {
    /// Input that requests the view to centre on the player.
    #[must_use]
    pub const fn recenter() -> Self {
        Self {
            pan: None,
            recenter: true,
        }
    }

    /// Input that replaces the view rectangle.
    #[must_use]
    pub const fn pan_to(bounds: GeoBounds) -> Self {
        Self {
            pan: Some(bounds),
            recenter: false,
        }
    }
}

/// Viewport system that tracks the map view and derives the visible window.
#[derive(Clone, Debug)]
pub struct Viewport {
    geometry: GridGeometry,
    span: ViewSpan,
    margin: u32,
    bounds: Option<GeoBounds>,
    last_window: Option<CellWindow>,
}

impl Viewport {
    /// Creates a viewport using the session's geometry, view span, and margin.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            geometry: config.geometry(),
            span: config.view_span,
            margin: config.window_margin,
            bounds: None,
            last_window: None,
        }
    }

    /// Current view rectangle, once the view has been positioned.
    #[must_use]
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    /// Window most recently requested from the world.
    #[must_use]
    pub fn window(&self) -> Option<CellWindow> {
        self.last_window
    }

    /// Consumes world events and adapter input to emit window commands.
    ///
    /// Player moves re-centre the view on the destination cell. An explicit pan
    /// takes precedence over every re-centre observed in the same call. Views
    /// touching more than [`MAX_WINDOW_CELLS`] cells are never requested.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: ViewportInput,
        player: CellId,
        out: &mut Vec<Command>,
    ) {
        let mut center_on = if input.recenter { Some(player) } else { None };
        for event in events {
            if let Event::PlayerMoved { to, .. } = event {
                center_on = Some(*to);
            }
        }

        if let Some(cell) = center_on {
            let center = self.geometry.center_of(cell);
            self.bounds = Some(GeoBounds::centered_on(
                center,
                self.span.latitude,
                self.span.longitude,
            ));
        }

        if let Some(bounds) = input.pan {
            self.bounds = Some(bounds);
        }

        let Some(bounds) = self.bounds else {
            return;
        };

        let window = self.geometry.window_for(bounds, self.margin);
        if self.last_window == Some(window) || window.cell_count() > MAX_WINDOW_CELLS {
            return;
        }

        self.last_window = Some(window);
        out.push(Command::UpdateWindow { window });
    }
}
