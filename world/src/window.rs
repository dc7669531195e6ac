//! Visible window bookkeeping: which cells are materialized right now.

use std::collections::BTreeSet;

use token_grid_core::{CellId, CellWindow, Event, MAX_WINDOW_CELLS};
use token_grid_system_token_generation::TokenGenerator;

use crate::store::CellStore;

/// Set of materialized cells and the window that produced it.
#[derive(Debug, Default)]
pub(crate) struct VisibleWindow {
    window: Option<CellWindow>,
    cells: BTreeSet<CellId>,
}

impl VisibleWindow {
    pub(crate) fn window(&self) -> Option<CellWindow> {
        self.window
    }

    pub(crate) fn contains(&self, cell: CellId) -> bool {
        self.cells.contains(&cell)
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().copied()
    }

    /// Recomputes the visible set so it matches `window` exactly.
    ///
    /// New cells are materialized south to north, west to east; stale cells are
    /// evicted in ascending order afterwards. Repeating the same window emits
    /// nothing.
    pub(crate) fn update(
        &mut self,
        window: CellWindow,
        store: &mut CellStore,
        generator: &TokenGenerator,
        out_events: &mut Vec<Event>,
    ) {
        if self.window == Some(window) {
            return;
        }

        let cell_count = window.cell_count();
        if cell_count > MAX_WINDOW_CELLS {
            log::warn!(
                "ignoring window {window:?}: {cell_count} cells exceeds limit of {MAX_WINDOW_CELLS}"
            );
            return;
        }

        let mut materialized: u32 = 0;
        for cell in window.cells() {
            if !self.cells.insert(cell) {
                continue;
            }

            let record = store.materialize(cell, generator);
            record.labeled = record.value.is_some();
            out_events.push(Event::CellMaterialized {
                cell,
                value: record.value,
            });
            materialized += 1;
        }

        let mut stale = Vec::new();
        self.cells.retain(|cell| {
            let keep = window.contains(*cell);
            if !keep {
                stale.push(*cell);
            }
            keep
        });

        for &cell in &stale {
            let labeled = store.evict(cell);
            out_events.push(Event::CellEvicted { cell, labeled });
        }

        self.window = Some(window);

        let evicted = u32::try_from(stale.len()).unwrap_or(u32::MAX);
        if materialized > 0 || evicted > 0 {
            log::debug!(
                "window {window:?}: materialized {materialized}, evicted {evicted}, stored {}",
                store.len()
            );
            out_events.push(Event::WindowChanged {
                window,
                materialized,
                evicted,
            });
        }
    }
}
