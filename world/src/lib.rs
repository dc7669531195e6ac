#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Token Grid.
//!
//! A [`World`] owns everything a single game session mutates: the cell store,
//! the visible window, and the player. Adapters and systems never touch that
//! state directly; they submit [`Command`] values to [`apply`] and read it back
//! through the [`query`] module.

mod store;
mod window;

use token_grid_core::{
    CellId, Command, ConfigError, Event, GameConfig, TokenValue,
};
use token_grid_system_token_generation::TokenGenerator;

use crate::{store::CellStore, window::VisibleWindow};

#[derive(Clone, Copy, Debug)]
struct Player {
    position: CellId,
    held: Option<TokenValue>,
}

/// Represents the authoritative state of one Token Grid session.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    generator: TokenGenerator,
    store: CellStore,
    visible: VisibleWindow,
    player: Player,
    victories: u32,
}

impl World {
    /// Creates a session using the default configuration and hash.
    #[must_use]
    pub fn new() -> Self {
        let config = GameConfig::default();
        Self::assemble(config, TokenGenerator::default())
    }

    /// Creates a session from a validated configuration using the default hash.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, TokenGenerator::default())
    }

    /// Creates a session from a validated configuration and a custom generator.
    pub fn with_generator(
        config: GameConfig,
        generator: TokenGenerator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, generator))
    }

    fn assemble(config: GameConfig, generator: TokenGenerator) -> Self {
        Self {
            store: CellStore::new(config.store_policy),
            visible: VisibleWindow::default(),
            player: Player {
                position: config.start_cell(),
                held: None,
            },
            victories: 0,
            generator,
            config,
        }
    }

    fn relocate_player(&mut self, to: CellId, out_events: &mut Vec<Event>) {
        let from = self.player.position;
        if from == to {
            return;
        }

        self.player.position = to;
        log::debug!("player moved from {from} to {to}");
        out_events.push(Event::PlayerMoved { from, to });
    }

    fn click(&mut self, cell: CellId, out_events: &mut Vec<Event>) {
        if !self.visible.contains(cell) {
            log::trace!("ignoring click on untracked cell {cell}");
            return;
        }

        let distance = cell.chebyshev_distance(self.player.position);
        if distance > self.config.interaction_radius {
            log::trace!("ignoring click on {cell}: distance {distance} exceeds radius");
            return;
        }

        let Some(record) = self.store.get_mut(cell) else {
            log::warn!("visible cell {cell} has no stored record");
            return;
        };

        match (self.player.held, record.value) {
            (None, Some(value)) => {
                record.value = None;
                record.labeled = false;
                self.player.held = Some(value);
                log::info!("picked up {value} from {cell}");
                out_events.push(Event::TokenPickedUp { cell, value });
                out_events.push(Event::InventoryChanged { held: Some(value) });
            }
            (Some(held), Some(value)) if held == value => {
                let Some(crafted) = held.doubled() else {
                    log::trace!("ignoring craft on {cell}: {held} cannot double");
                    return;
                };

                record.value = Some(crafted);
                record.labeled = true;
                self.player.held = None;
                log::info!("crafted {crafted} on {cell}");
                out_events.push(Event::TokenCrafted {
                    cell,
                    value: crafted,
                });
                out_events.push(Event::InventoryChanged { held: None });

                if crafted.get() >= self.config.victory_value {
                    self.victories = self.victories.saturating_add(1);
                    log::info!("victory with {crafted}");
                    out_events.push(Event::Victory { value: crafted });
                }
            }
            (held, value) => {
                log::trace!("no rule matches click on {cell}: held {held:?}, cell {value:?}");
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::UpdateWindow { window } => {
            world
                .visible
                .update(window, &mut world.store, &world.generator, out_events);
        }
        Command::MovePlayer { direction } => {
            if let Some(to) = world.player.position.step(direction) {
                world.relocate_player(to, out_events);
            }
        }
        Command::PlacePlayer { cell } => {
            world.relocate_player(cell, out_events);
        }
        Command::ClickCell { cell } => {
            world.click(cell, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use token_grid_core::{
        CellId, CellWindow, GameConfig, GridGeometry, StorePolicy, TokenValue,
    };

    use super::World;

    /// Configuration the session was started with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Grid geometry shared with the rendering side.
    #[must_use]
    pub fn geometry(world: &World) -> GridGeometry {
        world.config.geometry()
    }

    /// Eviction policy applied by the cell store.
    #[must_use]
    pub fn store_policy(world: &World) -> StorePolicy {
        world.store.policy()
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player_position(world: &World) -> CellId {
        world.player.position
    }

    /// Token held in the player's single inventory slot.
    #[must_use]
    pub fn held_token(world: &World) -> Option<TokenValue> {
        world.player.held
    }

    /// Window most recently materialized, if any.
    #[must_use]
    pub fn visible_window(world: &World) -> Option<CellWindow> {
        world.visible.window()
    }

    /// Iterates the visible cells in ascending order.
    pub fn visible_cells(world: &World) -> impl Iterator<Item = CellId> + '_ {
        world.visible.cells()
    }

    /// Reports whether `cell` is currently materialized.
    #[must_use]
    pub fn is_visible(world: &World, cell: CellId) -> bool {
        world.visible.contains(cell)
    }

    /// Reports whether `cell` lies within the interaction radius of the player.
    #[must_use]
    pub fn in_interaction_range(world: &World, cell: CellId) -> bool {
        cell.chebyshev_distance(world.player.position) <= world.config.interaction_radius
    }

    /// Captures the stored state of `cell`, if the store tracks it.
    #[must_use]
    pub fn cell(world: &World, cell: CellId) -> Option<CellSnapshot> {
        world.store.get(cell).map(|record| CellSnapshot {
            cell,
            value: record.value,
            visible: world.visible.contains(cell),
            labeled: record.labeled,
        })
    }

    /// Number of cell records the store currently holds.
    #[must_use]
    pub fn stored_cell_count(world: &World) -> usize {
        world.store.len()
    }

    /// Number of crafts that reached the victory threshold.
    #[must_use]
    pub fn victory_count(world: &World) -> u32 {
        world.victories
    }

    /// Reports whether any craft reached the victory threshold.
    #[must_use]
    pub fn victory_achieved(world: &World) -> bool {
        world.victories > 0
    }

    /// Immutable representation of a stored cell used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CellSnapshot {
        /// Identifier of the cell.
        pub cell: CellId,
        /// Token currently stored in the cell.
        pub value: Option<TokenValue>,
        /// Whether the cell is part of the visible window.
        pub visible: bool,
        /// Whether the rendering side shows a label for the cell.
        pub labeled: bool,
    }
}
