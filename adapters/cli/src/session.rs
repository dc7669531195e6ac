//! Drives the world, the viewport system, and the text canvas as one session.

use anyhow::{Context, Result};
use token_grid_core::{Command, Event, GameConfig};
use token_grid_rendering::{Presenter, TextCanvas};
use token_grid_system_viewport::{Viewport, ViewportInput};
use token_grid_world::{self as world, query, World};

use crate::input::PlayerInput;

/// Interactive game session rendered onto a [`TextCanvas`].
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    viewport: Viewport,
    presenter: Presenter,
    canvas: TextCanvas,
}

impl Session {
    /// Starts a session and draws the initial window around the player.
    pub(crate) fn new(config: GameConfig) -> Result<Self> {
        let world = World::with_config(config).context("invalid game configuration")?;
        Ok(Self::from_world(world))
    }

    fn from_world(world: World) -> Self {
        let mut session = Self {
            viewport: Viewport::new(query::config(&world)),
            presenter: Presenter::new(query::geometry(&world)),
            canvas: TextCanvas::new(),
            world,
        };

        let player = query::player_position(&session.world);
        log::info!(
            "session started at {player} with {} store",
            query::store_policy(&session.world)
        );
        session.presenter.recenter(player, &mut session.canvas);
        session.view(ViewportInput::recenter());
        session
    }

    /// Applies a single player instruction. `Quit` is left to the caller.
    pub(crate) fn handle(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::Move(direction) => self.submit(Command::MovePlayer { direction }),
            PlayerInput::Click(cell) => self.submit(Command::ClickCell { cell }),
            PlayerInput::Tap { rows, columns } => {
                let player = query::player_position(&self.world);
                match player.offset(rows, columns) {
                    Some(cell) => self.submit(Command::ClickCell { cell }),
                    None => log::trace!("tap ({rows}, {columns}) from {player} leaves the grid"),
                }
            }
            PlayerInput::Pan {
                latitude,
                longitude,
            } => {
                if let Some(bounds) = self.viewport.bounds() {
                    self.view(ViewportInput::pan_to(bounds.translated(latitude, longitude)));
                }
            }
            PlayerInput::Center => self.view(ViewportInput::recenter()),
            PlayerInput::Look | PlayerInput::Quit => {}
        }
    }

    /// Map of the visible window followed by the inventory and victory lines.
    pub(crate) fn frame(&self) -> String {
        let radius = query::config(&self.world).interaction_radius;
        let mut frame = self.canvas.render(radius);
        frame.push_str(&self.canvas.inventory_line());
        frame.push('\n');
        if self.canvas.victory_value().is_some() {
            frame.push_str("Victory!\n");
        }
        frame
    }

    fn submit(&mut self, command: Command) {
        self.drain(vec![command], ViewportInput::default());
    }

    fn view(&mut self, input: ViewportInput) {
        self.drain(Vec::new(), input);
    }

    // Runs commands through the world until the viewport stops requesting windows.
    fn drain(&mut self, mut commands: Vec<Command>, input: ViewportInput) {
        let mut input = Some(input);
        loop {
            let mut events: Vec<Event> = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.presenter.present(&events, &mut self.canvas);

            let player = query::player_position(&self.world);
            self.viewport.handle(
                &events,
                input.take().unwrap_or_default(),
                player,
                &mut commands,
            );
            if commands.is_empty() {
                break;
            }
        }
    }
}
