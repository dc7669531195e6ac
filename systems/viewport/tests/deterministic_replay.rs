use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use token_grid_core::{CellId, Command, Direction, Event, TokenValue};
use token_grid_system_viewport::{Viewport, ViewportInput};
use token_grid_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(scripted_steps());
    let second = replay(scripted_steps());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(
        first.fingerprint(),
        second.fingerprint(),
        "fingerprint mismatch"
    );
    assert!(!first.events.is_empty());
}

#[test]
fn every_move_keeps_the_player_inside_the_visible_window() {
    let mut world = World::new();
    let mut viewport = Viewport::new(query::config(&world));
    let mut log = Vec::new();
    process_viewport(&mut world, &mut viewport, Vec::new(), ViewportInput::recenter(), &mut log);

    for direction in [Direction::North, Direction::North, Direction::East, Direction::South] {
        let mut events = Vec::new();
        world::apply(&mut world, Command::MovePlayer { direction }, &mut events);
        process_viewport(&mut world, &mut viewport, events, ViewportInput::default(), &mut log);

        let player = query::player_position(&world);
        assert!(query::is_visible(&world, player));
        assert_eq!(query::visible_window(&world), viewport.window());
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Command(Command),
    View(ViewportInput),
    ClickNearby,
}

fn scripted_steps() -> Vec<Step> {
    let mut steps = vec![Step::View(ViewportInput::recenter()), Step::ClickNearby];
    for direction in [Direction::North, Direction::East, Direction::East, Direction::South] {
        steps.push(Step::Command(Command::MovePlayer { direction }));
        steps.push(Step::ClickNearby);
    }
    steps.push(Step::Command(Command::PlacePlayer {
        cell: CellId::new(369_990, -1_220_560),
    }));
    steps.push(Step::ClickNearby);
    steps.push(Step::View(ViewportInput::recenter()));
    steps
}

fn replay(steps: Vec<Step>) -> ReplayOutcome {
    let mut world = World::new();
    let mut viewport = Viewport::new(query::config(&world));
    let mut log = Vec::new();

    for step in steps {
        match step {
            Step::Command(command) => {
                let mut events = Vec::new();
                world::apply(&mut world, command, &mut events);
                process_viewport(
                    &mut world,
                    &mut viewport,
                    events,
                    ViewportInput::default(),
                    &mut log,
                );
            }
            Step::View(input) => {
                process_viewport(&mut world, &mut viewport, Vec::new(), input, &mut log);
            }
            Step::ClickNearby => {
                let player = query::player_position(&world);
                let nearby: Vec<CellId> = query::visible_cells(&world)
                    .filter(|cell| player.chebyshev_distance(*cell) <= 1)
                    .collect();
                for cell in nearby {
                    let mut events = Vec::new();
                    world::apply(&mut world, Command::ClickCell { cell }, &mut events);
                    log.extend(events);
                }
            }
        }
    }

    ReplayOutcome {
        player: query::player_position(&world),
        held: query::held_token(&world),
        stored: query::stored_cell_count(&world),
        events: log,
    }
}

fn process_viewport(
    world: &mut World,
    viewport: &mut Viewport,
    pending_events: Vec<Event>,
    input: ViewportInput,
    log: &mut Vec<Event>,
) {
    let mut events = pending_events;
    let mut input = Some(input);

    loop {
        log.extend(events.iter().copied());

        let mut commands = Vec::new();
        let player = query::player_position(world);
        viewport.handle(&events, input.take().unwrap_or_default(), player, &mut commands);

        if commands.is_empty() {
            break;
        }

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    player: CellId,
    held: Option<TokenValue>,
    stored: usize,
    events: Vec<Event>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
