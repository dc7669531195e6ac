use token_grid_core::{
    CellId, CellWindow, Command, Direction, Event, GameConfig, GeoPoint, StorePolicy, TokenValue,
};
use token_grid_system_token_generation::TokenGenerator;
use token_grid_world::{self as world, query, World};

fn scripted_generator() -> TokenGenerator {
    TokenGenerator::new(|seed: &str| match seed {
        "cell(2,1)" | "cell(1,1)" => 0.8,
        "cell(0,1)" => 0.93,
        _ => 0.05,
    })
}

fn origin_world(policy: StorePolicy) -> World {
    let config = GameConfig {
        start: GeoPoint::new(0.0, 0.0),
        store_policy: policy,
        ..GameConfig::default()
    };
    World::with_generator(config, scripted_generator()).expect("valid config")
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn click(world: &mut World, row: i32, column: i32) -> Vec<Event> {
    run(
        world,
        Command::ClickCell {
            cell: CellId::new(row, column),
        },
    )
}

#[test]
fn pickup_move_and_craft_scenario() {
    let mut world = origin_world(StorePolicy::Persistent);
    assert_eq!(query::player_position(&world), CellId::new(0, 0));
    let _ = run(
        &mut world,
        Command::UpdateWindow {
            window: CellWindow::around(CellId::new(0, 0), 5),
        },
    );

    let pickup = click(&mut world, 2, 1);
    assert_eq!(
        pickup.last(),
        Some(&Event::InventoryChanged {
            held: Some(TokenValue::ONE),
        })
    );
    assert_eq!(query::held_token(&world), Some(TokenValue::ONE));

    let moved = run(
        &mut world,
        Command::MovePlayer {
            direction: Direction::North,
        },
    );
    assert_eq!(
        moved,
        vec![Event::PlayerMoved {
            from: CellId::new(0, 0),
            to: CellId::new(1, 0),
        }]
    );
    assert!(query::in_interaction_range(&world, CellId::new(2, 1)));

    assert!(click(&mut world, 2, 1).is_empty(), "emptied cell is inert");
    assert!(click(&mut world, 0, 1).is_empty(), "a 2 never absorbs a held 1");
    assert_eq!(query::held_token(&world), Some(TokenValue::ONE));

    let craft = click(&mut world, 1, 1);
    assert_eq!(
        craft,
        vec![
            Event::TokenCrafted {
                cell: CellId::new(1, 1),
                value: TokenValue::TWO,
            },
            Event::InventoryChanged { held: None },
        ]
    );
    assert_eq!(
        query::cell(&world, CellId::new(1, 1)).map(|snapshot| snapshot.value),
        Some(Some(TokenValue::TWO))
    );
    assert_eq!(
        query::cell(&world, CellId::new(2, 1)).map(|snapshot| snapshot.value),
        Some(None)
    );
    assert_eq!(query::held_token(&world), None);
}

#[test]
fn climbing_the_chain_to_victory() {
    let mut world = origin_world(StorePolicy::Persistent);
    let _ = run(
        &mut world,
        Command::UpdateWindow {
            window: CellWindow::around(CellId::new(0, 0), 3),
        },
    );

    let _ = click(&mut world, 2, 1);
    let _ = click(&mut world, 1, 1);
    assert_eq!(
        query::cell(&world, CellId::new(1, 1)).and_then(|snapshot| snapshot.value),
        Some(TokenValue::TWO)
    );

    let _ = click(&mut world, 1, 1);
    let four = click(&mut world, 0, 1);
    assert!(four.contains(&Event::TokenCrafted {
        cell: CellId::new(0, 1),
        value: TokenValue::FOUR,
    }));
    assert!(!four.iter().any(|event| matches!(event, Event::Victory { .. })));
    assert!(!query::victory_achieved(&world));
}

#[test]
fn victory_is_signalled_for_every_qualifying_craft() {
    let config = GameConfig {
        start: GeoPoint::new(0.0, 0.0),
        victory_value: 2,
        ..GameConfig::default()
    };
    let mut world = World::with_generator(config, scripted_generator()).expect("valid config");
    let _ = run(
        &mut world,
        Command::UpdateWindow {
            window: CellWindow::around(CellId::new(0, 0), 3),
        },
    );

    let _ = click(&mut world, 2, 1);
    let first = click(&mut world, 1, 1);
    assert_eq!(
        first
            .iter()
            .filter(|event| matches!(event, Event::Victory { .. }))
            .count(),
        1
    );

    let _ = click(&mut world, 1, 1);
    let second = click(&mut world, 0, 1);
    assert_eq!(
        second.last(),
        Some(&Event::Victory {
            value: TokenValue::FOUR,
        })
    );
    assert_eq!(query::victory_count(&world), 2);
}

#[test]
fn memoryless_policy_discards_progress_on_eviction() {
    let mut world = origin_world(StorePolicy::Memoryless);
    let home = CellWindow::around(CellId::new(0, 0), 3);
    let _ = run(&mut world, Command::UpdateWindow { window: home });
    let _ = click(&mut world, 2, 1);
    let _ = click(&mut world, 1, 1);

    let _ = run(
        &mut world,
        Command::UpdateWindow {
            window: CellWindow::new(-10, -12, -10, -12),
        },
    );
    assert_eq!(query::stored_cell_count(&world), 9);

    let _ = run(&mut world, Command::UpdateWindow { window: home });
    assert_eq!(
        query::cell(&world, CellId::new(1, 1)).and_then(|snapshot| snapshot.value),
        Some(TokenValue::ONE)
    );
    assert_eq!(
        query::cell(&world, CellId::new(2, 1)).and_then(|snapshot| snapshot.value),
        Some(TokenValue::ONE)
    );
    assert_eq!(query::held_token(&world), None);
    assert_eq!(query::store_policy(&world), StorePolicy::Memoryless);
}
