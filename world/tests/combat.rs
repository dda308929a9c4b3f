use gridlock_core::{
    Blocker, CellCoord, Command, Direction, EffectKind, Event, RoundOutcome, Shooter,
};
use gridlock_world::{self as world, query, scaffolding, World, WorldConfig};

fn arena() -> World {
    let mut world = World::with_config(WorldConfig {
        columns: 5,
        rows: 5,
        player_start: CellCoord::new(0, 2),
        ..WorldConfig::default()
    });
    world::apply(&mut world, Command::BeginRound, &mut Vec::new());
    world
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn effect_kinds_at(world: &World, cell: CellCoord) -> Vec<EffectKind> {
    query::effect_view(world)
        .into_vec()
        .into_iter()
        .filter(|effect| effect.cell == cell)
        .map(|effect| effect.kind)
        .collect()
}

#[test]
fn ray_destroys_only_the_nearest_obstacle() {
    let mut world = arena();
    scaffolding::place_wall(&mut world, CellCoord::new(2, 2));
    let survivor = scaffolding::place_hostile(&mut world, CellCoord::new(4, 2));

    let events = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );

    assert!(events.contains(&Event::WallDestroyed {
        cell: CellCoord::new(2, 2)
    }));
    assert_eq!(query::remaining_hostiles(&world), 1);
    assert_eq!(
        query::occupancy_view(&world).blocker(CellCoord::new(4, 2)),
        Some(Blocker::Hostile(survivor))
    );
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(1, 2)),
        vec![EffectKind::LaserBeam]
    );
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(2, 2)),
        vec![EffectKind::AshPuff]
    );
    assert!(effect_kinds_at(&world, CellCoord::new(3, 2)).is_empty());
}

#[test]
fn open_row_shot_eliminates_the_hostile() {
    let mut world = arena();
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(4, 2));

    let events = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );

    assert!(events.contains(&Event::ShotFired {
        shooter: Shooter::Player,
        origin: CellCoord::new(0, 2),
        direction: Direction::East,
    }));
    assert!(events.contains(&Event::HostileDestroyed {
        hostile,
        cell: CellCoord::new(4, 2),
    }));
    assert!(events.contains(&Event::RoundEnded {
        outcome: RoundOutcome::Victory,
    }));
    assert_eq!(query::remaining_hostiles(&world), 0);
    assert_eq!(query::player(&world).score, 1);
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(4, 2)),
        vec![EffectKind::AshPuff]
    );
    for column in 1..4 {
        assert_eq!(
            effect_kinds_at(&world, CellCoord::new(column, 2)),
            vec![EffectKind::LaserBeam]
        );
    }
}

#[test]
fn whiffed_shot_leaves_only_beams() {
    let mut world = arena();
    let _ = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));

    let events = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::North,
        },
    );

    assert_eq!(events.len(), 1, "only the shot announcement: {events:?}");
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(0, 1)),
        vec![EffectKind::LaserBeam]
    );
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(0, 0)),
        vec![EffectKind::LaserBeam]
    );
}

#[test]
fn detonation_scorches_center_and_adjacent_wall() {
    let mut world = arena();
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 2));
    scaffolding::place_wall(&mut world, CellCoord::new(2, 1));
    let _ = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));

    let events = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );

    assert!(events.contains(&Event::ExplosiveDetonated {
        cell: CellCoord::new(2, 2)
    }));
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(2, 2)),
        vec![EffectKind::ExplosionAsh]
    );
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(2, 1)),
        vec![EffectKind::ExplosionAsh]
    );
    assert_eq!(query::occupancy_view(&world).blocker(CellCoord::new(2, 1)), None);
    assert!(query::player(&world).alive);
    assert!(query::is_round_active(&world));
}

#[test]
fn explosion_never_reaches_beyond_the_neighborhood() {
    let mut world = arena();
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 2));
    scaffolding::place_wall(&mut world, CellCoord::new(4, 2));
    let survivor = scaffolding::place_hostile(&mut world, CellCoord::new(0, 4));

    let _ = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );

    assert_eq!(
        query::occupancy_view(&world).blocker(CellCoord::new(4, 2)),
        Some(Blocker::Wall)
    );
    assert_eq!(
        query::occupancy_view(&world).blocker(CellCoord::new(0, 4)),
        Some(Blocker::Hostile(survivor))
    );
    assert!(effect_kinds_at(&world, CellCoord::new(4, 2)).is_empty());
    assert!(effect_kinds_at(&world, CellCoord::new(0, 4)).is_empty());
}

#[test]
fn two_explosive_chain_consumes_both_charges() {
    let mut world = arena();
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 2));
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 1));
    let _ = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));

    let events = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );

    let detonations = events
        .iter()
        .filter(|event| matches!(event, Event::ExplosiveDetonated { .. }))
        .count();
    assert_eq!(detonations, 2);
    assert_eq!(query::occupancy_view(&world).blocker(CellCoord::new(2, 2)), None);
    assert_eq!(query::occupancy_view(&world).blocker(CellCoord::new(2, 1)), None);
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(2, 1)),
        vec![EffectKind::ExplosionAsh]
    );
}

#[test]
fn three_explosive_chain_terminates() {
    let mut world = arena();
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 2));
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 1));
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 0));
    let _ = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));

    let events = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );

    let detonations = events
        .iter()
        .filter(|event| matches!(event, Event::ExplosiveDetonated { .. }))
        .count();
    assert_eq!(detonations, 3);
    for row in 0..3 {
        assert_eq!(
            query::occupancy_view(&world).blocker(CellCoord::new(2, row)),
            None
        );
        assert!(effect_kinds_at(&world, CellCoord::new(2, row))
            .contains(&EffectKind::ExplosionAsh));
    }
}

#[test]
fn explosion_kills_player_inside_the_blast_radius() {
    let mut world = arena();
    scaffolding::place_explosive(&mut world, CellCoord::new(1, 2));
    let _ = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));

    let events = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );

    assert!(events.contains(&Event::RoundEnded {
        outcome: RoundOutcome::PlayerKilled,
    }));
    assert!(!query::player(&world).alive);
    assert!(!query::is_round_active(&world));
}

#[test]
fn hostile_ray_reaches_the_player_before_the_grid() {
    let mut world = arena();
    scaffolding::set_player_cell(&mut world, CellCoord::new(2, 2));
    scaffolding::place_wall(&mut world, CellCoord::new(1, 2));
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(4, 2));

    let events = apply(
        &mut world,
        Command::HostileFire {
            hostile,
            direction: Direction::West,
        },
    );

    assert!(events.contains(&Event::RoundEnded {
        outcome: RoundOutcome::PlayerKilled,
    }));
    // The wall behind the player was never reached.
    assert_eq!(
        query::occupancy_view(&world).blocker(CellCoord::new(1, 2)),
        Some(Blocker::Wall)
    );
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(2, 2)),
        vec![EffectKind::EnemyAshPuff]
    );
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(3, 2)),
        vec![EffectKind::EnemyLaserBeam]
    );
}

#[test]
fn wall_shields_the_player_from_a_hostile_ray() {
    let mut world = arena();
    scaffolding::set_player_cell(&mut world, CellCoord::new(2, 2));
    scaffolding::place_wall(&mut world, CellCoord::new(3, 2));
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(4, 2));

    let events = apply(
        &mut world,
        Command::HostileFire {
            hostile,
            direction: Direction::West,
        },
    );

    assert!(events.contains(&Event::WallDestroyed {
        cell: CellCoord::new(3, 2)
    }));
    assert!(query::player(&world).alive);
    assert!(query::is_round_active(&world));
}

#[test]
fn friendly_fire_removes_the_struck_hostile_without_score() {
    let mut world = arena();
    scaffolding::set_player_cell(&mut world, CellCoord::new(0, 0));
    let shooter = scaffolding::place_hostile(&mut world, CellCoord::new(4, 2));
    let victim = scaffolding::place_hostile(&mut world, CellCoord::new(2, 2));

    let events = apply(
        &mut world,
        Command::HostileFire {
            hostile: shooter,
            direction: Direction::West,
        },
    );

    assert!(events.contains(&Event::HostileDestroyed {
        hostile: victim,
        cell: CellCoord::new(2, 2),
    }));
    assert_eq!(query::remaining_hostiles(&world), 1);
    assert_eq!(query::player(&world).score, 0);
}

#[test]
fn stale_hostile_commands_are_ignored() {
    let mut world = arena();
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(4, 2));
    let _ = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));
    let _ = apply(
        &mut world,
        Command::PlayerFire {
            direction: Direction::East,
        },
    );
    assert_eq!(query::remaining_hostiles(&world), 1);

    let step_events = apply(
        &mut world,
        Command::StepHostile {
            hostile,
            toward: Direction::West,
            fallback: None,
        },
    );
    let fire_events = apply(
        &mut world,
        Command::HostileFire {
            hostile,
            direction: Direction::West,
        },
    );

    assert!(step_events.is_empty());
    assert!(fire_events.is_empty());
}

#[test]
fn hostile_step_uses_the_fallback_axis_when_blocked() {
    let mut world = arena();
    scaffolding::set_player_cell(&mut world, CellCoord::new(0, 0));
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(2, 2));
    scaffolding::place_wall(&mut world, CellCoord::new(2, 1));

    let events = apply(
        &mut world,
        Command::StepHostile {
            hostile,
            toward: Direction::North,
            fallback: Some(Direction::West),
        },
    );

    assert_eq!(
        events,
        vec![Event::HostileStepped {
            hostile,
            from: CellCoord::new(2, 2),
            to: CellCoord::new(1, 2),
            facing: Direction::West,
        }]
    );
    assert_eq!(
        query::occupancy_view(&world).blocker(CellCoord::new(1, 2)),
        Some(Blocker::Hostile(hostile))
    );
    assert_eq!(query::occupancy_view(&world).blocker(CellCoord::new(2, 2)), None);
}

#[test]
fn hostile_entering_the_player_cell_ends_the_round() {
    let mut world = arena();
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(1, 2));

    let events = apply(
        &mut world,
        Command::StepHostile {
            hostile,
            toward: Direction::West,
            fallback: None,
        },
    );

    assert!(events.contains(&Event::RoundEnded {
        outcome: RoundOutcome::PlayerKilled,
    }));
    assert!(!query::player(&world).alive);
}

#[test]
fn breach_clears_a_wall_and_leaves_enemy_ash() {
    let mut world = arena();
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));
    scaffolding::place_wall(&mut world, CellCoord::new(2, 2));

    let events = apply(
        &mut world,
        Command::BreachCell {
            hostile,
            cell: CellCoord::new(2, 2),
        },
    );

    assert!(events.contains(&Event::CellBreached {
        hostile,
        cell: CellCoord::new(2, 2),
    }));
    assert_eq!(query::occupancy_view(&world).blocker(CellCoord::new(2, 2)), None);
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(2, 2)),
        vec![EffectKind::EnemyAshPuff]
    );
}

#[test]
fn breach_on_an_explosive_detonates_it() {
    let mut world = arena();
    scaffolding::set_player_cell(&mut world, CellCoord::new(4, 0));
    let hostile = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));
    scaffolding::place_explosive(&mut world, CellCoord::new(2, 2));

    let events = apply(
        &mut world,
        Command::BreachCell {
            hostile,
            cell: CellCoord::new(2, 2),
        },
    );

    assert!(events.contains(&Event::ExplosiveDetonated {
        cell: CellCoord::new(2, 2)
    }));
    assert!(events.contains(&Event::CellBreached {
        hostile,
        cell: CellCoord::new(2, 2),
    }));
    assert_eq!(
        effect_kinds_at(&world, CellCoord::new(2, 2)),
        vec![EffectKind::ExplosionAsh]
    );
}

#[test]
fn breach_can_destroy_another_hostile() {
    let mut world = arena();
    scaffolding::set_player_cell(&mut world, CellCoord::new(4, 0));
    let striker = scaffolding::place_hostile(&mut world, CellCoord::new(4, 4));
    let victim = scaffolding::place_hostile(&mut world, CellCoord::new(2, 2));

    let events = apply(
        &mut world,
        Command::BreachCell {
            hostile: striker,
            cell: CellCoord::new(2, 2),
        },
    );

    assert!(events.contains(&Event::HostileDestroyed {
        hostile: victim,
        cell: CellCoord::new(2, 2),
    }));
    assert_eq!(query::remaining_hostiles(&world), 1);
    assert_eq!(query::player(&world).score, 0);
}
