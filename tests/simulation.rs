mod common;

use common::{energy, player_at, set_energy, TestWorld};
use godcell_lib::headless;
use godcell_lib::model::data::{EntropySerpent, EvolutionStage, Position, SerpentState};
use godcell_lib::model::{GameConfig, Tag};

#[test]
fn nutrient_goes_to_exactly_one_toucher() {
    let mut sim = TestWorld::new().sim();
    let a = player_at(&mut sim.world, "a", EvolutionStage::SingleCell, 2000.0, 1500.0);
    let b = player_at(&mut sim.world, "b", EvolutionStage::SingleCell, 2020.0, 1500.0);
    set_energy(&sim.world, a, 50.0);
    set_energy(&sim.world, b, 50.0);
    sim.world.spawn_nutrient(Position::new(2010.0, 1500.0), 1.0);

    sim.tick();

    assert_event_count!(sim.log, "nutrientCollected", 1);
    assert_eq!(sim.world.count_tag(Tag::Nutrient), 0);
    let gained = [a, b]
        .iter()
        .filter(|&&p| energy(&sim.world, p).current > 50.0)
        .count();
    assert_eq!(gained, 1);
    assert_eq!(sim.world.respawns.len(), 1);
}

#[test]
fn lone_serpent_patrols_inside_the_jungle() {
    let mut sim = TestWorld::new().sim();
    let serpent = sim.world.spawn_serpent(Position::new(300.0, 300.0));
    let bounds = sim.world.config.world.jungle_bounds();

    for _ in 0..600 {
        sim.tick();
        let s = sim.world.read::<EntropySerpent>(serpent).expect("serpent");
        assert_eq!(s.state, SerpentState::Patrol);
        let pos = sim.world.read::<Position>(serpent).expect("position");
        assert!(bounds.contains(&pos), "serpent left the map at {pos:?}");
    }
    assert_event_count!(sim.log, "entropySerpentAttack", 0);
}

#[test]
fn positions_broadcast_every_tick() {
    let mut sim = TestWorld::new().seeded().sim();
    sim.ticks(30);
    assert_event_count!(sim.log, "positionsUpdate", 30);
    let interval = sim.world.config.network.energy_update_interval as usize;
    assert!(sim.log.count("energyUpdate") >= 30 / interval);
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut config = GameConfig::default();
    config.world.seed = Some(99);

    let first = headless::run(config.clone(), 600, true).expect("first run");
    let second = headless::run(config, 600, true).expect("second run");

    assert_eq!(first.ticks, 600);
    assert_eq!(
        serde_json::to_value(&first).expect("serializes"),
        serde_json::to_value(&second).expect("serializes")
    );
}

#[test]
fn headless_run_populates_and_keeps_bots_alive() {
    let mut config = GameConfig::default();
    config.world.seed = Some(3);
    let bots = config.bots.soup_bots + config.bots.jungle_bots;

    let summary = headless::run(config, 1200, true).expect("run");

    assert_eq!(summary.players, bots);
    assert!(summary.entities > bots);
    assert!((summary.sim_ms - 20_000.0).abs() < 1e-3);
    assert_eq!(summary.events.get("positionsUpdate"), Some(&1200));
}

#[test]
fn empty_world_runs_without_content() {
    let summary = headless::run(GameConfig::default(), 60, false).expect("run");
    assert_eq!(summary.entities, 0);
    assert_eq!(summary.players, 0);
    assert_eq!(summary.deaths, 0);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GameConfig::default();
    config.world.tick_rate = 0;
    assert!(headless::run(config, 10, false).is_err());
}
