mod common;

use common::{bot_at, energy, player_at, set_energy, specialize, TestWorld};
use godcell_lib::model::abilities::place_trap;
use godcell_lib::model::data::{
    CombatSpecialization, Energy, EvolutionStage, Position, Specialization, Stage,
};
use godcell_lib::model::metrics;
use godcell_lib::model::net::{ClientIntent, EventLog, GameEvent};
use godcell_lib::model::players::leave_player;
use godcell_lib::model::Tag;

#[test]
fn starved_player_dies_exactly_once() {
    let mut sim = TestWorld::new().sim();
    let p = player_at(&mut sim.world, "p", EvolutionStage::SingleCell, 2000.0, 1500.0);
    set_energy(&sim.world, p, 0.01);

    sim.ticks(120);

    assert_event_count!(sim.log, "playerDied", 1);
    assert!(energy(&sim.world, p).is_processed());
    assert_eq!(sim.world.metrics.counter(metrics::DEATHS), 1);
    // Humans wait for an explicit respawn.
    assert_event_count!(sim.log, "playerRespawned", 0);
}

#[test]
fn zero_energy_without_a_source_is_not_a_death() {
    let mut sim = TestWorld::new().sim();
    let p = player_at(&mut sim.world, "p", EvolutionStage::SingleCell, 2000.0, 1500.0);
    set_energy(&sim.world, p, 0.0);

    sim.ticks(10);
    assert_event_count!(sim.log, "playerDied", 0);
}

#[test]
fn respawn_intent_revives_a_dead_player() {
    let mut sim = TestWorld::new().sim();
    let p = player_at(&mut sim.world, "p", EvolutionStage::MultiCell, 2000.0, 1500.0);
    set_energy(&sim.world, p, 0.01);
    sim.ticks(2);
    assert!(energy(&sim.world, p).is_processed());

    sim.world.intents.push_back(("p".into(), ClientIntent::Respawn));
    sim.tick();

    assert_event_count!(sim.log, "playerRespawned", 1);
    let e = energy(&sim.world, p);
    assert!(e.is_alive());
    assert_eq!(
        sim.world.read::<Stage>(p).map(|s| s.stage),
        Some(EvolutionStage::SingleCell)
    );
}

#[test]
fn bots_respawn_after_delay() {
    let mut sim = TestWorld::new().sim();
    let b = bot_at(&mut sim.world, "bot-a", EvolutionStage::SingleCell, 2000.0, 1500.0);
    set_energy(&sim.world, b, 0.01);
    sim.ticks(2);
    assert_event_count!(sim.log, "playerDied", 1);

    sim.advance_ms(sim.world.config.bots.respawn_delay_ms - 100.0);
    assert_event_count!(sim.log, "playerRespawned", 0);
    sim.advance_ms(200.0);
    assert_event_count!(sim.log, "playerRespawned", 1);
    assert!(energy(&sim.world, b).is_alive());
}

#[test]
fn evolution_shields_then_promotes() {
    let mut sim = TestWorld::new().sim();
    let p = player_at(&mut sim.world, "p", EvolutionStage::SingleCell, 2000.0, 1500.0);
    let threshold = sim
        .world
        .config
        .stages
        .single_cell
        .evolution_threshold
        .unwrap_or(250.0);
    sim.world.with_mut::<Energy, _>(p, |e| *e = Energy::full(threshold));

    sim.tick();
    assert_event_count!(sim.log, "playerEvolutionStarted", 1);
    assert!(!sim.world.is_targetable(p));

    sim.advance_ms(sim.world.config.evolution.duration_ms + 50.0);
    assert_event_count!(sim.log, "playerEvolved", 1);
    let stage = sim.world.read::<Stage>(p).expect("stage");
    assert_eq!(stage.stage, EvolutionStage::MultiCell);
    assert_eq!(stage.radius, sim.world.config.stages.multi_cell.radius);
    assert!(!stage.is_evolving);
    assert_eq!(sim.world.metrics.counter(metrics::EVOLUTIONS), 1);
}

#[test]
fn cyber_organism_gets_prompt_then_a_specialization() {
    let mut sim = TestWorld::new().sim();
    let p = player_at(&mut sim.world, "p", EvolutionStage::MultiCell, 2000.0, 1500.0);
    let threshold = sim
        .world
        .config
        .stages
        .multi_cell
        .evolution_threshold
        .unwrap_or(1000.0);
    sim.world.with_mut::<Energy, _>(p, |e| *e = Energy::full(threshold));

    sim.advance_ms(sim.world.config.evolution.duration_ms + 50.0);
    let prompts = sim.log.sent_to("p");
    assert!(prompts
        .iter()
        .any(|e| matches!(e, GameEvent::SpecializationPrompt(_))));
    assert_event_count!(sim.log, "specializationSelected", 0);

    sim.advance_ms(sim.world.config.evolution.specialization_timeout_ms + 50.0);
    assert_event_count!(sim.log, "specializationSelected", 1);
}

#[test]
fn chosen_specialization_is_final() {
    let mut sim = TestWorld::new().sim();
    let p = player_at(&mut sim.world, "p", EvolutionStage::CyberOrganism, 800.0, 800.0);

    let pick = |spec| ("p".to_string(), ClientIntent::SelectSpecialization { specialization: spec });
    sim.world.intents.push_back(pick(Specialization::Melee));
    sim.world.intents.push_back(pick(Specialization::Ranged));
    sim.tick();

    assert_event_count!(sim.log, "specializationSelected", 1);
    assert_eq!(
        sim.world
            .read::<CombatSpecialization>(p)
            .and_then(|c| c.specialization),
        Some(Specialization::Melee)
    );
}

#[test]
fn leaving_removes_player_and_its_traps() {
    let mut world = TestWorld::new().build();
    let owner = player_at(&mut world, "t", EvolutionStage::CyberOrganism, 1200.0, 800.0);
    specialize(&world, owner, Specialization::Traps);
    let mut log = EventLog::new();
    assert!(place_trap(&mut world, &mut log, owner));

    assert!(leave_player(&mut world, &mut log, "t"));
    assert_gone!(world, owner);
    assert_eq!(world.count_tag(Tag::Trap), 0);
    assert_eq!(world.entity_by_socket("t"), None);
    assert_event_count!(log, "playerLeft", 1);
}

#[test]
fn destroy_is_idempotent_and_ids_stop_resolving() {
    let mut world = TestWorld::new().build();
    let nutrient = world.spawn_nutrient(Position::new(2000.0, 1500.0), 1.0);
    let id = world.id_of(nutrient).map(str::to_string).expect("string id");

    assert_eq!(world.entity_by_id(&id), Some(nutrient));
    assert!(world.destroy_entity(nutrient));
    assert!(!world.destroy_entity(nutrient));
    assert_eq!(world.entity_by_id(&id), None);
    assert_eq!(world.read::<Position>(nutrient), None);
    assert_eq!(world.count_tag(Tag::Nutrient), 0);
}
