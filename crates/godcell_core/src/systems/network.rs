//! Outbound state sync: positions every tick, energy and chemical sensing
//! on throttled intervals.

use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{Bot, Energy, EvolutionStage, Position, Stage};
use godcell_net::{
    Broadcaster, DetectedEntity, DetectedKind, DetectionUpdate, EnergyUpdate, EntityPosition,
    GameEvent, PositionsUpdate,
};
use hecs::Entity;

const MOVING: [Tag; 7] = [
    Tag::Player,
    Tag::Swarm,
    Tag::CyberBug,
    Tag::JungleCreature,
    Tag::EntropySerpent,
    Tag::Projectile,
    Tag::Pseudopod,
];

const SENSED: [(Tag, DetectedKind); 6] = [
    (Tag::Player, DetectedKind::Player),
    (Tag::Nutrient, DetectedKind::Nutrient),
    (Tag::Swarm, DetectedKind::Swarm),
    (Tag::CyberBug, DetectedKind::CyberBug),
    (Tag::JungleCreature, DetectedKind::JungleCreature),
    (Tag::EntropySerpent, DetectedKind::EntropySerpent),
];

#[derive(Debug, Default)]
pub struct NetworkBroadcastSystem;

fn living(world: &World, entity: Entity) -> bool {
    world.read::<Energy>(entity).map_or(true, |e| e.is_alive())
}

fn every(tick: u64, interval: u64) -> bool {
    tick % interval.max(1) == 0
}

impl System for NetworkBroadcastSystem {
    fn name(&self) -> &'static str {
        "network_broadcast"
    }

    fn priority(&self) -> u32 {
        priority::NETWORK
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let net = world.config.network.clone();

        let mut entities = Vec::new();
        for tag in MOVING {
            world.for_each_with_tag(tag, |e| {
                if !living(world, e) {
                    return;
                }
                if let Some(position) = world.read::<Position>(e) {
                    entities.push(EntityPosition {
                        id: world.label(e),
                        position,
                    });
                }
            });
        }
        broadcaster.broadcast(GameEvent::PositionsUpdate(PositionsUpdate {
            tick: ctx.tick,
            entities,
        }));

        if every(ctx.tick, net.energy_update_interval) {
            for player in world.tagged(Tag::Player) {
                let Some(energy) = world.read::<Energy>(player).filter(Energy::is_alive) else {
                    continue;
                };
                broadcaster.broadcast(GameEvent::EnergyUpdate(EnergyUpdate {
                    player_id: world.label(player),
                    energy: energy.current,
                    max_energy: energy.max,
                }));
            }
        }

        if every(ctx.tick, net.detection_interval) {
            for player in world.tagged(Tag::Player) {
                let sensing = !world.has::<Bot>(player)
                    && living(world, player)
                    && world
                        .read::<Stage>(player)
                        .is_some_and(|s| s.stage >= EvolutionStage::MultiCell);
                let (true, Some(origin), Some(socket)) = (
                    sensing,
                    world.read::<Position>(player),
                    world.socket_of(player).map(str::to_owned),
                ) else {
                    continue;
                };
                let detected = sense(world, player, &origin, net.detection_radius);
                broadcaster.emit_to(&socket, GameEvent::DetectionUpdate(DetectionUpdate { detected }));
            }
        }
    }
}

fn sense(world: &World, observer: Entity, origin: &Position, radius: f64) -> Vec<DetectedEntity> {
    let r2 = radius * radius;
    let mut detected = Vec::new();
    for (tag, kind) in SENSED {
        world.for_each_with_tag(tag, |e| {
            if e == observer || !living(world, e) {
                return;
            }
            if let Some(position) = world.read::<Position>(e).filter(|p| p.distance_sq(origin) <= r2) {
                detected.push(DetectedEntity {
                    id: world.label(e),
                    kind,
                    position,
                });
            }
        });
    }
    detected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, player};
    use godcell_net::EventLog;

    fn run(world: &mut World, log: &mut EventLog, tick: u64) {
        let ctx = TickContext { dt: 1.0 / 60.0, now: 0.0, tick };
        NetworkBroadcastSystem.run(world, ctx, log);
    }

    #[test]
    fn positions_every_tick_and_dead_players_hidden() {
        let mut world = testing::world();
        player(&mut world, "a", EvolutionStage::SingleCell, 2000.0, 1500.0);
        let b = player(&mut world, "b", EvolutionStage::SingleCell, 2100.0, 1500.0);
        world.spawn_swarm(Position::new(2500.0, 1500.0));
        testing::set_energy(&world, b, 0.0);
        let mut log = EventLog::new();

        run(&mut world, &mut log, 1);
        run(&mut world, &mut log, 2);
        assert_eq!(log.count("positionsUpdate"), 2);
        match log.named("positionsUpdate")[0] {
            GameEvent::PositionsUpdate(update) => assert_eq!(update.entities.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn energy_updates_are_throttled() {
        let mut world = testing::world();
        player(&mut world, "a", EvolutionStage::SingleCell, 2000.0, 1500.0);
        let interval = world.config.network.energy_update_interval;
        let mut log = EventLog::new();

        for tick in 1..=interval * 2 {
            run(&mut world, &mut log, tick);
        }
        assert_eq!(log.count("energyUpdate"), 2);
    }

    #[test]
    fn detection_is_private_and_needs_multi_cell() {
        let mut world = testing::world();
        player(&mut world, "single", EvolutionStage::SingleCell, 2000.0, 1500.0);
        player(&mut world, "multi", EvolutionStage::MultiCell, 2050.0, 1500.0);
        world.spawn_nutrient(Position::new(2060.0, 1500.0), 1.0);
        world.spawn_nutrient(Position::new(2050.0 + world.config.network.detection_radius + 50.0, 1500.0), 1.0);
        let interval = world.config.network.detection_interval;
        let mut log = EventLog::new();

        run(&mut world, &mut log, interval);
        assert!(log.sent_to("single").is_empty());
        let sent = log.sent_to("multi");
        assert_eq!(sent.len(), 1);
        match sent[0] {
            GameEvent::DetectionUpdate(update) => {
                assert_eq!(update.detected.len(), 2);
                assert!(update.detected.iter().all(|d| d.id != "multi"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
