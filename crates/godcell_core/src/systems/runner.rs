use super::ai::{
    BotAISystem, CyberBugAISystem, EntropySerpentAISystem, JungleCreatureAISystem, SwarmAISystem,
};
use super::collision::{
    MacroResourceCollisionSystem, NutrientCollisionSystem, PredationSystem,
    ProjectileSystem, PseudopodSystem, SwarmCollisionSystem, TrapSystem, TreeCollisionSystem,
};
use super::intent::AbilityIntentSystem;
use super::lifecycle::{
    DamageTrackingSystem, DeathSystem, DeferredActionSystem, MetabolismSystem, RespawnSystem,
};
use super::network::NetworkBroadcastSystem;
use super::physics::{GravitySystem, KnockbackSystem, MovementSystem};
use super::{System, TickContext};
use crate::world::{Tag, World};
use godcell_net::Broadcaster;
use std::time::Instant;

/// Runs registered systems in ascending priority. Systems sharing a
/// priority run in registration order.
#[derive(Default)]
pub struct SystemRunner {
    systems: Vec<Box<dyn System>>,
}

impl std::fmt::Debug for SystemRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl SystemRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full pipeline.
    #[must_use]
    pub fn with_default_systems() -> Self {
        let mut runner = Self::new();
        // AI
        runner.add(SwarmAISystem::default());
        runner.add(CyberBugAISystem::default());
        runner.add(JungleCreatureAISystem::default());
        runner.add(EntropySerpentAISystem::default());
        runner.add(BotAISystem::default());
        // Physics pull, then player intents
        runner.add(GravitySystem);
        runner.add(AbilityIntentSystem);
        // Collisions: contact drains before pickups, projectiles last
        runner.add(PredationSystem);
        runner.add(SwarmCollisionSystem);
        runner.add(TreeCollisionSystem);
        runner.add(TrapSystem);
        runner.add(ProjectileSystem);
        runner.add(PseudopodSystem);
        // Movement consumes Slowed and knockback written above
        runner.add(MovementSystem);
        runner.add(KnockbackSystem);
        runner.add(MetabolismSystem);
        runner.add(NutrientCollisionSystem);
        runner.add(MacroResourceCollisionSystem);
        // Death sees every damage source of the tick
        runner.add(DeathSystem);
        runner.add(DeferredActionSystem);
        runner.add(RespawnSystem);
        runner.add(DamageTrackingSystem::default());
        runner.add(NetworkBroadcastSystem);
        runner
    }

    pub fn add<S: System + 'static>(&mut self, system: S) {
        let priority = system.priority();
        let idx = self.systems.partition_point(|s| s.priority() <= priority);
        self.systems.insert(idx, Box::new(system));
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Advances the clock by `dt` seconds and runs one tick.
    pub fn update(&mut self, world: &mut World, dt: f64, broadcaster: &mut dyn Broadcaster) {
        let started = Instant::now();
        world.clock.advance(dt.max(0.0));
        let ctx = TickContext {
            dt: dt.max(0.0),
            now: world.clock.now_ms,
            tick: world.clock.tick,
        };
        for system in &mut self.systems {
            system.run(world, ctx, broadcaster);
        }
        world
            .metrics
            .record_tick(started.elapsed(), world.entity_count(), world.count_tag(Tag::Player));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::priority;
    use godcell_net::NullBroadcaster;

    struct Probe {
        name: &'static str,
        priority: u32,
    }

    impl System for Probe {
        fn name(&self) -> &'static str {
            self.name
        }
        fn priority(&self) -> u32 {
            self.priority
        }
        fn run(&mut self, world: &mut World, _ctx: TickContext, _b: &mut dyn Broadcaster) {
            world.metrics.increment_counter(self.name);
        }
    }

    #[test]
    fn systems_sorted_by_priority_then_registration() {
        let mut runner = SystemRunner::new();
        runner.add(Probe { name: "death", priority: priority::DEATH });
        runner.add(Probe { name: "ai", priority: priority::AI });
        runner.add(Probe { name: "ai2", priority: priority::AI });
        assert_eq!(runner.names(), vec!["ai", "ai2", "death"]);

        let mut world = World::default();
        runner.update(&mut world, 0.016, &mut NullBroadcaster);
        assert_eq!(world.metrics.counter("ai2"), 1);
        assert_eq!(world.clock.tick, 1);
    }

    #[test]
    fn default_pipeline_order_respects_bands() {
        let runner = SystemRunner::with_default_systems();
        let names = runner.names();
        let pos = |n: &str| names.iter().position(|x| *x == n).expect("registered");
        assert!(pos("swarm_ai") < pos("gravity"));
        assert!(pos("gravity") < pos("ability_intents"));
        assert!(pos("swarm_collision") < pos("movement"));
        assert!(pos("movement") < pos("metabolism"));
        assert!(pos("nutrient_collision") < pos("death"));
        assert!(pos("death") < pos("network_broadcast"));
        assert_eq!(names.last(), Some(&"network_broadcast"));
    }

    #[test]
    fn runner_can_move_across_threads() {
        fn assert_send<T: Send>(_: &T) {}
        let runner = SystemRunner::with_default_systems();
        assert_send(&runner);
        let handle = std::thread::spawn(move || runner.names().len());
        assert!(handle.join().expect("thread") > 0);
    }
}
