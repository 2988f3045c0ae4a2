pub mod macros;

use godcell_lib::model::data::{
    CombatSpecialization, Energy, EvolutionStage, Position, Specialization,
};
use godcell_lib::model::net::EventLog;
use godcell_lib::model::world::PlayerSpawn;
use godcell_lib::model::{spawner, GameConfig, SystemRunner, World};
use hecs::Entity;

/// Builds a world with no seeded content unless asked for.
#[allow(dead_code)]
pub struct TestWorld {
    config: GameConfig,
    seeded: bool,
}

#[allow(dead_code)]
impl TestWorld {
    pub fn new() -> Self {
        let mut config = GameConfig::default();
        config.world.seed = Some(42);
        Self {
            config,
            seeded: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut GameConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Populates the world the way the server does at startup.
    pub fn seeded(mut self) -> Self {
        self.seeded = true;
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config);
        if self.seeded {
            spawner::seed_world(&mut world, &mut EventLog::new()).expect("world seeds");
        }
        world
    }

    pub fn sim(self) -> Sim {
        Sim {
            world: self.build(),
            runner: SystemRunner::with_default_systems(),
            log: EventLog::new(),
        }
    }
}

/// A world plus the default pipeline and an event log.
#[allow(dead_code)]
pub struct Sim {
    pub world: World,
    pub runner: SystemRunner,
    pub log: EventLog,
}

#[allow(dead_code)]
impl Sim {
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.world.config.world.tick_rate)
    }

    pub fn tick(&mut self) {
        let dt = self.dt();
        self.runner.update(&mut self.world, dt, &mut self.log);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Ticks until `now_ms` has advanced by at least `ms`.
    pub fn advance_ms(&mut self, ms: f64) {
        let until = self.world.now() + ms;
        while self.world.now() < until {
            self.tick();
        }
    }
}

#[allow(dead_code)]
pub fn player_at(world: &mut World, socket: &str, stage: EvolutionStage, x: f64, y: f64) -> Entity {
    spawn_at(world, socket, stage, x, y, false)
}

#[allow(dead_code)]
pub fn bot_at(world: &mut World, socket: &str, stage: EvolutionStage, x: f64, y: f64) -> Entity {
    spawn_at(world, socket, stage, x, y, true)
}

fn spawn_at(
    world: &mut World,
    socket: &str,
    stage: EvolutionStage,
    x: f64,
    y: f64,
    is_bot: bool,
) -> Entity {
    world
        .spawn_player(PlayerSpawn {
            socket_id: socket.to_string(),
            name: socket.to_string(),
            color: "#00ff88".into(),
            stage,
            position: Position::new(x, y),
            is_bot,
        })
        .expect("test player spawns")
}

#[allow(dead_code)]
pub fn specialize(world: &World, entity: Entity, spec: Specialization) {
    world.with_mut::<CombatSpecialization, _>(entity, |c| c.specialization = Some(spec));
}

#[allow(dead_code)]
pub fn energy(world: &World, entity: Entity) -> Energy {
    world.read::<Energy>(entity).expect("entity has energy")
}

#[allow(dead_code)]
pub fn set_energy(world: &World, entity: Entity, current: f64) {
    world.with_mut::<Energy, _>(entity, |e| e.current = current);
}
