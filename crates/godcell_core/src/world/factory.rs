//! Entity creation. Each factory attaches a complete component set in one
//! `spawn`, then registers tags and a generated string id.

use super::{Tag, World};
use crate::error::{Result, WorldError};
use godcell_data::{
    Bot, CombatSpecialization, Cooldowns, CreatureVariant, CyberBug, CyberBugState, DamageTracking,
    DataFruit, Energy, EntropySerpent, EvolutionStage, InputDirection, JungleCreature,
    JungleCreatureState, Knockback, Nutrient, Obstacle, Player, Position, Projectile, Pseudopod,
    PseudopodMode, SerpentState, Slowed, Stage, Stunned, Swarm, Trap, Tree, Velocity,
};
use hecs::{Entity, EntityBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSpawn {
    pub socket_id: String,
    pub name: String,
    pub color: String,
    pub stage: EvolutionStage,
    pub position: Position,
    pub is_bot: bool,
}

impl World {
    fn spawn_with(&mut self, builder: &mut EntityBuilder, tag: Tag, prefix: &str) -> Entity {
        let entity = self.ecs.spawn(builder.build());
        self.tags.insert(entity, tag);
        let id = self.alloc_id(prefix);
        if let Err(err) = self.ids.bind_string(entity, &id) {
            tracing::warn!(%err, "Generated id collided with an assigned id");
        }
        entity
    }

    /// Players are addressed by their socket id, which doubles as their
    /// string id in every event.
    pub fn spawn_player(&mut self, spawn: PlayerSpawn) -> Result<Entity> {
        if self.ids.by_socket(&spawn.socket_id).is_some() {
            return Err(WorldError::duplicate_socket(spawn.socket_id));
        }
        if self.ids.by_string(&spawn.socket_id).is_some() {
            return Err(WorldError::duplicate_string_id(spawn.socket_id));
        }
        let tuning = self.config.stages.tuning(spawn.stage);
        let mut builder = EntityBuilder::new();
        builder
            .add(spawn.position)
            .add(Velocity::default())
            .add(Energy::full(tuning.starting_max_energy))
            .add(Stage::new(spawn.stage, tuning.radius))
            .add(Stunned::default())
            .add(Cooldowns::default())
            .add(DamageTracking::default())
            .add(Knockback::default())
            .add(CombatSpecialization {
                specialization: None,
                selection_deadline: 0.0,
            })
            .add(Player {
                name: spawn.name,
                color: spawn.color,
            })
            .add(InputDirection::default())
            .add(Slowed::default());
        if spawn.is_bot {
            builder.add(Bot::default());
        }
        let entity = self.ecs.spawn(builder.build());
        self.tags.insert(entity, Tag::Player);
        if spawn.is_bot {
            self.tags.insert(entity, Tag::Bot);
        }
        self.ids.bind_socket(entity, &spawn.socket_id)?;
        self.ids.bind_string(entity, &spawn.socket_id)?;
        Ok(entity)
    }

    pub fn spawn_swarm(&mut self, home: Position) -> Entity {
        let radius = self.config.swarm.radius;
        let mut builder = EntityBuilder::new();
        builder
            .add(home)
            .add(Velocity::default())
            .add(Swarm::new(home, radius));
        self.spawn_with(&mut builder, Tag::Swarm, "swarm")
    }

    pub fn spawn_cyber_bug(&mut self, home: Position) -> Entity {
        let cfg = &self.config.cyber_bug;
        let mut builder = EntityBuilder::new();
        builder
            .add(home)
            .add(Velocity::default())
            .add(Energy::full(cfg.energy))
            .add(CyberBug {
                state: CyberBugState::Idle,
                home,
                patrol_target: None,
                value: cfg.value,
                capacity_reward: cfg.capacity_reward,
                radius: cfg.radius,
            });
        self.spawn_with(&mut builder, Tag::CyberBug, "bug")
    }

    pub fn spawn_jungle_creature(&mut self, variant: CreatureVariant, home: Position) -> Entity {
        let tuning = self.config.jungle_creature.tuning(variant);
        let mut builder = EntityBuilder::new();
        builder
            .add(home)
            .add(Velocity::default())
            .add(Energy::full(tuning.energy))
            .add(JungleCreature {
                variant,
                state: JungleCreatureState::Idle,
                home,
                patrol_target: None,
                hunt_target: None,
                value: tuning.value,
                capacity_reward: tuning.capacity_reward,
                radius: tuning.radius,
            });
        self.spawn_with(&mut builder, Tag::JungleCreature, "creature")
    }

    pub fn spawn_serpent(&mut self, home: Position) -> Entity {
        let cfg = &self.config.serpent;
        let mut builder = EntityBuilder::new();
        builder
            .add(home)
            .add(Velocity::default())
            .add(Energy::full(cfg.energy))
            .add(EntropySerpent {
                state: SerpentState::Patrol,
                home,
                heading: 0.0,
                patrol_target: None,
                target: None,
                last_attack_time: None,
                radius: cfg.radius,
            });
        self.spawn_with(&mut builder, Tag::EntropySerpent, "serpent")
    }

    pub fn spawn_nutrient(&mut self, position: Position, value_multiplier: f64) -> Entity {
        let cfg = &self.config.resources;
        let mut builder = EntityBuilder::new();
        builder.add(position).add(Nutrient {
            value: cfg.nutrient_value,
            capacity_reward: cfg.nutrient_capacity,
            value_multiplier,
        });
        self.spawn_with(&mut builder, Tag::Nutrient, "nutrient")
    }

    pub fn spawn_obstacle(&mut self, position: Position) -> Entity {
        let cfg = &self.config.gravity;
        let mut builder = EntityBuilder::new();
        builder.add(position).add(Obstacle {
            radius: cfg.radius,
            strength: cfg.strength,
            core_radius: cfg.core_radius,
        });
        self.spawn_with(&mut builder, Tag::Obstacle, "obstacle")
    }

    pub fn spawn_tree(&mut self, position: Position) -> Entity {
        let radius = self.config.resources.tree_radius;
        let mut builder = EntityBuilder::new();
        builder.add(position).add(Tree { radius });
        self.spawn_with(&mut builder, Tag::Tree, "tree")
    }

    pub fn spawn_data_fruit(&mut self, tree: Option<Entity>, position: Position) -> Entity {
        let cfg = &self.config.resources;
        let mut builder = EntityBuilder::new();
        builder.add(position).add(DataFruit {
            tree,
            value: cfg.fruit_value,
            capacity_reward: cfg.fruit_capacity,
        });
        self.spawn_with(&mut builder, Tag::DataFruit, "fruit")
    }

    pub fn spawn_trap(&mut self, owner: Entity, position: Position) -> Entity {
        let cfg = &self.config.trap;
        let now = self.clock.now_ms;
        let mut builder = EntityBuilder::new();
        builder.add(position).add(Trap {
            owner,
            placed_at: now,
            expires_at: now + cfg.lifetime_ms,
            trigger_radius: cfg.trigger_radius,
            damage: cfg.damage,
            stun_duration_ms: cfg.stun_duration_ms,
        });
        self.spawn_with(&mut builder, Tag::Trap, "trap")
    }

    /// `direction` must already be a unit vector.
    pub fn spawn_projectile(
        &mut self,
        owner: Entity,
        origin: Position,
        direction: (f64, f64),
    ) -> Entity {
        let cfg = &self.config.projectile;
        let mut builder = EntityBuilder::new();
        builder.add(origin).add(Projectile {
            owner,
            origin,
            direction,
            speed: cfg.speed,
            max_distance: cfg.max_distance,
            traveled: 0.0,
            damage: cfg.damage,
            radius: cfg.radius,
        });
        self.spawn_with(&mut builder, Tag::Projectile, "projectile")
    }

    pub fn spawn_pseudopod(
        &mut self,
        owner: Entity,
        origin: Position,
        direction: (f64, f64),
        mode: PseudopodMode,
    ) -> Entity {
        let cfg = &self.config.pseudopod;
        let mut builder = EntityBuilder::new();
        builder.add(origin).add(Pseudopod {
            owner,
            origin,
            direction,
            speed: cfg.speed,
            max_distance: cfg.range,
            traveled: 0.0,
            damage: cfg.damage,
            width: cfg.width,
            mode,
            spent: false,
        });
        self.spawn_with(&mut builder, Tag::Pseudopod, "pseudopod")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(socket: &str) -> PlayerSpawn {
        PlayerSpawn {
            socket_id: socket.to_string(),
            name: "cell".into(),
            color: "#00ff88".into(),
            stage: EvolutionStage::MultiCell,
            position: Position::new(2000.0, 1500.0),
            is_bot: false,
        }
    }

    #[test]
    fn player_gets_complete_component_set() {
        let mut world = World::default();
        let p = world.spawn_player(spawn("s1")).expect("spawned");
        assert!(world.has::<Stunned>(p));
        assert!(world.has::<Cooldowns>(p));
        assert!(world.has::<DamageTracking>(p));
        assert!(world.has::<CombatSpecialization>(p));
        assert!(!world.has::<Bot>(p));
        let stage = world.read::<Stage>(p).expect("stage");
        assert_eq!(stage.radius, world.config.stages.multi_cell.radius);
        assert_eq!(world.entity_by_socket("s1"), Some(p));
        assert_eq!(world.label(p), "s1");
    }

    #[test]
    fn duplicate_socket_spawns_nothing() {
        let mut world = World::default();
        world.spawn_player(spawn("s1")).expect("spawned");
        let before = world.entity_count();
        assert!(matches!(
            world.spawn_player(spawn("s1")),
            Err(WorldError::DuplicateSocketId(_))
        ));
        assert_eq!(world.entity_count(), before);
    }

    #[test]
    fn creatures_get_unique_ids() {
        let mut world = World::default();
        let a = world.spawn_cyber_bug(Position::new(100.0, 100.0));
        let b = world.spawn_cyber_bug(Position::new(200.0, 100.0));
        assert_ne!(world.label(a), world.label(b));
        assert_eq!(world.entity_by_id(&world.label(a)), Some(a));
        assert!(!world.has::<Stage>(a));
        assert_eq!(world.count_tag(Tag::CyberBug), 2);
    }
}
