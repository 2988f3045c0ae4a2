//! Client intents queued by the transport layer. Each intent runs through
//! the same ability functions bots call, so the gates are identical.

use crate::abilities::{fire_emp, fire_melee, fire_projectile, fire_pseudopod, place_trap};
use crate::geometry::normalize;
use crate::players::respawn_player;
use crate::systems::lifecycle::select_specialization;
use crate::systems::{priority, System, TickContext};
use crate::world::World;
use godcell_data::InputDirection;
use godcell_net::{Broadcaster, ClientIntent};

#[derive(Debug, Default)]
pub struct AbilityIntentSystem;

impl System for AbilityIntentSystem {
    fn name(&self) -> &'static str {
        "ability_intents"
    }

    fn priority(&self) -> u32 {
        priority::ABILITIES
    }

    fn run(&mut self, world: &mut World, _ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        while let Some((socket_id, intent)) = world.intents.pop_front() {
            let Some(entity) = world.entity_by_socket(&socket_id) else {
                tracing::warn!(socket_id = %socket_id, ?intent, "Intent for unknown socket dropped");
                continue;
            };
            match intent {
                ClientIntent::Move { x, y } => {
                    let (x, y) = normalize(x, y).unwrap_or((0.0, 0.0));
                    world.with_mut::<InputDirection, _>(entity, |d| *d = InputDirection { x, y });
                }
                ClientIntent::FireEmp => {
                    fire_emp(world, broadcaster, entity);
                }
                ClientIntent::FirePseudopod { target_x, target_y } => {
                    fire_pseudopod(world, broadcaster, entity, target_x, target_y);
                }
                ClientIntent::FireProjectile { target_x, target_y } => {
                    fire_projectile(world, broadcaster, entity, target_x, target_y);
                }
                ClientIntent::Melee {
                    attack_type,
                    target_x,
                    target_y,
                } => {
                    fire_melee(world, broadcaster, entity, attack_type, target_x, target_y);
                }
                ClientIntent::PlaceTrap => {
                    place_trap(world, broadcaster, entity);
                }
                ClientIntent::SelectSpecialization { specialization } => {
                    if !select_specialization(world, broadcaster, entity, specialization) {
                        tracing::debug!(socket_id = %socket_id, ?specialization, "Specialization rejected");
                    }
                }
                ClientIntent::Respawn => {
                    respawn_player(world, broadcaster, entity);
                }
            }
        }
    }
}
