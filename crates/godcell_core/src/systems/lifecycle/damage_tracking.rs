use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{DamageKind, DamageRecord, DamageTracking};
use godcell_net::{Broadcaster, DrainInfo, GameEvent, PlayerDrainState};
use std::collections::BTreeMap;

/// Summarizes this tick's drain records for the client's drain visuals and
/// empties them. Summaries accumulate between throttled broadcasts; the
/// latest summary per player wins.
#[derive(Debug, Default)]
pub struct DamageTrackingSystem {
    latest: BTreeMap<String, DrainInfo>,
    announced_any: bool,
}

fn summarize(records: &[DamageRecord], hit_rate: f64) -> Option<DrainInfo> {
    if records.is_empty() && hit_rate <= 0.0 {
        return None;
    }
    let mut by_kind: Vec<(DamageKind, f64)> = Vec::new();
    for record in records {
        match by_kind.iter_mut().find(|(k, _)| *k == record.kind) {
            Some((_, rate)) => *rate += record.damage_rate,
            None => by_kind.push((record.kind, record.damage_rate)),
        }
    }
    let primary_source = by_kind
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(DamageKind::Beam, |(k, _)| *k);
    Some(DrainInfo {
        total_damage_rate: by_kind.iter().map(|(_, r)| r).sum(),
        primary_source,
        pseudopod_hit_rate: hit_rate,
    })
}

impl System for DamageTrackingSystem {
    fn name(&self) -> &'static str {
        "damage_tracking"
    }

    fn priority(&self) -> u32 {
        priority::NETWORK
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        for player in world.tagged(Tag::Player) {
            let label = world.label(player);
            let summary = world.with_mut::<DamageTracking, _>(player, |t| {
                if t.pseudopod_hit_expires_at.is_some_and(|at| ctx.now >= at) {
                    t.pseudopod_hit_rate = 0.0;
                    t.pseudopod_hit_expires_at = None;
                }
                let summary = summarize(&t.active_damage, t.pseudopod_hit_rate);
                t.active_damage.clear();
                summary
            });
            if let Some(Some(info)) = summary {
                self.latest.insert(label, info);
            }
        }

        let interval = world.config.network.drain_state_interval.max(1);
        if ctx.tick % interval != 0 {
            return;
        }
        // An empty map after a non-empty one tells clients the drains stopped.
        if self.latest.is_empty() && !self.announced_any {
            return;
        }
        self.announced_any = !self.latest.is_empty();
        broadcaster.broadcast(GameEvent::PlayerDrainState(PlayerDrainState {
            damage_info: std::mem::take(&mut self.latest),
        }));
    }
}
