use criterion::{black_box, criterion_group, criterion_main, Criterion};
use godcell_core::{spawner, GameConfig, SystemRunner, World};
use godcell_net::NullBroadcaster;

fn populated_world() -> World {
    let mut config = GameConfig::default();
    config.world.seed = Some(42);
    let mut world = World::new(config);
    spawner::seed_world(&mut world, &mut NullBroadcaster).expect("seeding succeeds");
    world
}

/// Benchmark one full tick over a seeded world.
fn bench_full_tick(c: &mut Criterion) {
    let mut world = populated_world();
    let mut runner = SystemRunner::with_default_systems();

    c.bench_function("full_tick_seeded_world", |b| {
        b.iter(|| {
            runner.update(&mut world, black_box(1.0 / 60.0), &mut NullBroadcaster);
        })
    });
}

/// Benchmark seeding from the default config counts.
fn bench_seed_world(c: &mut Criterion) {
    c.bench_function("seed_world_default", |b| {
        b.iter(|| {
            let world = populated_world();
            black_box(world.entity_count())
        })
    });
}

criterion_group!(benches, bench_full_tick, bench_seed_world);
criterion_main!(benches);
