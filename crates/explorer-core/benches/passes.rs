//! Benchmarks for the periodic passes and the affordability checks the
//! views poll every frame.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use explorer_core::prelude::*;
use explorer_logic::constants::{buildings, crafting, materials, research, resources};
use explorer_logic::model::ColonyState;

/// A mid-game colony: ten homes, every research done, a few of each building.
fn busy_colony() -> ColonyEngine {
    let mut state: ColonyState = ColonyEngine::new().state().clone();
    for (id, owned) in [
        (buildings::HOME, 10),
        (buildings::WOODCUTTER, 4),
        (buildings::MINER, 4),
    ] {
        if let Some(building) = state.buildings.get_mut(id) {
            building.owned = owned;
        }
    }
    for entry in state.research.values_mut() {
        entry.unlocked = true;
    }
    if let Some(wood) = state.resources.get_mut(resources::WOOD) {
        wood.amount = 400.0;
    }
    ColonyEngine::from_state(state, ColonyConfig::default()).with_seed(42)
}

fn bench_passes(c: &mut Criterion) {
    let mut engine = busy_colony();
    let mut now = 0.0;

    c.bench_function("pass_resource_generation", |b| {
        b.iter(|| {
            now += 1.0;
            black_box(engine.tick(black_box(Pass::ResourceGeneration), now))
        });
    });
    c.bench_function("pass_happiness_generation", |b| {
        b.iter(|| {
            now += 1.0;
            black_box(engine.tick(black_box(Pass::HappinessGeneration), now))
        });
    });
    c.bench_function("pass_wood_consumption", |b| {
        b.iter(|| {
            now += 10.0;
            black_box(engine.tick(black_box(Pass::WoodConsumption), now))
        });
    });
}

fn bench_affordability_sweep(c: &mut Criterion) {
    let engine = busy_colony();

    c.bench_function("affordability_sweep", |b| {
        b.iter(|| {
            let mut open = 0u32;
            for id in [buildings::HOME, buildings::WOODCUTTER, buildings::MINER] {
                open += u32::from(engine.can_afford_building(black_box(id)));
            }
            open += u32::from(engine.can_afford_crafting(crafting::CONSTRUCTOR));
            for id in [materials::BEAM, materials::SLAB, materials::BRICK] {
                open += u32::from(engine.can_craft_material(black_box(id)));
            }
            open += u32::from(engine.research_available(research::CONSTRUCTOR));
            open += u32::from(engine.can_invite_explorer());
            black_box(open)
        });
    });

    c.bench_function("snapshot", |b| b.iter(|| black_box(engine.snapshot())));
}

criterion_group!(benches, bench_passes, bench_affordability_sweep);
criterion_main!(benches);
