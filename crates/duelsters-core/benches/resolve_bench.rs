use criterion::{black_box, criterion_group, criterion_main, Criterion};
use duelsters_core::batch::{run_batch, BatchConfig};
use duelsters_core::controller::ComputerPolicy;
use duelsters_core::resolver::resolve;
use duelsters_core::{Action, ClassArchetype, Combatant, ControllerKind, DuelRules, Match};

fn bench_resolve_all_pairs(c: &mut Criterion) {
    c.bench_function("resolve_all_pairs", |b| {
        b.iter(|| {
            for one in Action::ALL {
                for two in Action::ALL {
                    black_box(resolve(black_box(one), black_box(two), true, false));
                }
            }
        })
    });
}

fn bench_full_match(c: &mut Criterion) {
    let rules = DuelRules::default();
    let one = Combatant::new("One", ClassArchetype::Acrobat, ControllerKind::Computer, &rules)
        .expect("valid name");
    let two = Combatant::new("Two", ClassArchetype::Support, ControllerKind::Computer, &rules)
        .expect("valid name");

    c.bench_function("full_match", |b| {
        b.iter(|| {
            let mut duel = Match::seeded(black_box(42), one.clone(), two.clone(), rules)
                .expect("default rules are valid");
            duel.play_to_completion(&mut ComputerPolicy::new(), &mut ComputerPolicy::new(), 1_000)
                .expect("computer match")
        })
    });
}

fn bench_batch_of_hundred(c: &mut Criterion) {
    // Parallel run, so this measures rayon overhead as much as combat
    c.bench_function("batch_100", |b| {
        b.iter(|| run_batch(black_box(BatchConfig::new(100))).expect("valid rules"))
    });
}

criterion_group!(benches, bench_resolve_all_pairs, bench_full_match, bench_batch_of_hundred);
criterion_main!(benches);
