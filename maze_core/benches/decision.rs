use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use maze_core::{
    CuriousStrategy, ExplorationCfg, ExplorationStrategy, GridCoordinate, Openings,
    VisitedSquare,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

// Strategy with a 16x16 block of remembered cells, every third one a dead end
fn seasoned_strategy() -> CuriousStrategy {
    let mut s = CuriousStrategy::new(ExplorationCfg::default());
    for x in 0..16 {
        for y in 0..16 {
            s.state_mut().remember(VisitedSquare {
                coordinate: GridCoordinate::new(x, y),
                is_dead_end: (x + y) % 3 == 0,
            });
        }
    }
    s
}

fn bench_decide(c: &mut Criterion) {
    let all_open = Openings {
        left: true,
        front: true,
        right: true,
    };
    c.bench_function("curious_decide_all_open", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter_batched(
            seasoned_strategy,
            |mut s| black_box(s.decide(black_box(all_open), &mut rng)),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("curious_walk_100_moves", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter_batched(
            || CuriousStrategy::new(ExplorationCfg::default()),
            |mut s| {
                for i in 0..100u32 {
                    let openings = Openings {
                        left: i % 3 != 0,
                        front: i % 5 != 0,
                        right: i % 2 == 0,
                    };
                    let turn = s.decide(openings, &mut rng);
                    s.on_turn(turn);
                    s.on_move_forward();
                }
                black_box(s.state().visited_count())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_decide);
criterion_main!(benches);
