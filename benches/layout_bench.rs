use criterion::{black_box, criterion_group, criterion_main, Criterion};

use spritegrid::layout;

fn bench_plan(c: &mut Criterion) {
    c.bench_function("plan_1000_frames", |b| {
        b.iter(|| layout::plan(black_box(1000), black_box(10), 64, 64).unwrap())
    });
}

fn bench_cell_origins(c: &mut Criterion) {
    let plan = layout::plan(1000, 10, 64, 64).unwrap();
    c.bench_function("cell_origins_1000", |b| {
        b.iter(|| {
            for i in 0..1000usize {
                black_box(plan.cell_origin(black_box(i)));
            }
        })
    });
}

criterion_group!(benches, bench_plan, bench_cell_origins);
criterion_main!(benches);
