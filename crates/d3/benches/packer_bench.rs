//! Benchmarks for 3D bin packing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use u_packing_core::solver::Solver;
use u_packing_d3::{
    first_fit_decreasing, BinSpec, Item, ItemSpec, LocalSearch, Neighborhood, Packer3D,
};

const DIMS: [(f64, f64, f64); 12] = [
    (9.0, 7.0, 5.0),
    (8.0, 6.0, 5.0),
    (7.0, 6.0, 4.0),
    (6.0, 5.0, 4.0),
    (6.0, 5.0, 3.0),
    (5.0, 4.0, 3.0),
    (5.0, 4.0, 2.0),
    (4.0, 4.0, 3.0),
    (4.0, 3.0, 3.0),
    (4.0, 3.0, 2.0),
    (3.0, 3.0, 2.0),
    (3.0, 2.0, 2.0),
];

fn items() -> Vec<Item> {
    DIMS.iter()
        .enumerate()
        .map(|(i, &(l, w, h))| Item::new(i, l, w, h))
        .collect()
}

fn packer_benchmark(c: &mut Criterion) {
    let specs: Vec<ItemSpec> = (0..20)
        .map(|i| ItemSpec::new(i, 10.0, 10.0, 10.0))
        .collect();
    let bin = BinSpec::new(100.0, 100.0, 100.0);
    let packer = Packer3D::default_config();

    c.bench_function("pack_20_uniform_boxes", |b| {
        b.iter(|| {
            let result = packer.solve(black_box(&specs), black_box(&bin));
            black_box(result)
        })
    });
}

fn ffd_benchmark(c: &mut Criterion) {
    c.bench_function("ffd_medium", |b| {
        b.iter(|| black_box(first_fit_decreasing((10.0, 8.0, 6.0), black_box(items()))))
    });
}

fn neighborhood_benchmark(c: &mut Criterion) {
    let initial = first_fit_decreasing((10.0, 8.0, 6.0), items());
    let neighborhood = Neighborhood::default();

    c.bench_function("local_search_neighbors_medium", |b| {
        b.iter(|| black_box(neighborhood.local_search_neighbors(black_box(&initial))))
    });

    c.bench_function("local_search_medium", |b| {
        b.iter(|| black_box(LocalSearch::new(50, false).solve(black_box(&initial))))
    });
}

criterion_group!(benches, packer_benchmark, ffd_benchmark, neighborhood_benchmark);
criterion_main!(benches);
