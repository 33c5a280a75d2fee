use std::collections::BTreeSet;

use criterion::{criterion_group, criterion_main, Criterion};
use overlap_engine::{find_windows, intersect, select_max, SlotCatalog};
use std::hint::black_box;

/// A week of 15-minute slots with a repeating availability pattern.
fn week_catalog(offset: u32) -> SlotCatalog {
    let mut builder = SlotCatalog::builder();
    for slot in 0..(7 * 96) {
        builder = builder.time(slot, i64::from(slot) * 900);
        for person in 0..((slot + offset) % 7) {
            builder = builder.available(slot, u64::from(person));
        }
    }
    builder.build().unwrap()
}

fn bench_windows(c: &mut Criterion) {
    let dense: BTreeSet<i64> = (0..(7 * 96)).map(|i| i * 900).collect();

    c.bench_function("find_windows_dense_week_60min", |b| {
        b.iter(|| find_windows(black_box(&dense), 900, 3600))
    });

    let a = week_catalog(0);
    let z = week_catalog(3);
    c.bench_function("select_intersect_find_week", |b| {
        b.iter(|| {
            let best_a = select_max(black_box(&a));
            let best_z = select_max(black_box(&z));
            let common = intersect([&best_a, &best_z]).unwrap();
            find_windows(&common, 900, 1800)
        })
    });
}

criterion_group!(benches, bench_windows);
criterion_main!(benches);
