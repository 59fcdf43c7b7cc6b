//! Staff drawing benchmarks.

use std::hint::black_box;

use criterion::Criterion;
use ear_trainer::{
    catalog::{self, NOTES},
    DisplayList, StaffRenderer, StaffStyle,
};

pub fn bench_staff(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/staff");

    let mut surface = DisplayList::new(800.0, 300.0);
    let mut renderer = StaffRenderer::new(StaffStyle::default());
    renderer.resize(300.0, &mut surface);

    // Worst case for a single note: two ledger lines
    let high_c = catalog::find("C6").copied();
    group.bench_function("target_with_ledgers", |b| {
        b.iter(|| renderer.render(&mut surface, black_box(high_c.as_ref()), &[]))
    });

    let played = [NOTES[1], NOTES[13]];
    group.bench_function("target_and_played_sharps", |b| {
        b.iter(|| renderer.render(&mut surface, black_box(Some(&NOTES[6])), black_box(&played)))
    });

    group.bench_function("resize", |b| {
        let mut height = 300.0;
        b.iter(|| {
            height = if height > 600.0 { 300.0 } else { height + 1.0 };
            renderer.resize(black_box(height), &mut surface)
        })
    });

    group.finish();
}
