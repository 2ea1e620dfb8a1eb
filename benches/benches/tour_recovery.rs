// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use futures::executor::block_on;
use kurbo::{Rect, Size};
use understory_document::{Document, ElementSpec, NodeId};
use understory_tour::adapters::document::SharedDocument;
use understory_tour::{CLASS_TOOLTIP, Step, TargetSpec, Tour, TourOptions};

fn setup(steps: usize, filler: usize) -> (SharedDocument, Tour<SharedDocument>, Vec<NodeId>) {
    let page = SharedDocument::new(Document::new());
    let mut targets = Vec::with_capacity(steps);
    {
        let mut doc = page.lock();
        doc.style_class(CLASS_TOOLTIP, Size::new(240.0, 96.0));
        let body = doc.body();
        for i in 0..filler {
            let y = i as f64 * 12.0;
            doc.insert(
                body,
                ElementSpec::new("p").with_bounds(Rect::new(0.0, y, 600.0, y + 10.0)),
            );
        }
        for i in 0..steps {
            let y = 40.0 + i as f64 * 80.0;
            targets.push(doc.insert(
                body,
                ElementSpec::new("button")
                    .with_id(format!("t{i}"))
                    .with_bounds(Rect::new(700.0, y, 820.0, y + 32.0)),
            ));
        }
    }
    let tour = Tour::new(page.clone(), TourOptions::default());
    let plan = (0..steps)
        .map(|i| {
            Step::new(
                TargetSpec::new(format!("#t{i}"))
                    .with_trigger(true)
                    .with_tooltip("Next"),
            )
        })
        .collect();
    tour.set_steps(plan).expect("valid steps");
    (page, tour, targets)
}

fn bench_layout_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("tour_layout_shift");
    for &filler in &[100_usize, 1_000] {
        let (page, tour, targets) = setup(8, filler);
        tour.start(0).expect("start");
        tour.flush_mutations().map(block_on);
        let mut shift = 0.0;
        group.bench_function(format!("flush_{filler}"), |b| {
            b.iter(|| {
                shift = if shift == 0.0 { 4.0 } else { 0.0 };
                page.lock().set_bounds(
                    targets[0],
                    Rect::new(700.0 + shift, 40.0, 820.0 + shift, 72.0),
                );
                black_box(tour.flush_mutations().map(block_on));
            });
        });
    }
    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    c.bench_function("tour_walk_8_steps", |b| {
        b.iter_batched(
            || setup(8, 200),
            |(_page, tour, _)| {
                tour.start(0).expect("start");
                while black_box(block_on(tour.go_next_step())) != understory_tour::Navigated::Finished
                {}
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_layout_shift, bench_walk);
criterion_main!(benches);
