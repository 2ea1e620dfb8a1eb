// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_tour::{Side, place};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_targets(count: usize, page: Size, seed: u64) -> Vec<Rect> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * page.width;
            let y = rng.next_f64() * page.height;
            let w = 20.0 + rng.next_f64() * 200.0;
            let h = 16.0 + rng.next_f64() * 60.0;
            Rect::new(x, y, x + w, y + h)
        })
        .collect()
}

fn bench_place(c: &mut Criterion) {
    let page = Size::new(1280.0, 2400.0);
    let tooltip = Size::new(240.0, 96.0);
    let targets = gen_targets(4096, page, 0x5eed);

    let mut group = c.benchmark_group("tooltip_place");
    group.throughput(Throughput::Elements(targets.len() as u64));
    for side in [Side::Auto, Side::Left, Side::Bottom] {
        group.bench_function(format!("{side:?}"), |b| {
            b.iter(|| {
                for &t in &targets {
                    black_box(place(side, black_box(t), tooltip, 5.0, page));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_place);
criterion_main!(benches);
