use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lilt_driver_core::{Runtime, Spring, ValueCell, Wobble};

fn bench_spring_step(c: &mut Criterion) {
    c.bench_function("spring_step_64x3", |b| {
        let runtime = Runtime::new();
        let cells: Vec<ValueCell<[f32; 3]>> = (0..64).map(|_| ValueCell::new([0.0; 3])).collect();
        let springs: Vec<_> = cells
            .iter()
            .map(|cell| {
                let mut spring = Spring::new();
                spring.set_references(vec![cell.binding()]);
                runtime.add_spring(spring)
            })
            .collect();
        let mut flip = false;
        b.iter(|| {
            // Retarget every step so no spring ever settles out of the set.
            flip = !flip;
            let target = if flip { [10.0, -4.0, 2.5] } else { [-3.0, 8.0, 0.5] };
            for spring in &springs {
                spring.borrow_mut().to(&[target]).unwrap();
            }
            runtime.update(black_box(1.0 / 240.0));
        });
    });
}

fn bench_wobble_step(c: &mut Criterion) {
    c.bench_function("wobble_step_64x3", |b| {
        let runtime = Runtime::new();
        let cells: Vec<ValueCell<[f32; 3]>> = (0..64).map(|_| ValueCell::new([0.0; 3])).collect();
        for cell in &cells {
            let mut wobble = Wobble::new();
            wobble
                .set_references(vec![cell.binding()])
                .set_frequency(7.0)
                .set_amplitude(2.0);
            let wobble = runtime.add_wobble(wobble);
            wobble.borrow_mut().start();
        }
        b.iter(|| {
            runtime.update(black_box(1.0 / 240.0));
        });
    });
}

criterion_group!(benches, bench_spring_step, bench_wobble_step);
criterion_main!(benches);
