//! # Scene Benchmark
//!
//! Camera updates per behavior, light/flare propagation and light packing.
//!
//! Run with: `cargo bench --package lumen_scene`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use lumen_scene::{BehaviorKind, LightKind, Scene};

fn bench_camera_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("camera_move");

    for kind in BehaviorKind::ALL {
        let mut scene = Scene::headless();
        scene.create_camera("cam", kind).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, _| {
            let camera = scene.camera_mut("cam").unwrap();
            b.iter(|| {
                camera.move_by(black_box(Vec3::new(0.1, 0.0, 0.1))).unwrap();
                camera.rotate(black_box(0.01), 0.0, 0.0).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_flare_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("light_set_position");

    for flares in [0usize, 4, 32] {
        let mut scene = Scene::headless();
        scene
            .create_light("lamp", LightKind::Point { attenuation: 10.0 }, Vec3::ZERO)
            .unwrap();
        for i in 0..flares {
            scene.attach_flare("lamp", &format!("flare_{i}")).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(flares), &flares, |b, _| {
            let light = scene.light_mut("lamp").unwrap();
            let mut x = 0.0_f32;
            b.iter(|| {
                x += 0.5;
                light.set_position(black_box(Vec3::new(x, 1.0, 0.0))).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_light_packing(c: &mut Criterion) {
    let mut scene = Scene::headless();
    for i in 0..256 {
        let kind = if i % 2 == 0 {
            LightKind::Point { attenuation: 5.0 }
        } else {
            LightKind::Spot { direction: Vec3::NEG_Y, angle: 0.6 }
        };
        #[allow(clippy::cast_precision_loss)]
        let x = i as f32;
        scene.create_light(&format!("light_{i}"), kind, Vec3::new(x, 3.0, 0.0)).unwrap();
    }

    c.bench_function("light_buffer_bytes_256", |b| {
        b.iter(|| black_box(scene.light_buffer_bytes()));
    });
}

criterion_group!(benches, bench_camera_move, bench_flare_propagation, bench_light_packing);
criterion_main!(benches);
