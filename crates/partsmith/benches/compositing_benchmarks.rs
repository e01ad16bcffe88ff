//! Compositing benchmarks.

use assets::{ObjectId, RendererId, SpriteAsset, SpriteId, TransformId};
use common::{Tint, Vec2};
use compositor::{apply_tint, CompositeRequest, Compositor, CompositorSettings};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};
use scene::{CharacterPart, PartCategory};
use std::sync::Arc;

fn sprite_part(index: usize, size: u32, alpha: u8) -> CharacterPart {
    let name = format!("Part_{}", index);
    let image = RgbaImage::from_fn(size, size, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, (index % 256) as u8, alpha])
    });
    let id = index as u64 + 1;

    CharacterPart {
        category: PartCategory::categorize(&name),
        sprite: Some(Arc::new(SpriteAsset::new(SpriteId(id), name.clone(), image))),
        name,
        object_id: ObjectId(id),
        transform_id: TransformId(id),
        renderer_id: RendererId(id),
        sprite_id: Some(SpriteId(id)),
        position: Vec2::new((index % 5) as f32 * 0.5 - 1.0, (index / 5) as f32 * 0.5 - 1.0),
        sorting_order: (index % 7) as i32,
        tint: Tint::IDENTITY,
        tint_corrected: false,
        active: true,
        selected: true,
    }
}

/// Benchmark tint correction.
fn bench_tint(c: &mut Criterion) {
    let mut group = c.benchmark_group("tint");
    let tint = Tint::new(0.8, 0.6, 1.2, 0.9);

    for size in [64u32, 256, 1024].iter() {
        let pixels = vec![200u8; (*size * *size * 4) as usize];
        group.bench_with_input(BenchmarkId::new("apply_tint", size), size, |b, _| {
            b.iter(|| black_box(apply_tint(black_box(&pixels), tint)))
        });
    }

    group.finish();
}

/// Benchmark full composites.
fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    group.sample_size(20);

    let compositor = Compositor::new(CompositorSettings::default().with_min_size(1024, 1024));

    for count in [5usize, 20, 50].iter() {
        let opaque: Vec<_> = (0..*count).map(|i| sprite_part(i, 256, 255)).collect();
        group.bench_with_input(BenchmarkId::new("opaque", count), &opaque, |b, parts| {
            let request = CompositeRequest::select_all(parts);
            b.iter(|| black_box(compositor.composite(&request, None)))
        });

        let translucent: Vec<_> = (0..*count).map(|i| sprite_part(i, 256, 160)).collect();
        group.bench_with_input(BenchmarkId::new("translucent", count), &translucent, |b, parts| {
            let request = CompositeRequest::select_all(parts).with_tint("Part_0", Tint::new(1.0, 0.5, 0.5, 1.0));
            b.iter(|| black_box(compositor.composite(&request, None)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tint, bench_composite);

criterion_main!(benches);
