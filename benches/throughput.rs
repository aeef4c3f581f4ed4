use std::path::PathBuf;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use pickkit::{
    config::{PickerOptions, SelectOptions},
    core::selection::SelectionController,
    edit::mosaic::pixelate,
    engine::chain::RuleChain,
    persist::{MemoryStorage, cache::EditCache},
    types::Bitmap,
};

fn library(n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| {
            let ext = if i % 5 == 0 { "mov" } else { "jpg" };
            PathBuf::from(format!("/library/IMG_{i:05}.{ext}"))
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let options = PickerOptions {
        select_options: SelectOptions::all(),
        ..PickerOptions::default()
    };
    c.bench_function("classify_10k", |b| {
        b.iter(|| {
            let mut picker = SelectionController::new(options.clone());
            picker.extend(library(10_000));
        });
    });
}

fn bench_toggles(c: &mut Criterion) {
    let options = PickerOptions {
        select_limit: 500,
        ..PickerOptions::default()
    };
    let ids: Vec<String> = library(2_000)
        .iter()
        .filter_map(|p| p.to_str().map(str::to_string))
        .collect();

    c.bench_function("toggle_500_then_deselect_first", |b| {
        b.iter(|| {
            let mut picker = SelectionController::with_rules(options.clone(), RuleChain::new());
            picker.extend(library(2_000));
            for id in ids.iter().take(500) {
                let _ = picker.toggle(id).expect("toggle");
            }
            // Worst case renumbering: every later selection shifts down.
            let _ = picker.toggle(&ids[0]).expect("toggle");
        });
    });
}

fn bench_cache(c: &mut Criterion) {
    let snapshot = Bitmap::new(512, 512);
    c.bench_function("cache_write_take_memory", |b| {
        let mut cache = EditCache::new("pen", MemoryStorage::new(), true);
        b.iter(|| {
            cache.write(snapshot.clone());
            let _ = cache.read(true);
        });
    });
}

fn bench_pixelate(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixelate_1024");
    let image = Bitmap::from_fn(1024, 1024, |x, y| image::Rgba([x as u8, y as u8, 0, 255]));

    for level in [8u32, 30, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            b.iter(|| {
                let _ = pixelate(&image, level);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_toggles, bench_cache, bench_pixelate);
criterion_main!(benches);
