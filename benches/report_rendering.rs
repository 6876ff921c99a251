//! Report Rendering Benchmarks
//!
//! **Purpose:** Measure the cost of the work done around every compilation
//!
//! **How to Run:**
//! ```bash
//! cargo bench --bench report_rendering
//! cargo bench --bench report_rendering -- --save-baseline main
//! cargo bench --bench report_rendering -- --baseline main
//! ```
//!
//! **What's Being Measured:**
//! 1. `flatten nested assets` - Meta-asset tree expansion for 10/100/1000 groups
//! 2. `measure build folder` - Snapshot of a synthetic folder (walk + gzip)
//! 3. `render report` - Measuring, sorting and aligning emitted assets
//!
//! **Performance Tips:**
//! - Snapshot measurement is dominated by gzip at the best compression level
//! - Flattening allocates one Vec of references; no asset is cloned

use build_report::report::ReportRenderer;
use build_report::snapshot::SizeSnapshot;
use build_report::stats::{flatten_assets, AssetNode, BuildStats, Stats};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;

fn nested_assets(groups: usize) -> Vec<AssetNode> {
    (0..groups)
        .map(|i| {
            AssetNode::group(
                format!("chunk-{}", i),
                vec![
                    AssetNode::file(format!("chunk-{}.{:08x}.js", i, i), true),
                    AssetNode::file(format!("chunk-{}.{:08x}.mjs", i, i), true),
                ],
            )
        })
        .collect()
}

fn synthetic_build(files: usize) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let js = dir.path().join("static/js");
    fs::create_dir_all(&js).expect("Failed to create build folder");
    for i in 0..files {
        let body: String = (0..200)
            .map(|line| format!("export const value{}_{} = {};\n", i, line, line * i))
            .collect();
        fs::write(js.join(format!("{}.{:08x}.chunk.js", i, i * 31)), body)
            .expect("Failed to write asset");
    }
    dir
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten nested assets");
    for groups in [10, 100, 1000] {
        let assets = nested_assets(groups);
        group.bench_with_input(BenchmarkId::from_parameter(groups), &assets, |b, assets| {
            b.iter(|| black_box(flatten_assets(black_box(assets))));
        });
    }
    group.finish();
}

fn bench_measure(c: &mut Criterion) {
    let build = synthetic_build(50);

    c.bench_function("measure build folder", |b| {
        b.iter(|| black_box(SizeSnapshot::measure(black_box(build.path()))));
    });
}

fn bench_render(c: &mut Criterion) {
    let build = synthetic_build(50);
    let previous = SizeSnapshot::measure(build.path());
    let assets = (0..50)
        .map(|i| AssetNode::file(format!("static/js/{}.{:08x}.chunk.js", i, i * 31), true))
        .collect();
    let stats = Stats::from(BuildStats {
        assets,
        ..Default::default()
    });
    let renderer = ReportRenderer::new();

    c.bench_function("render report", |b| {
        b.iter(|| black_box(renderer.render(&stats, &previous, Path::new(build.path()))));
    });
}

criterion_group!(benches, bench_flatten, bench_measure, bench_render);
criterion_main!(benches);
