//! Criterion benchmarks for foodviz critical paths
//!
//! Benchmarks the per-frame and per-stage operations:
//! - Builder: template to grid mapping
//! - Stage: color assignment for each stage policy
//! - Engine: stage transitions and frame generation
//! - Renderer: frame rasterization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use foodviz::builder::TemplateMap;
use foodviz::engine::{Engine, EngineSettings};
use foodviz::layout::GridLayout;
use foodviz::manifest::TemplateLibrary;
use foodviz::palette::Theme;
use foodviz::renderer::render_frame;
use foodviz::stage::{assign_colors, AssignContext, Stage};
use foodviz::template::Template;
use rand::rngs::StdRng;
use rand::SeedableRng;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a square template with a repeating diagonal pattern
fn make_template(size: usize) -> Template {
    let rows = (0..size)
        .map(|r| (0..size).map(|c| ((r + c) % 4 + 1) as u8).collect())
        .collect();
    Template::from_rows(rows).unwrap()
}

fn make_engine(surface: (u32, u32)) -> Engine {
    let mut library = TemplateLibrary::new();
    library.insert("bench", make_template(40));
    Engine::new(EngineSettings::default(), Theme::wall(), library, 0.6, Some(1), surface)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder");
    let template = make_template(40);

    for (cols, rows) in [(40u32, 40u32), (71, 40), (160, 90)] {
        group.throughput(Throughput::Elements((cols * rows) as u64));
        group.bench_with_input(
            BenchmarkId::new("build", format!("{}x{}", cols, rows)),
            &(cols, rows),
            |b, &(cols, rows)| b.iter(|| TemplateMap::build(black_box(&template), cols, rows, 4)),
        );
    }
    group.finish();
}

fn bench_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign_colors");
    let layout = GridLayout::compute(1280, 720, 40, 40).unwrap();
    let map = TemplateMap::build(&make_template(40), layout.cols, layout.rows, 4);
    let ctx = AssignContext { layout, palette_len: 4, map: &map, automation: 0.6 };
    let mut rng = StdRng::seed_from_u64(3);

    group.throughput(Throughput::Elements(layout.tile_count() as u64));
    for stage in Stage::ALL {
        group.bench_function(stage.name(), |b| {
            b.iter(|| assign_colors(black_box(stage), &ctx, &mut rng))
        });
    }
    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    group.bench_function("stage_transition_1280x720", |b| {
        let mut engine = make_engine((1280, 720));
        engine.tick(0);
        let step = engine.settings().timings.stage_length_ms() + 1;
        let mut now = 0;
        b.iter(|| {
            now += step;
            engine.tick(black_box(now))
        })
    });

    group.bench_function("frame_1280x720", |b| {
        let mut engine = make_engine((1280, 720));
        engine.tick(0);
        b.iter(|| engine.frame(black_box(1000)))
    });
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer");
    for (w, h) in [(320u32, 180u32), (1280, 720)] {
        let mut engine = make_engine((w, h));
        engine.tick(0);
        let frame = engine.frame(1000);
        group.throughput(Throughput::Elements((w * h) as u64));
        group.bench_with_input(
            BenchmarkId::new("render_frame", format!("{}x{}", w, h)),
            &frame,
            |b, frame| b.iter(|| render_frame(black_box(frame))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_builder, bench_assign, bench_engine, bench_render);
criterion_main!(benches);
