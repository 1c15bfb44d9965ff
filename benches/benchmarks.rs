use criterion::{black_box, criterion_group, criterion_main, Criterion};
use easel::document::HtmlParser;
use easel::surface::{Color, PaintOperation, PixelRect, Raster};
use easel::DrawingSurface;

const INDEX_HTML: &str = include_str!("../renderer/index.html");

/// Parse the shipped presentation document
fn benchmark_document(c: &mut Criterion) {
    let parser = HtmlParser::new();
    c.bench_function("parse_index_html", |b| {
        b.iter(|| parser.parse(black_box(INDEX_HTML)))
    });
}

/// Surface activation and raw paint throughput
fn benchmark_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface");
    let parser = HtmlParser::new();

    group.bench_function("initialize", |b| {
        b.iter_batched(
            || parser.parse(INDEX_HTML).unwrap(),
            |mut document| DrawingSurface::initialize(&mut document),
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("full_canvas_fill", |b| {
        let mut raster = Raster::new(800, 600);
        let op = PaintOperation {
            fill: Color::BLACK,
            rect: PixelRect::new(0, 0, 800, 600),
        };
        b.iter(|| raster.apply(black_box(&op)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_document, benchmark_surface);
criterion_main!(benches);
