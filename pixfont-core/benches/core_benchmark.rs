use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pixfont_core::{FontBundle, PixelBuffer};

/// A bundle with one grid font and one packed font covering A–Z.
fn bundle_json() -> String {
    let grid = "[[0,1,0],[1,0,1],[1,1,1],[1,0,1],[1,0,1]]";
    let packed = "[0,1,0,1,0,1,1,1,1,1,0,1,1,0,1]";
    let entries = |glyph: &str| {
        ('A'..='Z')
            .map(|c| format!("\"{c}\": {glyph}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{{ \"Grid\": {{ {} }}, \"threeXFiveMinifont\": {{ {} }} }}",
        entries(grid),
        entries(packed)
    )
}

fn bench_bundle_parse(c: &mut Criterion) {
    let json = bundle_json();

    c.bench_function("bundle_parse_2_fonts", |b| {
        b.iter(|| FontBundle::from_json_str(black_box(&json)));
    });
}

fn bench_encode_png(c: &mut Criterion) {
    let mut buffer = PixelBuffer::new(120, 24);
    for i in 0..120 * 24 {
        buffer.set(i % 120, i / 120, i % 3 == 0);
    }

    c.bench_function("encode_png_120x24", |b| {
        b.iter(|| black_box(&buffer).encode_png());
    });
}

criterion_group!(benches, bench_bundle_parse, bench_encode_png);
criterion_main!(benches);
