use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pixfont_core::{Alignment, FontCatalog, GlyphDefinition};
use pixfont_text::{GlyphRasterizer, TextEngine, VectorRasterizer};

/// A 3×5 catalog covering A–Z with a solid block per letter.
fn block_catalog() -> FontCatalog {
    let block = GlyphDefinition::from_art(&["###", "#.#", "###", "#.#", "#.#"]);
    let mut catalog = FontCatalog::new("Block")
        .with_glyph(' ', GlyphDefinition::from_art(&["..", "..", "..", "..", ".."]));
    for ch in 'A'..='Z' {
        catalog.insert(ch, block.clone());
    }
    catalog
}

fn bench_glyph_short_text(c: &mut Criterion) {
    let catalog = block_catalog();
    let raster = GlyphRasterizer::new();

    c.bench_function("glyph_short_text", |b| {
        b.iter(|| raster.render(&catalog, black_box("HELLO WORLD"), Alignment::Left));
    });
}

fn bench_glyph_paragraph(c: &mut Criterion) {
    let catalog = block_catalog();
    let raster = GlyphRasterizer::new();
    let paragraph = "THE QUICK BROWN FOX\nJUMPS OVER\nTHE LAZY DOG\n".repeat(8);

    c.bench_function("glyph_paragraph_centered", |b| {
        b.iter(|| raster.render(&catalog, black_box(&paragraph), Alignment::Center));
    });
}

fn bench_vector_short_text(c: &mut Criterion) {
    let engine = TextEngine::new();
    if !engine.has_fonts() {
        return;
    }
    let mut raster = VectorRasterizer::new(engine);

    c.bench_function("vector_short_text", |b| {
        b.iter(|| {
            raster.render(
                black_box("Hello World!"),
                "monospace",
                black_box(16.0),
                Alignment::Left,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_glyph_short_text,
    bench_glyph_paragraph,
    bench_vector_short_text,
);
criterion_main!(benches);
