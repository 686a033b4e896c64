//! Benchmarks for row packing and grid placement.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pagecraft::page::{BlockKind, BlockPatch, BlockWidth, Page, pack_rows};
use pagecraft::ui::content_height;
use pagecraft::ui::grid::grid_layout;

fn sample_page(blocks: usize) -> Page {
    let mut page = Page::new();
    for i in 0..blocks {
        let width = if i % 3 == 0 {
            BlockWidth::Full
        } else {
            BlockWidth::Half
        };
        let id = page.append(BlockKind::Text, width);
        let _ = page.replace_fields(
            id,
            BlockPatch::Text(format!("## Block {i}\n\nSome *body* text for block {i}.")),
        );
    }
    page
}

fn bench_pack_rows(c: &mut Criterion) {
    let page = sample_page(200);
    c.bench_function("pack_rows_200", |b| {
        b.iter(|| pack_rows(black_box(page.blocks())))
    });
}

fn bench_grid_layout(c: &mut Criterion) {
    let page = sample_page(200);
    c.bench_function("grid_layout_200", |b| {
        b.iter(|| {
            grid_layout(black_box(&page), black_box(96), 1, 1, |block, width| {
                content_height(block, width) + 2
            })
        })
    });
}

criterion_group!(benches, bench_pack_rows, bench_grid_layout);
criterion_main!(benches);
