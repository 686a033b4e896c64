//! Benchmarks for markdown layout and full-frame rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pagecraft::app::{Message, Model, update};
use pagecraft::markdown;
use pagecraft::page::Page;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

const SAMPLE: &str = "# Release notes\n\n\
Some **bold** and *italic* text with `code` and a [link](https://example.com).\n\n\
> A quoted paragraph that is long enough to wrap across several terminal lines.\n\n\
- first item\n- second item\n- third item\n\n\
1. one\n2. two\n";

fn bench_parse_with_layout(c: &mut Criterion) {
    c.bench_function("parse_with_layout", |b| {
        b.iter(|| markdown::parse_with_layout(black_box(SAMPLE), black_box(60)))
    });
}

fn bench_render_frames(c: &mut Criterion) {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    let mut build = Model::new(Page::demo(), (120, 40));
    let mut preview = update(Model::new(Page::demo(), (120, 40)), Message::OpenPreview);

    c.bench_function("render_build", |b| {
        b.iter(|| {
            terminal
                .draw(|frame| pagecraft::ui::render(&mut build, frame))
                .unwrap();
        })
    });
    c.bench_function("render_preview", |b| {
        b.iter(|| {
            terminal
                .draw(|frame| pagecraft::ui::render(&mut preview, frame))
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_parse_with_layout, bench_render_frames);
criterion_main!(benches);
