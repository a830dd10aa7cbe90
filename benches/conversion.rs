// Benchmarks for HTML-to-Markdown conversion.

use criterion::{criterion_group, criterion_main, Criterion};
use html_to_markdown::convert;

fn bench_simple(c: &mut Criterion) {
    let html = "<h1>Hello</h1><p>This is a <strong>simple</strong> document.</p>";
    c.bench_function("simple_document", |b| {
        b.iter(|| convert(html).unwrap());
    });
}

fn bench_structured(c: &mut Criterion) {
    let section = concat!(
        "<h2>Section</h2>",
        r#"<p>Text with a <a href="https://example.com/">link</a> and <code>code</code>.</p>"#,
        "<ul><li>one</li><li>two</li><li>three</li></ul>",
        "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>"
    );
    let html = section.repeat(50);
    c.bench_function("structured_document", |b| {
        b.iter(|| convert(&html).unwrap());
    });
}

criterion_group!(benches, bench_simple, bench_structured);
criterion_main!(benches);
