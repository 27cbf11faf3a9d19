use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use mailnote::convert::markdown::html_to_markdown;
use mailnote::parser::mime::decode_message;

fn newsletter_html() -> String {
    let mut html = String::from("<html><body><center><h1>Weekly digest</h1></center>");
    for i in 0..200 {
        html.push_str(&format!(
            "<p>Item {i}: <b>bold</b> and <a href=\"https://example.com/{i}\">a link</a>.</p>"
        ));
    }
    html.push_str("<table><tr><th>Name</th><th>Value</th></tr>");
    for i in 0..100 {
        html.push_str(&format!("<tr><td>row {i}</td><td>{}</td></tr>", i * 3));
    }
    html.push_str("</table></body></html>");
    html
}

fn bench_html_to_markdown(c: &mut Criterion) {
    let html = newsletter_html();
    c.bench_function("html_to_markdown_newsletter", |b| {
        b.iter(|| html_to_markdown(&html).unwrap())
    });
}

fn bench_decode_message(c: &mut Criterion) {
    let fixture_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("html_table.eml");
    let raw = std::fs::read(fixture_path).unwrap();

    c.bench_function("decode_html_table_eml", |b| b.iter(|| decode_message(&raw)));
}

criterion_group!(benches, bench_html_to_markdown, bench_decode_message);
criterion_main!(benches);
