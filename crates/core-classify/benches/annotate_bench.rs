use core_classify::{AnnotateOptions, Dialect, annotate, comment_section_length};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn verbose_template(hunks: usize) -> String {
    let mut text = String::from("Subject line for the benchmark\n\nBody text that wraps nicely.\n\n");
    text.push_str("# Please enter the commit message for your changes.\n#\n");
    text.push_str("# ------------------------ >8 ------------------------\n");
    text.push_str("# Do not modify or remove the line above.\n");
    for i in 0..hunks {
        text.push_str(&format!("diff --git a/f{i} b/f{i}\nindex 0000000..1111111 100644\n"));
        text.push_str(&format!("--- a/f{i}\n+++ b/f{i}\n@@ -1,2 +1,2 @@\n-old line {i}\n+new line {i}\n context\n"));
    }
    text
}

fn bench_annotate(c: &mut Criterion) {
    let text = verbose_template(5_000);
    let comment_len = comment_section_length(&text, Dialect::Git);
    let opts = AnnotateOptions::new(Dialect::Git, comment_len);

    c.bench_function("comment_section_length_verbose", |b| {
        b.iter(|| comment_section_length(black_box(&text), Dialect::Git))
    });
    c.bench_function("annotate_verbose", |b| {
        b.iter(|| annotate(black_box(&text), black_box(&opts)))
    });
}

criterion_group!(benches, bench_annotate);
criterion_main!(benches);
