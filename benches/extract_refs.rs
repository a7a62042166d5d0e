//! Benchmarks for reference extraction throughput
//!
//! Tests the pattern table against synthetic script text to keep scans of
//! large projects (thousands of script lines) fast.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;

use assetscope::config::ScanConfig;
use assetscope::extract::extract_from_str;
use assetscope::extract::patterns::PatternSet;
use assetscope::normalize::Normalizer;

/// Build a synthetic script with the given number of lines, mixing
/// dialogue with every reference syntax the extractor recognizes.
fn create_script(lines: usize) -> String {
    let mut script = String::new();
    for i in 0..lines {
        match i % 6 {
            0 => script.push_str(&format!("    scene bg_location_{}\n", i)),
            1 => script.push_str(&format!("    show character_{} happy\n", i)),
            2 => script.push_str(&format!(
                "image portrait_{} = \"images/portraits/p_{}.png\"\n",
                i, i
            )),
            3 => script.push_str(&format!(
                "    imagebutton auto \"gui/button_{}_%s.png\" action NullAction()\n",
                i
            )),
            4 => script.push_str("    \"Just a line of dialogue, nothing to extract.\"\n"),
            _ => script.push_str("    pause 0.5\n"),
        }
    }
    script
}

fn bench_extract(c: &mut Criterion) {
    let config = ScanConfig::default();
    let patterns = PatternSet::for_config(&config).unwrap();
    let normalizer = Normalizer::new(&config);
    let script_path = Path::new("bench.rpy");

    let mut group = c.benchmark_group("extract_from_str");
    for lines in [100, 1_000, 10_000] {
        let script = create_script(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &script, |b, text| {
            b.iter(|| {
                let tokens = extract_from_str(
                    black_box(text),
                    script_path,
                    &patterns,
                    &normalizer,
                );
                black_box(tokens.len())
            });
        });
    }
    group.finish();
}

fn bench_pattern_table(c: &mut Criterion) {
    let config = ScanConfig::default();
    c.bench_function("pattern_set_build", |b| {
        b.iter(|| PatternSet::for_config(black_box(&config)).unwrap())
    });
}

criterion_group!(benches, bench_extract, bench_pattern_table);
criterion_main!(benches);
