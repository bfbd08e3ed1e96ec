//! Decision benchmarks for the feed filter engine.
//!
//! Measures single-entry decisions against a realistic filter configuration,
//! deep nesting, and batch evaluation with and without rayon.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feed_filter::{
    Condition, EngineConfig, Entry, Field, FilterAction, FilterEngine, FilterGroup, FilterScope,
    FilterSet, LogicalOp,
};

const FILTERS_YAML: &str = r#"
- name: no-sponsored
  scope: feed
  action: filter_out_if_match
  top_operator: or
  groups:
    - operator: or
      conditions:
        - {field: title, match_type: contains, pattern: "sponsored"}
        - {field: title, match_type: contains, pattern: "advertisement"}
        - {field: link, match_type: match_regex, pattern: "utm_(source|campaign)=promo"}
    - operator: and
      negate: true
      conditions:
        - {field: description, match_type: longer_than, pattern: "40"}
- name: summarize-tech
  scope: summary_only
  action: filter_for_if_match
  groups:
    - operator: or
      conditions:
        - {field: title_or_description, match_type: match_regex, pattern: "\\b(rust|linux|kernel|compiler)\\b"}
        - {field: title, match_type: contains, pattern: "release"}
"#;

fn sample_entries(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| match i % 4 {
            0 => Entry::new(
                format!("Rust 1.{i} release notes"),
                format!("https://blog.example.org/rust-{i}"),
                "The compiler gained faster incremental builds and new lints.",
            ),
            1 => Entry::new(
                format!("Sponsored: deal #{i}"),
                format!("https://shop.example.com/{i}?utm_source=promo"),
                "Buy now.",
            ),
            2 => Entry::new(
                format!("Weekend reading {i}"),
                format!("https://news.example.net/{i}"),
                "A long-form essay on gardening, cooking and the joy of slow weekends.",
            ),
            _ => Entry::new(
                format!("Linux kernel 6.{i} is out"),
                format!("https://lwn.example.net/{i}"),
                "<p>Merge window highlights include scheduler work and filesystem fixes.</p>",
            ),
        })
        .collect()
}

fn bench_single_decision(c: &mut Criterion) {
    let engine = FilterEngine::from_yaml(FILTERS_YAML).unwrap();
    let entries = sample_entries(4);

    c.bench_function("decide_single_entry", |b| {
        b.iter(|| {
            for entry in &entries {
                black_box(engine.decide(black_box(entry)).unwrap());
            }
        })
    });
}

fn bench_nesting_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("nesting_depth");
    let entry = Entry::new("foo bar baz", "https://x/1", "");

    for depth in [1usize, 10, 100, 1000] {
        let mut tree = FilterGroup::and().with_condition(Condition::contains(Field::Title, "bar"));
        for level in 0..depth {
            let op = if level % 2 == 0 { LogicalOp::Or } else { LogicalOp::And };
            tree = FilterGroup::new(op).with_subgroup(tree);
        }
        let sets = vec![FilterSet::new("deep", FilterScope::Feed, FilterAction::FilterForIfMatch)
            .with_group(tree)];

        group.bench_with_input(BenchmarkId::new("decide", depth), &sets, |b, sets| {
            b.iter(|| black_box(feed_filter::decide(black_box(&entry), sets).unwrap()))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let entries = sample_entries(2000);

    let sequential =
        FilterEngine::from_yaml_with_config(FILTERS_YAML, EngineConfig::development()).unwrap();
    let parallel =
        FilterEngine::from_yaml_with_config(FILTERS_YAML, EngineConfig::high_performance())
            .unwrap();

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(sequential.decide_batch(black_box(&entries))))
    });
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(parallel.decide_batch(black_box(&entries))))
    });

    group.finish();
}

criterion_group!(benches, bench_single_decision, bench_nesting_depth, bench_batch);
criterion_main!(benches);
