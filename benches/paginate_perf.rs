//! Criterion benchmarks for page computation.
//!
//! Targets, for a 5000-producer leaderboard:
//! - Unfiltered page: < 50us
//! - Searched page: < 2ms
//! - Control strip: < 5us

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use leaderboard::config::DisplayConfig;
use leaderboard::core::{Entry, PageRequest, Paginator, ResultSet, Source, controls, filter};
use leaderboard::server::render;

fn leaderboard_of(n: usize) -> ResultSet {
    let entries = (0..n)
        .map(|i| {
            Entry::new(
                format!("B62q{i:06}xLwQnRkYtPz"),
                Some((n - i) as i64),
                100.0 * (n - i) as f64 / n as f64,
            )
        })
        .collect();
    ResultSet::new(Source::Snark, entries, n as i64, Some("01-01-2025 00:00".to_string()))
}

fn paginate_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    let paginator = Paginator::new(DisplayConfig {
        show_score_column: true,
        ..DisplayConfig::default()
    });

    for size in [100, 1000, 5000] {
        let rs = leaderboard_of(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("first_page", size), &rs, |b, rs| {
            let request = PageRequest::first(10);
            b.iter(|| paginator.compute(black_box(rs), black_box(&request)));
        });

        group.bench_with_input(BenchmarkId::new("last_page", size), &rs, |b, rs| {
            let request = PageRequest::page(10, size.div_ceil(10));
            b.iter(|| paginator.compute(black_box(rs), black_box(&request)));
        });

        group.bench_with_input(BenchmarkId::new("search", size), &rs, |b, rs| {
            let request = PageRequest::first(10).with_search(Some("q00"));
            b.iter(|| paginator.compute(black_box(rs), black_box(&request)));
        });
    }

    group.finish();
}

fn filter_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let rs = leaderboard_of(5000);

    group.bench_function("no_match", |b| {
        b.iter(|| filter::filter(black_box(&rs.entries), black_box(Some("zzzz"))));
    });

    group.bench_function("mixed_case", |b| {
        b.iter(|| filter::filter(black_box(&rs.entries), black_box(Some("XLWQ"))));
    });

    group.finish();
}

fn controls_benchmarks(c: &mut Criterion) {
    c.bench_function("controls/build", |b| {
        b.iter(|| controls::build(black_box(7), black_box(500), black_box(10), black_box(60)));
    });
}

fn render_benchmarks(c: &mut Criterion) {
    let rs = leaderboard_of(1000);
    let page = Paginator::default()
        .compute(&rs, &PageRequest::first(100))
        .expect("valid request");

    let layout = render::FragmentLayout::default();

    c.bench_function("render/html_fragment_100_rows", |b| {
        b.iter(|| render::page_fragment(black_box(&page), Some("snark-1"), &layout));
    });
}

criterion_group!(
    benches,
    paginate_benchmarks,
    filter_benchmarks,
    controls_benchmarks,
    render_benchmarks
);
criterion_main!(benches);
