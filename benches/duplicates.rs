use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mzsplash::io::{find_duplicates, parse_peak_list, DuplicateFinder, ParseMode, SplashRecord};

fn make_records(n: usize, run_length: usize) -> Vec<SplashRecord> {
    (0..n)
        .map(|i| {
            SplashRecord::new(
                format!("splash10-0udi-0900000000-{:020x}", i / run_length),
                format!("origin:{i}"),
                None,
            )
        })
        .collect()
}

fn make_peak_list(n: usize) -> String {
    (0..n)
        .map(|i| format!("{:.4}:{:.1}", 50.0 + i as f64 * 0.37, (i * 7 % 1000) as f64))
        .collect::<Vec<_>>()
        .join(" ")
}

fn duplicate_search(c: &mut Criterion) {
    let unique = make_records(10_000, 1);
    let paired = make_records(10_000, 2);
    c.bench_function("find_duplicates_unique", |b| {
        b.iter(|| {
            let mut finder = DuplicateFinder::new(Vec::new(), Vec::<(String, String)>::new());
            find_duplicates(black_box(unique.iter().cloned()), &mut finder).unwrap()
        })
    });
    c.bench_function("find_duplicates_paired", |b| {
        b.iter(|| {
            let mut finder = DuplicateFinder::new(Vec::new(), Vec::<(String, String)>::new());
            find_duplicates(black_box(paired.iter().cloned()), &mut finder).unwrap()
        })
    });
}

fn peak_list_parsing(c: &mut Criterion) {
    let text = make_peak_list(500);
    c.bench_function("parse_peak_list", |b| {
        b.iter(|| parse_peak_list(black_box(&text), ParseMode::Lenient).unwrap())
    });
}

criterion_group!(benches, duplicate_search, peak_list_parsing);
criterion_main!(benches);
