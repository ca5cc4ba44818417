use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stockchart_core::{build_series, ChartType, LineOptions, StockDataPoint, Theme};

fn dataset(n: usize) -> Vec<StockDataPoint> {
    let start = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
    (0..n)
        .map(|i| {
            let x = i as f64;
            let date = start + chrono::Days::new(i as u64);
            let close = (x * 0.01).sin() * 10.0 + 50.0;
            StockDataPoint::new(date.format("%Y-%m-%d").to_string())
                .with("open", format!("{:.2}", close - 0.5))
                .with("high", close + 1.0)
                .with("low", close - 1.0)
                .with("close", close)
                .with("trend_q", close * 0.9)
                .with("fq", if i % 7 == 0 { String::new() } else { format!("{:.3}", close * 1.1) })
                .with("qv1", (x * 0.05).cos() * 1e6)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let theme = Theme::dark();
    let lines = LineOptions::new(["trend_q", "fq"]);
    let mut group = c.benchmark_group("build_series");
    for &n in &[1_000usize, 10_000usize] {
        let data = dataset(n);
        group.bench_function(format!("candlestick_{n}"), |b| {
            b.iter(|| black_box(build_series(&data, ChartType::Candlestick, None, None, &theme)))
        });
        group.bench_function(format!("line_{n}"), |b| {
            b.iter(|| black_box(build_series(&data, ChartType::Line, Some(&lines), None, &theme)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
