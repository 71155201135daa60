use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [1_024usize, 10_240, 102_400] {
        let input = make_input(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| envfile::parse_str(black_box(input)).expect("parse should succeed"));
        });
    }
    group.finish();
}

fn bench_parse_interpolated(c: &mut Criterion) {
    let input = make_interpolated_input(2_000);
    c.bench_function("parse_interpolated", |b| {
        b.iter(|| envfile::parse_str(black_box(&input)).expect("parse should succeed"));
    });
}

fn make_input(bytes: usize) -> String {
    let line = "KEY=value\n";
    let repeat = bytes / line.len() + 1;
    line.repeat(repeat)
}

fn make_interpolated_input(entries: usize) -> String {
    let mut content = String::with_capacity(entries * 24);
    content.push_str("BASE=/opt/app\n");
    for idx in 0..entries {
        content.push_str(&format!("KEY_{idx}=${{BASE}}/bin\n"));
    }
    content
}

criterion_group!(benches, bench_parse, bench_parse_interpolated);
criterion_main!(benches);
