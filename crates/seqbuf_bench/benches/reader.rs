//! Reader benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seqbuf_bench::{random_data, random_lines, segmented};
use seqbuf_core::{Reader, Sequence};

/// Benchmark big-endian reads on the fast and the boundary-straddling path.
fn bench_read_integers(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_u32_be");
    let data = random_data(64 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    // One segment: every read takes the fast path.
    group.bench_function("contiguous", |b| {
        let seq = Sequence::from_slice(&data);
        b.iter(|| {
            let mut reader = Reader::new(&seq);
            let mut sum = 0u64;
            while let Some(value) = reader.try_read_u32_be() {
                sum = sum.wrapping_add(u64::from(value));
            }
            black_box(sum);
        });
    });

    // Odd segment sizes: a share of the reads straddles a boundary.
    for size in [3usize, 7, 61, 4093] {
        let seq = segmented(&data, size);
        group.bench_with_input(BenchmarkId::new("segmented", size), &seq, |b, seq| {
            b.iter(|| {
                let mut reader = Reader::new(seq);
                let mut sum = 0u64;
                while let Some(value) = reader.try_read_u32_be() {
                    sum = sum.wrapping_add(u64::from(value));
                }
                black_box(sum);
            });
        });
    }
    group.finish();
}

/// Benchmark CRLF line splitting.
fn bench_read_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_lines");
    let text = random_lines(2048, 80);
    group.throughput(Throughput::Bytes(text.len() as u64));

    for size in [1usize, 16, 512, usize::MAX] {
        let seq = if size == usize::MAX {
            Sequence::from_slice(&text)
        } else {
            segmented(&text, size)
        };
        let label = if size == usize::MAX {
            "contiguous".to_string()
        } else {
            size.to_string()
        };
        group.bench_with_input(BenchmarkId::from_parameter(label), &seq, |b, seq| {
            b.iter(|| {
                let mut reader = Reader::new(seq);
                let mut lines = 0usize;
                while let Some(line) = reader.try_read_to(b"\r\n", true) {
                    lines += 1;
                    black_box(line.len());
                }
                black_box(lines);
            });
        });
    }
    group.finish();
}

/// Benchmark skipping runs of whitespace.
fn bench_advance_past(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_past_any");
    let mut text = Vec::new();
    for _ in 0..1024 {
        text.extend_from_slice(b" \t \t  word");
    }
    let seq = segmented(&text, 13);

    group.bench_function("segmented_13", |b| {
        b.iter(|| {
            let mut reader = Reader::new(&seq);
            let mut skipped = 0usize;
            while !reader.end() {
                skipped += reader.advance_past_any(b" \t");
                if !reader.try_advance_to(b" ", false) {
                    reader.advance_to_end();
                }
            }
            black_box(skipped);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_read_integers,
    bench_read_lines,
    bench_advance_past
);
criterion_main!(benches);
