//! Benchmarks for frame assembly and decoding in isolation.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use ruuvigate::{FrameAssembler, PressureUnit, decode};

const RECORD_LINES: [&str; 3] = [
    "> 04 3E 2B 02 01 00 01 4F 88 4C 33 B8 CB 1F 02 01 06 1B FF 99",
    "  04 05 12 FC 53 94 C3 7C 00 04 FF FC 04 0C AC 36 42 00 CD CB",
    "  B8 33 4C 88 4F B5",
];

fn sample_frame() -> Vec<u8> {
    let mut assembler = FrameAssembler::new();
    for line in RECORD_LINES {
        assembler.feed(line);
    }
    assembler.feed(">").unwrap()
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    group.throughput(Throughput::Elements(1));

    group.bench_function("record", |b| {
        let mut assembler = FrameAssembler::new();
        b.iter(|| {
            for line in RECORD_LINES {
                black_box(assembler.feed(black_box(line)));
            }
        })
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    let frame = sample_frame();
    group.bench_function("ruuvi", |b| {
        b.iter(|| black_box(decode(black_box(&frame), PressureUnit::Pa)))
    });

    let mut foreign = frame.clone();
    foreign[19] = 0x4C;
    group.bench_function("foreign", |b| {
        b.iter(|| black_box(decode(black_box(&foreign), PressureUnit::Pa)))
    });

    let short = &frame[..20];
    group.bench_function("short", |b| {
        b.iter(|| black_box(decode(black_box(short), PressureUnit::Pa)))
    });

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_decode);
criterion_main!(benches);
