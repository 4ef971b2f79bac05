//! Benchmark for the capture line pipeline.
//!
//! Feeds hcidump text through `run_with_io` with a collector stub that
//! answers immediately, so the numbers cover assembly, decoding, name
//! resolution and envelope serialization.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ruuvigate::app::{Options, run_with_io};
use ruuvigate::forwarder::{ForwardError, Transport};
use reqwest::Url;
use ruuvigate::{Alias, MacAddress, Settings};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::runtime::Runtime;

/// One RuuviTag data format 5 advertisement as printed by `hcidump --raw`.
const RECORD: &str = "\
> 04 3E 2B 02 01 00 01 4F 88 4C 33 B8 CB 1F 02 01 06 1B FF 99
  04 05 12 FC 53 94 C3 7C 00 04 FF FC 04 0C AC 36 42 00 CD CB
  B8 33 4C 88 4F B5
";

/// A non-Ruuvi advertisement of similar size.
const FOREIGN: &str = "\
> 04 3E 2B 02 01 00 01 11 22 33 44 55 66 1F 02 01 06 1B FF 4C
  00 02 15 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
  00 00 00 00 00 C5
";

/// Collector stub that accepts every post.
struct AcceptAll;

impl Transport for AcceptAll {
    fn post(
        &self,
        _url: &str,
        body: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<u16, ForwardError>> + Send + '_>> {
        black_box(body);
        Box::pin(async { Ok(200) })
    }
}

fn capture(records: &[&str]) -> String {
    let mut text = records.concat();
    text.push_str("> 04 0E 04 01 0C 20 00\n");
    text
}

fn settings() -> Settings {
    Settings {
        endpoint: Some(Url::parse("http://collector/ruuvi").unwrap()),
        tags: vec![Alias {
            address: MacAddress([0xCB, 0xB8, 0x33, 0x4C, 0x88, 0x4F]),
            name: "Sauna".to_string(),
        }],
        ..Settings::default()
    }
}

fn run(rt: &Runtime, options: &Options, settings: &Settings, text: &str) {
    let stats = rt
        .block_on(run_with_io(
            options,
            settings,
            text.as_bytes(),
            Box::new(AcceptAll),
        ))
        .unwrap();
    black_box(stats);
}

/// Batches of Ruuvi records through the full pipeline
fn bench_batch_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_pipeline");
    let rt = Runtime::new().unwrap();
    let options = Options::default();
    let settings = settings();

    for batch_size in [1, 10, 100] {
        let text = capture(&vec![RECORD; batch_size]);
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &text, |b, text| {
            b.iter(|| run(&rt, &options, &settings, text))
        });
    }

    group.finish();
}

/// Mixed traffic where most advertisements are not from Ruuvi tags
fn bench_mixed_traffic(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_traffic");
    let rt = Runtime::new().unwrap();
    let options = Options::default();
    let settings = settings();

    let records: Vec<&str> = (0..100)
        .map(|i| if i % 10 == 0 { RECORD } else { FOREIGN })
        .collect();
    let text = capture(&records);

    group.throughput(Throughput::Elements(100));
    group.bench_function("100_records_10_ruuvi", |b| {
        b.iter(|| run(&rt, &options, &settings, &text))
    });

    group.finish();
}

/// Throttling enabled: only the first of 100 records is serialized
fn bench_throttled_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("throttled_pipeline");
    let rt = Runtime::new().unwrap();
    let options = Options {
        throttle: Some(Duration::from_secs(3600)),
        ..Options::default()
    };
    let settings = settings();
    let text = capture(&[RECORD; 100]);

    group.throughput(Throughput::Elements(100));
    group.bench_function("100_same_mac_throttled", |b| {
        b.iter(|| run(&rt, &options, &settings, &text))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_batch_pipeline,
    bench_mixed_traffic,
    bench_throttled_pipeline,
);
criterion_main!(benches);
