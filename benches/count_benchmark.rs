//! Performance benchmarks for ParlaMint
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parlamint::analysis::{count_occurrences, session_form_counts, session_usage};
use parlamint::corpus::Session;
use std::path::Path;

const SENTENCE: &str = "Vom vota acest proiect și vom discuta amendamentele, dar nu voi accepta amânarea. ";

fn future_forms() -> Vec<String> {
    let forms = [
        "voi vota", "vei vota", "va vota", "vom vota", "veți vota", "vor vota",
        "voi discuta", "vom discuta", "voi accepta", "vor accepta", "va fi", "vor fi",
    ];
    forms.iter().map(|f| f.to_string()).collect()
}

/// Build a session document with the given number of utterances
fn session_xml(utterances: usize) -> String {
    let mut body = String::new();
    for i in 0..utterances {
        body.push_str(&format!(
            "<u who=\"#Speaker-{}\"><seg>{}</seg></u>",
            i % 25,
            SENTENCE.repeat(8)
        ));
    }
    format!(
        r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader><settingDesc><setting><date when="2019-03-12"/></setting></settingDesc></teiHeader><text><body>{}</body></text></TEI>"#,
        body
    )
}

fn bench_count_occurrences(c: &mut Criterion) {
    let text = SENTENCE.repeat(1000);
    let mut group = c.benchmark_group("count_occurrences");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("vom_vota", |b| {
        b.iter(|| count_occurrences(black_box(&text), black_box("vom vota")))
    });
    group.finish();
}

fn bench_parse_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_session");

    for utterances in [100usize, 1000].iter() {
        let xml = session_xml(*utterances);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(utterances), &xml, |b, xml| {
            b.iter(|| Session::from_xml(black_box(xml), Path::new("bench.xml")).unwrap())
        });
    }

    group.finish();
}

fn bench_session_counts(c: &mut Criterion) {
    let session = Session::from_xml(&session_xml(1000), Path::new("bench.xml")).unwrap();
    let forms = future_forms();

    c.bench_function("session_usage_1000_utterances", |b| {
        b.iter(|| session_usage(black_box(&forms), black_box(&session)))
    });
    c.bench_function("session_form_counts_1000_utterances", |b| {
        b.iter(|| session_form_counts(black_box(&forms), black_box(&session)))
    });
}

criterion_group!(
    benches,
    bench_count_occurrences,
    bench_parse_session,
    bench_session_counts
);
criterion_main!(benches);
