// Copyright 2026 The Journey Stream Project
// SPDX-License-Identifier: Apache-2.0

//! Scanner throughput benchmarks.
//!
//! Measures:
//! - plain text passthrough (no marker anywhere)
//! - marker-dense streams (a split occurrence per chunk)
//! - prefix churn (every chunk boundary lands mid-marker)
//!
//! Run: cargo bench --bench segmenter_latency

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use journey_stream::segment::MarkerScanner;

const MARKER: &str = "BREAK_TOKEN";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn plain_chunks() -> Vec<String> {
    (0..64)
        .map(|i| format!("chunk {i}: the quick brown fox jumps over the lazy dog. "))
        .collect()
}

fn marker_dense_chunks() -> Vec<String> {
    (0..64)
        .map(|i| format!("before {i} BREAK_TOKEN after {i} BREAK"))
        .collect()
}

fn prefix_churn_chunks() -> Vec<String> {
    // Each chunk ends with a marker prefix that the next chunk breaks,
    // forcing the pending buffer through its worst case every feed.
    (0..64).map(|i| format!("text {i} BREAK_TOKE")).collect()
}

fn drive(chunks: &[String]) -> usize {
    let mut scanner = MarkerScanner::new(MARKER);
    let mut events = 0;
    for chunk in chunks {
        events += scanner.feed(chunk).len();
    }
    events += scanner.flush_at_end().len();
    events
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_scanner(c: &mut Criterion) {
    let plain = plain_chunks();
    let dense = marker_dense_chunks();
    let churn = prefix_churn_chunks();

    c.bench_function("scanner/plain_text", |b| {
        b.iter(|| drive(black_box(&plain)))
    });
    c.bench_function("scanner/marker_dense", |b| {
        b.iter(|| drive(black_box(&dense)))
    });
    c.bench_function("scanner/prefix_churn", |b| {
        b.iter(|| drive(black_box(&churn)))
    });
}

criterion_group!(benches, bench_scanner);
criterion_main!(benches);
