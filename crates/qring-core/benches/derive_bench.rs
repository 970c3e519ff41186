//! Criterion benchmarks for label derivation.
//!
//! The UI re-derives the action URI and address line on every render, so
//! these measure one full derivation pass plus phone normalization on its own.
//!
//! Run with:
//! ```bash
//! cargo bench --package qring-core --bench derive_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qring_core::{
    decide_initial_route, validate_config, Address, CommunicationMode, ConfigForm, ConfigRecord,
    PayloadDeriver,
};

/// Raw inputs covering each normalization rule.
const BENCH_RAW_NUMBERS: &[&str] = &[
    "+54 9 11 1234-5678",
    "54 11 1234 5678",
    "9 11 1234 5678",
    "(011) 1234-5678",
    "",
];

fn sample_record() -> ConfigRecord {
    ConfigRecord {
        contact_number: Some("5491112345678".to_string()),
        address: Some(Address {
            street: "Av. Corrientes".to_string(),
            number: "1234".to_string(),
            unit: Some("4B".to_string()),
        }),
        show_address_on_label: true,
        communication_mode: CommunicationMode::WhatsApp,
    }
}

// ── Benchmarks: normalization ────────────────────────────────────────────────

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let deriver = PayloadDeriver::default();

    group.bench_function("normalize_batch_5", |b| {
        b.iter(|| {
            BENCH_RAW_NUMBERS
                .iter()
                .map(|raw| deriver.plan.normalize(black_box(raw)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

// ── Benchmarks: full render pass ─────────────────────────────────────────────

fn bench_render_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_pass");
    let deriver = PayloadDeriver::default();
    let record = sample_record();
    let form = ConfigForm::from_record(&record);

    group.bench_function("uri_address_route", |b| {
        b.iter(|| {
            let record = black_box(&record);
            (
                deriver.derive_action_uri(record),
                deriver.format_address_display(record),
                decide_initial_route(Some(record)),
            )
        })
    });

    group.bench_function("validate_form", |b| {
        b.iter(|| validate_config(black_box(&form)))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_render_pass);
criterion_main!(benches);
