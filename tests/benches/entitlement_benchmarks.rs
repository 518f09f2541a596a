//! # Entitlement Authority Benchmarks
//!
//! | Operation | Path | Target |
//! |-----------|------|--------|
//! | Code issuance | CSPRNG + DashMap insert | < 10µs |
//! | Status check | code index + record read | < 5µs |
//! | Activation | claim → record write → confirm | < 20µs |
//! | Maintenance sweep | full store scan | linear in store size |

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use ea_01_code_registry::{CodeRegistryConfig, CsprngCodeGenerator, IssueRequest};
use ea_03_entitlement::{EntitlementApi, EntitlementConfig, EntitlementService};
use shared_types::{AccountId, MockTimeSource, Plan, SubscriptionLevel, DAY_MS};
use std::sync::Arc;

const T0: u64 = 1_700_000_000_000;

fn service(max_codes: usize) -> (EntitlementService, Arc<MockTimeSource>) {
    let clock = Arc::new(MockTimeSource::new(T0));
    let config = CodeRegistryConfig {
        max_codes,
        ..CodeRegistryConfig::default()
    };
    let service = EntitlementService::in_memory(
        EntitlementConfig::default(),
        config,
        Arc::new(CsprngCodeGenerator::default()),
        clock.clone(),
    );
    (service, clock)
}

fn activation_request(i: usize) -> IssueRequest {
    IssueRequest::activation(
        AccountId::new(format!("acct-{i}")),
        Plan::for_level(SubscriptionLevel::Standard),
    )
}

fn bench_issuance(c: &mut Criterion) {
    let mut group = c.benchmark_group("ea-01-issuance");
    group.throughput(Throughput::Elements(1));

    let (service, _) = service(usize::MAX);
    let mut i = 0usize;
    group.bench_function("issue_activation_code", |b| {
        b.iter(|| {
            i += 1;
            black_box(service.issue_code(activation_request(i)).is_ok())
        })
    });
    group.finish();
}

fn bench_redemption(c: &mut Criterion) {
    let mut group = c.benchmark_group("ea-03-redemption");

    let (service, _) = service(usize::MAX);
    let mut i = 0usize;
    group.bench_function("activate", |b| {
        b.iter_batched(
            || {
                i += 1;
                service
                    .issue_code(activation_request(i))
                    .map(|code| code.value.to_string())
                    .unwrap_or_default()
            },
            |code| black_box(service.activate(&code).is_ok()),
            BatchSize::SmallInput,
        )
    });

    let code = service
        .issue_code(activation_request(0))
        .map(|code| code.value.to_string())
        .unwrap_or_default();
    let _ = service.activate(&code);
    group.bench_function("check_status_active", |b| {
        b.iter(|| black_box(service.check_status(&code).is_ok()))
    });
    group.finish();
}

fn bench_maintenance(c: &mut Criterion) {
    let mut group = c.benchmark_group("ea-03-maintenance");

    for size in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sweep", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let (service, clock) = service(size);
                    for i in 0..size {
                        let _ = service.issue_code(activation_request(i));
                    }
                    clock.advance(30 * DAY_MS);
                    service
                },
                |service| black_box(service.run_maintenance().is_ok()),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_issuance, bench_redemption, bench_maintenance);
criterion_main!(benches);
