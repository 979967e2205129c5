//! 重启闸门基准测试
//!
//! 测试滑动窗口频率判定在不同记录规模下的性能

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use service_sentinel::config::{CheckSpec, ServiceSpec};
use service_sentinel::health::RestartGate;

/// 创建基准测试用的服务定义
fn create_test_services(count: usize, max_restarts_per_hour: u32) -> Vec<ServiceSpec> {
    (0..count)
        .map(|i| ServiceSpec {
            name: format!("service-{}", i),
            restart_on_failure: true,
            max_restarts_per_hour,
            check: CheckSpec::Systemd,
        })
        .collect()
}

/// 重启闸门基准测试
fn restart_gate_benchmark(c: &mut Criterion) {
    c.bench_function("gate_allow_under_quota", |b| {
        let services = create_test_services(100, 3);
        let gate = RestartGate::new(&services);
        let now = Utc::now();

        b.iter(|| {
            let allowed = gate.allow(black_box("service-50"), now);
            black_box(allowed)
        });
    });

    c.bench_function("gate_allow_at_quota", |b| {
        let services = create_test_services(1, 3);
        let gate = RestartGate::new(&services);
        let now = Utc::now();
        // 窗口内已有3条记录，allow每次都会扫描并拒绝
        gate.record("service-0", now - Duration::minutes(30));
        gate.record("service-0", now - Duration::minutes(20));
        gate.record("service-0", now - Duration::minutes(10));

        b.iter(|| {
            let allowed = gate.allow(black_box("service-0"), now);
            black_box(allowed)
        });
    });

    c.bench_function("gate_record_burst", |b| {
        let services = create_test_services(1, 100);
        let now = Utc::now();

        b.iter(|| {
            let gate = RestartGate::new(&services);
            for _ in 0..10 {
                gate.record("service-0", now);
            }
            black_box(gate.used("service-0", now))
        });
    });

    c.bench_function("gate_prune_expired_records", |b| {
        let services = create_test_services(1, 5);
        let now = Utc::now();
        let aged = now - Duration::minutes(90);

        b.iter(|| {
            let gate = RestartGate::new(&services);
            for _ in 0..100 {
                gate.record("service-0", aged);
            }
            // 过期记录在allow时被惰性清理
            let allowed = gate.allow("service-0", now);
            black_box(allowed)
        });
    });
}

criterion_group!(benches, restart_gate_benchmark);
criterion_main!(benches);
