//! Benchmarks for the dashboard view model: merge, derived insights and rendering

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use triggerio_core::{DashboardPayload, fallback, types::FunnelStage};
use triggerio_web::{
    filters::FilterState, insights::funnel_summary, pages::render_dashboard, view::DashboardView,
};

/// A payload that supplies every section
fn full_payload() -> DashboardPayload {
    DashboardPayload {
        overview: Some(fallback::overview()),
        temperature_data: Some(fallback::temperature()),
        funnel_data: Some(fallback::funnel()),
        email_campaigns: Some(fallback::email_campaigns()),
        social_media_data: Some(fallback::social_media()),
        automation_rules: Some(fallback::automation_rules()),
        ghl_transfers_data: Some(fallback::ghl_transfers()),
        recent_activities: Some(fallback::recent_activities()),
    }
}

/// Benchmark the section-by-section merge
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_merge");
    let full = full_payload();
    let partial = DashboardPayload {
        overview: Some(fallback::overview()),
        ..DashboardPayload::default()
    };

    group.bench_function("no_payload", |b| b.iter(|| DashboardView::merge(black_box(None))));
    group.bench_function("partial_payload", |b| {
        b.iter(|| DashboardView::merge(black_box(Some(&partial))));
    });
    group.bench_function("full_payload", |b| {
        b.iter(|| DashboardView::merge(black_box(Some(&full))));
    });

    group.finish();
}

/// Benchmark funnel insights over growing funnels
fn bench_funnel_insights(c: &mut Criterion) {
    let mut group = c.benchmark_group("funnel_insights");

    for size in [6_u64, 50, 500] {
        let stages: Vec<FunnelStage> = (0..size)
            .map(|i| FunnelStage {
                stage: format!("Stage {i}"),
                count: Some((size - i) * 100),
                percentage: Some((size - i) as f64 / size as f64 * 100.0),
                color: "#7C3AED".to_string(),
            })
            .collect();

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("summary", size), &stages, |b, stages| {
            b.iter(|| funnel_summary(black_box(stages)));
        });
    }

    group.finish();
}

/// Benchmark a full page render from the fallback view
fn bench_render(c: &mut Criterion) {
    let view = DashboardView::merge(None);
    let filters = FilterState::default();

    c.bench_function("render_dashboard", |b| {
        b.iter(|| render_dashboard(black_box(&view), black_box(&filters), false));
    });
}

criterion_group!(benches, bench_merge, bench_funnel_insights, bench_render);
criterion_main!(benches);
