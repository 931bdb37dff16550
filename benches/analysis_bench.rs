//! Benchmarks for section analysis

use std::f64::consts::PI;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use section_solver::prelude::*;

fn reinforced_rect() -> Section {
    let concrete = Arc::new(
        Material::concrete(
            "40 MPa Concrete",
            2.4e-6,
            32.8e3,
            40.0,
            0.85,
            0.77,
            0.003,
            0.85,
            0.6 * 40.0_f64.sqrt(),
        )
        .unwrap(),
    );
    let steel = Arc::new(Material::steel("500 MPa Steel", 7.85e-6, 200e3, 500.0, 0.05).unwrap());

    let region = MatrixRegion::new(Polygon::rectangle(300.0, 900.0).unwrap(), concrete);
    let mut bars = Vec::new();
    for x in [75.0, 150.0, 225.0] {
        bars.push(Inclusion::new(x, 862.0, 200.0, Arc::clone(&steel)).unwrap());
        bars.push(Inclusion::new(x, 42.0, 450.0, Arc::clone(&steel)).unwrap());
    }
    Section::new(vec![region], bars).unwrap()
}

fn circular_section() -> Section {
    let concrete = Arc::new(
        Material::concrete(
            "40 MPa Concrete",
            2.4e-6,
            32.8e3,
            40.0,
            0.85,
            0.77,
            0.003,
            0.85,
            0.6 * 40.0_f64.sqrt(),
        )
        .unwrap(),
    );
    let steel = Arc::new(Material::steel("500 MPa Steel", 7.85e-6, 200e3, 500.0, 0.05).unwrap());

    let region = MatrixRegion::new(Polygon::circle(750.0, 64).unwrap(), concrete);
    let ring = 375.0 - 50.0;
    let bars = (0..12)
        .map(|k| {
            let angle = 2.0 * PI * k as f64 / 12.0;
            Inclusion::new(
                ring * angle.cos(),
                ring * angle.sin(),
                450.0,
                Arc::clone(&steel),
            )
            .unwrap()
        })
        .collect();
    Section::new(vec![region], bars).unwrap()
}

fn benchmark_gross_properties(c: &mut Criterion) {
    c.bench_function("gross_properties_rect", |b| {
        b.iter(|| {
            let section = reinforced_rect();
            black_box(section.gross_properties());
        })
    });
}

fn benchmark_uncracked_stress(c: &mut Criterion) {
    let section = reinforced_rect();
    c.bench_function("uncracked_stress_rect", |b| {
        b.iter(|| {
            let stress = section.uncracked_stress(1e5, 10e6, -4e6).unwrap();
            black_box(stress);
        })
    });
}

fn benchmark_cracked_analysis(c: &mut Criterion) {
    let section = reinforced_rect();
    let options = AnalysisOptions::default();
    c.bench_function("cracked_properties_and_stress_rect", |b| {
        b.iter(|| {
            let cracked = section.cracked_properties(0.3, &options).unwrap();
            let stress = section.cracked_stress(&cracked, 1e3, 10e6, &options).unwrap();
            black_box(stress);
        })
    });
}

fn benchmark_ultimate_capacity(c: &mut Criterion) {
    let rect = reinforced_rect();
    let circle = circular_section();
    let options = AnalysisOptions::default();

    c.bench_function("ultimate_capacity_rect", |b| {
        b.iter(|| {
            let ultimate = rect.ultimate_capacity(0.0, 1e5, &options).unwrap();
            black_box(ultimate);
        })
    });
    c.bench_function("ultimate_capacity_circle", |b| {
        b.iter(|| {
            let ultimate = circle.ultimate_capacity(0.4, 1e5, &options).unwrap();
            black_box(ultimate);
        })
    });
}

fn benchmark_diagrams(c: &mut Criterion) {
    let section = reinforced_rect();
    let options = AnalysisOptions::default();

    c.bench_function("moment_interaction_rect_24", |b| {
        b.iter(|| {
            let diagram = section.moment_interaction(0.0, 24).unwrap();
            black_box(diagram);
        })
    });
    c.bench_function("biaxial_bending_rect_16", |b| {
        b.iter(|| {
            let diagram = section.biaxial_bending(1e5, 16, &options).unwrap();
            black_box(diagram);
        })
    });
}

fn benchmark_moment_curvature(c: &mut Criterion) {
    let section = reinforced_rect();
    let options = AnalysisOptions::default()
        .with_curvature_increment(5e-7)
        .with_max_curvature_steps(50);

    c.bench_function("moment_curvature_rect_50", |b| {
        b.iter(|| {
            let response = section.moment_curvature(0.0, 0.0, &options).unwrap();
            black_box(response);
        })
    });
}

criterion_group!(
    benches,
    benchmark_gross_properties,
    benchmark_uncracked_stress,
    benchmark_cracked_analysis,
    benchmark_ultimate_capacity,
    benchmark_diagrams,
    benchmark_moment_curvature,
);

criterion_main!(benches);
