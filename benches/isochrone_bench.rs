use criterion::{black_box, criterion_group, criterion_main, Criterion};
use isochron::{
    compute_isochrones, compute_isochrones_blocking, julian_day, sun_position, CalendarDate,
    EngineConfig, GeoBounds, IsochroneRequest, LongitudeSolver, Prayer, PrayerAngleSpec,
    PrayerSettings,
};

fn ephemeris_bench(c: &mut Criterion) {
    let jd = julian_day(2024, 6, 21);

    let mut group = c.benchmark_group("ephemeris");
    group.bench_function("sun_position", |b| b.iter(|| sun_position(black_box(jd))));
    group.finish();
}

fn solver_bench(c: &mut Criterion) {
    let settings = PrayerSettings::default();
    let jd = julian_day(2024, 6, 21);
    let fajr = LongitudeSolver::new(PrayerAngleSpec::resolve(Prayer::Fajr, &settings), jd, 1.0);
    let asr = LongitudeSolver::new(PrayerAngleSpec::resolve(Prayer::Asr, &settings), jd, 1.0);

    let mut group = c.benchmark_group("solver");
    group.bench_function("fajr_refined", |b| {
        b.iter(|| fajr.solve(black_box(48.5), black_box(1.25)))
    });
    group.bench_function("asr_refined", |b| {
        b.iter(|| asr.solve(black_box(48.5), black_box(17.25)))
    });
    group.finish();
}

fn request_bench(c: &mut Criterion) {
    let config = EngineConfig::default();
    let request = IsochroneRequest::new(
        "fajr",
        GeoBounds::new(2.0, 3.0, 48.0, 49.0).unwrap(),
        CalendarDate::new(2024, 6, 21).unwrap(),
    )
    .with_timezone(1.0);

    let mut group = c.benchmark_group("request");
    group.sample_size(20);
    group.bench_function("fajr_bands_200", |b| {
        b.iter(|| compute_isochrones(black_box(&request), &config))
    });
    group.bench_function("fajr_bands_fallback", |b| {
        b.iter(|| compute_isochrones_blocking(black_box(&request), &config))
    });
    group.finish();
}

criterion_group!(benches, ephemeris_bench, solver_bench, request_bench);
criterion_main!(benches);
