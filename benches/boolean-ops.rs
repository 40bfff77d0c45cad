use criterion::{measurement::Measurement, *};
use geo_clipping::{ClipType, Clipper64, FillRule, Paths64};
use rand::{rngs::StdRng, SeedableRng};

#[path = "utils/random.rs"]
mod random;

fn clip(subjects: &Paths64, clips: &Paths64, clip_type: ClipType) -> usize {
    let mut clipper = Clipper64::new();
    clipper.add_subject(subjects).unwrap();
    clipper.add_clip(clips).unwrap();
    clipper
        .execute(clip_type, FillRule::NonZero)
        .map(|sol| sol.closed.len())
        .unwrap_or(0)
}

fn run_star_polygons<T: Measurement>(c: &mut Criterion<T>) {
    let mut group = c.benchmark_group("Star polygon boolean-ops");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    (6..14).for_each(|scale| {
        let verts = 1 << scale;
        let subjects: Paths64 = random::random_polygons(scale, 2, verts, 1 << 20);
        let clips: Paths64 = random::random_polygons(scale + 100, 2, verts, 1 << 20);

        group.sample_size(20);
        for (name, clip_type) in [
            ("union", ClipType::Union),
            ("intersection", ClipType::Intersection),
            ("difference", ClipType::Difference),
            ("xor", ClipType::Xor),
        ] {
            group.bench_with_input(BenchmarkId::new(name, verts), &(), |b, _| {
                b.iter(|| clip(&subjects, &clips, clip_type));
            });
        }
    });
}

fn run_self_intersecting<T: Measurement>(c: &mut Criterion<T>) {
    let mut group = c.benchmark_group("Self-intersecting union");
    (4..10).for_each(|scale| {
        let verts = 1 << scale;
        let mut rng = StdRng::seed_from_u64(scale);
        let subjects: Paths64 = vec![random::uniform_polygon(&mut rng, 1 << 20, verts)];

        group.sample_size(20);
        group.bench_with_input(BenchmarkId::new("union", verts), &(), |b, _| {
            b.iter(|| clip(&subjects, &Paths64::new(), ClipType::Union));
        });
    });
}

criterion_group!(verts_vs_time, run_star_polygons, run_self_intersecting);
criterion_main!(verts_vs_time);
