use std::f64::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Standard};

/// A random star-shaped ring around `center` with `verts` vertices.
///
/// Vertex angles are sorted, so the ring is simple; radii vary with a
/// normal distribution.
pub fn star_polygon<R: Rng, P: From<(i64, i64)>>(rng: &mut R, center: (i64, i64), radius: f64, verts: usize) -> Vec<P> {
    let mut angles: Vec<f64> = (0..verts)
        .map(|_| rng.sample::<f64, _>(Standard) * 2. * PI)
        .collect();
    angles.sort_by(|a, b| a.total_cmp(b));

    let spread = Normal::<f64>::new(1., 0.3).unwrap();
    angles
        .into_iter()
        .map(|angle| {
            let r = radius * spread.sample(rng).clamp(0.1, 2.);
            P::from((
                center.0 + (r * angle.cos()).round() as i64,
                center.1 + (r * angle.sin()).round() as i64,
            ))
        })
        .collect()
}

/// Uniform points in `[-range, range]^2`; as a ring this usually
/// self-intersects.
#[allow(dead_code)]
pub fn uniform_polygon<R: Rng, P: From<(i64, i64)>>(rng: &mut R, range: i64, verts: usize) -> Vec<P> {
    (0..verts)
        .map(|_| P::from((rng.gen_range(-range..=range), rng.gen_range(-range..=range))))
        .collect()
}

/// `count` star-shaped rings of `verts` vertices each within roughly
/// `[-range, range]^2`, reproducible from `seed`.
pub fn random_polygons<P: From<(i64, i64)>>(seed: u64, count: usize, verts: usize, range: i64) -> Vec<Vec<P>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let center = (rng.gen_range(-range / 2..=range / 2), rng.gen_range(-range / 2..=range / 2));
            star_polygon(&mut rng, center, range as f64 / 4., verts)
        })
        .collect()
}
