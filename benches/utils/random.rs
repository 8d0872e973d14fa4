use geo::{Coordinate, Line, Rect};

use rand::Rng;
use rand_distr::Standard;

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

#[inline]
pub fn uniform_line<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Line<f64> {
    Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds))
}

/// Vertical segments on well-separated abscissas with random extents;
/// no two of them can ever intersect.
#[allow(dead_code)]
pub fn spread_verticals<R: Rng>(rng: &mut R, count: usize) -> Vec<Line<f64>> {
    (0..count)
        .map(|i| {
            let x = 3. * i as f64;
            let bottom = rng.sample::<f64, _>(Standard) * 100.;
            let height = 1. + rng.sample::<f64, _>(Standard) * 100.;
            Line::new(
                Coordinate { x, y: bottom },
                Coordinate {
                    x,
                    y: bottom + height,
                },
            )
        })
        .collect()
}
