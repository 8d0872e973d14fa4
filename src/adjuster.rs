use geo::Coordinate;
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::events::SweepPoint;

/// Default snapping tolerance, matching the geometric tolerances used
/// by the intersection predicates.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Canonicalizes near-equal coordinates into one representative.
///
/// Two points that are meant to be equal — say an intersection computed
/// independently from two different segment pairs — rarely compare
/// bitwise equal after floating-point rounding. The adjuster maps every
/// computed or input point onto the first representative registered
/// within tolerance, so that point identity elsewhere in the crate can
/// use plain equality and hashing.
///
/// [`hash_point`](Adjuster::hash_point) is idempotent: hashing a
/// representative returns that same representative. Representatives are
/// registered only when no existing one is within tolerance, so any two
/// of them are more than one tolerance apart on at least one axis.
///
/// The registered state is per run: sharing an adjuster across
/// unrelated segment sets would let one run's representatives capture
/// the other's coordinates.
#[derive(Debug, Clone)]
pub struct Adjuster {
    tolerance: f64,
    representatives: HashMap<(i64, i64), SmallVec<[SweepPoint; 1]>>,
}

impl Default for Adjuster {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl Adjuster {
    /// Create an adjuster snapping within the given tolerance.
    pub fn new(tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && tolerance > 0.,
            "adjuster tolerance must be positive and finite"
        );
        Adjuster {
            tolerance,
            representatives: HashMap::new(),
        }
    }

    /// The canonical representative for `point`.
    ///
    /// Returns the first registered representative within tolerance on
    /// both axes; otherwise registers `point` itself and returns it.
    pub fn hash_point<P: Into<SweepPoint>>(&mut self, point: P) -> SweepPoint {
        let point = point.into();
        let (cx, cy) = self.cell(point.coord());

        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(reps) = self.representatives.get(&(cx + dx, cy + dy)) {
                    for rep in reps {
                        if (rep.x() - point.x()).abs() <= self.tolerance
                            && (rep.y() - point.y()).abs() <= self.tolerance
                        {
                            return *rep;
                        }
                    }
                }
            }
        }

        self.representatives
            .entry((cx, cy))
            .or_default()
            .push(point);
        point
    }

    /// The number of distinct representatives registered so far.
    pub fn len(&self) -> usize {
        self.representatives.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    fn cell(&self, c: Coordinate<f64>) -> (i64, i64) {
        (
            (c.x / self.tolerance).round() as i64,
            (c.y / self.tolerance).round() as i64,
        )
    }
}
