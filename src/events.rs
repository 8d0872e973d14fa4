use geo::Coordinate;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A sweep event for the intersection algorithm.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event {
    pub(crate) point: SweepPoint,
    pub(crate) ty: EventType,
}

/// Equality check for usage in ordered collections. Events are unique
/// per point; the type only records how the point was first referenced.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

/// Assert total equality
impl Eq for Event {}

/// Ordering for use with a max-heap (`BinaryHeap`): the event reached
/// first by the sweep must compare greatest.
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.point
                .cmp(&other.point)
                .then_with(|| self.ty.cmp(&other.ty))
                .reverse(),
        )
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// Event type to associate with the event point.
///
/// A point is enqueued the first time it is referenced; segments may
/// later be attached to the same point under any role, so the variant
/// is informational and does not affect processing.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
pub(crate) enum EventType {
    Start,
    End,
    Intersection,
}

/// Wraps a [`Coordinate`] to support the sweep ordering.
///
/// The sweep runs top-to-bottom, and left-to-right within a scanline:
/// of two points, the one with the greater `y` is reached first, and
/// ties on `y` go to the smaller `x`. The `Ord` impl encodes exactly
/// this: `a < b` means the sweep reaches `a` before `b`.
///
/// Note that the trait impls exist even though `f64` is not `Eq` or
/// `Ord`. Construction checks that the components are finite, and every
/// `SweepPoint` used as a map key is a canonical representative from the
/// [`Adjuster`](crate::Adjuster), so comparisons are consistent.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SweepPoint(pub(crate) Coordinate<f64>);

/// Implement the sweep ordering: by `y` descending, then by `x`
/// ascending.
impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match other.0.y.partial_cmp(&self.0.y) {
            Some(Ordering::Equal) => self.0.x.partial_cmp(&other.0.x),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail.
impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// We derive `Eq` manually to not require the scalar to be `Eq`.
impl Eq for SweepPoint {}

/// Hash by coordinate bits; valid on canonical representatives, where
/// equal points carry identical bit patterns.
impl Hash for SweepPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // +0.0 so that a negative zero hashes like the positive zero
        // it compares equal to.
        (self.0.x + 0.0).to_bits().hash(state);
        (self.0.y + 0.0).to_bits().hash(state);
    }
}

/// Create from `Coordinate` while checking the components are finite.
impl From<Coordinate<f64>> for SweepPoint {
    fn from(pt: Coordinate<f64>) -> Self {
        assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}

impl SweepPoint {
    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<f64> {
        self.0
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Whether a sweep currently at `current` has already passed `self`.
    ///
    /// A point equal to `current` is at the sweep position, not in the
    /// past.
    #[inline]
    pub(crate) fn is_past(&self, current: SweepPoint) -> bool {
        *self < current
    }
}
