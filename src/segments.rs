use std::cmp::Ordering;

use geo::{Coordinate, Line};
use slab::Slab;
use thiserror::Error;

use crate::{adjuster::Adjuster, events::SweepPoint};

/// Tolerance below which the intersection determinant is treated as
/// parallel, and the slack allowed by the containment test.
pub(crate) const GEOMETRY_TOLERANCE: f64 = 1e-6;

/// An input segment rejected before a run starts.
///
/// Rejection happens at registration, per offending segment; the run is
/// never started with a malformed participant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidSegment {
    /// A coordinate was NaN or infinite.
    #[error("segment has a non-finite coordinate: {0:?}")]
    NonFinite(Line<f64>),
    /// The endpoints coincide, possibly only after snapping.
    #[error("segment endpoints coincide within tolerance: {0:?}")]
    ZeroLength(Line<f64>),
}

/// A line segment participating in a sweep.
///
/// Endpoints are stored in input order, not sweep order; the sweep
/// start and end points are derived on demand. The slab key is the
/// segment's identity: two segments with equal geometry are still
/// distinct participants, and the status structure addresses segments
/// by key only.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    endpoints: [SweepPoint; 2],
    key: usize,
}

impl Segment {
    /// Validate a line and store it as a `Segment`, canonicalizing both
    /// endpoints through the adjuster. Returns the storage key.
    pub(crate) fn create_in_slab(
        storage: &mut Slab<Self>,
        line: Line<f64>,
        adjuster: &mut Adjuster,
    ) -> Result<usize, InvalidSegment> {
        let finite = [line.start.x, line.start.y, line.end.x, line.end.y]
            .iter()
            .all(|c| c.is_finite());
        if !finite {
            return Err(InvalidSegment::NonFinite(line));
        }

        let start = adjuster.hash_point(line.start);
        let end = adjuster.hash_point(line.end);
        if start == end {
            return Err(InvalidSegment::ZeroLength(line));
        }

        let entry = storage.vacant_entry();
        let key = entry.key();
        entry.insert(Segment {
            endpoints: [start, end],
            key,
        });
        Ok(key)
    }

    /// Get the segment's key.
    #[inline]
    pub fn key(&self) -> usize {
        self.key
    }

    /// The segment's geometry, in input endpoint order.
    #[inline]
    pub fn line(&self) -> Line<f64> {
        Line::new(self.endpoints[0].coord(), self.endpoints[1].coord())
    }

    /// The endpoint the sweep reaches first.
    #[inline]
    pub(crate) fn sweep_start(&self) -> SweepPoint {
        std::cmp::min(self.endpoints[0], self.endpoints[1])
    }

    /// The endpoint the sweep reaches last.
    #[inline]
    pub(crate) fn sweep_end(&self) -> SweepPoint {
        std::cmp::max(self.endpoints[0], self.endpoints[1])
    }

    /// Whether `point` is one of the segment's own endpoints.
    #[inline]
    pub(crate) fn has_endpoint(&self, point: SweepPoint) -> bool {
        self.endpoints[0] == point || self.endpoints[1] == point
    }

    /// Intersect two segments.
    ///
    /// Solves the lines through each segment and only returns the point
    /// if it lies within both finite segments. Near-parallel lines are
    /// not an error, just `None`.
    pub fn intersection_with(&self, other: &Segment) -> Option<Coordinate<f64>> {
        let this = self.line();
        let that = other.line();
        let crossing = line_intersection(&this, &that)?;
        if segment_contains(&this, crossing) && segment_contains(&that, crossing) {
            Some(crossing)
        } else {
            None
        }
    }

    /// The ordering key of this segment at the given sweep position.
    ///
    /// Recomputed at every query: a key is only meaningful for the
    /// position it was computed at and must never be cached across
    /// events. The scanline crossing is canonicalized through the
    /// adjuster so that segments meeting the scanline at the same spot
    /// tie exactly on `x` and fall through to the angle.
    pub(crate) fn sweep_key(&self, current: SweepPoint, adjuster: &mut Adjuster) -> SweepKey {
        let scanline = Line::new(
            Coordinate {
                x: 0.,
                y: current.y(),
            },
            Coordinate {
                x: 1.,
                y: current.y(),
            },
        );
        let key_x = match line_intersection(&self.line(), &scanline) {
            Some(crossing) => adjuster.hash_point(crossing).x(),
            // Horizontal segments ride on the scanline itself.
            None => current.x(),
        };

        // Angle of the sweep-forward direction against the scanline, in
        // (-π, 0]: ascending angle is left-to-right just below the
        // shared spot, so segments through one point stay ordered the
        // way the sweep is about to meet them.
        let start = self.sweep_start();
        let end = self.sweep_end();
        let angle = (end.y() - start.y()).atan2(end.x() - start.x());

        SweepKey { x: key_x, angle }
    }
}

/// Equality based on key.
impl PartialEq for Segment {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Segment {}

/// A segment's position among the active segments: the abscissa where
/// the scanline crosses it, then the angle of the segment against the
/// scanline to order segments through a shared spot.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub(crate) struct SweepKey {
    pub(crate) x: f64,
    pub(crate) angle: f64,
}

impl Eq for SweepKey {}

/// Derive `Ord` from `PartialOrd`; keys are built from finite inputs.
impl Ord for SweepKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other)
            .expect("sweep keys are finite and totally ordered")
    }
}

/// Intersect the infinite lines through two segments.
///
/// Solves `a.start + alpha * dir_a == b.start + beta * dir_b` by cross
/// products; `None` when the determinant says near-parallel.
fn line_intersection(a: &Line<f64>, b: &Line<f64>) -> Option<Coordinate<f64>> {
    let dir_a = Coordinate {
        x: a.end.x - a.start.x,
        y: a.end.y - a.start.y,
    };
    let dir_b = Coordinate {
        x: b.end.x - b.start.x,
        y: b.end.y - b.start.y,
    };
    let denominator = cross(dir_a, dir_b);
    if denominator.abs() < GEOMETRY_TOLERANCE {
        return None;
    }

    let start_diff = Coordinate {
        x: b.start.x - a.start.x,
        y: b.start.y - a.start.y,
    };
    let alpha = cross(start_diff, dir_b) / denominator;
    Some(Coordinate {
        x: a.start.x + dir_a.x * alpha,
        y: a.start.y + dir_a.y * alpha,
    })
}

/// Whether `point` lies on the finite segment, by comparing the summed
/// endpoint distances against the segment length.
fn segment_contains(line: &Line<f64>, point: Coordinate<f64>) -> bool {
    let length = distance(line.start, line.end);
    let via = distance(line.start, point) + distance(point, line.end);
    (via - length).abs() < GEOMETRY_TOLERANCE
}

#[inline]
fn cross(a: Coordinate<f64>, b: Coordinate<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
fn distance(a: Coordinate<f64>, b: Coordinate<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
