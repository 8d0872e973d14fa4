use std::collections::HashSet;

use itertools::Itertools;

use crate::{events::SweepPoint, segments::Segment};

/// The result of a run: for every input segment, the set of distinct
/// points where it crosses another segment.
///
/// Created with an empty set per input segment, filled by the sweep
/// driver as intersections are discovered, and read-only once the run
/// returns it.
#[derive(Debug, Default, Clone)]
pub struct Solution {
    segments: Vec<Segment>,
    points: Vec<HashSet<SweepPoint>>,
}

impl Solution {
    /// Register an input segment with an empty point set.
    pub(crate) fn insert_segment(&mut self, segment: Segment) {
        debug_assert_eq!(segment.key(), self.segments.len());
        self.segments.push(segment);
        self.points.push(HashSet::new());
    }

    /// Record an intersection point for a segment. Idempotent.
    pub(crate) fn add(&mut self, key: usize, point: SweepPoint) {
        self.points
            .get_mut(key)
            .expect("segment missing from the solution")
            .insert(point);
    }

    /// All input segments, in registration order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// The distinct intersection points recorded for one segment.
    pub fn points(&self, segment: &Segment) -> impl Iterator<Item = SweepPoint> + '_ {
        self.points
            .get(segment.key())
            .expect("segment missing from the solution")
            .iter()
            .copied()
    }

    /// Every distinct intersection point across all segments.
    ///
    /// Lazy and restartable: each call returns a fresh iterator over
    /// the recorded sets, deduplicated by canonical point identity.
    pub fn intersection_points(&self) -> impl Iterator<Item = SweepPoint> + '_ {
        self.points.iter().flatten().copied().unique()
    }

    /// Per-segment and overall intersection counts.
    pub fn summary(&self) -> Summary {
        Summary {
            segment_counts: self.points.iter().map(HashSet::len).collect(),
            distinct_points: self.intersection_points().count(),
        }
    }
}

/// Intersection counts reported by [`Solution::summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    segment_counts: Vec<usize>,
    distinct_points: usize,
}

impl Summary {
    /// Distinct intersection points per segment, indexed by segment key.
    pub fn segment_counts(&self) -> &[usize] {
        &self.segment_counts
    }

    /// The number of cuts across all segments: a point shared by
    /// several segments counts once per segment it touches.
    pub fn total_cuts(&self) -> usize {
        self.segment_counts.iter().sum()
    }

    /// The number of distinct intersection points in the solution.
    pub fn distinct_points(&self) -> usize {
        self.distinct_points
    }
}
