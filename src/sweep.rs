use geo::Line;
use log::{debug, trace};
use slab::Slab;

use crate::{
    active::ActiveSegments,
    adjuster::Adjuster,
    events::SweepPoint,
    registry::EventRegistry,
    segments::{InvalidSegment, Segment},
    solution::Solution,
};

/// Sweep driver for detecting all crossings.
///
/// Implements the [Bentley-Ottman] sweep over the registered segments.
/// Events are processed top-to-bottom: at each event point the segments
/// ending there are finished (testing the neighbors their removal makes
/// adjacent), then the segments starting there are begun (testing their
/// new neighbors), and every accepted intersection is fed back into the
/// event registry so the sweep revisits it as an event of its own.
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub struct Sweep {
    segments: Slab<Segment>,
    registry: EventRegistry,
    active: ActiveSegments,
    adjuster: Adjuster,
    solution: Solution,
}

impl Sweep {
    /// Validate and register segments for a run, canonicalizing every
    /// endpoint through the given adjuster.
    ///
    /// The adjuster state must not be shared with unrelated runs; pass
    /// the one returned by [`load_segments`](crate::load_segments) when
    /// the input came from a segment file.
    pub fn new<I: IntoIterator<Item = Line<f64>>>(
        iter: I,
        adjuster: Adjuster,
    ) -> Result<Self, InvalidSegment> {
        let iter = iter.into_iter();
        let size = {
            let (min_size, max_size) = iter.size_hint();
            max_size.unwrap_or(min_size)
        };

        let mut sweep = Sweep {
            segments: Slab::with_capacity(size),
            registry: EventRegistry::with_capacity(size),
            active: ActiveSegments::default(),
            adjuster,
            solution: Solution::default(),
        };
        for line in iter {
            sweep.create_segment(line)?;
        }
        Ok(sweep)
    }

    /// Store one segment, queue its events, and give it an empty slot
    /// in the solution.
    fn create_segment(&mut self, line: Line<f64>) -> Result<usize, InvalidSegment> {
        let key = Segment::create_in_slab(&mut self.segments, line, &mut self.adjuster)?;
        let segment = self.segments[key];
        self.registry.register_segment(&segment);
        self.solution.insert_segment(segment);
        Ok(key)
    }

    /// Drain the event queue and return the collected intersections.
    pub fn run(mut self) -> Solution {
        while self.step().is_some() {}
        assert!(
            self.active.is_empty(),
            "active segments remain after the event queue drained"
        );
        self.solution
    }

    /// Process the next event; returns its point, or `None` once the
    /// queue is empty.
    ///
    /// The event's point is the sweep position for everything the event
    /// does: it is passed explicitly into every key computation and
    /// past-test below, there is no stored current point.
    pub(crate) fn step(&mut self) -> Option<SweepPoint> {
        let event = self.registry.pop_event()?;
        trace!("handling event: {:?}", event);
        self.finish_segments(event.point);
        self.begin_segments(event.point);
        Some(event.point)
    }

    /// Finish every segment scheduled to end at `pt`.
    ///
    /// Iterates the end list by index: a neighbor pair found to cross
    /// exactly at `pt` is appended to this same list and gets finished
    /// in this same pass.
    fn finish_segments(&mut self, pt: SweepPoint) {
        let mut index = 0;
        loop {
            let key = match self.registry.ending_at(pt) {
                Some(list) if index < list.len() => list[index],
                _ => break,
            };
            index += 1;

            let (left, right) = self.active.neighbor_keys(key);
            self.active.remove_key(key);

            // Only a removal that leaves two segments newly adjacent
            // can reveal an intersection.
            if let (Some(left), Some(right)) = (left, right) {
                self.test_candidates(pt, left, right);
            }
        }
    }

    /// Begin every segment scheduled to start at `pt`, including
    /// segments restarting after an interior intersection.
    fn begin_segments(&mut self, pt: SweepPoint) {
        let mut index = 0;
        loop {
            let key = match self.registry.beginning_at(pt) {
                Some(list) if index < list.len() => list[index],
                _ => break,
            };
            index += 1;

            if !self.active.contains(key) {
                self.active
                    .add_key(key, &self.segments, pt, &mut self.adjuster);
            }

            let (left, right) = self.active.neighbor_keys(key);
            for neighbor in [left, right] {
                if let Some(neighbor) = neighbor {
                    self.test_candidates(pt, key, neighbor);
                }
            }
        }
    }

    /// Test a pair of now-adjacent segments and record an accepted
    /// intersection.
    ///
    /// A candidate is dropped when the sweep has already passed it, and
    /// when it is nothing but a shared endpoint of the pair. An
    /// accepted point goes to the solution for both segments and is fed
    /// back into the registry: both segments finish at the point, and
    /// each also restarts there unless the point is one of its own
    /// endpoints (a touching segment ends, it does not restart).
    fn test_candidates(&mut self, pt: SweepPoint, first: usize, second: usize) {
        let crossing = match self.segments[first].intersection_with(&self.segments[second]) {
            Some(crossing) => crossing,
            None => return,
        };
        let crossing = self.adjuster.hash_point(crossing);

        if crossing.is_past(pt) {
            return;
        }
        if self.segments[first].has_endpoint(crossing)
            && self.segments[second].has_endpoint(crossing)
        {
            return;
        }

        debug!(
            "found intersection:\n\tsegment1: {:?}\n\tsegment2: {:?}\n\tintersection: {:?}",
            self.segments[first], self.segments[second], crossing
        );

        self.solution.add(first, crossing);
        self.solution.add(second, crossing);

        self.registry.register_intersection(crossing);
        for key in [first, second] {
            self.registry.add_ending(crossing, key);
        }
        for key in [first, second] {
            if !self.segments[key].has_endpoint(crossing) {
                self.registry.add_beginning(crossing, key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coordinate, Rect};
    use itertools::Itertools;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::random::{spread_verticals, uniform_line};
    use crate::intersections;

    use super::*;

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sweep_point(x: f64, y: f64) -> SweepPoint {
        SweepPoint::from(Coordinate { x, y })
    }

    #[test]
    fn test_disjoint_segments() {
        let solution = intersections(vec![
            Line::from([(0., 0.), (1., 0.)]),
            Line::from([(0., 1.), (1., 1.)]),
        ])
        .unwrap();
        assert_eq!(solution.intersection_points().count(), 0);
        assert_eq!(solution.summary().segment_counts(), &[0, 0]);
    }

    #[test]
    fn test_simple_cross() {
        init_log();
        let solution = intersections(vec![
            Line::from([(0., 0.), (2., 2.)]),
            Line::from([(0., 2.), (2., 0.)]),
        ])
        .unwrap();

        let points: Vec<_> = solution.intersection_points().collect();
        assert_eq!(points.len(), 1);
        assert_eq!((points[0].x(), points[0].y()), (1., 1.));

        // Recorded for both segments.
        for segment in solution.segments() {
            assert_eq!(solution.points(segment).count(), 1);
        }
    }

    #[test]
    fn test_crossing_swaps_status_order() {
        let mut sweep = Sweep::new(
            vec![
                Line::from([(0., 0.), (2., 2.)]),
                Line::from([(0., 2.), (2., 0.)]),
            ],
            Adjuster::default(),
        )
        .unwrap();

        // Segment 1 starts at (0,2), segment 0 at (2,2): 1 left of 0.
        sweep.step();
        sweep.step();
        assert_eq!(sweep.active.ordered_keys(), &[1, 0]);

        // The crossing event removes and re-begins the pair, reversing
        // the order for the sweep below it.
        let crossing = sweep.step().unwrap();
        assert_eq!((crossing.x(), crossing.y()), (1., 1.));
        assert_eq!(sweep.active.ordered_keys(), &[0, 1]);
    }

    #[test]
    fn test_shared_endpoint_is_not_an_intersection() {
        // Meeting bottom-to-top at the origin.
        let solution = intersections(vec![
            Line::from([(0., 0.), (1., 1.)]),
            Line::from([(0., 0.), (1., -1.)]),
        ])
        .unwrap();
        assert_eq!(solution.intersection_points().count(), 0);

        // Starting from a shared top endpoint, where both live at once.
        let solution = intersections(vec![
            Line::from([(1., 1.), (0., 0.)]),
            Line::from([(1., 1.), (2., 0.)]),
        ])
        .unwrap();
        assert_eq!(solution.intersection_points().count(), 0);
    }

    #[test]
    fn test_t_junction_touches_without_restarting() {
        let mut sweep = Sweep::new(
            vec![
                Line::from([(0., 0.), (2., 0.)]),
                Line::from([(1., 0.), (1., 2.)]),
            ],
            Adjuster::default(),
        )
        .unwrap();
        while sweep.step().is_some() {}
        assert!(sweep.active.is_empty());

        let summary = sweep.solution.summary();
        assert_eq!(summary.segment_counts(), &[1, 1]);
        assert_eq!(summary.distinct_points(), 1);

        // The junction finishes both segments, but only the horizontal
        // restarts: the vertical merely touches with its own endpoint.
        let junction = sweep_point(1., 0.);
        assert_eq!(
            sweep.registry.ending_at(junction).unwrap().as_slice(),
            &[1, 0]
        );
        assert_eq!(
            sweep.registry.beginning_at(junction).unwrap().as_slice(),
            &[0]
        );
    }

    #[test]
    fn test_three_segments_through_one_point() {
        init_log();
        let solution = intersections(vec![
            Line::from([(0., 0.), (2., 2.)]),
            Line::from([(0., 2.), (2., 0.)]),
            Line::from([(1., 0.), (1., 2.)]),
        ])
        .unwrap();

        let summary = solution.summary();
        assert_eq!(summary.distinct_points(), 1);
        assert_eq!(summary.segment_counts(), &[1, 1, 1]);
        assert_eq!(summary.total_cuts(), 3);
    }

    #[test]
    fn test_status_order_invariant() {
        // Non-crossing inputs keep every ordering change attributable
        // to insertion alone: after each event, the status order must
        // match the key order at that event's point.
        for seed in 0..4 {
            let mut rng = StdRng::seed_from_u64(seed);
            let lines = spread_verticals(&mut rng, 25);
            let mut sweep = Sweep::new(lines, Adjuster::default()).unwrap();

            while let Some(current) = sweep.step() {
                let keys = sweep.active.ordered_keys().to_vec();
                let segments = &sweep.segments;
                let adjuster = &mut sweep.adjuster;
                let computed: Vec<_> = keys
                    .iter()
                    .map(|&k| (segments[k].sweep_key(current, adjuster), k))
                    .collect();
                assert!(
                    computed.windows(2).all(|w| w[0] < w[1]),
                    "status out of order at {:?}: {:?}",
                    current,
                    computed
                );
            }
            assert_eq!(sweep.solution.intersection_points().count(), 0);
        }
    }

    /// All pairwise intersections by direct comparison, deduplicated
    /// through a fresh adjuster.
    fn brute_force_points(lines: &[Line<f64>]) -> Vec<SweepPoint> {
        let mut slab = Slab::new();
        let mut adjuster = Adjuster::default();
        let keys: Vec<usize> = lines
            .iter()
            .map(|&line| Segment::create_in_slab(&mut slab, line, &mut adjuster).unwrap())
            .collect();

        let mut points: Vec<SweepPoint> = Vec::new();
        for (&a, &b) in keys.iter().tuple_combinations() {
            if let Some(crossing) = slab[a].intersection_with(&slab[b]) {
                let crossing = adjuster.hash_point(crossing);
                if !points.contains(&crossing) {
                    points.push(crossing);
                }
            }
        }
        points
    }

    fn assert_same_points(found: &[SweepPoint], expected: &[SweepPoint]) {
        let close = |p: &SweepPoint, q: &SweepPoint| {
            (p.x() - q.x()).abs() <= 1e-4 && (p.y() - q.y()).abs() <= 1e-4
        };
        assert_eq!(
            found.len(),
            expected.len(),
            "point counts differ:\n\tsweep: {:?}\n\tbrute force: {:?}",
            found,
            expected
        );
        for p in found {
            assert!(
                expected.iter().any(|q| close(p, q)),
                "sweep point not found by brute force: {:?}",
                p
            );
        }
        for q in expected {
            assert!(
                found.iter().any(|p| close(p, q)),
                "brute-force point missed by sweep: {:?}",
                q
            );
        }
    }

    #[test]
    fn test_matches_brute_force() {
        init_log();
        let bounds = Rect::new([0., 0.], [1024., 1024.]);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let lines: Vec<_> = (0..40).map(|_| uniform_line(&mut rng, bounds)).collect();

            let solution = intersections(lines.clone()).unwrap();
            let found: Vec<_> = solution.intersection_points().collect();
            let expected = brute_force_points(&lines);
            assert_same_points(&found, &expected);
        }
    }

    #[test]
    fn test_symmetry() {
        let bounds = Rect::new([0., 0.], [512., 512.]);
        let mut rng = StdRng::seed_from_u64(42);
        let lines: Vec<_> = (0..30).map(|_| uniform_line(&mut rng, bounds)).collect();
        let solution = intersections(lines).unwrap();

        // Every recorded point belongs to at least two segments.
        for segment in solution.segments() {
            for point in solution.points(segment) {
                let shared = solution
                    .segments()
                    .filter(|other| other.key() != segment.key())
                    .any(|other| solution.points(other).any(|p| p == point));
                assert!(shared, "point {:?} recorded for only one segment", point);
            }
        }
    }

    #[test]
    fn test_no_duplicate_points_within_tolerance() {
        let bounds = Rect::new([0., 0.], [256., 256.]);
        let mut rng = StdRng::seed_from_u64(7);
        let lines: Vec<_> = (0..30).map(|_| uniform_line(&mut rng, bounds)).collect();
        let solution = intersections(lines).unwrap();

        let points: Vec<_> = solution.intersection_points().collect();
        for (p, q) in points.iter().tuple_combinations() {
            assert!(
                (p.x() - q.x()).abs() > 1e-6 || (p.y() - q.y()).abs() > 1e-6,
                "distinct points within tolerance: {:?} and {:?}",
                p,
                q
            );
        }
    }
}
