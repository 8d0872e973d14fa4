use std::collections::{BinaryHeap, HashMap};

use log::trace;
use smallvec::SmallVec;

use crate::{
    events::{Event, EventType, SweepPoint},
    segments::Segment,
};

/// Per-point segment lists; most event points start or end at most two
/// segments.
pub(crate) type SegmentList = SmallVec<[usize; 2]>;

/// The pending events of one sweep, with the two point-to-segments
/// mappings.
///
/// Every point appearing in either mapping has exactly one entry in the
/// ordered queue: a point is enqueued the first time either mapping
/// references it, and never again.
#[derive(Debug, Default)]
pub(crate) struct EventRegistry {
    begin_points: HashMap<SweepPoint, SegmentList>,
    end_points: HashMap<SweepPoint, SegmentList>,
    queue: BinaryHeap<Event>,
}

impl EventRegistry {
    pub(crate) fn with_capacity(size: usize) -> Self {
        EventRegistry {
            begin_points: HashMap::with_capacity(size),
            end_points: HashMap::with_capacity(size),
            queue: BinaryHeap::with_capacity(2 * size),
        }
    }

    /// Attach a freshly stored segment to its start and end points,
    /// queueing an event for each point seen for the first time.
    pub(crate) fn register_segment(&mut self, segment: &Segment) {
        let start = segment.sweep_start();
        let end = segment.sweep_end();

        let known = self.is_known(start);
        self.begin_points
            .entry(start)
            .or_default()
            .push(segment.key());
        if !known {
            self.queue.push(Event {
                point: start,
                ty: EventType::Start,
            });
        }

        let known = self.is_known(end);
        self.end_points.entry(end).or_default().push(segment.key());
        if !known {
            self.queue.push(Event {
                point: end,
                ty: EventType::End,
            });
        }
    }

    /// Make an intersection point known to both mappings, queueing an
    /// event only if the point was never seen before.
    ///
    /// Idempotent: calling again for the same point changes nothing.
    pub(crate) fn register_intersection(&mut self, point: SweepPoint) {
        let known = self.is_known(point);
        self.begin_points.entry(point).or_default();
        self.end_points.entry(point).or_default();
        if !known {
            trace!("queueing intersection event at {:?}", point);
            self.queue.push(Event {
                point,
                ty: EventType::Intersection,
            });
        }
    }

    /// Attach a segment to a registered point's end list, once.
    ///
    /// The point must already be registered; a missing entry means the
    /// driver and the registry disagree and the run cannot continue.
    pub(crate) fn add_ending(&mut self, point: SweepPoint, key: usize) {
        let list = self
            .end_points
            .get_mut(&point)
            .expect("intersection point missing from the end mapping");
        if !list.contains(&key) {
            list.push(key);
        }
    }

    /// Attach a segment to a registered point's begin list, once.
    pub(crate) fn add_beginning(&mut self, point: SweepPoint, key: usize) {
        let list = self
            .begin_points
            .get_mut(&point)
            .expect("intersection point missing from the begin mapping");
        if !list.contains(&key) {
            list.push(key);
        }
    }

    /// The segments scheduled to end at `point`, if any.
    pub(crate) fn ending_at(&self, point: SweepPoint) -> Option<&SegmentList> {
        self.end_points.get(&point)
    }

    /// The segments scheduled to begin at `point`, if any.
    pub(crate) fn beginning_at(&self, point: SweepPoint) -> Option<&SegmentList> {
        self.begin_points.get(&point)
    }

    /// Dequeue the next event in sweep order.
    pub(crate) fn pop_event(&mut self) -> Option<Event> {
        self.queue.pop()
    }

    fn is_known(&self, point: SweepPoint) -> bool {
        self.begin_points.contains_key(&point) || self.end_points.contains_key(&point)
    }
}
