use slab::Slab;

use crate::{adjuster::Adjuster, events::SweepPoint, segments::Segment};

/// The segments currently crossing the sweep line, ordered left to
/// right by their sweep keys.
///
/// Insertion sorts by the key computed at the explicit current
/// position. Removal and neighbor lookup go by segment identity, never
/// by a recomputed key: a segment ending exactly at the sweep point
/// re-derives a different key than it was inserted under, so keys
/// cannot locate it.
#[derive(Debug, Default)]
pub(crate) struct ActiveSegments {
    order: Vec<usize>,
}

impl ActiveSegments {
    /// Insert a live segment at its ordered position for `current`.
    ///
    /// Ties on the sweep key are broken by segment key, so the order is
    /// total even for coincident segments.
    pub(crate) fn add_key(
        &mut self,
        key: usize,
        storage: &Slab<Segment>,
        current: SweepPoint,
        adjuster: &mut Adjuster,
    ) {
        debug_assert!(storage.contains(key));
        let new_key = (storage[key].sweep_key(current, adjuster), key);
        let position = self
            .order
            .partition_point(|&k| (storage[k].sweep_key(current, adjuster), k) < new_key);
        self.order.insert(position, key);
    }

    /// Remove a segment by identity.
    pub(crate) fn remove_key(&mut self, key: usize) {
        let position = self
            .position(key)
            .unwrap_or_else(|| panic!("segment {} scheduled to finish is not active", key));
        self.order.remove(position);
    }

    /// The immediately lower and higher ordered live segments.
    pub(crate) fn neighbor_keys(&self, key: usize) -> (Option<usize>, Option<usize>) {
        let position = self
            .position(key)
            .unwrap_or_else(|| panic!("segment {} queried for neighbors is not active", key));
        let prev = position.checked_sub(1).map(|i| self.order[i]);
        let next = self.order.get(position + 1).copied();
        (prev, next)
    }

    pub(crate) fn contains(&self, key: usize) -> bool {
        self.position(key).is_some()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The live segment keys in left-to-right order.
    pub(crate) fn ordered_keys(&self) -> &[usize] {
        &self.order
    }

    fn position(&self, key: usize) -> Option<usize> {
        self.order.iter().position(|&k| k == key)
    }
}
