//! Computes all pairwise intersection points of a set of 2-d line
//! segments.
//!
//! This is an implementation of the [Bentley-Ottman] plane sweep over
//! segments with tolerance-snapped coordinates: input endpoints and
//! every computed intersection are canonicalized through a shared
//! [`Adjuster`], which keeps independently computed copies of the same
//! point identical despite floating-point rounding. The sweep runs in
//! O((n + k) log(n)) time for n segments and k intersections; this is
//! faster than the brute-force check over all pairs when k is small
//! compared to n².
//!
//! A run returns a [`Solution`]: per segment, the set of distinct
//! points where it crosses another segment, plus summary counts.
//!
//! ## Usage
//!
//! Pass any iterator of [`Line`]s to [`intersections`], or to
//! [`Sweep::new`] to control the adjuster — e.g. to keep using the one
//! returned by [`load_segments`].
//!
//! ```rust
//! use geo::Line;
//! use segment_crossings::intersections;
//!
//! let input = vec![
//!     Line::from([(1., 0.), (0., 1.)]),
//!     Line::from([(0., 0.5), (1., 0.5)]),
//!     Line::from([(0., 0.), (1., 1.)]),
//! ];
//! let solution = intersections(input).unwrap();
//! // All three pairs cross at the same spot.
//! assert_eq!(solution.summary().total_cuts(), 3);
//! assert_eq!(solution.summary().distinct_points(), 1);
//! ```
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
//! [`Line`]: geo::Line
mod adjuster;
pub use adjuster::{Adjuster, DEFAULT_TOLERANCE};

mod events;
pub use events::SweepPoint;

mod segments;
pub use segments::{InvalidSegment, Segment};

mod registry;

mod active;

mod sweep;
pub use sweep::Sweep;

mod solution;
pub use solution::{Solution, Summary};

mod loader;
pub use loader::{load_segments, read_segments, LoadError};

use geo::Line;

/// Compute all intersections among the given segments with a default
/// adjuster.
///
/// Convenience wrapper around [`Sweep::new`] and [`Sweep::run`].
pub fn intersections<I: IntoIterator<Item = Line<f64>>>(
    iter: I,
) -> Result<Solution, InvalidSegment> {
    Sweep::new(iter, Adjuster::default()).map(Sweep::run)
}

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub(crate) mod random;
