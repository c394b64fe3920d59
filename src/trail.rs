//! # Trail buffer
//!
//! Fixed-capacity FIFO history of the most recent positions, rendered as a path behind
//! the target.
//!
//! The renderer never reads the buffer directly: [`TrailBuffer::snapshot`] hands out a
//! [`TrailSnapshot`], an immutable shared copy that stays valid while the buffer keeps
//! receiving appends.

use std::{collections::VecDeque, ops::Deref, sync::Arc};

use itertools::Itertools;

use crate::constants::Position;

#[derive(Debug, Clone)]
pub struct TrailBuffer<T> {
    points: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> TrailBuffer<T> {
    /// Create an empty trail holding at most `capacity` points.
    ///
    /// A capacity of zero is raised to one; configuration validation rejects it earlier.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        TrailBuffer {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push `point` at the back, evicting from the front once the capacity is exceeded.
    pub fn append(&mut self, point: T) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&T> {
        self.points.back()
    }

    /// Oldest-first copy of the current contents.
    pub fn snapshot(&self) -> TrailSnapshot<T> {
        TrailSnapshot(self.points.iter().cloned().collect())
    }
}

/// Read-only, cheaply cloneable view of a trail at one instant, oldest point first.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailSnapshot<T>(Arc<[T]>);

impl<T> Default for TrailSnapshot<T> {
    fn default() -> Self {
        TrailSnapshot(Arc::from(Vec::new()))
    }
}

impl<T> Deref for TrailSnapshot<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'a, T> IntoIterator for &'a TrailSnapshot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TrailSnapshot<Position> {
    /// Length of the polyline through the trail points, in scene units.
    pub fn path_length(&self) -> f64 {
        self.iter()
            .tuple_windows()
            .map(|(from, to)| (to - from).norm())
            .sum()
    }
}

#[cfg(test)]
mod trail_test {
    use super::*;

    #[test]
    fn test_eviction_keeps_last_points_in_order() {
        let capacity = 5;
        let mut trail = TrailBuffer::new(capacity);
        for k in 0..(capacity + 3) {
            trail.append(k);
        }

        assert_eq!(trail.len(), capacity);
        assert_eq!(&*trail.snapshot(), &[3, 4, 5, 6, 7]);
        assert_eq!(trail.last(), Some(&7));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut trail = TrailBuffer::new(100);
        for k in 0..1_000 {
            trail.append(k);
            assert!(trail.len() <= 100);
        }
        assert_eq!(trail.snapshot().first(), Some(&900));
    }

    #[test]
    fn test_snapshot_is_detached_from_buffer() {
        let mut trail = TrailBuffer::new(3);
        trail.append(1);
        trail.append(2);
        let before = trail.snapshot();

        trail.append(3);
        trail.append(4);
        trail.clear();

        assert_eq!(&*before, &[1, 2]);
        assert!(trail.is_empty());
        assert!(trail.snapshot().is_empty());

        let collected: Vec<_> = (&before).into_iter().copied().collect();
        let again: Vec<_> = before.iter().copied().collect();
        assert_eq!(collected, again);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut trail = TrailBuffer::new(0);
        trail.append(1);
        trail.append(2);
        assert_eq!(trail.capacity(), 1);
        assert_eq!(&*trail.snapshot(), &[2]);
    }

    #[test]
    fn test_path_length() {
        let mut trail = TrailBuffer::new(10);
        trail.append(Position::new(0.0, 0.0, 0.0));
        trail.append(Position::new(3.0, 4.0, 0.0));
        trail.append(Position::new(3.0, 4.0, 2.0));
        assert!((trail.snapshot().path_length() - 7.0).abs() < 1e-12);
        assert_eq!(TrailSnapshot::<Position>::default().path_length(), 0.0);
    }
}
