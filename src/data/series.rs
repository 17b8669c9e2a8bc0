//! Rolling request-rate history for the line chart.

use std::collections::VecDeque;

/// Number of points kept in the rolling window.
pub const WINDOW_CAPACITY: usize = 60;

/// Fixed-capacity, insertion-ordered `(label, value)` history.
///
/// Appending at capacity evicts the oldest entry, so the series holds
/// exactly [`WINDOW_CAPACITY`] points once it has filled up.
#[derive(Debug, Clone)]
pub struct RollingSeries {
    capacity: usize,
    labels: VecDeque<String>,
    values: VecDeque<f64>,
}

impl Default for RollingSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingSeries {
    /// Create an empty series with the standard window capacity.
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    /// Create an empty series holding at most `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a point, evicting the oldest one once at capacity.
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        if self.values.len() == self.capacity {
            self.labels.pop_front();
            self.values.pop_front();
        }
        self.labels.push_back(label.into());
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over `(label, value)` pairs, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Chart coordinates: x is the position in the window, y the value.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
    }

    /// Largest value currently in the window.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn first_label(&self) -> Option<&str> {
        self.labels.front().map(String::as_str)
    }

    pub fn last_label(&self) -> Option<&str> {
        self.labels.back().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_series_is_empty() {
        let s = RollingSeries::new();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), WINDOW_CAPACITY);
        assert!(s.max().is_none());
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut s = RollingSeries::new();
        s.push("a", 1.0);
        s.push("b", 2.0);

        let items: Vec<_> = s.iter().collect();
        assert_eq!(items, vec![("a", 1.0), ("b", 2.0)]);
    }

    #[test]
    fn sixty_first_push_evicts_the_first() {
        let mut s = RollingSeries::new();
        for i in 1..=61 {
            s.push(format!("t{}", i), i as f64);
        }

        assert_eq!(s.len(), 60);
        let values: Vec<f64> = s.iter().map(|(_, v)| v).collect();
        let expected: Vec<f64> = (2..=61).map(|i| i as f64).collect();
        assert_eq!(values, expected);
        assert_eq!(s.first_label(), Some("t2"));
        assert_eq!(s.last_label(), Some("t61"));
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut s = RollingSeries::new();
        for i in 0..500 {
            s.push("t", i as f64);
            assert!(s.len() <= WINDOW_CAPACITY);
        }
        assert_eq!(s.len(), WINDOW_CAPACITY);
    }

    #[test]
    fn points_are_indexed_from_zero() {
        let mut s = RollingSeries::with_capacity(3);
        for v in [5.0, 6.0, 7.0, 8.0] {
            s.push("t", v);
        }
        assert_eq!(s.points(), vec![(0.0, 6.0), (1.0, 7.0), (2.0, 8.0)]);
        assert_eq!(s.max(), Some(8.0));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut s = RollingSeries::with_capacity(0);
        s.push("a", 1.0);
        s.push("b", 2.0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.last_label(), Some("b"));
    }
}
