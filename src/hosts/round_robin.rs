//! Round-robin rotation over the node pool.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector.
/// Stores an internal counter to rotate through candidates.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the first index in rotation order accepted by `accept`.
    ///
    /// The rotation start advances on every call, so repeated calls spread
    /// across all accepted indices.
    pub fn next_matching<F>(&self, len: usize, mut accept: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        if len == 0 {
            return None;
        }

        // The counter wraps; reduce it first so the offset sum cannot overflow.
        let start = self.counter.fetch_add(1, Ordering::Relaxed) % len;
        (0..len).map(|i| (start + i) % len).find(|&index| accept(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin() {
        let rr = RoundRobin::new();
        assert_eq!(rr.next_matching(2, |_| true), Some(0));
        assert_eq!(rr.next_matching(2, |_| true), Some(1));
        assert_eq!(rr.next_matching(2, |_| true), Some(0));
    }

    #[test]
    fn test_skips_rejected() {
        let rr = RoundRobin::new();
        for _ in 0..4 {
            assert_eq!(rr.next_matching(3, |i| i == 2), Some(2));
        }
        assert_eq!(rr.next_matching(3, |_| false), None);
        assert_eq!(rr.next_matching(0, |_| true), None);
    }

    #[test]
    fn test_counter_wraps_around() {
        let rr = RoundRobin {
            counter: AtomicUsize::new(usize::MAX),
        };
        // usize::MAX is a multiple of 3, so the rotation starts at 0.
        assert_eq!(rr.next_matching(3, |i| i == 2), Some(2));
        assert_eq!(rr.next_matching(3, |_| true), Some(0));
        assert_eq!(rr.next_matching(3, |_| true), Some(1));
    }
}
