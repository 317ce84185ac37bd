//! Bounded selection of the N smallest values in a stream.
//!
//! A fixed-size binary **max**-heap: the root is the largest value still kept, so
//! a new value either beats the root (replace + sift down, O(log N)) or is
//! discarded in O(1). Unfilled slots hold `u64::MAX`, which no incoming value
//! can displace from below, so they behave as "+infinity" until overwritten.

/// Marker for a slot that has not received a value yet.
pub const SENTINEL: u64 = u64::MAX;

/// Keeps the `capacity` smallest values pushed through [`MinSelector::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinSelector {
    heap: Vec<u64>,
}

impl MinSelector {
    /// Create a selector retaining at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: vec![SENTINEL; capacity],
        }
    }

    /// Offer a value; it is kept if it is smaller than the current root.
    #[inline]
    pub fn update(&mut self, item: u64) {
        match self.heap.first_mut() {
            Some(root) if item < *root => {
                *root = item;
                self.sift_down(0);
            }
            _ => {}
        }
    }

    /// Current root: the largest slot value, `SENTINEL` while any slot is unfilled.
    ///
    /// Anything `>=` this value is rejected by [`Self::update`]. `None` for a
    /// zero-capacity selector.
    pub fn threshold(&self) -> Option<u64> {
        self.heap.first().copied()
    }

    /// Largest value actually retained.
    pub fn max_retained(&self) -> Option<u64> {
        self.retained().max()
    }

    /// Retained values in heap order (sentinel slots skipped).
    pub fn retained(&self) -> impl Iterator<Item = u64> + '_ {
        self.heap.iter().copied().filter(|&v| v != SENTINEL)
    }

    /// Number of retained values.
    pub fn len(&self) -> usize {
        self.retained().count()
    }

    /// True if nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.retained().next().is_none()
    }

    /// Maximum number of retained values.
    pub fn capacity(&self) -> usize {
        self.heap.len()
    }

    /// Retained values, sorted ascending.
    pub fn into_sorted_vec(self) -> Vec<u64> {
        let mut out: Vec<u64> = self.heap.into_iter().filter(|&v| v != SENTINEL).collect();
        out.sort_unstable();
        out
    }

    fn sift_down(&mut self, mut idx: usize) {
        let n = self.heap.len();
        let val = self.heap[idx];
        loop {
            let mut kid = 2 * idx + 1;
            if kid >= n {
                break;
            }
            if kid + 1 < n && self.heap[kid] < self.heap[kid + 1] {
                kid += 1;
            }
            if self.heap[kid] <= val {
                break;
            }
            self.heap[idx] = self.heap[kid];
            idx = kid;
        }
        self.heap[idx] = val;
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| self.heap[(i - 1) / 2] >= self.heap[i])
    }
}
