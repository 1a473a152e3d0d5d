//! Submission-order release buffer
//!
//! Probe results arrive in completion order. The buffer holds each result in
//! the slot of the target that produced it and releases a contiguous prefix
//! as soon as the next expected slot is filled, so callers see results in
//! submission order. It also counts released results, which is what the
//! per-script completion barrier waits on.

/// Fixed-size buffer releasing values in index order
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    slots: Vec<Option<T>>,
    next: usize,
}

impl<T> ReorderBuffer<T> {
    /// Creates a buffer expecting exactly `len` values, indexed `0..len`
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            next: 0,
        }
    }

    /// Stores the value for `index` and returns everything now releasable
    ///
    /// Indexes that are out of range or already filled are ignored.
    pub fn insert(&mut self, index: usize, value: T) -> Vec<(usize, T)> {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_none() && index >= self.next => *slot = Some(value),
            _ => return Vec::new(),
        }

        let mut ready = Vec::new();
        while let Some(value) = self.slots.get_mut(self.next).and_then(Option::take) {
            ready.push((self.next, value));
            self.next += 1;
        }
        ready
    }

    /// Number of values released so far
    pub fn released(&self) -> usize {
        self.next
    }

    /// Number of values received but held back behind a gap
    pub fn held(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Every expected value has been released
    pub fn is_complete(&self) -> bool {
        self.next == self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_values_release_immediately() {
        let mut buffer = ReorderBuffer::new(3);
        assert_eq!(buffer.insert(0, 'a'), vec![(0, 'a')]);
        assert_eq!(buffer.insert(1, 'b'), vec![(1, 'b')]);
        assert_eq!(buffer.insert(2, 'c'), vec![(2, 'c')]);
        assert!(buffer.is_complete());
    }

    #[test]
    fn test_out_of_order_values_are_held() {
        let mut buffer = ReorderBuffer::new(3);

        assert!(buffer.insert(2, 'c').is_empty());
        assert!(buffer.insert(1, 'b').is_empty());
        assert_eq!(buffer.held(), 2);
        assert_eq!(buffer.released(), 0);

        assert_eq!(buffer.insert(0, 'a'), vec![(0, 'a'), (1, 'b'), (2, 'c')]);
        assert_eq!(buffer.held(), 0);
        assert!(buffer.is_complete());
    }

    #[test]
    fn test_partial_release() {
        let mut buffer = ReorderBuffer::new(4);
        assert!(buffer.insert(1, 1).is_empty());
        assert_eq!(buffer.insert(0, 0), vec![(0, 0), (1, 1)]);
        assert!(buffer.insert(3, 3).is_empty());
        assert!(!buffer.is_complete());
        assert_eq!(buffer.insert(2, 2), vec![(2, 2), (3, 3)]);
        assert!(buffer.is_complete());
    }

    #[test]
    fn test_duplicates_and_out_of_range_are_ignored() {
        let mut buffer = ReorderBuffer::new(2);
        assert!(buffer.insert(5, 'x').is_empty());
        assert!(buffer.insert(1, 'b').is_empty());
        assert!(buffer.insert(1, 'z').is_empty());
        assert_eq!(buffer.insert(0, 'a'), vec![(0, 'a'), (1, 'b')]);
        assert!(buffer.insert(0, 'y').is_empty());
        assert_eq!(buffer.released(), 2);
    }

    #[test]
    fn test_empty_buffer_is_complete() {
        let buffer: ReorderBuffer<()> = ReorderBuffer::new(0);
        assert!(buffer.is_complete());
    }
}
