//! Pending queue - owned byte ranges awaiting consumption.
//!
//! Uses `bytes::Bytes` for zero-copy range management: taking a block off
//! the front of a long range and re-fronting the remainder splits the
//! underlying allocation without copying. Only coalescing adjacent
//! fragments copies, and it copies each byte at most once per merge.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};

/// FIFO of owned byte ranges, in arrival order.
///
/// Invariants:
/// - every element is non-empty
/// - element order is insertion order
/// - [`bytes()`](Self::bytes) equals the sum of all element lengths
#[derive(Debug, Default)]
pub struct PendingQueue {
    ranges: VecDeque<Bytes>,
    bytes: usize,
}

impl PendingQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            ranges: VecDeque::new(),
            bytes: 0,
        }
    }

    /// Append a range at the tail. Empty ranges are dropped, keeping the
    /// non-empty-element invariant without a caller-side check.
    pub fn push_back(&mut self, chunk: Bytes) {
        if chunk.is_empty() {
            return;
        }
        self.bytes += chunk.len();
        self.ranges.push_back(chunk);
    }

    /// Total buffered bytes across all ranges.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Number of distinct ranges currently held.
    pub fn segments(&self) -> usize {
        self.ranges.len()
    }

    /// Check whether the queue holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Merge leading fragments until the head range alone holds at least
    /// `needed` bytes or only one range remains.
    ///
    /// A requested block may straddle many small deliveries; consumers only
    /// ever look at the head, so the two front ranges are concatenated in
    /// order, repeatedly. Byte order is preserved exactly.
    pub fn coalesce_front(&mut self, needed: usize) {
        while self.ranges.len() > 1 && self.ranges[0].len() < needed {
            let first = self.ranges.pop_front().expect("length checked above");
            let second = self.ranges.pop_front().expect("length checked above");

            let mut joined = BytesMut::with_capacity(first.len() + second.len());
            joined.extend_from_slice(&first);
            joined.extend_from_slice(&second);
            self.ranges.push_front(joined.freeze());
        }
    }

    /// Take exactly `needed` bytes off the front, if the head range alone is
    /// long enough.
    ///
    /// A longer head is split in two: the front `needed` bytes are moved out
    /// and the remainder is reinserted at the front, ahead of everything
    /// else. Returns `None` when the head is shorter than `needed` (callers
    /// coalesce first) or the queue is empty.
    pub fn split_front(&mut self, needed: usize) -> Option<Bytes> {
        debug_assert!(needed > 0);

        if self.ranges.front().map_or(true, |head| head.len() < needed) {
            return None;
        }

        let mut head = self.ranges.pop_front().expect("front checked above");
        if head.len() > needed {
            let rest = head.split_off(needed);
            self.ranges.push_front(rest);
        }
        self.bytes -= needed;
        Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_drops_empty_ranges() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::new());

        assert!(queue.is_empty());
        assert_eq!(queue.segments(), 0);

        queue.push_back(Bytes::from_static(b"ab"));
        queue.push_back(Bytes::new());

        assert_eq!(queue.segments(), 1);
        assert_eq!(queue.bytes(), 2);
    }

    #[test]
    fn test_coalesce_front_preserves_order() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::from_static(b"ab"));
        queue.push_back(Bytes::from_static(b"cd"));
        queue.push_back(Bytes::from_static(b"ef"));

        queue.coalesce_front(5);

        assert_eq!(queue.segments(), 1);
        assert_eq!(queue.split_front(6).unwrap(), Bytes::from_static(b"abcdef"));
    }

    #[test]
    fn test_coalesce_front_stops_once_head_is_long_enough() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::from_static(b"abc"));
        queue.push_back(Bytes::from_static(b"de"));

        queue.coalesce_front(3);

        // Head already satisfies the request, tail stays separate.
        assert_eq!(queue.segments(), 2);
    }

    #[test]
    fn test_coalesce_front_single_range_is_untouched() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::from_static(b"ab"));

        queue.coalesce_front(100);

        assert_eq!(queue.segments(), 1);
        assert_eq!(queue.bytes(), 2);
    }

    #[test]
    fn test_split_front_exact_length_takes_whole_head() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::from_static(b"abcd"));

        let block = queue.split_front(4).unwrap();

        assert_eq!(block, Bytes::from_static(b"abcd"));
        assert!(queue.is_empty());
        assert_eq!(queue.bytes(), 0);
    }

    #[test]
    fn test_split_front_refronts_the_remainder() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::from_static(b"abcdef"));
        queue.push_back(Bytes::from_static(b"gh"));

        let block = queue.split_front(2).unwrap();

        assert_eq!(block, Bytes::from_static(b"ab"));
        // Remainder sits ahead of the later arrival.
        assert_eq!(queue.segments(), 2);
        assert_eq!(queue.split_front(4).unwrap(), Bytes::from_static(b"cdef"));
        assert_eq!(queue.split_front(2).unwrap(), Bytes::from_static(b"gh"));
    }

    #[test]
    fn test_split_front_short_head_returns_none() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::from_static(b"ab"));
        queue.push_back(Bytes::from_static(b"cd"));

        // 4 bytes are buffered but the head alone is too short.
        assert!(queue.split_front(3).is_none());
        assert_eq!(queue.bytes(), 4);
    }

    #[test]
    fn test_split_front_empty_queue_returns_none() {
        let mut queue = PendingQueue::new();
        assert!(queue.split_front(1).is_none());
    }

    #[test]
    fn test_byte_accounting_across_operations() {
        let mut queue = PendingQueue::new();
        queue.push_back(Bytes::from_static(b"abc"));
        queue.push_back(Bytes::from_static(b"defgh"));
        assert_eq!(queue.bytes(), 8);

        queue.coalesce_front(5);
        assert_eq!(queue.bytes(), 8);

        queue.split_front(5).unwrap();
        assert_eq!(queue.bytes(), 3);

        queue.split_front(3).unwrap();
        assert_eq!(queue.bytes(), 0);
        assert!(queue.is_empty());
    }
}
