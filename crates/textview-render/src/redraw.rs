//! Coalesces redraw requests into line ranges.

use crate::host::ViewHost;

#[derive(Debug, Default, Clone)]
pub struct RedrawQueue {
    ranges: Vec<(usize, usize)>,
}

impl RedrawQueue {
    pub fn line(&mut self, line: usize) {
        self.ranges.push((line, line));
    }

    /// Queues `first..=last`, in either order.
    pub fn lines(&mut self, first: usize, last: usize) {
        self.ranges.push((first.min(last), first.max(last)));
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sorted, merged ranges; adjacent lines join one range.
    pub fn coalesced(&self) -> Vec<(usize, usize)> {
        let mut ranges = self.ranges.clone();
        ranges.sort_unstable();
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
        for (a, b) in ranges {
            match merged.last_mut() {
                Some(last) if a <= last.1.saturating_add(1) => last.1 = last.1.max(b),
                _ => merged.push((a, b)),
            }
        }
        merged
    }

    /// Sends the queued requests to the host and empties the queue.
    pub fn flush(&mut self, host: &mut dyn ViewHost) {
        for (a, b) in self.coalesced() {
            if a == b {
                host.redraw_line(a);
            } else {
                host.redraw_lines(a, b);
            }
        }
        self.ranges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostRequest, RecordingHost};

    #[test]
    fn test_coalesce_merges_overlap_and_adjacent() {
        let mut q = RedrawQueue::default();
        q.line(7);
        q.line(3);
        q.lines(5, 4);
        q.line(3);
        q.line(10);
        assert_eq!(q.coalesced(), vec![(3, 5), (7, 7), (10, 10)]);
    }

    #[test]
    fn test_flush_emits_single_and_range_requests() {
        let mut q = RedrawQueue::default();
        q.line(2);
        q.lines(4, 6);
        let mut host = RecordingHost::new();
        q.flush(&mut host);
        assert!(q.is_empty());
        assert_eq!(
            host.requests,
            vec![HostRequest::RedrawLine(2), HostRequest::RedrawLines(4, 6)]
        );
    }
}
