//! Binary-search window over byte offsets

use std::cmp::Ordering;

/// Half-open byte range `[low, high)` still to be searched.
///
/// `low` and `high` always sit on record boundaries (or at the end of the
/// data), so the record containing any pivot inside the window starts at
/// or after `low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    low: u64,
    high: u64,
}

impl SearchWindow {
    pub fn new(low: u64, high: u64) -> Self {
        debug_assert!(low <= high, "window low {low} above high {high}");
        Self { low, high }
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn is_empty(&self) -> bool {
        self.low >= self.high
    }

    /// Midpoint of the window; strictly below `high` while non-empty
    pub fn pivot(&self) -> u64 {
        self.low + (self.high - self.low) / 2
    }

    /// Narrow after comparing the query with a record.
    ///
    /// `record_start` is where the descent began (`pivot_down`) and
    /// `record_end` is the offset just past the compared record.
    pub fn narrow(&mut self, ordering: Ordering, record_start: u64, record_end: u64) {
        match ordering {
            Ordering::Less => self.high = record_start.max(self.low),
            _ => self.low = record_end.min(self.high),
        }
    }

    /// Drop everything from `offset` up; it holds no records.
    pub fn truncate(&mut self, offset: u64) {
        self.high = offset.clamp(self.low, self.high);
    }
}
