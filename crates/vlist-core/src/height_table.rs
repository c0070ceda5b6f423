#![forbid(unsafe_code)]

//! Per-row heights and the prefix-offset table derived from them.
//!
//! [`HeightTable`] keeps one [`HeightEntry`] per loaded row and a parallel
//! cumulative table:
//!
//! ```text
//! offset[0] = 0
//! offset[i] = height[0] + … + height[i-1]
//! ```
//!
//! The offset table is never written directly. Every height mutation is
//! followed by a recomputation of the suffix starting at the first changed
//! row, so `offset` stays non-decreasing as long as heights are
//! non-negative (which [`sanitize_px`](crate::units::sanitize_px) enforces).
//!
//! Internally the table stores `len + 1` offsets; the extra trailing value is
//! the total extent. [`HeightTable::offsets`] exposes only the per-row part.

use crate::units::sanitize_px;

/// Where a row's current height came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightSource {
    /// Constant or adaptive placeholder, already in pixels.
    Placeholder,
    /// Per-item estimate converted from host-native units; follows the unit
    /// scale when it changes.
    Estimated,
    /// Reported by the render surface after layout.
    Measured,
}

/// One row's height and where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightEntry {
    /// Height in pixels.
    pub px: f64,
    /// Provenance of `px`.
    pub source: HeightSource,
}

impl HeightEntry {
    /// A pixel placeholder awaiting measurement.
    #[must_use]
    pub fn placeholder(px: f64) -> Self {
        Self {
            px: sanitize_px(px),
            source: HeightSource::Placeholder,
        }
    }

    /// A unit-scaled estimate awaiting measurement.
    #[must_use]
    pub fn estimated(px: f64) -> Self {
        Self {
            px: sanitize_px(px),
            source: HeightSource::Estimated,
        }
    }

    /// A measured height.
    #[must_use]
    pub fn measured(px: f64) -> Self {
        Self {
            px: sanitize_px(px),
            source: HeightSource::Measured,
        }
    }

    /// Whether the render surface has reported this row.
    #[inline]
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.source == HeightSource::Measured
    }
}

/// Heights plus their derived prefix offsets.
#[derive(Debug, Clone)]
pub struct HeightTable {
    entries: Vec<HeightEntry>,
    offsets: Vec<f64>,
}

impl Default for HeightTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            offsets: vec![0.0],
        }
    }

    /// Build a table from a slice of measured heights.
    #[must_use]
    pub fn from_measured(heights: &[f64]) -> Self {
        let mut table = Self::new();
        table.entries = heights.iter().map(|&h| HeightEntry::measured(h)).collect();
        table.recompute_from(0);
        table
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append rows and extend the offset table in one pass.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = HeightEntry>,
    {
        let first_new = self.entries.len();
        self.entries.extend(entries);
        self.recompute_from(first_new);
    }

    /// Overwrite the entry at `idx` without touching offsets.
    ///
    /// Callers batch several writes and then call
    /// [`recompute_from`](Self::recompute_from) with the smallest index.
    /// Returns `false` if `idx` is out of range.
    pub fn write(&mut self, idx: usize, entry: HeightEntry) -> bool {
        match self.entries.get_mut(idx) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Overwrite one entry and recompute offsets from it.
    pub fn set(&mut self, idx: usize, entry: HeightEntry) -> bool {
        let applied = self.write(idx, entry);
        if applied {
            self.recompute_from(idx);
        }
        applied
    }

    /// Rebuild offsets for rows `start..` from their predecessors.
    pub fn recompute_from(&mut self, start: usize) {
        let len = self.entries.len();
        let start = start.min(len);
        self.offsets.truncate(start + 1);
        let mut acc = self.offsets[start];
        for entry in &self.entries[start..] {
            acc += entry.px;
            self.offsets.push(acc);
        }
        debug_assert_eq!(self.offsets.len(), len + 1);
    }

    /// Multiply every unit-scaled estimate by `ratio`.
    ///
    /// Placeholders and measured rows are already in pixels and stay put.
    /// Returns the number of rows rescaled.
    pub fn rescale_estimates(&mut self, ratio: f64) -> usize {
        let mut first = None;
        let mut count = 0;
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            if entry.source == HeightSource::Estimated {
                entry.px = sanitize_px(entry.px * ratio);
                first.get_or_insert(idx);
                count += 1;
            }
        }
        if let Some(first) = first {
            self.recompute_from(first);
        }
        count
    }

    /// Entry at `idx`.
    #[inline]
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<HeightEntry> {
        self.entries.get(idx).copied()
    }

    /// Offset of row `idx` from the top of the list.
    #[inline]
    #[must_use]
    pub fn offset(&self, idx: usize) -> Option<f64> {
        if idx < self.entries.len() {
            Some(self.offsets[idx])
        } else {
            None
        }
    }

    /// Per-row offsets, one per row.
    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        &self.offsets[..self.entries.len()]
    }

    /// All entries in index order.
    #[must_use]
    pub fn entries(&self) -> &[HeightEntry] {
        &self.entries
    }

    /// Sum of every height: the bottom edge of the last row.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.offsets[self.entries.len()]
    }

    /// Number of rows still holding an estimate.
    #[must_use]
    pub fn unmeasured(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_measured()).count()
    }

    /// Largest row index whose offset is `<= target`.
    ///
    /// Returns `None` when `target` lies before the first row (or the table
    /// is empty). A target exactly equal to a row's offset resolves to that
    /// row, and among rows sharing one offset (zero-height rows) the last
    /// one wins.
    #[must_use]
    pub fn find_index(&self, target: f64) -> Option<usize> {
        self.offsets()
            .partition_point(|&offset| offset <= target)
            .checked_sub(1)
    }

    /// First row sharing the offset of row `idx`.
    ///
    /// Zero-height rows stack at one offset; this walks back to the start of
    /// that run. Out-of-range indices are returned unchanged.
    #[must_use]
    pub fn run_start(&self, idx: usize) -> usize {
        match self.offset(idx) {
            Some(target) => self.offsets[..idx].partition_point(|&offset| offset < target),
            None => idx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(heights: &[f64]) -> HeightTable {
        HeightTable::from_measured(heights)
    }

    #[test]
    fn empty_table() {
        let t = HeightTable::new();
        assert!(t.is_empty());
        assert_eq!(t.total(), 0.0);
        assert!(t.offsets().is_empty());
        assert_eq!(t.find_index(0.0), None);
        assert_eq!(t.offset(0), None);
    }

    #[test]
    fn offsets_are_prefix_sums() {
        let t = table(&[100.0, 150.0, 150.0, 200.0, 50.0]);
        assert_eq!(t.offsets(), &[0.0, 100.0, 250.0, 400.0, 600.0]);
        assert_eq!(t.total(), 650.0);
    }

    #[test]
    fn extend_continues_from_previous_total() {
        let mut t = table(&[10.0, 20.0]);
        t.extend([HeightEntry::estimated(5.0), HeightEntry::estimated(5.0)]);
        assert_eq!(t.offsets(), &[0.0, 10.0, 30.0, 35.0]);
        assert_eq!(t.total(), 40.0);
        assert_eq!(t.unmeasured(), 2);
    }

    #[test]
    fn set_recomputes_suffix_only() {
        let mut t = table(&[10.0, 10.0, 10.0, 10.0]);
        assert!(t.set(1, HeightEntry::measured(30.0)));
        assert_eq!(t.offsets(), &[0.0, 10.0, 40.0, 50.0]);
        assert_eq!(t.total(), 60.0);
    }

    #[test]
    fn set_out_of_range_is_rejected() {
        let mut t = table(&[10.0]);
        assert!(!t.set(3, HeightEntry::measured(30.0)));
        assert_eq!(t.total(), 10.0);
    }

    #[test]
    fn negative_heights_are_clamped() {
        let mut t = table(&[10.0, 10.0]);
        t.set(0, HeightEntry::measured(-50.0));
        assert_eq!(t.offsets(), &[0.0, 0.0]);
        assert_eq!(t.total(), 10.0);
    }

    #[test]
    fn find_index_boundaries() {
        let t = table(&[100.0, 150.0, 150.0, 200.0, 50.0]);
        assert_eq!(t.find_index(0.0), Some(0));
        assert_eq!(t.find_index(99.9), Some(0));
        // Exact match resolves to the row starting there.
        assert_eq!(t.find_index(100.0), Some(1));
        assert_eq!(t.find_index(320.0), Some(2));
        assert_eq!(t.find_index(600.0), Some(4));
        assert_eq!(t.find_index(10_000.0), Some(4));
        assert_eq!(t.find_index(-1.0), None);
    }

    #[test]
    fn find_index_zero_height_run_picks_last() {
        let mut t = HeightTable::new();
        t.extend([HeightEntry::placeholder(0.0); 4]);
        assert_eq!(t.find_index(0.0), Some(3));
        assert_eq!(t.run_start(3), 0);
    }

    #[test]
    fn run_start_stops_at_positive_height() {
        let mut t = HeightTable::new();
        t.extend([
            HeightEntry::measured(40.0),
            HeightEntry::placeholder(0.0),
            HeightEntry::placeholder(0.0),
            HeightEntry::measured(10.0),
        ]);
        assert_eq!(t.offsets(), &[0.0, 40.0, 40.0, 40.0]);
        // Rows 1..=3 all start at 40; row 0 does not.
        assert_eq!(t.run_start(3), 1);
        assert_eq!(t.run_start(1), 1);
        assert_eq!(t.run_start(0), 0);
        assert_eq!(t.run_start(9), 9);
    }

    #[test]
    fn rescale_touches_only_estimates() {
        let mut t = HeightTable::new();
        t.extend([
            HeightEntry::estimated(100.0),
            HeightEntry::measured(40.0),
            HeightEntry::placeholder(10.0),
            HeightEntry::estimated(200.0),
        ]);
        assert_eq!(t.rescale_estimates(0.5), 2);
        assert_eq!(t.get(0).unwrap().px, 50.0);
        assert_eq!(t.get(1).unwrap().px, 40.0);
        assert_eq!(t.get(2).unwrap().px, 10.0);
        assert_eq!(t.get(3).unwrap().px, 100.0);
        assert_eq!(t.offsets(), &[0.0, 50.0, 90.0, 100.0]);
        assert_eq!(t.total(), 200.0);
        assert_eq!(t.unmeasured(), 3);
    }

    #[test]
    fn recompute_from_past_end_is_harmless() {
        let mut t = table(&[1.0, 2.0]);
        t.recompute_from(99);
        assert_eq!(t.offsets(), &[0.0, 1.0]);
        assert_eq!(t.total(), 3.0);
    }
}
