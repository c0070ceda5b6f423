#![forbid(unsafe_code)]

//! The window engine: an append-only virtualized list with variable heights.
//!
//! [`WindowEngine`] owns every piece of list state:
//!
//! - the loaded items, in global-index order, and the page each arrived in;
//! - a [`HeightTable`] with one height per item and the prefix offsets
//!   derived from it;
//! - the scroll offset and viewport reported by the host;
//! - the [`LoadState`] that gates page loading.
//!
//! Reads are pure. [`WindowEngine::visible_window`] can run on every frame
//! and returns the same answer until a setter, an append or a height report
//! changes state.
//!
//! # Window computation
//!
//! ```text
//! first  = find_index(scroll)
//! last   = find_index(scroll + viewport_height)
//! window = [first - buffer, last + buffer] ∩ [0, len - 1]
//! ```
//!
//! `find_index(target)` is the largest `i` with `offset[i] <= target`, found
//! by binary search over the monotone offset table.
//!
//! # Loading
//!
//! The engine never performs I/O. A driver asks [`WindowEngine::begin_load`]
//! for a [`PageRequest`], runs the loader, and hands the result to
//! [`WindowEngine::finish_load`]. `begin_load` refuses while a request is
//! outstanding, which is what deduplicates rapid triggers.

use std::fmt;
use std::ops::Range;

use tracing::{debug, trace, warn};

use crate::config::{EngineConfig, HeightMode};
use crate::estimator::HeightEstimator;
use crate::height_table::{HeightEntry, HeightTable};
use crate::load_state::{LoadOutcome, LoadState, PageRequest};
use crate::units::{UnitScale, Viewport, sanitize_px};

type HeightFn<T> = Box<dyn Fn(&T) -> f64>;

/// A height report for an index the engine has not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRangeReport {
    /// Index that was reported.
    pub index: usize,
    /// Number of loaded items at the time of the report.
    pub len: usize,
}

impl fmt::Display for OutOfRangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "height reported for index {} but only {} items are loaded",
            self.index, self.len
        )
    }
}

impl std::error::Error for OutOfRangeReport {}

/// One row of the visible window.
#[derive(Debug, PartialEq)]
pub struct VisibleItem<'a, T> {
    /// The payload.
    pub item: &'a T,
    /// Global index.
    pub index: usize,
    /// Zero-based page the item arrived in.
    pub page: usize,
    /// Distance from the top of the list (px).
    pub offset: f64,
    /// Current height (px).
    pub height: f64,
}

/// The rows to render for the current scroll position.
#[derive(Debug, PartialEq)]
pub struct VisibleWindow<'a, T> {
    /// First rendered index (buffer included).
    pub start_index: usize,
    /// One past the last rendered index (buffer included).
    pub end_index: usize,
    /// Row containing the top edge of the viewport, before buffering. For a
    /// run of zero-height rows at the top edge this is the first of the run.
    pub first_visible: Option<usize>,
    /// Row containing the bottom edge of the viewport, before buffering.
    pub last_visible: Option<usize>,
    /// Rows in `start_index..end_index`, in index order.
    pub items: Vec<VisibleItem<'a, T>>,
}

impl<T> VisibleWindow<'_, T> {
    /// Rendered index range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Whether nothing is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Incremental virtualized-list state.
pub struct WindowEngine<T> {
    config: EngineConfig,
    items: Vec<T>,
    page_starts: Vec<usize>,
    heights: HeightTable,
    estimator: HeightEstimator,
    height_fn: Option<HeightFn<T>>,
    scroll_offset: f64,
    viewport: Viewport,
    unit_scale: UnitScale,
    load: LoadState,
}

impl<T> fmt::Debug for WindowEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowEngine")
            .field("len", &self.items.len())
            .field("pages", &self.page_starts.len())
            .field("total_height", &self.total_height())
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport", &self.viewport)
            .field("unit_scale", &self.unit_scale)
            .field("load", &self.load)
            .field("height_fn", &self.height_fn.is_some())
            .finish()
    }
}

impl<T> Default for WindowEngine<T> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<T> WindowEngine<T> {
    /// Create an empty engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let estimator =
            HeightEstimator::new(config.placeholder_height, config.estimate_prior_strength);
        Self {
            config,
            items: Vec::new(),
            page_starts: Vec::new(),
            heights: HeightTable::new(),
            estimator,
            height_fn: None,
            scroll_offset: 0.0,
            viewport: Viewport::default(),
            unit_scale: UnitScale::IDENTITY,
            load: LoadState::default(),
        }
    }

    /// Install a per-item height function, evaluated once at append time.
    ///
    /// Its result is in host-native units and is converted with the current
    /// unit scale. Installing one switches the engine to
    /// [`HeightMode::Estimate`].
    #[must_use]
    pub fn with_height_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> f64 + 'static,
    {
        self.height_fn = Some(Box::new(f));
        self.config.height_mode = HeightMode::Estimate;
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Items ───────────────────────────────────────────────────────────

    /// Number of loaded items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been loaded yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at a global index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// All loaded items in global-index order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Page an item arrived in.
    #[must_use]
    pub fn page_of(&self, index: usize) -> Option<usize> {
        if index >= self.items.len() {
            return None;
        }
        self.page_starts
            .partition_point(|&start| start <= index)
            .checked_sub(1)
    }

    /// Number of non-empty pages appended.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_starts.len()
    }

    /// Append one page of items.
    ///
    /// Each item receives the next global index and a height from the active
    /// strategy; offsets are extended and the page cursor advances. An empty
    /// batch changes nothing. Returns the global indices assigned.
    pub fn append_page(&mut self, batch: Vec<T>) -> Range<usize> {
        let start = self.items.len();
        if batch.is_empty() {
            return start..start;
        }

        let entries: Vec<HeightEntry> = batch.iter().map(|item| self.initial_height(item)).collect();
        self.heights.extend(entries);
        self.items.extend(batch);
        self.page_starts.push(start);
        let page = self.load.cursor();
        self.load.advance();

        let end = self.items.len();
        debug!(
            target: "vlist.engine",
            page,
            count = end - start,
            start_index = start,
            total_height = self.heights.total(),
            "page appended"
        );
        start..end
    }

    fn initial_height(&self, item: &T) -> HeightEntry {
        match (self.config.height_mode, &self.height_fn) {
            (HeightMode::Estimate, Some(f)) => HeightEntry::estimated(self.unit_scale.to_px(f(item))),
            (HeightMode::Estimate, None) => HeightEntry::placeholder(self.estimator.predict()),
            (HeightMode::Measured, _) => HeightEntry::placeholder(self.config.placeholder_height),
        }
    }

    // ── Heights ─────────────────────────────────────────────────────────

    /// Record a height measured by the render surface.
    ///
    /// Overwrites the entry and recomputes offsets from `index` on. Repeated
    /// reports simply overwrite. An index past the loaded range leaves state
    /// untouched and is returned as an error value.
    pub fn report_measured_height(&mut self, index: usize, px: f64) -> Result<(), OutOfRangeReport> {
        let px = sanitize_px(px);
        if !self.heights.set(index, HeightEntry::measured(px)) {
            let report = OutOfRangeReport {
                index,
                len: self.items.len(),
            };
            debug!(target: "vlist.engine", index, len = report.len, "height report out of range");
            return Err(report);
        }
        self.estimator.observe(px);
        trace!(target: "vlist.engine", index, px, "height measured");
        Ok(())
    }

    /// Apply many height reports with a single offset recomputation.
    ///
    /// Out-of-range reports are skipped. Returns how many were applied.
    pub fn report_measured_heights<I>(&mut self, reports: I) -> usize
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut first = None::<usize>;
        let mut applied = 0;
        for (index, px) in reports {
            let px = sanitize_px(px);
            if self.heights.write(index, HeightEntry::measured(px)) {
                self.estimator.observe(px);
                first = Some(first.map_or(index, |f| f.min(index)));
                applied += 1;
            } else {
                debug!(
                    target: "vlist.engine",
                    index,
                    len = self.items.len(),
                    "height report out of range"
                );
            }
        }
        if let Some(first) = first {
            self.heights.recompute_from(first);
        }
        applied
    }

    /// Height table with derived offsets.
    #[must_use]
    pub fn heights(&self) -> &HeightTable {
        &self.heights
    }

    /// Per-item offsets.
    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        self.heights.offsets()
    }

    /// Offset of one item.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> Option<f64> {
        self.heights.offset(index)
    }

    /// Current height of one item.
    #[must_use]
    pub fn height_of(&self, index: usize) -> Option<f64> {
        self.heights.get(index).map(|e| e.px)
    }

    /// Whether an item's height came from the render surface.
    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.heights.get(index).is_some_and(|e| e.is_measured())
    }

    /// Total scrollable extent: the bottom edge of the last item.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.heights.total()
    }

    /// Adaptive estimator fed by every measurement.
    #[must_use]
    pub fn estimator(&self) -> &HeightEstimator {
        &self.estimator
    }

    // ── Viewport ────────────────────────────────────────────────────────

    /// Set the scroll offset. Negative values clamp to zero.
    pub fn set_scroll(&mut self, px: f64) {
        self.scroll_offset = sanitize_px(px);
    }

    /// Set the viewport height. Negative values clamp to zero.
    pub fn set_viewport_height(&mut self, px: f64) {
        self.viewport.height = sanitize_px(px);
    }

    /// Apply a host viewport report.
    ///
    /// When unit conversion is configured the pixels-per-unit ratio is
    /// rederived from the width, and unit-scaled estimates follow it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport::new(viewport.width, viewport.height);
        let Some(units) = self.config.units else {
            return;
        };
        let scale = UnitScale::from_viewport(self.viewport, units.reference_width);
        if scale == self.unit_scale {
            return;
        }
        let ratio = scale.px_per_unit() / self.unit_scale.px_per_unit();
        self.unit_scale = scale;
        let rescaled = self.heights.rescale_estimates(ratio);
        debug!(
            target: "vlist.engine",
            px_per_unit = scale.px_per_unit(),
            rescaled,
            "unit scale changed"
        );
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Current viewport height.
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport.height
    }

    /// Last reported viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pixels per host-native unit.
    #[must_use]
    pub fn unit_scale(&self) -> UnitScale {
        self.unit_scale
    }

    // ── Window ──────────────────────────────────────────────────────────

    /// Largest index whose offset is `<= target`; `None` before the first item.
    #[must_use]
    pub fn find_index(&self, target: f64) -> Option<usize> {
        self.heights.find_index(target)
    }

    /// Rendered index range for the current state, buffer included.
    ///
    /// At the top edge a run of zero-height rows sharing the top offset is
    /// included from its first row; at the bottom edge the search already
    /// lands on the last row of such a run. Every row whose start lies in
    /// `[scroll, scroll + viewport]` is therefore rendered, including fresh
    /// zero-height placeholders awaiting measurement.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let len = self.items.len();
        if len == 0 {
            return 0..0;
        }
        let top = self.scroll_offset;
        let bottom = top + self.viewport.height;
        let first = self.first_visible_at(top).unwrap_or(0);
        let last = self.find_index(bottom).unwrap_or(0);
        let buffer = self.config.buffer_size;
        let start = first.saturating_sub(buffer);
        let end = last.saturating_add(buffer).min(len - 1) + 1;
        start..end
    }

    fn first_visible_at(&self, top: f64) -> Option<usize> {
        self.find_index(top).map(|idx| self.heights.run_start(idx))
    }

    /// Rows to render for the current scroll position.
    #[must_use]
    pub fn visible_window(&self) -> VisibleWindow<'_, T> {
        let range = self.visible_range();
        let top = self.scroll_offset;
        let bottom = top + self.viewport.height;
        let items = range
            .clone()
            .filter_map(|index| {
                let item = self.items.get(index)?;
                let entry = self.heights.get(index)?;
                Some(VisibleItem {
                    item,
                    index,
                    page: self.page_of(index).unwrap_or(0),
                    offset: self.heights.offset(index)?,
                    height: entry.px,
                })
            })
            .collect();
        VisibleWindow {
            start_index: range.start,
            end_index: range.end,
            first_visible: self.first_visible_at(top),
            last_visible: self.find_index(bottom),
            items,
        }
    }

    // ── Loading ─────────────────────────────────────────────────────────

    /// Load-state snapshot.
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Whether the viewport has reached the end of content (within the load
    /// margin) and no load is outstanding.
    #[must_use]
    pub fn should_load_more(&self) -> bool {
        if self.load.in_flight() {
            return false;
        }
        let reach = self.scroll_offset + self.viewport.height;
        reach >= self.total_height() - sanitize_px(self.config.load_margin)
    }

    /// Claim the load slot. Returns `None` while another load is in flight.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if !self.load.try_begin() {
            trace!(target: "vlist.load", page = self.load.cursor(), "load already in flight");
            return None;
        }
        let request = PageRequest {
            page: self.load.cursor(),
            start_index: self.items.len(),
            page_size: self.config.page_size,
        };
        debug!(target: "vlist.load", page = request.page, start_index = request.start_index, "load started");
        Some(request)
    }

    /// Apply a loader result and release the load slot.
    ///
    /// A non-empty page is appended; an empty page or an error leaves data
    /// and cursor untouched so the next trigger asks for the same page.
    pub fn finish_load<E>(&mut self, request: PageRequest, result: Result<Vec<T>, E>) -> LoadOutcome
    where
        E: fmt::Display,
    {
        if !self.load.in_flight() {
            debug!(target: "vlist.load", page = request.page, "load finished without begin_load");
        }
        self.load.clear();
        match result {
            Ok(batch) if batch.is_empty() => {
                self.load.record_empty();
                debug!(target: "vlist.load", page = request.page, "load returned no items");
                LoadOutcome::Empty { page: request.page }
            }
            Ok(batch) => {
                let page = self.load.cursor();
                let range = self.append_page(batch);
                debug!(target: "vlist.load", page, count = range.len(), "load finished");
                LoadOutcome::Appended {
                    page,
                    count: range.len(),
                    start_index: range.start,
                }
            }
            Err(err) => {
                self.load.record_failure();
                let error = err.to_string();
                warn!(target: "vlist.load", page = request.page, error = %error, "load failed");
                LoadOutcome::Failed {
                    page: request.page,
                    error,
                }
            }
        }
    }

    /// Release the load slot without a result.
    pub fn abandon_load(&mut self, request: PageRequest) {
        if self.load.in_flight() {
            self.load.clear();
            debug!(target: "vlist.load", page = request.page, "load abandoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured_engine(heights: &[f64]) -> WindowEngine<usize> {
        let mut engine = WindowEngine::new(EngineConfig::default());
        engine.append_page((0..heights.len()).collect());
        for (i, &h) in heights.iter().enumerate() {
            engine.report_measured_height(i, h).unwrap();
        }
        engine
    }

    #[test]
    fn empty_engine() {
        let engine: WindowEngine<u8> = WindowEngine::default();
        assert!(engine.is_empty());
        assert_eq!(engine.total_height(), 0.0);
        assert_eq!(engine.visible_range(), 0..0);
        let window = engine.visible_window();
        assert!(window.is_empty());
        assert_eq!(window.first_visible, None);
        assert!(engine.should_load_more());
    }

    #[test]
    fn empty_page_is_noop() {
        let mut engine: WindowEngine<u8> = WindowEngine::default();
        let range = engine.append_page(Vec::new());
        assert!(range.is_empty());
        assert_eq!(engine.load_state().cursor(), 0);
        assert_eq!(engine.page_count(), 0);
    }

    #[test]
    fn append_assigns_indices_and_pages() {
        let mut engine = WindowEngine::new(EngineConfig::default().with_placeholder_height(10.0));
        assert_eq!(engine.append_page(vec!['a', 'b', 'c']), 0..3);
        assert_eq!(engine.append_page(vec!['d', 'e']), 3..5);
        assert_eq!(engine.load_state().cursor(), 2);
        assert_eq!(engine.page_of(2), Some(0));
        assert_eq!(engine.page_of(3), Some(1));
        assert_eq!(engine.page_of(5), None);
        assert_eq!(engine.get(4), Some(&'e'));
        assert_eq!(engine.offsets(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(engine.total_height(), 50.0);
    }

    #[test]
    fn window_around_scroll_position() {
        let mut engine = measured_engine(&[100.0, 150.0, 150.0, 200.0, 50.0]);
        engine.set_scroll(120.0);
        engine.set_viewport_height(200.0);
        let window = engine.visible_window();
        assert_eq!(window.first_visible, Some(1));
        assert_eq!(window.last_visible, Some(2));
        assert_eq!(window.range(), 0..5);
        let indices: Vec<usize> = window.items.iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(window.items[2].offset, 250.0);
    }

    #[test]
    fn zero_buffer_shows_only_intersecting_rows() {
        let mut engine = WindowEngine::new(EngineConfig::default().with_buffer_size(0));
        engine.append_page((0..5).collect::<Vec<u32>>());
        engine.report_measured_heights([(0, 100.0), (1, 150.0), (2, 150.0), (3, 200.0), (4, 50.0)]);
        engine.set_scroll(120.0);
        engine.set_viewport_height(200.0);
        assert_eq!(engine.visible_range(), 1..3);
    }

    #[test]
    fn exact_boundary_starts_at_next_row() {
        let mut engine = WindowEngine::new(EngineConfig::default().with_buffer_size(0));
        engine.append_page((0..3).collect::<Vec<u32>>());
        engine.report_measured_heights([(0, 100.0), (1, 100.0), (2, 100.0)]);
        engine.set_scroll(100.0);
        engine.set_viewport_height(100.0);
        // Row 1 starts exactly at the top edge, row 2 exactly at the bottom.
        assert_eq!(engine.visible_range(), 1..3);
    }

    #[test]
    fn fresh_zero_placeholders_are_rendered() {
        let mut engine: WindowEngine<u32> = WindowEngine::default();
        engine.set_viewport(Viewport::new(375.0, 600.0));
        engine.append_page((0..10).collect());
        assert_eq!(engine.offsets(), &[0.0; 10]);

        let window = engine.visible_window();
        assert_eq!(window.first_visible, Some(0));
        assert_eq!(window.last_visible, Some(9));
        assert_eq!(window.range(), 0..10);
    }

    #[test]
    fn zero_height_run_below_measured_rows() {
        let mut engine = WindowEngine::new(EngineConfig::default().with_buffer_size(0));
        engine.append_page((0..6).collect::<Vec<u32>>());
        engine.report_measured_heights([(0, 100.0), (1, 100.0)]);
        // Rows 2..6 stack at offset 200.
        engine.set_scroll(200.0);
        engine.set_viewport_height(50.0);
        assert_eq!(engine.visible_range(), 2..6);
    }

    #[test]
    fn height_correction_reflows() {
        let mut engine: WindowEngine<&str> = WindowEngine::default();
        engine.append_page(vec!["a", "b", "c"]);
        assert_eq!(engine.total_height(), 0.0);
        engine.report_measured_height(0, 80.0).unwrap();
        engine.report_measured_height(1, 120.0).unwrap();
        engine.report_measured_height(2, 60.0).unwrap();
        assert_eq!(engine.total_height(), 260.0);
        assert_eq!(engine.offsets(), &[0.0, 80.0, 200.0]);
        assert!(engine.is_measured(1));
    }

    #[test]
    fn out_of_range_report_is_value() {
        let mut engine: WindowEngine<u8> = WindowEngine::default();
        engine.append_page(vec![1, 2]);
        let err = engine.report_measured_height(7, 40.0).unwrap_err();
        assert_eq!(err, OutOfRangeReport { index: 7, len: 2 });
        assert_eq!(
            err.to_string(),
            "height reported for index 7 but only 2 items are loaded"
        );
        assert_eq!(engine.total_height(), 0.0);
    }

    #[test]
    fn batch_reports_skip_out_of_range() {
        let mut engine: WindowEngine<u8> = WindowEngine::default();
        engine.append_page(vec![1, 2, 3]);
        let applied = engine.report_measured_heights([(2, 30.0), (9, 1.0), (0, 10.0)]);
        assert_eq!(applied, 2);
        assert_eq!(engine.offsets(), &[0.0, 10.0, 10.0]);
        assert_eq!(engine.total_height(), 40.0);
    }

    #[test]
    fn negative_inputs_clamp() {
        let mut engine: WindowEngine<u8> = WindowEngine::default();
        engine.set_scroll(-30.0);
        engine.set_viewport_height(-1.0);
        assert_eq!(engine.scroll_offset(), 0.0);
        assert_eq!(engine.viewport_height(), 0.0);
        engine.append_page(vec![1]);
        engine.report_measured_height(0, -10.0).unwrap();
        assert_eq!(engine.height_of(0), Some(0.0));
    }

    #[test]
    fn height_fn_is_applied_through_unit_scale() {
        let config = EngineConfig::default().with_units(750.0);
        let mut engine = WindowEngine::new(config).with_height_fn(|h: &f64| *h);
        engine.set_viewport(Viewport::new(375.0, 600.0));
        assert_eq!(engine.unit_scale().px_per_unit(), 0.5);
        engine.append_page(vec![200.0, 400.0]);
        assert_eq!(engine.offsets(), &[0.0, 100.0]);
        assert_eq!(engine.total_height(), 300.0);
    }

    #[test]
    fn estimates_follow_late_viewport() {
        let config = EngineConfig::default().with_units(750.0);
        let mut engine = WindowEngine::new(config).with_height_fn(|h: &f64| *h);
        engine.append_page(vec![200.0, 400.0, 300.0]);
        engine.report_measured_height(1, 90.0).unwrap();
        assert_eq!(engine.total_height(), 590.0);

        engine.set_viewport(Viewport::new(375.0, 600.0));
        // Rows 0 and 2 halve; the measured row keeps its height.
        assert_eq!(engine.offsets(), &[0.0, 100.0, 190.0]);
        assert_eq!(engine.total_height(), 340.0);
    }

    #[test]
    fn estimate_mode_without_fn_uses_running_mean() {
        let config = EngineConfig {
            height_mode: HeightMode::Estimate,
            placeholder_height: 100.0,
            estimate_prior_strength: 0.0,
            ..Default::default()
        };
        let mut engine = WindowEngine::new(config);
        engine.append_page(vec![0u8, 1]);
        assert_eq!(engine.total_height(), 200.0);
        engine.report_measured_heights([(0, 40.0), (1, 60.0)]);
        engine.append_page(vec![2u8]);
        assert_eq!(engine.height_of(2), Some(50.0));
    }

    #[test]
    fn should_load_more_respects_margin_and_flight() {
        let mut engine = measured_engine(&[100.0; 10]);
        engine.set_viewport_height(300.0);
        engine.set_scroll(0.0);
        assert!(!engine.should_load_more());
        engine.set_scroll(660.0);
        // 960 >= 1000 - 50
        assert!(engine.should_load_more());
        let request = engine.begin_load().unwrap();
        assert!(!engine.should_load_more());
        engine.abandon_load(request);
        assert!(engine.should_load_more());
    }

    #[test]
    fn begin_load_deduplicates() {
        let mut engine: WindowEngine<u8> = WindowEngine::default();
        let first = engine.begin_load().unwrap();
        assert_eq!(first.page, 0);
        assert!(engine.begin_load().is_none());
        let outcome = engine.finish_load::<String>(first, Ok(vec![1, 2, 3]));
        assert_eq!(
            outcome,
            LoadOutcome::Appended {
                page: 0,
                count: 3,
                start_index: 0
            }
        );
        let second = engine.begin_load().unwrap();
        assert_eq!(second.page, 1);
        assert_eq!(second.start_index, 3);
    }

    #[test]
    fn failed_load_keeps_cursor() {
        let mut engine: WindowEngine<u8> = WindowEngine::default();
        let request = engine.begin_load().unwrap();
        let outcome = engine.finish_load(request, Err("boom"));
        assert!(outcome.is_failed());
        assert!(!engine.load_state().in_flight());
        assert_eq!(engine.load_state().failures(), 1);
        assert_eq!(engine.begin_load().map(|r| r.page), Some(0));
    }

    #[test]
    fn empty_load_clears_flag() {
        let mut engine: WindowEngine<u8> = WindowEngine::default();
        let request = engine.begin_load().unwrap();
        let outcome = engine.finish_load::<String>(request, Ok(Vec::new()));
        assert_eq!(outcome, LoadOutcome::Empty { page: 0 });
        assert!(!engine.load_state().in_flight());
        assert_eq!(engine.load_state().empty_responses(), 1);
        assert_eq!(engine.load_state().cursor(), 0);
    }

    #[test]
    fn debug_does_not_require_item_debug() {
        struct Opaque;
        let engine: WindowEngine<Opaque> = WindowEngine::default();
        let text = format!("{engine:?}");
        assert!(text.contains("WindowEngine"));
    }
}
