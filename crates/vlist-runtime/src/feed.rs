#![forbid(unsafe_code)]

//! Async driver that wires a [`PageLoader`] to a shared [`WindowEngine`].
//!
//! A [`Feed`] is what host callbacks talk to. Scroll handlers call
//! [`Feed::handle_scroll`], layout callbacks call [`Feed::report_height`],
//! and "end reached" signals call [`Feed::reached_bottom`] or
//! [`Feed::maybe_load_more`].
//!
//! # Load deduplication
//!
//! At most one loader call is outstanding. A trigger that arrives while a
//! load is pending resolves immediately to [`LoadOutcome::Skipped`] and the
//! loader is not invoked.
//!
//! # Invariants
//!
//! 1. No engine borrow is held across an `.await`; callbacks may use the
//!    engine while a page is loading.
//! 2. The in-flight flag is cleared on every exit path: completion,
//!    failure, or dropping the load future before it resolves. A future
//!    dropped while the engine is borrowed parks its request instead; the
//!    slot is released at the start of the next load trigger.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};
use vlist_core::{LoadOutcome, OutOfRangeReport, PageRequest, Viewport, WindowEngine};
use web_time::Instant;

use crate::loader::PageLoader;
use crate::throttle::ScrollThrottle;

/// A shared engine plus the loader that feeds it.
pub struct Feed<T, L> {
    engine: Rc<RefCell<WindowEngine<T>>>,
    loader: L,
    throttle: RefCell<ScrollThrottle>,
    orphaned: Cell<Option<PageRequest>>,
}

impl<T, L> fmt::Debug for Feed<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feed")
            .field("engine", &self.engine)
            .field("throttle", &self.throttle)
            .field("orphaned", &self.orphaned.get())
            .finish_non_exhaustive()
    }
}

impl<T, L> Feed<T, L>
where
    L: PageLoader<T>,
{
    /// Wrap an engine. The scroll throttle interval comes from the engine's
    /// configuration.
    pub fn new(engine: WindowEngine<T>, loader: L) -> Self {
        let throttle = ScrollThrottle::from_millis(engine.config().throttle_ms);
        Self {
            engine: Rc::new(RefCell::new(engine)),
            loader,
            throttle: RefCell::new(throttle),
            orphaned: Cell::new(None),
        }
    }

    /// Replace the scroll throttle.
    #[must_use]
    pub fn with_throttle(self, throttle: ScrollThrottle) -> Self {
        self.throttle.replace(throttle);
        self
    }

    /// Borrow the engine.
    ///
    /// Dropping a pending load future while this borrow is alive leaves the
    /// load slot claimed until the next load trigger.
    ///
    /// # Panics
    ///
    /// Panics if the engine is mutably borrowed elsewhere.
    pub fn engine(&self) -> Ref<'_, WindowEngine<T>> {
        self.engine.borrow()
    }

    /// Mutably borrow the engine.
    ///
    /// Dropping a pending load future while this borrow is alive leaves the
    /// load slot claimed until the next load trigger.
    ///
    /// # Panics
    ///
    /// Panics if the engine is borrowed elsewhere.
    pub fn engine_mut(&self) -> RefMut<'_, WindowEngine<T>> {
        self.engine.borrow_mut()
    }

    /// Handle to the shared engine, for callbacks that outlive `&self`.
    #[must_use]
    pub fn shared_engine(&self) -> Rc<RefCell<WindowEngine<T>>> {
        Rc::clone(&self.engine)
    }

    /// The wrapped loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    // ── Loading ─────────────────────────────────────────────────────────

    /// Request the next page.
    ///
    /// Returns [`LoadOutcome::Skipped`] without calling the loader when
    /// another load is already pending.
    pub async fn load_more(&self) -> LoadOutcome {
        self.release_orphaned();
        let begun = self.engine.borrow_mut().begin_load();
        let Some(request) = begun else {
            return LoadOutcome::Skipped;
        };
        let guard = LoadGuard {
            engine: &self.engine,
            orphaned: &self.orphaned,
            request,
            armed: true,
        };
        let result = self.loader.load_page(request).await;
        guard.finish(result)
    }

    /// Load the next page only if the viewport is near the end of content.
    ///
    /// Returns `None` when no load was warranted.
    pub async fn maybe_load_more(&self) -> Option<LoadOutcome> {
        self.release_orphaned();
        let wanted = self.engine.borrow().should_load_more();
        if !wanted {
            return None;
        }
        Some(self.load_more().await)
    }

    /// Discrete "end of list reached" event from the host.
    pub async fn reached_bottom(&self) -> LoadOutcome {
        trace!(target: "vlist.load", "reached bottom");
        self.load_more().await
    }

    /// Release a slot left claimed by a future dropped mid-borrow.
    fn release_orphaned(&self) {
        if let Some(request) = self.orphaned.take() {
            self.engine.borrow_mut().abandon_load(request);
        }
    }

    // ── Host reports ────────────────────────────────────────────────────

    /// Feed a raw scroll position through the throttle.
    ///
    /// Returns `true` if the engine's scroll offset was updated.
    pub fn handle_scroll(&self, px: f64, now: Instant) -> bool {
        let applied = self.throttle.borrow_mut().offer(px, now);
        self.apply_scroll(applied)
    }

    /// Apply a throttled-away scroll position once its interval elapsed.
    ///
    /// Hosts call this from a timer at [`Feed::scroll_deadline`].
    pub fn flush_scroll(&self, now: Instant) -> bool {
        let applied = self.throttle.borrow_mut().flush(now);
        self.apply_scroll(applied)
    }

    /// When a pending scroll position becomes flushable.
    #[must_use]
    pub fn scroll_deadline(&self) -> Option<Instant> {
        self.throttle.borrow().deadline()
    }

    fn apply_scroll(&self, position: Option<f64>) -> bool {
        match position {
            Some(px) => {
                self.engine.borrow_mut().set_scroll(px);
                true
            }
            None => false,
        }
    }

    /// Forward a measured row height.
    pub fn report_height(&self, index: usize, px: f64) -> Result<(), OutOfRangeReport> {
        self.engine.borrow_mut().report_measured_height(index, px)
    }

    /// Forward a viewport report.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.engine.borrow_mut().set_viewport(viewport);
    }
}

/// Releases the load slot if the load future is dropped mid-flight.
struct LoadGuard<'a, T> {
    engine: &'a RefCell<WindowEngine<T>>,
    orphaned: &'a Cell<Option<PageRequest>>,
    request: PageRequest,
    armed: bool,
}

impl<T> LoadGuard<'_, T> {
    fn finish<E: fmt::Display>(mut self, result: Result<Vec<T>, E>) -> LoadOutcome {
        self.armed = false;
        self.engine.borrow_mut().finish_load(self.request, result)
    }
}

impl<T> Drop for LoadGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.abandon_load(self.request),
            Err(_) => {
                warn!(
                    target: "vlist.load",
                    page = self.request.page,
                    "load dropped while engine borrowed; releasing on next trigger"
                );
                self.orphaned.set(Some(self.request));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::Cell;
    use vlist_core::EngineConfig;
    use web_time::Duration;

    fn counting_loader(
        calls: Rc<Cell<usize>>,
    ) -> impl Fn(PageRequest) -> std::future::Ready<Result<Vec<u32>, String>> {
        move |request: PageRequest| {
            calls.set(calls.get() + 1);
            let start = request.start_index as u32;
            std::future::ready(Ok((start..start + request.page_size as u32).collect()))
        }
    }

    #[test]
    fn load_more_appends_page() {
        let calls = Rc::new(Cell::new(0));
        let feed = Feed::new(WindowEngine::<u32>::default(), counting_loader(calls.clone()));
        let outcome = block_on(feed.load_more());
        assert_eq!(
            outcome,
            LoadOutcome::Appended {
                page: 0,
                count: 5,
                start_index: 0
            }
        );
        assert_eq!(feed.engine().len(), 5);
        assert_eq!(calls.get(), 1);
        assert!(!feed.engine().load_state().in_flight());
    }

    #[test]
    fn maybe_load_more_respects_margin() {
        let calls = Rc::new(Cell::new(0));
        let config = EngineConfig::default().with_placeholder_height(100.0).with_load_margin(0.0);
        let feed = Feed::new(WindowEngine::<u32>::new(config), counting_loader(calls.clone()));
        feed.set_viewport(Viewport::new(320.0, 200.0));

        // Empty list: the bottom is always in reach.
        assert!(block_on(feed.maybe_load_more()).is_some());
        assert_eq!(feed.engine().total_height(), 500.0);

        // 200 px of 500 visible: nothing to do.
        assert_eq!(block_on(feed.maybe_load_more()), None);
        assert_eq!(calls.get(), 1);

        feed.engine_mut().set_scroll(300.0);
        assert!(block_on(feed.maybe_load_more()).is_some_and(|o| o.is_appended()));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn scroll_is_throttled() {
        let calls = Rc::new(Cell::new(0));
        let feed = Feed::new(WindowEngine::<u32>::default(), counting_loader(calls))
            .with_throttle(ScrollThrottle::from_millis(40));
        let t0 = Instant::now();

        assert!(feed.handle_scroll(10.0, t0));
        assert!(!feed.handle_scroll(20.0, t0 + Duration::from_millis(5)));
        assert!(!feed.handle_scroll(30.0, t0 + Duration::from_millis(10)));
        assert_eq!(feed.engine().scroll_offset(), 10.0);
        assert_eq!(feed.scroll_deadline(), Some(t0 + Duration::from_millis(40)));

        assert!(feed.flush_scroll(t0 + Duration::from_millis(40)));
        assert_eq!(feed.engine().scroll_offset(), 30.0);
        assert!(!feed.flush_scroll(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn report_height_forwards_to_engine() {
        let calls = Rc::new(Cell::new(0));
        let feed = Feed::new(WindowEngine::<u32>::default(), counting_loader(calls));
        block_on(feed.load_more());
        feed.report_height(2, 64.0).unwrap();
        assert_eq!(feed.engine().height_of(2), Some(64.0));
        let err = feed.report_height(9, 1.0).unwrap_err();
        assert_eq!(err, OutOfRangeReport { index: 9, len: 5 });
    }
}
