#![forbid(unsafe_code)]

//! Single-threaded async runtime pieces for `vlist-core`.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`loader`] | [`PageLoader`]: the async page source contract |
//! | [`feed`] | [`Feed`]: deduplicated loading and host callbacks over a shared engine |
//! | [`throttle`] | [`ScrollThrottle`]: latest-wins scroll throttling |
//! | [`palette`] | [`Palette`]: cyclic row colours |
//!
//! # Example
//!
//! ```
//! use futures::executor::block_on;
//! use vlist_core::{PageRequest, Viewport, WindowEngine};
//! use vlist_runtime::Feed;
//!
//! let loader = |request: PageRequest| async move {
//!     let start = request.start_index as u32;
//!     Ok::<_, String>((start..start + request.page_size as u32).collect::<Vec<u32>>())
//! };
//! let feed = Feed::new(WindowEngine::<u32>::default(), loader);
//! feed.set_viewport(Viewport::new(375.0, 600.0));
//!
//! let outcome = block_on(feed.load_more());
//! assert!(outcome.is_appended());
//! assert_eq!(feed.engine().len(), 5);
//! ```

pub mod feed;
pub mod loader;
pub mod palette;
pub mod throttle;

pub use feed::Feed;
pub use loader::PageLoader;
pub use palette::Palette;
pub use throttle::ScrollThrottle;
