#![forbid(unsafe_code)]

//! Incremental windowing for virtualized lists.
//!
//! `vlist-core` computes which rows of a growing, paginated list are visible
//! in a scrolling viewport and where each row sits, while rows arrive page by
//! page with heights that are only known after they render.
//!
//! # Example
//!
//! ```
//! use vlist_core::{EngineConfig, WindowEngine};
//!
//! let mut engine = WindowEngine::new(EngineConfig::default());
//! engine.append_page(vec!["a", "b", "c"]);
//!
//! // The render surface reports real heights after layout.
//! engine.report_measured_height(0, 80.0).unwrap();
//! engine.report_measured_height(1, 120.0).unwrap();
//! engine.report_measured_height(2, 60.0).unwrap();
//! assert_eq!(engine.total_height(), 260.0);
//! assert_eq!(engine.offsets(), &[0.0, 80.0, 200.0]);
//!
//! engine.set_viewport_height(100.0);
//! engine.set_scroll(90.0);
//! let window = engine.visible_window();
//! assert_eq!(window.first_visible, Some(1));
//! ```

pub mod config;
pub mod engine;
pub mod estimator;
pub mod height_table;
pub mod load_state;
pub mod units;

pub use config::{ConfigError, EngineConfig, HeightMode, UnitConversion};
pub use engine::{OutOfRangeReport, VisibleItem, VisibleWindow, WindowEngine};
pub use estimator::HeightEstimator;
pub use height_table::{HeightEntry, HeightSource, HeightTable};
pub use load_state::{LoadOutcome, LoadState, PageRequest};
pub use units::{UnitScale, Viewport, sanitize_px};
