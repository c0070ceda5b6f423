#![forbid(unsafe_code)]

//! The paged-data source contract.
//!
//! A [`PageLoader`] is any async source of item batches. Both loader styles
//! hosts tend to write are covered by one signature: a "give me more"
//! loader ignores its [`PageRequest`], a page-number loader reads
//! `request.page`.
//!
//! Closures returning futures are loaders:
//!
//! ```
//! use vlist_core::PageRequest;
//! use vlist_runtime::PageLoader;
//!
//! fn assert_loader<L: PageLoader<u32>>(_: &L) {}
//!
//! let loader = |request: PageRequest| async move {
//!     let start = (request.page * request.page_size) as u32;
//!     Ok::<_, String>((start..start + request.page_size as u32).collect::<Vec<u32>>())
//! };
//! assert_loader(&loader);
//! ```

use std::fmt;
use std::future::Future;

use vlist_core::PageRequest;

/// Async source of item pages.
///
/// An empty `Ok` batch means "nothing for this call"; it is not treated as
/// an error and the same page is requested on the next trigger. Errors are
/// rendered with `Display` and reported to the caller without panicking.
pub trait PageLoader<T> {
    /// Loader failure.
    type Error: fmt::Display;

    /// Fetch the items for `request`.
    fn load_page(&self, request: PageRequest) -> impl Future<Output = Result<Vec<T>, Self::Error>>;
}

impl<T, E, F, Fut> PageLoader<T> for F
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
    E: fmt::Display,
{
    type Error = E;

    fn load_page(&self, request: PageRequest) -> impl Future<Output = Result<Vec<T>, E>> {
        self(request)
    }
}
