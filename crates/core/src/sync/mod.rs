//! Resource synchronisation: one debounced, single-flight fetch loop per
//! list screen.

pub mod ports;
pub mod synchronizer;

pub use ports::{page_source_fn, FnPageSource, PageSource};
pub use synchronizer::{FetchState, ResourceSynchronizer};
