//! View projection engine
//!
//! Pure, synchronous filtering and sorting over an already-fetched
//! collection. Nothing here performs I/O or mutates its input.

pub mod engine;
pub mod filter;
pub mod projectable;
pub mod sort;

pub use engine::{project, Projection};
pub use filter::FilterSpec;
pub use projectable::{ClientFacet, ClientSortKey, Projectable, WorkOrderFacet, WorkOrderSortKey};
pub use sort::{compare_values, FieldValue, SortDirection, SortSpec};
