//! Generic paginated, filterable tables.
//!
//! - [`ColumnRegistry`] - what each screen displays, in order
//! - [`Pagination`] - page bookkeeping and stale response guard
//! - [`apply_filter`] - free-text narrowing of the loaded page
//! - [`RowActions`] - per-row callbacks
//! - [`TableController`] - ties the above together into a [`ViewModel`]

pub mod action;
pub mod column;
pub mod controller;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod row;

pub use action::{RowActionKind, RowActions};
pub use column::{CellValue, ColumnDescriptor, ColumnRegistry, Tone};
pub use controller::{
    DEFAULT_PAGE_SIZE, PaginationView, RowView, TableBuilder, TableController, ViewModel,
    ViewStatus,
};
pub use error::{ConfigError, TableError};
pub use filter::{FilterPredicate, SearchFields, apply_filter};
pub use pagination::{Applied, FetchRequest, FetchToken, LoadState, Pagination};
pub use row::Row;
