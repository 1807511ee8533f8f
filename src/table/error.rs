use thiserror::Error;

use crate::table::action::RowActionKind;

/// Mistakes made while assembling a table. Reported by
/// [`TableBuilder::build`](crate::table::TableBuilder::build) before anything
/// is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("column key `{0}` is registered more than once")]
    DuplicateColumn(String),
    #[error("a table needs at least one column")]
    EmptyColumns,
    #[error("action `{0}` is offered but has no handler")]
    MissingHandler(RowActionKind),
    #[error("action `{0}` already has a handler")]
    DuplicateHandler(RowActionKind),
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Invalid calls against a running table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("page {0} is out of range, pages start at 1")]
    InvalidPage(u32),
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(u32),
    #[error("action `{0}` is not offered on this table")]
    ActionNotOffered(RowActionKind),
    #[error("no visible row at position {0}")]
    RowOutOfRange(usize),
}
