//! Per-row actions offered by a table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::Row;
use crate::table::error::{ConfigError, TableError};

/// The closed set of actions a row can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowActionKind {
    Update,
    Details,
}

impl RowActionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Update => "Update",
            Self::Details => "Details",
        }
    }
}

impl fmt::Display for RowActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Update => "update",
            Self::Details => "details",
        })
    }
}

pub type RowHandler = Box<dyn FnMut(&Row) + Send>;

/// Handlers keyed by action kind, in registration order.
#[derive(Default)]
pub struct RowActions {
    handlers: Vec<(RowActionKind, RowHandler)>,
}

impl RowActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Fails if `kind` already has a handler.
    pub fn register(&mut self, kind: RowActionKind, handler: RowHandler) -> Result<(), ConfigError> {
        if self.offers(kind) {
            return Err(ConfigError::DuplicateHandler(kind));
        }
        self.handlers.push((kind, handler));
        Ok(())
    }

    pub fn offers(&self, kind: RowActionKind) -> bool {
        self.handlers.iter().any(|(k, _)| *k == kind)
    }

    pub fn kinds(&self) -> Vec<RowActionKind> {
        self.handlers.iter().map(|(kind, _)| *kind).collect()
    }

    /// Hand `row` to the handler registered for `kind`.
    ///
    /// # Errors
    /// Fails if no handler is registered for `kind`.
    pub fn dispatch(&mut self, kind: RowActionKind, row: &Row) -> Result<(), TableError> {
        let (_, handler) = self
            .handlers
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .ok_or(TableError::ActionNotOffered(kind))?;
        handler(row);
        Ok(())
    }
}

impl fmt::Debug for RowActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
