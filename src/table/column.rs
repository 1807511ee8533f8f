//! Column descriptors and cell rendering dispatch.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::table::error::ConfigError;
use crate::table::row::Row;

/// Visual weight of a derived cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// What a renderer draws in one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Badge { label: String, tone: Tone },
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn badge(label: impl Into<String>, tone: Tone) -> Self {
        Self::Badge {
            label: label.into(),
            tone,
        }
    }

    /// Plain text shown for this cell, ignoring styling.
    pub fn label(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Badge { label, .. } => label,
            Self::Empty => "",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub type CellRenderer = Arc<dyn Fn(&Row) -> CellValue + Send + Sync>;

/// One displayed field.
#[derive(Clone)]
pub struct ColumnDescriptor {
    key: String,
    label: String,
    width: Option<u16>,
    render: Option<CellRenderer>,
}

impl ColumnDescriptor {
    /// Column showing `row[key]` verbatim. `key` may be a dotted path.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            render: None,
        }
    }

    /// Column whose cell is derived from the full row.
    pub fn derived<F>(key: impl Into<String>, label: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Row) -> CellValue + Send + Sync + 'static,
    {
        Self::new(key, label).with_renderer(render)
    }

    /// Active/Inactive badge computed from a boolean field.
    pub fn status(key: impl Into<String>, label: impl Into<String>) -> Self {
        let key = key.into();
        let field = key.clone();
        Self::derived(key, label, move |row| match row.get(&field).and_then(|v| v.as_bool()) {
            Some(true) => CellValue::badge("Active", Tone::Positive),
            Some(false) => CellValue::badge("Inactive", Tone::Negative),
            None => CellValue::badge("Unknown", Tone::Neutral),
        })
    }

    #[must_use]
    pub fn with_renderer<F>(mut self, render: F) -> Self
    where
        F: Fn(&Row) -> CellValue + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Preferred width in terminal cells.
    #[must_use]
    pub const fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn width(&self) -> Option<u16> {
        self.width
    }

    /// Produce this column's cell for `row`.
    pub fn cell(&self, row: &Row) -> CellValue {
        if let Some(render) = &self.render {
            return render(row);
        }
        row.text(&self.key)
            .filter(|text| !text.is_empty())
            .map_or(CellValue::Empty, CellValue::Text)
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("derived", &self.render.is_some())
            .finish()
    }
}

/// Ordered, validated set of columns for one screen.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnRegistry {
    /// Validate and freeze a column list.
    ///
    /// # Errors
    /// Fails on an empty list or a repeated key.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self, ConfigError> {
        if columns.is_empty() {
            return Err(ConfigError::EmptyColumns);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key()) {
                return Err(ConfigError::DuplicateColumn(column.key().to_string()));
            }
        }
        Ok(Self { columns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnDescriptor::key)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnDescriptor::label)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cells for `row`, in column order.
    pub fn render_row(&self, row: &Row) -> Vec<CellValue> {
        self.columns.iter().map(|column| column.cell(row)).collect()
    }
}
