//! Free-text filtering over the rows already loaded into a table.
//!
//! Filtering never fetches. On a server-paginated table it only narrows the
//! current page; on a local table the page is the whole dataset.

use std::borrow::Cow;

use crate::table::row::Row;

/// Field paths a query is matched against. Dotted paths reach nested values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFields(Vec<String>);

impl SearchFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A normalized, case-insensitive substring test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    needle: String,
}

impl FilterPredicate {
    /// Returns `None` for blank queries, which match everything.
    pub fn parse(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    pub fn matches(&self, row: &Row, fields: &SearchFields) -> bool {
        fields.iter().any(|field| {
            row.text(field)
                .is_some_and(|text| text.to_lowercase().contains(&self.needle))
        })
    }
}

/// Ordered subsequence of `items` matching `query`.
///
/// A blank query borrows the input untouched.
pub fn apply_filter<'a>(items: &'a [Row], query: &str, fields: &SearchFields) -> Cow<'a, [Row]> {
    let Some(predicate) = FilterPredicate::parse(query) else {
        return Cow::Borrowed(items);
    };
    Cow::Owned(
        items
            .iter()
            .filter(|row| predicate.matches(row, fields))
            .cloned()
            .collect(),
    )
}

/// Positions of the rows in `items` that match `query`, in order.
pub fn matching_indices(items: &[Row], query: &str, fields: &SearchFields) -> Vec<usize> {
    match FilterPredicate::parse(query) {
        None => (0..items.len()).collect(),
        Some(predicate) => items
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate.matches(row, fields))
            .map(|(i, _)| i)
            .collect(),
    }
}
