//! Terminal rendering for the console.
//!
//! - [`Component`] - interactive building block with its own key handling
//! - [`TableView`] - draws a table [`ViewModel`](crate::table::ViewModel)
//! - [`StatusBar`] - breadcrumbs, notices and key hints
//! - [`DetailsView`] / [`HelpView`] - overlays

mod component;
mod details;
mod help;
mod spinner;
mod status_bar;
mod table_view;

pub use component::Component;
pub use details::{DetailsEvent, DetailsView};
pub use help::{HelpEvent, HelpView, Keybinding, KeybindingSection};
pub use spinner::Spinner;
pub use status_bar::{Notice, NoticeLevel, StatusBar};
pub use table_view::{TableEvent, TableView};

pub type Result<T> = std::result::Result<T, color_eyre::Report>;

/// Outcome of handling a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Not handled; the parent should try.
    Ignored,
    /// Handled without producing anything.
    Consumed,
    Event(E),
}

impl<E> EventResult<E> {
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub fn map<F, U>(self, f: F) -> EventResult<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Ignored => EventResult::Ignored,
            Self::Consumed => EventResult::Consumed,
            Self::Event(e) => EventResult::Event(f(e)),
        }
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}
