//! Terminal console for browsing laboratory master data.
//!
//! The [`table`] module holds the list controller every screen is built on:
//! pagination, local search, columns and row actions, reduced to a
//! [`ViewModel`](table::ViewModel) the [`ui`] draws. [`source`] supplies the
//! records, either a page at a time or all at once.

pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod dataset;
pub mod screen;
pub mod source;
pub mod table;
pub mod theme;
pub mod tui;
pub mod ui;

pub use theme::Theme;
