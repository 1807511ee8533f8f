//! Full-page screens and the registry that knows how to build them.

mod catalog;
mod list;
mod registry;
mod selector;

pub use catalog::register_all;
pub use list::{ListMsg, ListScreen};
pub use registry::{ScreenDef, ScreenRegistry};
pub use selector::ScreenSelector;

use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::Theme;
use crate::app::AppMessage;
use crate::command::Command;
use crate::config::{KeyResolver, TableConfig};
use crate::ui::{EventResult, Keybinding};

pub enum ScreenMsg {
    Idle,
    /// Spawn these commands.
    Run(Vec<Box<dyn Command>>),
    /// Return to the screen selector.
    Close,
}

impl<T: Command> From<T> for ScreenMsg {
    fn from(value: T) -> Self {
        Self::Run(vec![Box::new(value)])
    }
}

/// What every screen gets from the app.
#[derive(Clone)]
pub struct ScreenEnv {
    pub resolver: Arc<KeyResolver>,
    pub table: TableConfig,
    pub app_tx: UnboundedSender<AppMessage>,
}

/// A screen of the console.
///
/// Screens own their state and a message queue. The App calls:
///
/// 1. `init()` once when the screen opens
/// 2. `update()` after every event, to drain queued messages
/// 3. `handle_tick()` / `handle_key()` as input arrives
/// 4. `destroy()` when the screen closes
pub trait Screen {
    fn init(&mut self) {}

    fn destroy(&mut self) {}

    fn handle_tick(&mut self) {}

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()>;

    /// Process all queued messages.
    ///
    /// # Errors
    /// The App shows the error; the screen stays open.
    fn update(&mut self) -> Result<ScreenMsg>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn breadcrumbs(&self) -> Vec<String>;

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
