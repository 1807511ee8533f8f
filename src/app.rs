use std::sync::Arc;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::Theme;
use crate::command::Command;
use crate::config::{
    GlobalAction, KeyResolver, NavAction, PageAction, RowKeyAction, SearchAction, TableConfig,
};
use crate::dataset::Dataset;
use crate::screen::{ListScreen, Screen, ScreenEnv, ScreenMsg, ScreenRegistry, ScreenSelector};
use crate::table::Row;
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, DetailsEvent, DetailsView, EventResult, HelpEvent, HelpView, Keybinding,
    KeybindingSection, Notice, StatusBar,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;

/// Messages screens and commands send to the App.
#[derive(Debug)]
pub enum AppMessage {
    /// Open the read-only details overlay for a record.
    ShowDetails { title: String, row: Row },
    /// The update action was invoked on a record.
    EditRequested { title: String, label: String },
    CommandFailed { name: String, error: String },
}

pub struct App {
    registry: Arc<ScreenRegistry>,
    dataset: Dataset,
    theme: Theme,
    env: ScreenEnv,
    selector: ScreenSelector,
    /// The open list screen; `None` shows the selector.
    screen: Option<Box<dyn Screen>>,
    details: Option<DetailsView>,
    help: Option<HelpView>,
    notice: Option<Notice>,
    should_quit: bool,
    app_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    /// # Errors
    /// Fails if the screen selector cannot be built.
    pub fn new(
        registry: ScreenRegistry,
        dataset: Dataset,
        table: TableConfig,
        resolver: Arc<KeyResolver>,
        theme: Theme,
    ) -> Result<Self> {
        let (app_tx, app_rx) = mpsc::unbounded_channel();
        let selector = ScreenSelector::new(&registry, Arc::clone(&resolver))?;
        Ok(Self {
            registry: Arc::new(registry),
            dataset,
            theme,
            env: ScreenEnv {
                resolver,
                table,
                app_tx,
            },
            selector,
            screen: None,
            details: None,
            help: None,
            notice: None,
            should_quit: false,
            app_rx,
        })
    }

    fn app_tx(&self) -> &UnboundedSender<AppMessage> {
        &self.env.app_tx
    }

    /// Open the list screen registered under `key`, replacing any open one.
    ///
    /// # Errors
    /// Fails if no screen is registered under `key` or its definition is
    /// inconsistent.
    pub fn open_screen(&mut self, key: &str) -> Result<()> {
        let def = self
            .registry
            .get(key)
            .ok_or_else(|| eyre!("Unknown screen `{key}`"))?;
        if !self.dataset.contains(def.collection) {
            warn!(screen = key, collection = def.collection, "Dataset has no such collection");
        }

        let mut screen = ListScreen::new(&def, self.dataset.rows(def.collection), &self.env)?;
        screen.init();
        if let Some(mut previous) = self.screen.replace(Box::new(screen)) {
            previous.destroy();
        }
        self.details = None;
        self.notice = None;
        info!(screen = key, "Opened screen");
        self.update_screen();
        Ok(())
    }

    fn close_screen(&mut self) {
        if let Some(mut screen) = self.screen.take() {
            screen.destroy();
            debug!("Closed screen");
        }
        self.details = None;
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        while !self.should_quit {
            tokio::select! {
                event = tui.next_event() => match event {
                    Some(event) => self.handle_event(&mut tui, event)?,
                    None => break,
                },
                Some(msg) = self.app_rx.recv() => self.handle_message(msg),
            }
            self.update_screen();
        }

        self.close_screen();
        tui.exit()?;
        info!("Exiting labconsole");
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Tick => self.handle_tick(),
            Event::Render | Event::Resize(..) => {
                tui.draw(|frame| self.render(frame))?;
            }
            Event::Key(key) => self.handle_key(key)?,
            Event::Error(e) => {
                error!("Terminal event error: {e}");
                self.notice = Some(Notice::error(e));
            }
        }
        Ok(())
    }

    fn handle_tick(&mut self) {
        match self.screen.as_mut() {
            Some(screen) => screen.handle_tick(),
            None => self.selector.handle_tick(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(help) = self.help.as_mut() {
            if let EventResult::Event(HelpEvent::Close) = help.handle_key(key)? {
                self.help = None;
            }
            return Ok(());
        }
        if let Some(details) = self.details.as_mut() {
            if let EventResult::Event(DetailsEvent::Close) = details.handle_key(key)? {
                self.details = None;
            }
            return Ok(());
        }

        let result = match self.screen.as_mut() {
            Some(screen) => screen.handle_key(key),
            None => match self.selector.handle_key(key)? {
                EventResult::Event(screen_key) => {
                    if let Err(e) = self.open_screen(&screen_key) {
                        error!(screen = %screen_key, "Could not open screen: {e}");
                        self.notice = Some(Notice::error(e.to_string()));
                    }
                    EventResult::Consumed
                }
                other => other.map(|_| ()),
            },
        };
        if result.is_consumed() {
            return Ok(());
        }

        let resolver = Arc::clone(&self.env.resolver);
        if resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if resolver.matches_global(&key, GlobalAction::Help) {
            self.help = Some(HelpView::new(self.help_sections()));
        }
        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::ShowDetails { title, row } => {
                self.details = Some(DetailsView::new(title, &row));
            }
            AppMessage::EditRequested { title, label } => {
                info!(screen = %title, record = %label, "Edit requested");
                self.notice = Some(Notice::info(format!(
                    "Editing \"{label}\" is not available in the console"
                )));
            }
            AppMessage::CommandFailed { name, error } => {
                self.notice = Some(Notice::error(format!("{name} failed: {error}")));
            }
        }
    }

    /// Drain the open screen's queue and act on what it asks for.
    fn update_screen(&mut self) {
        let Some(screen) = self.screen.as_mut() else {
            return;
        };
        match screen.update() {
            Ok(ScreenMsg::Idle) => {}
            Ok(ScreenMsg::Run(commands)) => {
                for command in commands {
                    self.spawn_command(command);
                }
            }
            Ok(ScreenMsg::Close) => self.close_screen(),
            Err(e) => {
                error!("Screen update failed: {e}");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    fn spawn_command(&self, command: Box<dyn Command>) {
        let name = command.name();
        let app_tx = self.app_tx().clone();
        debug!(command = %name, "Spawning command");
        tokio::spawn(async move {
            if let Err(e) = command.execute().await {
                error!(command = %name, "Command failed: {e}");
                let _ = app_tx.send(AppMessage::CommandFailed {
                    name,
                    error: e.to_string(),
                });
            }
        });
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(4)]).areas(area);

        let (breadcrumbs, mut hints) = match self.screen.as_mut() {
            Some(screen) => {
                screen.render(frame, main, &self.theme);
                (screen.breadcrumbs(), screen.keybindings())
            }
            None => {
                self.selector.render(frame, main, &self.theme);
                (Vec::new(), selector_hints(&self.env.resolver))
            }
        };
        let r = &self.env.resolver;
        hints.push(Keybinding::hint(r.display_global(GlobalAction::Help), "Help"));
        hints.push(Keybinding::hint(r.display_global(GlobalAction::Quit), "Quit"));
        StatusBar::render(
            frame,
            status,
            &self.theme,
            &breadcrumbs,
            &hints,
            self.notice.as_ref(),
        );

        if let Some(details) = self.details.as_mut() {
            details.render(frame, main, &self.theme);
        }
        if let Some(help) = self.help.as_mut() {
            help.render(frame, area, &self.theme);
        }
    }

    fn help_sections(&self) -> Vec<KeybindingSection> {
        let r = &self.env.resolver;
        vec![
            KeybindingSection::new(
                "Global",
                vec![
                    Keybinding::new(r.display_global(GlobalAction::Quit), "Quit"),
                    Keybinding::new(r.display_global(GlobalAction::Help), "Toggle help"),
                    Keybinding::new(r.display_global(GlobalAction::Back), "Back"),
                ],
            ),
            KeybindingSection::new(
                "Navigation",
                vec![
                    Keybinding::new(r.display_nav(NavAction::Up), "Move up"),
                    Keybinding::new(r.display_nav(NavAction::Down), "Move down"),
                    Keybinding::new(r.display_nav(NavAction::PageUp), "Scroll up"),
                    Keybinding::new(r.display_nav(NavAction::PageDown), "Scroll down"),
                    Keybinding::new(r.display_nav(NavAction::Home), "First row"),
                    Keybinding::new(r.display_nav(NavAction::End), "Last row"),
                    Keybinding::new(r.display_nav(NavAction::Select), "Select"),
                ],
            ),
            KeybindingSection::new(
                "Search",
                vec![
                    Keybinding::new(r.display_search(SearchAction::Toggle), "Search this page"),
                    Keybinding::new(r.display_search(SearchAction::Exit), "Clear search"),
                ],
            ),
            KeybindingSection::new(
                "Pages",
                vec![
                    Keybinding::new(r.display_page(PageAction::Next), "Next page"),
                    Keybinding::new(r.display_page(PageAction::Previous), "Previous page"),
                    Keybinding::new(r.display_page(PageAction::First), "First page"),
                    Keybinding::new(r.display_page(PageAction::Last), "Last page"),
                    Keybinding::new(r.display_page(PageAction::Grow), "Larger pages"),
                    Keybinding::new(r.display_page(PageAction::Shrink), "Smaller pages"),
                    Keybinding::new(r.display_page(PageAction::Reload), "Reload"),
                ],
            ),
            KeybindingSection::new(
                "Records",
                vec![
                    Keybinding::new(r.display_row(RowKeyAction::Update), "Update"),
                    Keybinding::new(r.display_row(RowKeyAction::Details), "Details"),
                ],
            ),
        ]
    }
}

fn selector_hints(r: &KeyResolver) -> Vec<Keybinding> {
    vec![
        Keybinding::hint(r.display_nav(NavAction::Select), "Open"),
        Keybinding::hint(r.display_search(SearchAction::Toggle), "Search"),
    ]
}
