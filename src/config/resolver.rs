use crate::config::actions::*;
use crate::config::keybindings::KeybindingsConfig;
use crossterm::event::KeyEvent;
use std::sync::Arc;

/// Maps key events to actions using the configured bindings.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    // Global actions
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.matches(event),
            GlobalAction::Help => kb.help.matches(event),
            GlobalAction::Back => kb.back.matches(event),
        }
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.display(),
            GlobalAction::Help => kb.help.display(),
            GlobalAction::Back => kb.back.display(),
        }
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.matches(event),
            NavAction::Down => kb.down.matches(event),
            NavAction::PageUp => kb.page_up.matches(event),
            NavAction::PageDown => kb.page_down.matches(event),
            NavAction::Home => kb.home.matches(event),
            NavAction::End => kb.end.matches(event),
            NavAction::Select => kb.select.matches(event),
        }
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.display(),
            NavAction::Down => kb.down.display(),
            NavAction::PageUp => kb.page_up.display(),
            NavAction::PageDown => kb.page_down.display(),
            NavAction::Home => kb.home.display(),
            NavAction::End => kb.end.display(),
            NavAction::Select => kb.select.display(),
        }
    }

    // Search actions
    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => kb.toggle.matches(event),
            SearchAction::Exit => kb.exit.matches(event),
        }
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => kb.toggle.display(),
            SearchAction::Exit => kb.exit.display(),
        }
    }

    // Paging actions
    pub fn matches_page(&self, event: &KeyEvent, action: PageAction) -> bool {
        let kb = &self.keybindings.pages;
        match action {
            PageAction::Next => kb.next.matches(event),
            PageAction::Previous => kb.previous.matches(event),
            PageAction::First => kb.first.matches(event),
            PageAction::Last => kb.last.matches(event),
            PageAction::Grow => kb.grow.matches(event),
            PageAction::Shrink => kb.shrink.matches(event),
            PageAction::Reload => kb.reload.matches(event),
        }
    }

    pub fn display_page(&self, action: PageAction) -> String {
        let kb = &self.keybindings.pages;
        match action {
            PageAction::Next => kb.next.display(),
            PageAction::Previous => kb.previous.display(),
            PageAction::First => kb.first.display(),
            PageAction::Last => kb.last.display(),
            PageAction::Grow => kb.grow.display(),
            PageAction::Shrink => kb.shrink.display(),
            PageAction::Reload => kb.reload.display(),
        }
    }

    // Row actions
    pub fn matches_row(&self, event: &KeyEvent, action: RowKeyAction) -> bool {
        let kb = &self.keybindings.rows;
        match action {
            RowKeyAction::Update => kb.update.matches(event),
            RowKeyAction::Details => kb.details.matches(event),
        }
    }

    pub fn display_row(&self, action: RowKeyAction) -> String {
        let kb = &self.keybindings.rows;
        match action {
            RowKeyAction::Update => kb.update.display(),
            RowKeyAction::Details => kb.details.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_paging_keys() {
        let resolver = KeyResolver::new(Arc::new(KeybindingsConfig::default()));
        assert!(resolver.matches_page(&press(KeyCode::Char(']')), PageAction::Next));
        assert!(resolver.matches_page(&press(KeyCode::Right), PageAction::Next));
        assert!(resolver.matches_page(&press(KeyCode::Left), PageAction::Previous));
        assert!(!resolver.matches_page(&press(KeyCode::Left), PageAction::Next));
        assert_eq!(resolver.display_page(PageAction::Reload), "r");
    }

    #[test]
    fn test_row_keys() {
        let resolver = KeyResolver::new(Arc::new(KeybindingsConfig::default()));
        assert!(resolver.matches_row(&press(KeyCode::Enter), RowKeyAction::Details));
        assert!(resolver.matches_row(&press(KeyCode::Char('e')), RowKeyAction::Update));
        assert_eq!(resolver.display_row(RowKeyAction::Details), "Enter/d");
    }
}
