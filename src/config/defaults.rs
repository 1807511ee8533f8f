use crate::config::key::{Key, KeyBinding};
use crate::config::keybindings::*;
use crossterm::event::KeyCode;

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            help: Key::char('?').into(),
            back: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::char('k'), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::char('j'), Key::new(KeyCode::Down)]),
            page_up: Key::new(KeyCode::PageUp).into(),
            page_down: Key::new(KeyCode::PageDown).into(),
            home: KeyBinding::multiple(vec![Key::char('g'), Key::new(KeyCode::Home)]),
            end: KeyBinding::multiple(vec![Key::char('G'), Key::new(KeyCode::End)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            toggle: Key::char('/').into(),
            exit: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for PageKeybindings {
    fn default() -> Self {
        Self {
            next: KeyBinding::multiple(vec![Key::char(']'), Key::new(KeyCode::Right)]),
            previous: KeyBinding::multiple(vec![Key::char('['), Key::new(KeyCode::Left)]),
            first: Key::char('{').into(),
            last: Key::char('}').into(),
            grow: Key::char('+').into(),
            shrink: Key::char('-').into(),
            reload: Key::char('r').into(),
        }
    }
}

impl Default for RowKeybindings {
    fn default() -> Self {
        Self {
            update: Key::char('e').into(),
            details: KeyBinding::multiple(vec![Key::new(KeyCode::Enter), Key::char('d')]),
        }
    }
}
