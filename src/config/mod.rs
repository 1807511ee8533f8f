pub mod actions;
mod defaults;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::{config_dir, config_path, load};
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::source::DEFAULT_FETCH_TIMEOUT;
use crate::table::{ConfigError, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Defaults applied to every list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub default_page_size: u32,
    /// Sizes cycled through by the grow/shrink page size keys.
    pub page_size_options: Vec<u32>,
    pub fetch_timeout_secs: u64,
    /// Artificial delay for server-paged collections, in milliseconds.
    pub simulated_latency_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 25, 50, 100],
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            simulated_latency_ms: 250,
        }
    }
}

impl TableConfig {
    /// # Errors
    /// Rejects a zero default page size or a zero entry in the options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 || self.page_size_options.contains(&0) {
            return Err(ConfigError::InvalidPageSize);
        }
        Ok(())
    }

    /// Next larger configured size after `current`, if any.
    pub fn grow(&self, current: u32) -> Option<u32> {
        self.page_size_options
            .iter()
            .copied()
            .filter(|&size| size > current)
            .min()
    }

    /// Next smaller configured size before `current`, if any.
    pub fn shrink(&self, current: u32) -> Option<u32> {
        self.page_size_options
            .iter()
            .copied()
            .filter(|&size| size < current)
            .max()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}
