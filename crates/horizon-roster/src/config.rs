//! Console and list configuration.
//!
//! Configuration is plain serde data. It can be built in code, or loaded
//! from a TOML or JSON file whose format is picked from the extension:
//!
//! ```toml
//! [theme]
//! vi_color = "#2563eb"
//!
//! [lists.files]
//! page_size = 12
//! search_field = "name"
//!
//! [lists.activities]
//! page_size = 5
//! search_field = "title"
//! exportable = false
//! ```
//!
//! Every loader validates the result before returning it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use horizon_roster_core::logging::targets;

use crate::error::ConfigError;
use crate::theme::{self, DEFAULT_ACCENT};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default searched field.
pub const DEFAULT_SEARCH_FIELD: &str = "name";

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format.
    Json,
    /// TOML format.
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// Configuration of one list instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Records per page. Must be at least 1.
    pub page_size: usize,
    /// Field matched by the search box.
    pub search_field: String,
    /// Whether the list shows a search box at all.
    pub searchable: bool,
    /// Whether the list offers an export action.
    pub exportable: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_field: DEFAULT_SEARCH_FIELD.to_string(),
            searchable: true,
            exportable: true,
        }
    }
}

impl ListConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the searched field.
    #[must_use]
    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = field.into();
        self
    }

    /// Turns the search box on or off.
    #[must_use]
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Turns the export action on or off.
    #[must_use]
    pub fn with_exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid_value(
                "page_size",
                "must be at least 1",
            ));
        }
        if self.searchable && self.search_field.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "search_field",
                "must name a field when the list is searchable",
            ));
        }
        Ok(())
    }
}

/// Theme section of the console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Accent colour as `#rrggbb`.
    pub vi_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            vi_color: DEFAULT_ACCENT.to_string(),
        }
    }
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Accent theme.
    pub theme: ThemeConfig,
    /// List configurations by list name.
    pub lists: BTreeMap<String, ListConfig>,
}

impl ConsoleConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named list configuration.
    pub fn list(&self, name: &str) -> Option<&ListConfig> {
        self.lists.get(name)
    }

    /// Returns the named list configuration, or the defaults.
    pub fn list_or_default(&self, name: &str) -> ListConfig {
        self.list(name).cloned().unwrap_or_default()
    }

    /// Adds or replaces a list configuration.
    #[must_use]
    pub fn with_list(mut self, name: impl Into<String>, list: ListConfig) -> Self {
        self.lists.insert(name.into(), list);
        self
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        theme::hex_to_hsl(&self.theme.vi_color)?;
        for (name, list) in &self.lists {
            list.validate().map_err(|err| match err {
                ConfigError::InvalidValue { field, message } => {
                    ConfigError::invalid_value(format!("lists.{name}.{field}"), message)
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnknownFormat(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let config = match format {
            ConfigFormat::Toml => Self::from_toml_str(&content),
            ConfigFormat::Json => Self::from_json_str(&content),
        }?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            lists = config.lists.len(),
            "loaded console config"
        );
        Ok(config)
    }

    /// Writes a `.toml` or `.json` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path) {
            Some(ConfigFormat::Toml) => self.to_toml_string()?,
            Some(ConfigFormat::Json) => self.to_json_string()?,
            None => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }
}
