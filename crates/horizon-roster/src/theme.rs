//! Console accent theme.
//!
//! The console is tinted by a single accent colour. This module turns that
//! colour into the set of CSS custom properties the stylesheet reads:
//!
//! - [`hex_to_hsl`]: pure `#rrggbb` to HSL conversion
//! - [`ThemeVariables`]: the derived `--primary`, `--accent`, ... values
//! - [`ThemeSink`]: where variables are written (a document root, a map)
//! - [`ThemeController`]: holds the current colour, persists it through a
//!   [`ThemeStore`] and announces changes
//!
//! # Example
//!
//! ```
//! use horizon_roster::theme::{MemoryThemeStore, ThemeController};
//! use std::collections::BTreeMap;
//!
//! let theme = ThemeController::new(MemoryThemeStore::new(), "#2563eb");
//! theme.set_color("#16a34a").unwrap();
//!
//! let mut root = BTreeMap::new();
//! theme.apply(&mut root);
//! assert_eq!(root["--primary"], "142 76% 36%");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::Mutex;

use horizon_roster_core::logging::targets;
use horizon_roster_core::{Property, Signal};

use crate::error::ThemeError;

/// Default accent colour of the console.
pub const DEFAULT_ACCENT: &str = "#2563eb";

/// Lightness used for accent backgrounds.
const ACCENT_LIGHTNESS: u16 = 97;

/// Lightness used for the admin avatar icon background.
const ICON_BG_LIGHTNESS: u16 = 95;

/// A colour in HSL space, rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    /// Hue in degrees, `0..=360`.
    pub h: u16,
    /// Saturation in percent, `0..=100`.
    pub s: u16,
    /// Lightness in percent, `0..=100`.
    pub l: u16,
}

impl Hsl {
    /// Returns the same hue and saturation with a different lightness.
    #[must_use]
    pub fn with_lightness(self, l: u16) -> Self {
        Self { l, ..self }
    }
}

impl fmt::Display for Hsl {
    /// Formats as a CSS variable value, e.g. `221 83% 53%`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.h, self.s, self.l)
    }
}

/// Converts a `#rrggbb` (or `rrggbb`) colour to HSL.
///
/// An 8-digit form with alpha is accepted; the alpha is ignored.
pub fn hex_to_hsl(hex: &str) -> Result<Hsl, ThemeError> {
    let invalid = || ThemeError::InvalidHex(hex.to_string());

    let digits = hex.trim().trim_start_matches('#');
    if !(digits.len() == 6 || digits.len() == 8)
        || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| f64::from(v) / 255.0)
            .map_err(|_| invalid())
    };
    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    Ok(Hsl {
        h: round_unit(h, 360.0),
        s: round_unit(s, 100.0),
        l: round_unit(l, 100.0),
    })
}

fn round_unit(fraction: f64, scale: f64) -> u16 {
    // fraction is within 0.0..=1.0, so the product fits.
    (fraction * scale).round().clamp(0.0, scale) as u16
}

/// Destination for theme variables.
///
/// Applying a theme is the only side effect in this module; everything up
/// to it is pure.
pub trait ThemeSink {
    /// Sets one custom property. `name` includes the leading `--`.
    fn set_variable(&mut self, name: &str, value: &str);
}

impl ThemeSink for BTreeMap<String, String> {
    fn set_variable(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

impl ThemeSink for std::collections::HashMap<String, String> {
    fn set_variable(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

/// CSS custom properties derived from an accent colour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeVariables {
    variables: BTreeMap<String, String>,
}

impl ThemeVariables {
    /// Create empty variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the console's variable set from an accent colour.
    pub fn from_accent(accent: Hsl) -> Self {
        let base = accent.to_string();
        let light = accent.with_lightness(ACCENT_LIGHTNESS).to_string();
        let icon_bg = accent.with_lightness(ICON_BG_LIGHTNESS).to_string();

        let mut vars = Self::new();
        vars.set("primary", &base);
        vars.set("ring", &base);
        vars.set("accent", &light);
        vars.set("accent-foreground", &base);
        vars.set("sidebar-primary", &base);
        vars.set("sidebar-accent", &light);
        vars.set("sidebar-accent-foreground", &base);
        vars.set("sidebar-ring", &base);
        vars.set("admin-icon-bg", icon_bg);
        vars.set("admin-icon-color", base);
        vars
    }

    /// Parses `hex` and derives the variable set from it.
    pub fn from_hex(hex: &str) -> Result<Self, ThemeError> {
        hex_to_hsl(hex).map(Self::from_accent)
    }

    /// Set a variable. A leading `--` is optional.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let name = name.strip_prefix("--").map(str::to_string).unwrap_or(name);
        self.variables.insert(name, value.into());
    }

    /// Get a variable value. A leading `--` is optional.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.strip_prefix("--").unwrap_or(name);
        self.variables.get(name).map(String::as_str)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if no variables are set.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over all variables, names without the leading `--`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes every variable to `sink` as `--name`.
    pub fn apply<S: ThemeSink + ?Sized>(&self, sink: &mut S) {
        for (name, value) in self.iter() {
            sink.set_variable(&format!("--{name}"), value);
        }
    }
}

/// Persistence for the chosen accent colour.
pub trait ThemeStore: Send + Sync {
    /// Returns the stored colour, if any.
    fn load(&self) -> Option<String>;

    /// Stores a colour.
    fn save(&self, color: &str);
}

/// In-memory [`ThemeStore`].
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    color: Mutex<Option<String>>,
}

impl MemoryThemeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `color`.
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: Mutex::new(Some(color.into())),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Option<String> {
        self.color.lock().clone()
    }

    fn save(&self, color: &str) {
        *self.color.lock() = Some(color.to_string());
    }
}

/// Owns the console's accent colour.
///
/// On construction the stored colour wins over the default, unless it no
/// longer parses.
pub struct ThemeController<S> {
    color: Property<String>,
    store: S,
    /// Emitted with the new variable set whenever the colour changes.
    pub theme_changed: Signal<ThemeVariables>,
}

impl<S: ThemeStore> ThemeController<S> {
    /// Creates a controller, restoring the stored colour if there is a
    /// valid one and falling back to `default_color` otherwise.
    pub fn new(store: S, default_color: impl Into<String>) -> Self {
        let default_color = default_color.into();
        let color = match store.load() {
            Some(stored) if hex_to_hsl(&stored).is_ok() => stored,
            Some(stored) => {
                tracing::warn!(target: targets::THEME, %stored, "ignoring invalid stored colour");
                default_color
            }
            None => default_color,
        };
        Self {
            color: Property::new(color),
            store,
            theme_changed: Signal::new(),
        }
    }

    /// Returns the current accent colour.
    pub fn color(&self) -> String {
        self.color.get()
    }

    /// Returns the variables for the current colour.
    ///
    /// Falls back to the default accent if the current colour is invalid.
    pub fn variables(&self) -> ThemeVariables {
        self.color
            .with(|color| ThemeVariables::from_hex(color))
            .or_else(|_| ThemeVariables::from_hex(DEFAULT_ACCENT))
            .unwrap_or_default()
    }

    /// Changes the accent colour.
    ///
    /// Invalid colours are rejected and leave the theme untouched. A valid
    /// new colour is persisted and announced through `theme_changed`.
    pub fn set_color(&self, hex: &str) -> Result<ThemeVariables, ThemeError> {
        let variables = ThemeVariables::from_hex(hex)?;
        if self.color.set(hex.to_string()) {
            self.store.save(hex);
            tracing::debug!(target: targets::THEME, color = hex, "accent colour changed");
            self.theme_changed.emit(variables.clone());
        }
        Ok(variables)
    }

    /// Writes the current variables to `sink`.
    pub fn apply<K: ThemeSink + ?Sized>(&self, sink: &mut K) {
        self.variables().apply(sink);
    }
}

impl<S> fmt::Debug for ThemeController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ThemeController<MemoryThemeStore>: Send, Sync);
