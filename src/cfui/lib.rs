//! # cfui - Terminal Output for the cf CLI
//!
//! Everything the command layer prints goes through this crate. It owns three concerns:
//!
//! - **Styling**: named `console::Style`s collected in a [`Theme`] and applied through a
//!   `style` template filter, with graceful degradation when color is off.
//! - **Translation**: a [`Translator`] that swaps an English template for its locale-specific
//!   text and substitutes `{{ placeholders }}`. Translation is total: a broken template is
//!   printed verbatim rather than failing the command.
//! - **Layout**: the [`Ui`] writer, which knows which stream each kind of output belongs to
//!   (warnings and errors on stderr, results and the final `OK`/`FAILED` marker on stdout),
//!   plus aligned tables via [`table`].
//!
//! ## Quick Example
//!
//! ```rust
//! use cfui::{render_with_color, Theme};
//! use console::Style;
//!
//! let theme = Theme::new().add("flavor", Style::new().cyan().bold());
//! let out = render_with_color(
//!     r#"Getting apps in org {{ org | style("flavor") }}..."#,
//!     &serde_json::json!({ "org": "dev" }),
//!     &theme,
//!     false,
//! )
//! .unwrap();
//! assert_eq!(out, "Getting apps in org dev...");
//! ```
//!
//! Templates use [minijinja](https://docs.rs/minijinja) syntax.

use console::Style;
use minijinja::{Environment, Error, Value};
use serde::Serialize;
use std::collections::HashMap;

pub mod i18n;
pub mod table;
pub mod ui;

pub use i18n::{normalize_locale, Translator, SUPPORTED_LOCALES};
pub use ui::{Buffer, Translatable, Ui};

/// Default prefix shown when a style name is not found.
pub const DEFAULT_MISSING_STYLE_INDICATOR: &str = "(!?)";

/// A collection of named styles.
///
/// When a style name is not found, a configurable indicator is prepended to the text
/// so typos in templates are visible (defaults to `(!?)`).
///
/// ```rust
/// use cfui::Styles;
/// use console::Style;
///
/// let styles = Styles::new().add("failure", Style::new().bold().red());
/// assert!(styles.apply("typo", "FAILED").starts_with("(!?)"));
/// ```
#[derive(Clone)]
pub struct Styles {
    styles: HashMap<String, Style>,
    missing_indicator: String,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            styles: HashMap::new(),
            missing_indicator: DEFAULT_MISSING_STYLE_INDICATOR.to_string(),
        }
    }
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indicator prepended when a style name is not found. Empty disables it.
    pub fn missing_indicator(mut self, indicator: &str) -> Self {
        self.missing_indicator = indicator.to_string();
        self
    }

    /// Adds a named style, replacing any style with the same name.
    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles.insert(name.to_string(), style);
        self
    }

    /// Applies a named style to text, emitting ANSI codes.
    pub fn apply(&self, name: &str, text: &str) -> String {
        match self.styles.get(name) {
            Some(style) => style.apply_to(text).to_string(),
            None if self.missing_indicator.is_empty() => text.to_string(),
            None => format!("{} {}", self.missing_indicator, text),
        }
    }

    /// Same lookup as [`Styles::apply`] without ANSI codes.
    pub fn apply_plain(&self, name: &str, text: &str) -> String {
        if self.styles.contains_key(name) || self.missing_indicator.is_empty() {
            text.to_string()
        } else {
            format!("{} {}", self.missing_indicator, text)
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// A named collection of styles used when rendering templates.
#[derive(Clone, Default)]
pub struct Theme {
    styles: Styles,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_styles(styles: Styles) -> Self {
        Self { styles }
    }

    /// Adds a named style, returning an updated theme for chaining.
    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles = self.styles.add(name, style);
        self
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Applies a style when `use_color` is set, otherwise only checks the name.
    pub fn paint(&self, name: &str, text: &str, use_color: bool) -> String {
        if use_color {
            self.styles.apply(name, text)
        } else {
            self.styles.apply_plain(name, text)
        }
    }
}

/// Renders a template with explicit color control.
///
/// ```rust
/// use cfui::{render_with_color, Theme};
/// use console::Style;
///
/// let theme = Theme::new().add("success", Style::new().green());
/// let plain = render_with_color(
///     r#"{{ "OK" | style("success") }}"#,
///     &(),
///     &theme,
///     false,
/// )
/// .unwrap();
/// assert_eq!(plain, "OK");
/// ```
pub fn render_with_color<T: Serialize>(
    template: &str,
    data: &T,
    theme: &Theme,
    use_color: bool,
) -> Result<String, Error> {
    let mut env = Environment::new();
    register_style_filter(&mut env, theme.clone(), use_color);
    env.render_str(template, data)
}

/// Registers the `style` filter on a minijinja environment.
fn register_style_filter(env: &mut Environment<'static>, theme: Theme, use_color: bool) {
    env.add_filter("style", move |value: Value, name: String| -> String {
        theme.paint(&name, &value.to_string(), use_color)
    });
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}
