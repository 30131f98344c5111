//! Row kinds and their per-kind configuration.
//!
//! A [`RowKind`] decides which renderer draws a row (through its
//! [`RendererKind`]) and how the row's [`Value`] is turned into display text.
//! Configuration structs follow the builder pattern used across the crate:
//!
//! ```
//! use horizon_forms::kind::{KeyboardHint, TextConfig};
//!
//! let config = TextConfig::new()
//!     .with_placeholder("name@example.com")
//!     .with_keyboard(KeyboardHint::Email);
//! assert_eq!(config.placeholder.as_deref(), Some("name@example.com"));
//! ```

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;

use crate::value::Value;

/// Identifies which renderer draws a row.
///
/// Kinds are plain strings so hosts can add their own next to the built-in
/// constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererKind(Cow<'static, str>);

impl RendererKind {
    /// Read-only title/detail rows.
    pub const LABEL: RendererKind = RendererKind(Cow::Borrowed("label"));
    /// Editable text and number rows.
    pub const TEXT_FIELD: RendererKind = RendererKind(Cow::Borrowed("textField"));
    /// On/off rows.
    pub const SWITCH: RendererKind = RendererKind(Cow::Borrowed("switch"));
    /// Continuous range rows.
    pub const SLIDER: RendererKind = RendererKind(Cow::Borrowed("slider"));
    /// Date and time rows.
    pub const DATE: RendererKind = RendererKind(Cow::Borrowed("date"));
    /// Map location rows.
    pub const MAP: RendererKind = RendererKind(Cow::Borrowed("map"));
    /// Rows that open a selection screen.
    pub const SELECTION: RendererKind = RendererKind(Cow::Borrowed("selection"));
    /// Rows inside a selection screen.
    pub const CHOICE: RendererKind = RendererKind(Cow::Borrowed("choice"));

    /// Built-in kinds, in registration order.
    pub const BUILT_IN: [RendererKind; 8] = [
        Self::LABEL,
        Self::TEXT_FIELD,
        Self::SWITCH,
        Self::SLIDER,
        Self::DATE,
        Self::MAP,
        Self::SELECTION,
        Self::CHOICE,
    ];

    /// Creates a custom renderer kind.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The kind's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for RendererKind {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

/// Which on-screen keyboard a text row asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardHint {
    #[default]
    Default,
    Email,
    Phone,
    Decimal,
    Url,
}

/// Automatic capitalization of typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capitalization {
    None,
    Words,
    #[default]
    Sentences,
    All,
}

/// Configuration for text entry rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextConfig {
    pub placeholder: Option<String>,
    pub keyboard: KeyboardHint,
    /// Obscure the entered text.
    pub secure: bool,
    pub capitalization: Capitalization,
    pub autocorrect: bool,
}

impl TextConfig {
    pub fn new() -> Self {
        Self {
            autocorrect: true,
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_keyboard(mut self, keyboard: KeyboardHint) -> Self {
        self.keyboard = keyboard;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_capitalization(mut self, capitalization: Capitalization) -> Self {
        self.capitalization = capitalization;
        self
    }

    pub fn with_autocorrect(mut self, autocorrect: bool) -> Self {
        self.autocorrect = autocorrect;
        self
    }

    /// Text entry for e-mail addresses.
    pub fn email() -> Self {
        Self::new()
            .with_keyboard(KeyboardHint::Email)
            .with_capitalization(Capitalization::None)
            .with_autocorrect(false)
    }

    /// Secure text entry.
    pub fn password() -> Self {
        Self::new()
            .with_secure(true)
            .with_capitalization(Capitalization::None)
            .with_autocorrect(false)
    }

    /// Text entry for phone numbers.
    pub fn phone() -> Self {
        Self::new().with_keyboard(KeyboardHint::Phone)
    }
}

/// Configuration for numeric entry rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberConfig {
    pub placeholder: Option<String>,
    /// Digits shown after the decimal point.
    pub fraction_digits: usize,
    /// Prefix shown before the number, e.g. `"€"`.
    pub currency_symbol: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self::decimal()
    }
}

impl NumberConfig {
    /// A plain decimal number with two fraction digits.
    pub fn decimal() -> Self {
        Self {
            placeholder: None,
            fraction_digits: 2,
            currency_symbol: None,
            minimum: None,
            maximum: None,
        }
    }

    /// A currency amount with the given symbol.
    pub fn currency(symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: Some(symbol.into()),
            minimum: Some(0.0),
            ..Self::decimal()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_fraction_digits(mut self, digits: usize) -> Self {
        self.fraction_digits = digits;
        self
    }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Clamps a number into the configured range.
    pub fn clamp(&self, number: f64) -> f64 {
        let number = self.minimum.map_or(number, |min| number.max(min));
        self.maximum.map_or(number, |max| number.min(max))
    }

    /// Formats a number for display.
    pub fn format(&self, number: f64) -> String {
        let digits = self.fraction_digits;
        match &self.currency_symbol {
            Some(symbol) => format!("{symbol} {number:.digits$}"),
            None => format!("{number:.digits$}"),
        }
    }
}

/// Configuration for slider rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub minimum: f64,
    pub maximum: f64,
    /// Snap positions to multiples of this step above `minimum`.
    pub step: Option<f64>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            minimum: 0.0,
            maximum: 1.0,
            step: None,
        }
    }
}

impl SliderConfig {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self {
            minimum,
            maximum,
            step: None,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Clamps a position into range and snaps it to the step.
    pub fn normalize(&self, position: f64) -> f64 {
        let clamped = position.clamp(self.minimum, self.maximum);
        match self.step {
            Some(step) if step > 0.0 => {
                let snapped = self.minimum + ((clamped - self.minimum) / step).round() * step;
                snapped.min(self.maximum)
            }
            _ => clamped,
        }
    }
}

/// Which components a date row edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePickerMode {
    #[default]
    Date,
    Time,
    DateAndTime,
}

/// Configuration for date rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateConfig {
    pub mode: DatePickerMode,
    /// A `chrono` format string overriding the mode's default.
    pub format: Option<String>,
}

impl DateConfig {
    pub fn new(mode: DatePickerMode) -> Self {
        Self { mode, format: None }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// The format string used for display.
    pub fn display_format(&self) -> &str {
        match (&self.format, self.mode) {
            (Some(format), _) => format,
            (None, DatePickerMode::Date) => "%Y-%m-%d",
            (None, DatePickerMode::Time) => "%H:%M",
            (None, DatePickerMode::DateAndTime) => "%Y-%m-%d %H:%M",
        }
    }

    pub fn format(&self, date: &NaiveDateTime) -> String {
        date.format(self.display_format()).to_string()
    }
}

/// Configuration for map rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Visible region around the coordinate, in meters.
    pub span_meters: f64,
    pub pin_title: Option<String>,
    pub interactive: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            span_meters: 1000.0,
            pin_title: None,
            interactive: false,
        }
    }
}

impl MapConfig {
    pub fn with_span(mut self, meters: f64) -> Self {
        self.span_meters = meters;
        self
    }

    pub fn with_pin_title(mut self, title: impl Into<String>) -> Self {
        self.pin_title = Some(title.into());
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Configuration for rows that open a selection screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Whether "no selection" is offered as a choice.
    pub allow_empty_selection: bool,
    /// Title of the "no selection" choice.
    pub empty_selection_label: String,
    /// Show a disclosure indicator next to the row.
    pub show_disclosure: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            allow_empty_selection: false,
            empty_selection_label: String::new(),
            show_disclosure: true,
        }
    }
}

/// What a row is and how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Label,
    Text(TextConfig),
    Number(NumberConfig),
    Switch,
    Slider(SliderConfig),
    Date(DateConfig),
    Map(MapConfig),
    Selection(SelectionConfig),
    /// One option inside a selection screen; its value is `Bool(selected)`.
    Choice,
    /// A host-defined row drawn by a host-registered renderer.
    Custom(RendererKind),
}

impl RowKind {
    /// The renderer kind that draws rows of this kind.
    pub fn renderer_kind(&self) -> RendererKind {
        match self {
            RowKind::Label => RendererKind::LABEL,
            RowKind::Text(_) | RowKind::Number(_) => RendererKind::TEXT_FIELD,
            RowKind::Switch => RendererKind::SWITCH,
            RowKind::Slider(_) => RendererKind::SLIDER,
            RowKind::Date(_) => RendererKind::DATE,
            RowKind::Map(_) => RendererKind::MAP,
            RowKind::Selection(_) => RendererKind::SELECTION,
            RowKind::Choice => RendererKind::CHOICE,
            RowKind::Custom(kind) => kind.clone(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            RowKind::Label => "label",
            RowKind::Text(_) => "text",
            RowKind::Number(_) => "number",
            RowKind::Switch => "switch",
            RowKind::Slider(_) => "slider",
            RowKind::Date(_) => "date",
            RowKind::Map(_) => "map",
            RowKind::Selection(_) => "selection",
            RowKind::Choice => "choice",
            RowKind::Custom(_) => "custom",
        }
    }

    /// Turns a value into the text a renderer shows for it.
    ///
    /// Returns `None` for values that are drawn rather than printed
    /// (switch and choice flags).
    pub fn format_value(&self, value: &Value) -> Option<String> {
        match (self, value) {
            (RowKind::Text(config), Value::Text(text)) if config.secure => {
                Some("\u{2022}".repeat(text.chars().count()))
            }
            (RowKind::Number(config), Value::Number(n)) => Some(config.format(*n)),
            (RowKind::Date(config), Value::Date(date)) => Some(config.format(date)),
            (_, Value::Text(text)) => Some(text.clone()),
            (_, Value::Number(n)) => Some(n.to_string()),
            (_, Value::Bool(_)) => None,
            (_, Value::Date(date)) => Some(date.format("%Y-%m-%d %H:%M").to_string()),
            (_, Value::Coordinate(coordinate)) => Some(coordinate.to_string()),
            (_, Value::Choice(choice)) => Some(choice.title.clone()),
        }
    }

    /// The placeholder shown while the row has no value.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            RowKind::Text(config) => config.placeholder.as_deref(),
            RowKind::Number(config) => config.placeholder.as_deref(),
            _ => None,
        }
    }
}
