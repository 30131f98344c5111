//! Rows: the unit of data binding.
//!
//! A [`Row`] is a cheap, clonable handle to one logical field. It owns the
//! field's value, title, visibility and change notifications. Clones share
//! state, so a host can keep a row around, hand it to a [`Section`], and later
//! read or write its value from anywhere on the UI thread.
//!
//! Writing a value always goes through [`Row::set_value`], which stores it,
//! refreshes the renderer currently showing the row (if any) and then emits
//! [`RowSignals::value_changed`]:
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use horizon_forms::prelude::*;
//!
//! let changes = Arc::new(AtomicUsize::new(0));
//! let counter = changes.clone();
//! let name = Row::text_field("Name").on_value_changed(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! name.set_value("Otto");
//! name.set_value("Otto");
//! assert_eq!(name.value(), Some(Value::from("Otto")));
//! assert_eq!(changes.load(Ordering::SeqCst), 2);
//! ```
//!
//! [`Section`]: crate::Section

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use horizon_forms_core::logging::targets;
use horizon_forms_core::{ObjectId, Property, Signal};
use parking_lot::RwLock;

use crate::form::{Form, FormInner};
use crate::kind::{
    DateConfig, DatePickerMode, MapConfig, NumberConfig, RendererKind, RowKind, SliderConfig,
    TextConfig,
};
use crate::renderer::SharedRenderer;
use crate::value::{Coordinate, Value};

/// Identifies a row for its whole lifetime.
pub type RowId = ObjectId;

/// Built-in behaviour run when a row is tapped, after host slots.
pub(crate) type ActivationHook = Arc<dyn Fn(&Row, &SharedRenderer) + Send + Sync>;

/// Resolves a value to its display text. `None` shows the row as empty.
pub(crate) type DisplayHook = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Signals emitted by a row.
pub struct RowSignals {
    /// Emitted after every value write, including writes of an equal value.
    pub value_changed: Signal<Row>,
    /// Emitted when the row is tapped, with the renderer that was tapped.
    pub selected: Signal<(Row, SharedRenderer)>,
    /// Emitted when the hidden flag flips. Carries the new flag.
    pub hidden_changed: Signal<bool>,
}

impl RowSignals {
    fn new() -> Self {
        Self {
            value_changed: Signal::new(),
            selected: Signal::new(),
            hidden_changed: Signal::new(),
        }
    }
}

struct RowInner {
    id: RowId,
    title: Property<Option<String>>,
    value: Property<Option<Value>>,
    kind: RwLock<RowKind>,
    renderer_kind: RwLock<Option<RendererKind>>,
    height: Property<Option<f32>>,
    hidden: Property<bool>,
    /// The form this row is currently attached to.
    form: RwLock<Weak<FormInner>>,
    activation: RwLock<Option<ActivationHook>>,
    display: RwLock<Option<DisplayHook>>,
    signals: RowSignals,
}

/// A handle to one field of a form.
#[derive(Clone)]
pub struct Row {
    inner: Arc<RowInner>,
}

impl Row {
    /// Creates a row of the given kind with no title and no value.
    pub fn new(kind: RowKind) -> Self {
        Self {
            inner: Arc::new(RowInner {
                id: ObjectId::next(),
                title: Property::new(None),
                value: Property::new(None),
                kind: RwLock::new(kind),
                renderer_kind: RwLock::new(None),
                height: Property::new(None),
                hidden: Property::new(false),
                form: RwLock::new(Weak::new()),
                activation: RwLock::new(None),
                display: RwLock::new(None),
                signals: RowSignals::new(),
            }),
        }
    }

    /// A read-only title/detail row.
    pub fn label(title: impl Into<String>) -> Self {
        Self::new(RowKind::Label).with_title(title)
    }

    pub fn text_field(title: impl Into<String>) -> Self {
        Self::new(RowKind::Text(TextConfig::new())).with_title(title)
    }

    pub fn email(title: impl Into<String>) -> Self {
        Self::new(RowKind::Text(TextConfig::email())).with_title(title)
    }

    pub fn password(title: impl Into<String>) -> Self {
        Self::new(RowKind::Text(TextConfig::password())).with_title(title)
    }

    pub fn phone(title: impl Into<String>) -> Self {
        Self::new(RowKind::Text(TextConfig::phone())).with_title(title)
    }

    pub fn decimal(title: impl Into<String>) -> Self {
        Self::new(RowKind::Number(NumberConfig::decimal())).with_title(title)
    }

    pub fn currency(title: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::new(RowKind::Number(NumberConfig::currency(symbol))).with_title(title)
    }

    pub fn switch(title: impl Into<String>) -> Self {
        Self::new(RowKind::Switch).with_title(title)
    }

    pub fn slider(title: impl Into<String>, config: SliderConfig) -> Self {
        Self::new(RowKind::Slider(config)).with_title(title)
    }

    pub fn date(title: impl Into<String>, mode: DatePickerMode) -> Self {
        Self::new(RowKind::Date(DateConfig::new(mode))).with_title(title)
    }

    /// A map row centred on `coordinate`.
    pub fn map(title: impl Into<String>, coordinate: Coordinate) -> Self {
        Self::new(RowKind::Map(MapConfig::default()))
            .with_title(title)
            .with_value(coordinate)
    }

    /// A row drawn by a host-registered renderer.
    pub fn custom(kind: RendererKind) -> Self {
        Self::new(RowKind::Custom(kind))
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.inner.title.set_silent(Some(title.into()));
        self
    }

    /// Sets the initial value without notifying.
    pub fn with_value(self, value: impl Into<Value>) -> Self {
        self.inner.value.set_silent(Some(value.into()));
        self
    }

    pub fn with_height(self, height: f32) -> Self {
        self.inner.height.set_silent(Some(height));
        self
    }

    pub fn with_hidden(self, hidden: bool) -> Self {
        self.inner.hidden.set_silent(hidden);
        self
    }

    /// Draw this row with a different renderer than its kind implies.
    pub fn with_renderer_kind(self, kind: RendererKind) -> Self {
        *self.inner.renderer_kind.write() = Some(kind);
        self
    }

    /// Sets the placeholder of a text or number row. Other kinds ignore it.
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        match &mut *self.inner.kind.write() {
            RowKind::Text(config) => config.placeholder = Some(placeholder.into()),
            RowKind::Number(config) => config.placeholder = Some(placeholder.into()),
            _ => {}
        }
        self
    }

    /// Connects a slot to [`RowSignals::value_changed`].
    pub fn on_value_changed<F>(self, slot: F) -> Self
    where
        F: Fn(&Row) + Send + Sync + 'static,
    {
        self.inner.signals.value_changed.connect(slot);
        self
    }

    /// Connects a slot to [`RowSignals::selected`].
    pub fn on_selected<F>(self, slot: F) -> Self
    where
        F: Fn(&Row, &SharedRenderer) + Send + Sync + 'static,
    {
        self.inner
            .signals
            .selected
            .connect(move |(row, renderer): &(Row, SharedRenderer)| slot(row, renderer));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> RowId {
        self.inner.id
    }

    pub fn title(&self) -> Option<String> {
        self.inner.title.get()
    }

    /// Changes the title and refreshes the bound renderer.
    pub fn set_title(&self, title: Option<String>) {
        if self.inner.title.set(title) {
            if let Some(form) = self.form() {
                form.refresh_row(self);
            }
        }
    }

    pub fn value(&self) -> Option<Value> {
        self.inner.value.get()
    }

    /// Stores a value, refreshes the bound renderer and notifies.
    ///
    /// Equal values are not suppressed: every call emits exactly one
    /// `value_changed`.
    pub fn set_value(&self, value: impl Into<Value>) {
        self.set_optional_value(Some(value.into()));
    }

    /// Removes the value, refreshes the bound renderer and notifies.
    pub fn clear_value(&self) {
        self.set_optional_value(None);
    }

    pub fn set_optional_value(&self, value: Option<Value>) {
        tracing::trace!(
            target: targets::ROW,
            row = %self.id(),
            value = value.as_ref().map_or("none", crate::value::Value::kind_name),
            "value set"
        );
        self.inner.value.set_silent(value);
        if let Some(form) = self.form() {
            form.refresh_row(self);
        }
        self.inner.signals.value_changed.emit(self.clone());
    }

    pub fn kind(&self) -> RowKind {
        self.inner.kind.read().clone()
    }

    /// The renderer kind that draws this row.
    pub fn renderer_kind(&self) -> RendererKind {
        if let Some(kind) = self.inner.renderer_kind.read().clone() {
            return kind;
        }
        self.inner.kind.read().renderer_kind()
    }

    /// Preferred height, or `None` for the widget's default.
    pub fn height(&self) -> Option<f32> {
        self.inner.height.get()
    }

    pub fn set_height(&self, height: Option<f32>) {
        self.inner.height.set_silent(height);
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.hidden.get()
    }

    /// Shows or hides the row.
    ///
    /// When the row is attached to a form with a widget, the widget is told
    /// to delete or insert the row at its visible position. Setting the
    /// current state again does nothing.
    pub fn set_hidden(&self, hidden: bool) {
        if self.is_hidden() == hidden {
            return;
        }
        match self.form() {
            Some(form) => form.set_row_hidden(self, hidden),
            None => self.inner.hidden.set_silent(hidden),
        }
        tracing::debug!(target: targets::ROW, row = %self.id(), hidden, "visibility changed");
        self.inner.signals.hidden_changed.emit(hidden);
    }

    /// The text a renderer shows for the current value.
    pub fn display_text(&self) -> Option<String> {
        let value = self.value();
        let display = self.inner.display.read().clone();
        let kind = self.inner.kind.read();
        let text = match (value, display) {
            (Some(value), Some(display)) => display(&value),
            (Some(value), None) => kind.format_value(&value),
            (None, _) => None,
        };
        text.or_else(|| match &*kind {
            RowKind::Selection(config) if config.allow_empty_selection => {
                Some(config.empty_selection_label.clone())
            }
            _ => None,
        })
    }

    pub fn placeholder(&self) -> Option<String> {
        self.inner.kind.read().placeholder().map(str::to_string)
    }

    pub fn signals(&self) -> &RowSignals {
        &self.inner.signals
    }

    /// The form this row is attached to, if it is still alive.
    pub fn form(&self) -> Option<Form> {
        self.inner.form.read().upgrade().map(Form::from_inner)
    }

    pub fn is_attached(&self) -> bool {
        self.inner.form.read().strong_count() > 0
    }

    /// Runs the row's tap behaviour: host `selected` slots first, then the
    /// built-in behaviour of the row kind.
    pub fn activate(&self, renderer: &SharedRenderer) {
        tracing::debug!(target: targets::ROW, row = %self.id(), kind = self.inner.kind.read().name(), "row activated");
        self.inner
            .signals
            .selected
            .emit((self.clone(), renderer.clone()));
        let hook = self.inner.activation.read().clone();
        if let Some(hook) = hook {
            hook(self, renderer);
        }
    }

    pub fn downgrade(&self) -> WeakRow {
        WeakRow {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same row.
    pub fn ptr_eq(&self, other: &Row) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Crate-internal wiring
    // =========================================================================

    pub(crate) fn set_activation_hook(&self, hook: ActivationHook) {
        *self.inner.activation.write() = Some(hook);
    }

    pub(crate) fn set_display_hook(&self, hook: DisplayHook) {
        *self.inner.display.write() = Some(hook);
    }

    pub(crate) fn store_hidden(&self, hidden: bool) {
        self.inner.hidden.set_silent(hidden);
    }

    pub(crate) fn attach(&self, form: &Arc<FormInner>) {
        *self.inner.form.write() = Arc::downgrade(form);
    }

    /// Forgets the form, unless the row has since moved to another one.
    pub(crate) fn detach_from(&self, form: &Arc<FormInner>) {
        let mut attached = self.inner.form.write();
        if std::ptr::eq(attached.as_ptr(), Arc::as_ptr(form)) {
            *attached = Weak::new();
        }
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Row {}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind.read().name())
            .field("title", &self.title())
            .field("value", &self.value())
            .field("hidden", &self.is_hidden())
            .finish()
    }
}

/// A non-owning reference to a row.
#[derive(Clone)]
pub struct WeakRow {
    inner: Weak<RowInner>,
}

impl WeakRow {
    pub fn upgrade(&self) -> Option<Row> {
        self.inner.upgrade().map(|inner| Row { inner })
    }
}

impl fmt::Debug for WeakRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRow")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::headless::HeadlessRenderer;
    use crate::kind::SelectionConfig;

    #[test]
    fn test_set_value_then_read() {
        let row = Row::decimal("Price");
        assert_eq!(row.value(), None);
        row.set_value(9.5);
        assert_eq!(row.value(), Some(Value::Number(9.5)));
        row.clear_value();
        assert_eq!(row.value(), None);
    }

    #[test]
    fn test_one_notification_per_write() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let row = Row::switch("Notifications").on_value_changed(move |row| {
            seen_clone.lock().push(row.value());
        });

        row.set_value(true);
        row.set_value(true);
        row.set_value(false);

        assert_eq!(
            *seen.lock(),
            vec![
                Some(Value::Bool(true)),
                Some(Value::Bool(true)),
                Some(Value::Bool(false)),
            ]
        );
    }

    #[test]
    fn test_slot_sees_stored_value() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        let row = Row::text_field("Name");
        row.signals().value_changed.connect(move |row| {
            *seen_clone.lock() = row.value();
        });
        row.set_value("Ada");
        assert_eq!(*seen.lock(), Some(Value::from("Ada")));
    }

    #[test]
    fn test_builder_value_is_silent() {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        let row = Row::text_field("City")
            .on_value_changed(move |_| *count_clone.lock() += 1)
            .with_value("Bolzano");
        assert_eq!(row.value(), Some(Value::from("Bolzano")));
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_hidden_on_detached_row() {
        let flips = Arc::new(Mutex::new(Vec::new()));
        let flips_clone = flips.clone();
        let row = Row::label("Secret");
        row.signals()
            .hidden_changed
            .connect(move |hidden| flips_clone.lock().push(*hidden));

        row.set_hidden(true);
        row.set_hidden(true);
        row.set_hidden(false);

        assert!(!row.is_hidden());
        assert_eq!(*flips.lock(), vec![true, false]);
    }

    #[test]
    fn test_clones_share_state() {
        let row = Row::text_field("Name");
        let other = row.clone();
        other.set_value("Grace");
        assert_eq!(row.value(), Some(Value::from("Grace")));
        assert_eq!(row, other);
        assert_ne!(row, Row::text_field("Name"));
    }

    #[test]
    fn test_renderer_kind_override() {
        let row = Row::text_field("Notes");
        assert_eq!(row.renderer_kind(), RendererKind::TEXT_FIELD);
        let row = row.with_renderer_kind(RendererKind::new("multiline"));
        assert_eq!(row.renderer_kind().as_str(), "multiline");
    }

    #[test]
    fn test_display_text() {
        let price = Row::currency("Price", "€").with_value(3.0);
        assert_eq!(price.display_text().as_deref(), Some("€ 3.00"));

        let empty = Row::new(RowKind::Selection(SelectionConfig {
            allow_empty_selection: true,
            empty_selection_label: "Nobody".into(),
            show_disclosure: true,
        }));
        assert_eq!(empty.display_text().as_deref(), Some("Nobody"));

        let strict = Row::new(RowKind::Selection(SelectionConfig::default()));
        assert_eq!(strict.display_text(), None);
    }

    #[test]
    fn test_placeholder() {
        let row = Row::email("Email").with_placeholder("name@example.com");
        assert_eq!(row.placeholder().as_deref(), Some("name@example.com"));
        let row = Row::switch("Wi-Fi").with_placeholder("ignored");
        assert_eq!(row.placeholder(), None);
    }

    #[test]
    fn test_activate_runs_slots() {
        let taps = Arc::new(Mutex::new(Vec::new()));
        let taps_clone = taps.clone();
        let row = Row::label("About").on_selected(move |row, renderer| {
            taps_clone.lock().push((row.id(), renderer.kind()));
        });
        let renderer: SharedRenderer = Arc::new(HeadlessRenderer::new(RendererKind::LABEL));

        row.activate(&renderer);

        assert_eq!(*taps.lock(), vec![(row.id(), RendererKind::LABEL)]);
    }

    #[test]
    fn test_weak_row() {
        let row = Row::label("Temporary");
        let weak = row.downgrade();
        assert!(weak.upgrade().is_some());
        drop(row);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_detached_row_has_no_form() {
        let row = Row::label("Loose");
        assert!(!row.is_attached());
        assert!(row.form().is_none());
    }
}
