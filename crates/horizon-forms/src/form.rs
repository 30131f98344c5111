//! Forms: the data source behind a list widget.
//!
//! A [`Form`] owns an ordered list of [`Section`]s and answers the questions a
//! [`ListWidget`] asks while drawing: how many sections and visible rows there
//! are, which row sits at a position, which renderer kind it needs and how
//! tall it is. It also keeps the bookkeeping that ties on-screen renderers to
//! rows, so a value written into a row refreshes whatever renderer shows it.
//!
//! # Binding
//!
//! The renderer side holds a strong handle to its row; the form keeps a side
//! table from row id to a *weak* renderer reference. A row never owns its
//! renderer, and a renderer that the widget has dropped simply stops
//! receiving refreshes.
//!
//! # Threading
//!
//! Forms are `Send + Sync` handles but are driven from the UI thread only.
//! Structural operations assert this in debug builds.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use horizon_forms_core::logging::targets;
use horizon_forms_core::{ObjectId, PerfSpan, Property, Signal, ThreadAffinity};
use parking_lot::{Mutex, RwLock};

use crate::kind::RendererKind;
use crate::navigation::Navigator;
use crate::renderer::{Renderer, RendererRegistry, SharedRenderer};
use crate::row::{Row, RowId};
use crate::section::Section;
use crate::widget::{IndexPath, ListWidget, RowAnimation};

/// Signals emitted by a form.
pub struct FormSignals {
    /// Emitted after the sections were replaced. Carries the new section count.
    pub sections_changed: Signal<usize>,
    /// Emitted when the widget reports a tap, before the row reacts.
    pub row_selected: Signal<IndexPath>,
}

pub(crate) struct FormInner {
    id: ObjectId,
    affinity: ThreadAffinity,
    title: Property<Option<String>>,
    sections: RwLock<Vec<Section>>,
    widget: RwLock<Option<Arc<dyn ListWidget>>>,
    registry: Arc<RendererRegistry>,
    bindings: Mutex<HashMap<RowId, Weak<dyn Renderer>>>,
    navigator: RwLock<Option<Weak<dyn Navigator>>>,
    signals: FormSignals,
}

/// A handle to a form.
///
/// Clones share state.
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

impl Form {
    /// Creates an empty form that draws rows with renderers from `registry`.
    pub fn new(registry: Arc<RendererRegistry>) -> Self {
        Self {
            inner: Arc::new(FormInner {
                id: ObjectId::next(),
                affinity: ThreadAffinity::current(),
                title: Property::new(None),
                sections: RwLock::new(Vec::new()),
                widget: RwLock::new(None),
                registry,
                bindings: Mutex::new(HashMap::new()),
                navigator: RwLock::new(None),
                signals: FormSignals {
                    sections_changed: Signal::new(),
                    row_selected: Signal::new(),
                },
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<FormInner>) -> Self {
        Self { inner }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.inner.title.set_silent(Some(title.into()));
        self
    }

    pub fn with_sections(self, sections: Vec<Section>) -> Self {
        self.set_sections(sections);
        self
    }

    pub fn id(&self) -> ObjectId {
        self.inner.id
    }

    pub fn title(&self) -> Option<String> {
        self.inner.title.get()
    }

    pub fn set_title(&self, title: Option<String>) {
        self.inner.title.set_silent(title);
    }

    pub fn registry(&self) -> Arc<RendererRegistry> {
        self.inner.registry.clone()
    }

    pub fn signals(&self) -> &FormSignals {
        &self.inner.signals
    }

    pub fn downgrade(&self) -> WeakForm {
        WeakForm {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Form) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Sections
    // =========================================================================

    /// A snapshot of the sections.
    pub fn sections(&self) -> Vec<Section> {
        self.inner.sections.read().clone()
    }

    pub fn section(&self, index: usize) -> Option<Section> {
        self.inner.sections.read().get(index).cloned()
    }

    /// Replaces all sections and reloads the widget.
    ///
    /// Rows of the old sections are detached from this form; rows of the new
    /// sections are attached to it.
    pub fn set_sections(&self, sections: Vec<Section>) {
        self.inner.affinity.debug_assert_same_thread();
        let previous = std::mem::replace(&mut *self.inner.sections.write(), sections);
        for row in previous.iter().flat_map(Section::rows) {
            row.detach_from(&self.inner);
        }
        let count = {
            let sections = self.inner.sections.read();
            for row in sections.iter().flat_map(Section::rows) {
                row.attach(&self.inner);
            }
            sections.len()
        };
        tracing::debug!(target: targets::FORM, form = %self.id(), sections = count, "sections replaced");

        self.clear_bindings();
        self.inner.signals.sections_changed.emit(count);
        if let Some(widget) = self.widget() {
            widget.reload_data();
        }
    }

    /// Appends a section and reloads the widget.
    pub fn append_section(&self, section: Section) {
        let mut sections = self.sections();
        sections.push(section);
        self.set_sections(sections);
    }

    /// Every row of the form, hidden ones included.
    pub fn rows(&self) -> Vec<Row> {
        self.inner
            .sections
            .read()
            .iter()
            .flat_map(|section| section.rows().iter().cloned())
            .collect()
    }

    pub fn find_row(&self, id: RowId) -> Option<Row> {
        self.inner
            .sections
            .read()
            .iter()
            .flat_map(Section::rows)
            .find(|row| row.id() == id)
            .cloned()
    }

    /// The visible position of `row`, or `None` if it is hidden or not part
    /// of this form.
    pub fn index_path_of(&self, row: &Row) -> Option<IndexPath> {
        self.inner
            .sections
            .read()
            .iter()
            .enumerate()
            .find_map(|(section, rows)| {
                rows.position_of(row)
                    .map(|position| IndexPath::new(section, position))
            })
    }

    // =========================================================================
    // Widget
    // =========================================================================

    /// Binds a widget to this form.
    ///
    /// Any previously attached widget is detached first. The widget learns
    /// every registered renderer kind, the registry is sealed, and the widget
    /// reloads.
    pub fn attach_widget(&self, widget: Arc<dyn ListWidget>) {
        self.inner.affinity.debug_assert_same_thread();
        let _span = PerfSpan::new("form.attach_widget");

        self.detach_widget();
        widget.attach_source(self.downgrade());
        widget.set_dismiss_keyboard_on_drag(true);
        for (kind, factory) in self.inner.registry.entries() {
            widget.register_renderer(kind, factory);
        }
        self.inner.registry.seal();
        *self.inner.widget.write() = Some(widget.clone());

        tracing::debug!(target: targets::FORM, form = %self.id(), "widget attached");
        widget.reload_data();
    }

    /// Unbinds the current widget, returning it.
    pub fn detach_widget(&self) -> Option<Arc<dyn ListWidget>> {
        let previous = self.inner.widget.write().take();
        if let Some(widget) = &previous {
            widget.detach_source();
            self.clear_bindings();
            tracing::debug!(target: targets::FORM, form = %self.id(), "widget detached");
        }
        previous
    }

    pub fn widget(&self) -> Option<Arc<dyn ListWidget>> {
        self.inner.widget.read().clone()
    }

    pub fn has_widget(&self) -> bool {
        self.inner.widget.read().is_some()
    }

    /// The navigator rows of this form present screens through.
    pub fn navigator(&self) -> Option<Arc<dyn Navigator>> {
        self.inner.navigator.read().as_ref().and_then(Weak::upgrade)
    }

    pub fn set_navigator(&self, navigator: Weak<dyn Navigator>) {
        *self.inner.navigator.write() = Some(navigator);
    }

    // =========================================================================
    // Data source queries
    // =========================================================================

    pub fn section_count(&self) -> usize {
        self.inner.sections.read().len()
    }

    /// Number of visible rows in `section`.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range.
    pub fn row_count(&self, section: usize) -> usize {
        let sections = self.inner.sections.read();
        match sections.get(section) {
            Some(section) => section.visible_count(),
            None => panic!(
                "section {section} out of range for form with {} sections",
                sections.len()
            ),
        }
    }

    /// Title of `section`.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range.
    pub fn section_title(&self, section: usize) -> Option<String> {
        let sections = self.inner.sections.read();
        match sections.get(section) {
            Some(section) => section.title().map(str::to_string),
            None => panic!(
                "section {section} out of range for form with {} sections",
                sections.len()
            ),
        }
    }

    /// The visible row at `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not address a visible row.
    pub fn row_at(&self, path: IndexPath) -> Row {
        let sections = self.inner.sections.read();
        sections
            .get(path.section)
            .and_then(|section| section.visible_row(path.row))
            .unwrap_or_else(|| panic!("no visible row at {path}"))
    }

    pub fn renderer_kind_at(&self, path: IndexPath) -> RendererKind {
        self.row_at(path).renderer_kind()
    }

    /// Preferred height of the row at `path`, or `None` for the default.
    pub fn row_height_at(&self, path: IndexPath) -> Option<f32> {
        self.row_at(path).height()
    }

    /// Binds `renderer` to the row at `path` and lets it draw the row.
    pub fn configure_renderer(&self, path: IndexPath, renderer: &SharedRenderer) {
        let row = self.row_at(path);
        tracing::trace!(target: targets::FORM, path = %path, row = %row.id(), renderer = %renderer.id(), "configure renderer");
        self.bind(&row, renderer);
        renderer.configure(&row);
    }

    /// The widget is about to show `renderer` at `path`.
    pub fn will_display(&self, path: IndexPath, renderer: &SharedRenderer) {
        let row = self.row_at(path);
        if renderer.bound_row().as_ref() != Some(&row) {
            self.bind(&row, renderer);
        }
    }

    /// The widget no longer shows `renderer`.
    pub fn did_end_displaying(&self, renderer: &SharedRenderer) {
        if let Some(row) = renderer.bound_row() {
            self.release(&row, renderer);
            tracing::trace!(target: targets::FORM, row = %row.id(), renderer = %renderer.id(), "renderer unbound");
        }
        renderer.set_bound_row(None);
    }

    /// The user tapped the row at `path`.
    pub fn did_select(&self, path: IndexPath, renderer: &SharedRenderer) {
        let row = self.row_at(path);
        self.inner.signals.row_selected.emit(path);
        row.activate(renderer);
    }

    /// The renderer currently showing `row`, if one is alive.
    pub fn renderer_for(&self, row: &Row) -> Option<SharedRenderer> {
        self.inner
            .bindings
            .lock()
            .get(&row.id())
            .and_then(Weak::upgrade)
    }

    // =========================================================================
    // Row callbacks
    // =========================================================================

    /// Redraws the renderer bound to `row`.
    pub(crate) fn refresh_row(&self, row: &Row) {
        let Some(renderer) = self.renderer_for(row) else {
            return;
        };
        if renderer.bound_row().as_ref() == Some(row) {
            renderer.configure(row);
        }
    }

    /// Flips a row's hidden flag and tells the widget.
    ///
    /// The deleted position is taken before the row disappears; the inserted
    /// position after it reappears.
    pub(crate) fn set_row_hidden(&self, row: &Row, hidden: bool) {
        let widget = self.widget();
        if hidden {
            let path = self.index_path_of(row);
            row.store_hidden(true);
            if let (Some(widget), Some(path)) = (widget, path) {
                tracing::debug!(target: targets::FORM, path = %path, row = %row.id(), "deleting hidden row");
                widget.delete_rows(&[path], RowAnimation::Automatic);
            }
        } else {
            row.store_hidden(false);
            if let (Some(widget), Some(path)) = (widget, self.index_path_of(row)) {
                tracing::debug!(target: targets::FORM, path = %path, row = %row.id(), "inserting shown row");
                widget.insert_rows(&[path], RowAnimation::Automatic);
            }
        }
    }

    // =========================================================================
    // Binding table
    // =========================================================================

    fn bind(&self, row: &Row, renderer: &SharedRenderer) {
        if let Some(previous) = renderer.bound_row() {
            if previous != *row {
                self.release(&previous, renderer);
            }
        }
        let displaced = self
            .inner
            .bindings
            .lock()
            .insert(row.id(), Arc::downgrade(renderer))
            .and_then(|weak| weak.upgrade());
        if let Some(displaced) = displaced {
            if displaced.id() != renderer.id() && displaced.bound_row().as_ref() == Some(row) {
                displaced.set_bound_row(None);
            }
        }
        renderer.set_bound_row(Some(row.clone()));
    }

    /// Drops the table entry for `row` if it still points at `renderer`.
    fn release(&self, row: &Row, renderer: &SharedRenderer) {
        let mut bindings = self.inner.bindings.lock();
        let points_here = bindings
            .get(&row.id())
            .and_then(Weak::upgrade)
            .is_some_and(|bound| bound.id() == renderer.id());
        if points_here {
            bindings.remove(&row.id());
        }
    }

    fn clear_bindings(&self) {
        let drained: Vec<_> = self.inner.bindings.lock().drain().collect();
        for (row_id, weak) in drained {
            if let Some(renderer) = weak.upgrade() {
                if renderer.bound_row().is_some_and(|row| row.id() == row_id) {
                    renderer.set_bound_row(None);
                }
            }
        }
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.inner.id)
            .field("title", &self.title())
            .field("sections", &self.section_count())
            .field("has_widget", &self.has_widget())
            .finish()
    }
}

/// A non-owning reference to a form, held by widgets.
#[derive(Clone)]
pub struct WeakForm {
    inner: Weak<FormInner>,
}

impl WeakForm {
    pub fn upgrade(&self) -> Option<Form> {
        self.inner.upgrade().map(Form::from_inner)
    }
}

impl Default for WeakForm {
    fn default() -> Self {
        Self { inner: Weak::new() }
    }
}

impl fmt::Debug for WeakForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakForm")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
