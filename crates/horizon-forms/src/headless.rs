//! A headless widget toolkit.
//!
//! These types implement [`ListWidget`], [`Renderer`] and [`Navigator`]
//! without drawing anything. They lay out every visible row, recycle
//! renderers per kind the way an on-screen list does, and record the
//! structural calls they receive. Hosts use them to drive forms from tests
//! or from a terminal; the crate's own tests use them throughout.
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_forms::headless::{self, NavigationStack};
//! use horizon_forms::prelude::*;
//! use horizon_forms_core::MainLoop;
//!
//! let registry = headless::renderer_registry().unwrap();
//! let name = Row::text_field("Name");
//! let form = Form::new(registry).with_sections(vec![Section::new(vec![name.clone()])]);
//!
//! let stack = NavigationStack::new(Arc::new(MainLoop::new()));
//! stack.push(Arc::new(FormScreen::new(form)));
//!
//! let widget = stack.top_widget().unwrap();
//! widget.input(IndexPath::new(0, 0), "Ada");
//! assert_eq!(name.value(), Some(Value::from("Ada")));
//! assert_eq!(widget.rendered(IndexPath::new(0, 0)).unwrap().detail.as_deref(), Some("Ada"));
//! ```

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use horizon_forms_core::MainLoop;
use horizon_forms_core::logging::targets;
use parking_lot::{Mutex, RwLock};

use crate::error::Result;
use crate::form::{Form, WeakForm};
use crate::kind::{RendererKind, RowKind};
use crate::navigation::{Navigator, Screen};
use crate::renderer::{Renderer, RendererBase, RendererFactory, RendererRegistry, SharedRenderer};
use crate::value::Value;
use crate::widget::{IndexPath, ListWidget, RowAnimation, ScrollPosition};

/// A registry with a [`HeadlessRenderer`] for every built-in kind.
pub fn renderer_registry() -> Result<Arc<RendererRegistry>> {
    let registry = RendererRegistry::new();
    register_renderers(&registry)?;
    Ok(Arc::new(registry))
}

/// Registers a [`HeadlessRenderer`] for every built-in kind.
pub fn register_renderers(registry: &RendererRegistry) -> Result<()> {
    for kind in RendererKind::BUILT_IN {
        let factory_kind = kind.clone();
        registry.register(kind, move || {
            let renderer: SharedRenderer = Arc::new(HeadlessRenderer::new(factory_kind.clone()));
            renderer
        })?;
    }
    Ok(())
}

/// What a [`HeadlessRenderer`] currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedRow {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub placeholder: Option<String>,
    /// Switch on, or choice marked.
    pub checked: bool,
    pub disclosure: bool,
}

/// A renderer that keeps its visual state in memory.
pub struct HeadlessRenderer {
    base: RendererBase,
    rendered: RwLock<RenderedRow>,
    configured: AtomicUsize,
}

impl HeadlessRenderer {
    pub fn new(kind: RendererKind) -> Self {
        Self {
            base: RendererBase::new(kind),
            rendered: RwLock::new(RenderedRow::default()),
            configured: AtomicUsize::new(0),
        }
    }

    pub fn rendered(&self) -> RenderedRow {
        self.rendered.read().clone()
    }

    /// How many times the renderer was configured.
    pub fn configure_count(&self) -> usize {
        self.configured.load(Ordering::SeqCst)
    }

    /// Simulates the user entering `value`.
    ///
    /// Returns `false` if the renderer is not bound to a row.
    pub fn input(&self, value: impl Into<Value>) -> bool {
        match self.bound_row() {
            Some(row) => {
                row.set_value(value);
                true
            }
            None => false,
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn base(&self) -> &RendererBase {
        &self.base
    }

    fn configure(&self, row: &crate::row::Row) {
        let kind = row.kind();
        let rendered = RenderedRow {
            title: row.title(),
            detail: row.display_text(),
            placeholder: row.placeholder(),
            checked: matches!(row.value(), Some(Value::Bool(true))),
            disclosure: matches!(kind, RowKind::Selection(ref config) if config.show_disclosure),
        };
        *self.rendered.write() = rendered;
        self.configured.fetch_add(1, Ordering::SeqCst);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for HeadlessRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessRenderer")
            .field("base", &self.base)
            .field("rendered", &*self.rendered.read())
            .finish()
    }
}

/// A structural call received by a [`HeadlessListWidget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Reload,
    Insert(Vec<IndexPath>),
    Delete(Vec<IndexPath>),
    ReloadRows(Vec<IndexPath>),
    Select(Option<IndexPath>),
}

/// A list widget that lays out every visible row in memory.
pub struct HeadlessListWidget {
    source: RwLock<WeakForm>,
    factories: RwLock<HashMap<RendererKind, RendererFactory>>,
    pool: Mutex<HashMap<RendererKind, Vec<SharedRenderer>>>,
    visible: Mutex<BTreeMap<IndexPath, SharedRenderer>>,
    selected: Mutex<Option<IndexPath>>,
    dismiss_on_drag: AtomicBool,
    events: Mutex<Vec<WidgetEvent>>,
}

impl Default for HeadlessListWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessListWidget {
    pub fn new() -> Self {
        Self {
            source: RwLock::new(WeakForm::default()),
            factories: RwLock::new(HashMap::new()),
            pool: Mutex::new(HashMap::new()),
            visible: Mutex::new(BTreeMap::new()),
            selected: Mutex::new(None),
            dismiss_on_drag: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
        }
    }

    fn source(&self) -> Option<Form> {
        self.source.read().upgrade()
    }

    /// Simulates a tap on the row at `path`.
    ///
    /// # Panics
    ///
    /// Panics if no row is displayed at `path`.
    pub fn tap(&self, path: IndexPath) {
        let renderer = self.displayed_renderer(path);
        let Some(form) = self.source() else {
            return;
        };
        *self.selected.lock() = Some(path);
        form.did_select(path, &renderer);
    }

    /// Simulates the user entering `value` into the row at `path`.
    ///
    /// # Panics
    ///
    /// Panics if no row is displayed at `path`.
    pub fn input(&self, path: IndexPath, value: impl Into<Value>) {
        let renderer = self.displayed_renderer(path);
        if let Some(row) = renderer.bound_row() {
            row.set_value(value);
        }
    }

    fn displayed_renderer(&self, path: IndexPath) -> SharedRenderer {
        self.visible
            .lock()
            .get(&path)
            .cloned()
            .unwrap_or_else(|| panic!("no row displayed at {path}"))
    }

    pub fn renderer_at(&self, path: IndexPath) -> Option<SharedRenderer> {
        self.visible.lock().get(&path).cloned()
    }

    /// What the renderer at `path` shows.
    pub fn rendered(&self, path: IndexPath) -> Option<RenderedRow> {
        let renderer = self.renderer_at(path)?;
        renderer
            .as_any()
            .downcast_ref::<HeadlessRenderer>()
            .map(HeadlessRenderer::rendered)
    }

    /// Titles shown in `section`, top to bottom.
    pub fn rendered_titles(&self, section: usize) -> Vec<String> {
        let paths: Vec<IndexPath> = self
            .visible
            .lock()
            .keys()
            .filter(|path| path.section == section)
            .copied()
            .collect();
        paths
            .into_iter()
            .filter_map(|path| self.rendered(path))
            .map(|rendered| rendered.title.unwrap_or_default())
            .collect()
    }

    pub fn displayed_count(&self) -> usize {
        self.visible.lock().len()
    }

    pub fn displayed_paths(&self) -> Vec<IndexPath> {
        self.visible.lock().keys().copied().collect()
    }

    /// Number of sections reported by the source.
    pub fn section_count(&self) -> usize {
        self.source().map_or(0, |form| form.section_count())
    }

    pub fn selected_path(&self) -> Option<IndexPath> {
        *self.selected.lock()
    }

    pub fn is_attached(&self) -> bool {
        self.source().is_some()
    }

    pub fn dismisses_keyboard_on_drag(&self) -> bool {
        self.dismiss_on_drag.load(Ordering::SeqCst)
    }

    pub fn registered_kinds(&self) -> Vec<RendererKind> {
        let mut kinds: Vec<RendererKind> = self.factories.read().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn events(&self) -> Vec<WidgetEvent> {
        self.events.lock().clone()
    }

    pub fn take_events(&self) -> Vec<WidgetEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    fn record(&self, event: WidgetEvent) {
        tracing::trace!(target: targets::HEADLESS, event = ?event, "headless widget event");
        self.events.lock().push(event);
    }

    /// Retires every displayed renderer and lays out all visible rows again.
    fn layout(&self) {
        let form = self.source();
        let retired: Vec<SharedRenderer> = std::mem::take(&mut *self.visible.lock())
            .into_values()
            .collect();
        for renderer in retired {
            match &form {
                Some(form) => form.did_end_displaying(&renderer),
                None => renderer.set_bound_row(None),
            }
            self.pool
                .lock()
                .entry(renderer.kind())
                .or_default()
                .push(renderer);
        }

        let Some(form) = form else {
            return;
        };
        for section in 0..form.section_count() {
            for row in 0..form.row_count(section) {
                let path = IndexPath::new(section, row);
                let renderer = self.dequeue(&form.renderer_kind_at(path));
                form.configure_renderer(path, &renderer);
                form.will_display(path, &renderer);
                self.visible.lock().insert(path, renderer);
            }
        }
    }

    /// A recycled renderer of `kind`, or a fresh one.
    fn dequeue(&self, kind: &RendererKind) -> SharedRenderer {
        let recycled = self.pool.lock().get_mut(kind).and_then(Vec::pop);
        if let Some(renderer) = recycled {
            return renderer;
        }
        let factory = self
            .factories
            .read()
            .get(kind)
            .cloned()
            .unwrap_or_else(|| panic!("no renderer registered for kind '{kind}'"));
        factory()
    }
}

impl ListWidget for HeadlessListWidget {
    fn attach_source(&self, source: WeakForm) {
        *self.source.write() = source;
    }

    fn detach_source(&self) {
        *self.source.write() = WeakForm::default();
        let retired: Vec<SharedRenderer> = std::mem::take(&mut *self.visible.lock())
            .into_values()
            .collect();
        for renderer in retired {
            renderer.set_bound_row(None);
        }
    }

    fn register_renderer(&self, kind: RendererKind, factory: RendererFactory) {
        self.factories.write().insert(kind, factory);
    }

    fn set_dismiss_keyboard_on_drag(&self, enabled: bool) {
        self.dismiss_on_drag.store(enabled, Ordering::SeqCst);
    }

    fn reload_data(&self) {
        self.record(WidgetEvent::Reload);
        self.layout();
    }

    fn insert_rows(&self, paths: &[IndexPath], _animation: RowAnimation) {
        self.record(WidgetEvent::Insert(paths.to_vec()));
        self.layout();
    }

    fn delete_rows(&self, paths: &[IndexPath], _animation: RowAnimation) {
        self.record(WidgetEvent::Delete(paths.to_vec()));
        self.layout();
    }

    fn reload_rows(&self, paths: &[IndexPath], _animation: RowAnimation) {
        self.record(WidgetEvent::ReloadRows(paths.to_vec()));
        let Some(form) = self.source() else {
            return;
        };
        for path in paths {
            if let Some(renderer) = self.renderer_at(*path) {
                form.configure_renderer(*path, &renderer);
            }
        }
    }

    fn select_row(&self, path: Option<IndexPath>, _animated: bool, _scroll: ScrollPosition) {
        self.record(WidgetEvent::Select(path));
        *self.selected.lock() = path;
    }
}

impl fmt::Debug for HeadlessListWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessListWidget")
            .field("attached", &self.is_attached())
            .field("displayed", &self.displayed_count())
            .field("selected", &self.selected_path())
            .finish()
    }
}

struct StackEntry {
    screen: Arc<dyn Screen>,
    widget: Arc<HeadlessListWidget>,
}

/// A navigator that gives every pushed screen its own headless widget.
pub struct NavigationStack {
    main_loop: Arc<MainLoop>,
    entries: Mutex<Vec<StackEntry>>,
    this: Weak<NavigationStack>,
}

impl NavigationStack {
    pub fn new(main_loop: Arc<MainLoop>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            main_loop,
            entries: Mutex::new(Vec::new()),
            this: this.clone(),
        })
    }

    pub fn main_loop(&self) -> &Arc<MainLoop> {
        &self.main_loop
    }

    pub fn depth(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn top_screen(&self) -> Option<Arc<dyn Screen>> {
        self.entries.lock().last().map(|entry| entry.screen.clone())
    }

    pub fn top_widget(&self) -> Option<Arc<HeadlessListWidget>> {
        self.entries.lock().last().map(|entry| entry.widget.clone())
    }

    pub fn widget_at(&self, depth: usize) -> Option<Arc<HeadlessListWidget>> {
        self.entries.lock().get(depth).map(|entry| entry.widget.clone())
    }
}

impl Navigator for NavigationStack {
    fn push(&self, screen: Arc<dyn Screen>) {
        let covered = self.top_screen();
        if let Some(covered) = covered {
            covered.did_disappear();
        }

        let navigator: Weak<dyn Navigator> = self.this.clone();
        screen.form().set_navigator(navigator);
        let widget = Arc::new(HeadlessListWidget::new());
        screen.did_load(widget.clone());
        self.entries.lock().push(StackEntry {
            screen: screen.clone(),
            widget,
        });
        tracing::debug!(target: targets::HEADLESS, depth = self.depth(), title = ?screen.title(), "screen pushed");
        screen.did_appear(&self.main_loop);
    }

    fn pop(&self) -> Option<Arc<dyn Screen>> {
        let popped = {
            let mut entries = self.entries.lock();
            if entries.len() <= 1 {
                return None;
            }
            entries.pop()?
        };
        popped.screen.did_disappear();
        popped.screen.did_unload();
        tracing::debug!(target: targets::HEADLESS, depth = self.depth(), "screen popped");

        if let Some(top) = self.top_screen() {
            top.did_appear(&self.main_loop);
        }
        Some(popped.screen)
    }
}

impl fmt::Debug for NavigationStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationStack")
            .field("depth", &self.depth())
            .field("main_loop", &self.main_loop)
            .finish()
    }
}
