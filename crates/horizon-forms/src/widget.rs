//! The list widget a form drives.
//!
//! A [`ListWidget`] is the scrollable, sectioned list that displays a form.
//! The form is its data source: the widget asks the form how many sections and
//! rows there are, which renderer kind each row needs, and notifies the form
//! when renderers appear, disappear and are tapped. In the other direction the
//! form tells the widget about structural changes (rows inserted or deleted
//! when visibility toggles) and full reloads.

use std::fmt;

use crate::form::WeakForm;
use crate::kind::RendererKind;
use crate::renderer::RendererFactory;

/// A `(section, row)` position, counted over visible rows only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// How inserted and deleted rows are animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAnimation {
    None,
    Fade,
    #[default]
    Automatic,
}

/// Where a row lands when the widget scrolls to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    #[default]
    None,
    Top,
    Middle,
    Bottom,
}

/// A sectioned list that displays a form.
///
/// All methods are called on the UI thread. Implementations must not call
/// back into the form while holding their own locks.
pub trait ListWidget: Send + Sync {
    /// Sets the form this widget reads from.
    fn attach_source(&self, source: WeakForm);

    /// Forgets the current data source.
    fn detach_source(&self);

    /// Makes a renderer kind available to the widget.
    fn register_renderer(&self, kind: RendererKind, factory: RendererFactory);

    /// Dismiss the on-screen keyboard when the user drags the list.
    fn set_dismiss_keyboard_on_drag(&self, enabled: bool);

    /// Discards all on-screen renderers and asks the source again.
    fn reload_data(&self);

    fn insert_rows(&self, paths: &[IndexPath], animation: RowAnimation);

    fn delete_rows(&self, paths: &[IndexPath], animation: RowAnimation);

    /// Re-renders the given rows in place.
    fn reload_rows(&self, paths: &[IndexPath], animation: RowAnimation);

    /// Highlights a row programmatically, without notifying the source of a tap.
    fn select_row(&self, path: Option<IndexPath>, animated: bool, scroll: ScrollPosition);
}
