//! Screens and navigation.
//!
//! A [`Screen`] is a full-screen host for one form. A [`Navigator`] is the
//! stack that screens are pushed onto and popped off; the form layer never
//! owns it, it only holds a weak reference so rows can present follow-up
//! screens (the selection screen of an options row).

use std::sync::Arc;

use horizon_forms_core::MainLoop;
use parking_lot::RwLock;

use crate::form::Form;
use crate::widget::ListWidget;

/// A full-screen host for a form.
///
/// Lifecycle, in order: `did_load` once a widget exists, `did_appear` every
/// time the screen becomes topmost, `did_disappear` when it is covered or
/// removed, `did_unload` once it is removed for good.
pub trait Screen: Send + Sync {
    fn title(&self) -> Option<String>;

    fn form(&self) -> Form;

    /// The screen's widget was created.
    fn did_load(&self, widget: Arc<dyn ListWidget>) {
        self.form().attach_widget(widget);
    }

    /// The screen became topmost.
    fn did_appear(&self, _main_loop: &MainLoop) {}

    fn did_disappear(&self) {}

    /// The screen was removed from its navigator.
    fn did_unload(&self) {
        self.form().detach_widget();
    }
}

/// A stack of screens.
pub trait Navigator: Send + Sync {
    /// Shows `screen` on top of the current one.
    fn push(&self, screen: Arc<dyn Screen>);

    /// Removes the topmost screen. The root screen cannot be popped.
    fn pop(&self) -> Option<Arc<dyn Screen>>;
}

/// A screen that shows a host-provided form.
pub struct FormScreen {
    form: RwLock<Form>,
    widget: RwLock<Option<Arc<dyn ListWidget>>>,
}

impl FormScreen {
    pub fn new(form: Form) -> Self {
        Self {
            form: RwLock::new(form),
            widget: RwLock::new(None),
        }
    }

    /// Replaces the form, moving the loaded widget (if any) over to it.
    pub fn set_form(&self, form: Form) {
        let previous = std::mem::replace(&mut *self.form.write(), form.clone());
        previous.detach_widget();
        if let Some(navigator) = previous.navigator() {
            form.set_navigator(Arc::downgrade(&navigator));
        }
        let widget = self.widget.read().clone();
        if let Some(widget) = widget {
            form.attach_widget(widget);
        }
    }

    pub fn widget(&self) -> Option<Arc<dyn ListWidget>> {
        self.widget.read().clone()
    }
}

impl Screen for FormScreen {
    fn title(&self) -> Option<String> {
        self.form.read().title()
    }

    fn form(&self) -> Form {
        self.form.read().clone()
    }

    fn did_load(&self, widget: Arc<dyn ListWidget>) {
        *self.widget.write() = Some(widget.clone());
        self.form().attach_widget(widget);
    }

    fn did_unload(&self) {
        self.form().detach_widget();
        *self.widget.write() = None;
    }
}
