//! Renderers and the renderer registry.
//!
//! A renderer is the reusable visual element that draws one row at a time.
//! The widget owns renderers and recycles them; the form binds each on-screen
//! renderer to the row it shows, in both directions, so that a value change
//! on the row can refresh the renderer and user input on the renderer can
//! write back into the row.
//!
//! Custom renderers embed a [`RendererBase`] and implement [`Renderer`]:
//!
//! ```
//! use std::any::Any;
//!
//! use horizon_forms::prelude::*;
//!
//! struct RatingRenderer {
//!     base: RendererBase,
//! }
//!
//! impl Renderer for RatingRenderer {
//!     fn base(&self) -> &RendererBase {
//!         &self.base
//!     }
//!
//!     fn configure(&self, row: &Row) {
//!         let _stars = row.value().and_then(|v| v.as_number()).unwrap_or(0.0);
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! let registry = RendererRegistry::new();
//! registry
//!     .register(RendererKind::new("rating"), || {
//!         let renderer: SharedRenderer = std::sync::Arc::new(RatingRenderer {
//!             base: RendererBase::new(RendererKind::new("rating")),
//!         });
//!         renderer
//!     })
//!     .unwrap();
//! assert!(registry.contains(&RendererKind::new("rating")));
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_forms_core::ObjectId;
use horizon_forms_core::logging::targets;
use parking_lot::RwLock;

use crate::error::{FormError, Result};
use crate::kind::RendererKind;
use crate::row::Row;

/// A shared handle to a renderer.
pub type SharedRenderer = Arc<dyn Renderer>;

/// Creates a fresh renderer for a registered kind.
pub type RendererFactory = Arc<dyn Fn() -> SharedRenderer + Send + Sync>;

/// State every renderer carries: identity, kind and the bound row.
pub struct RendererBase {
    id: ObjectId,
    kind: RendererKind,
    row: RwLock<Option<Row>>,
}

impl RendererBase {
    pub fn new(kind: RendererKind) -> Self {
        Self {
            id: ObjectId::next(),
            kind,
            row: RwLock::new(None),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> RendererKind {
        self.kind.clone()
    }

    pub fn bound_row(&self) -> Option<Row> {
        self.row.read().clone()
    }

    pub fn set_bound_row(&self, row: Option<Row>) {
        *self.row.write() = row;
    }
}

impl fmt::Debug for RendererBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererBase")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("row", &self.row.read().as_ref().map(Row::id))
            .finish()
    }
}

/// The visual element that draws a row.
///
/// Implementations must only write user input back through
/// [`Row::set_value`] on their bound row.
pub trait Renderer: Send + Sync {
    /// Access to the shared renderer state.
    fn base(&self) -> &RendererBase;

    /// Update the visual state from the row.
    ///
    /// Called when the renderer is bound to a row and every time the bound
    /// row's value changes.
    fn configure(&self, row: &Row);

    /// Downcasting support.
    fn as_any(&self) -> &dyn Any;

    fn id(&self) -> ObjectId {
        self.base().id()
    }

    fn kind(&self) -> RendererKind {
        self.base().kind()
    }

    /// The row this renderer currently shows, if any.
    fn bound_row(&self) -> Option<Row> {
        self.base().bound_row()
    }

    fn set_bound_row(&self, row: Option<Row>) {
        self.base().set_bound_row(row);
    }
}

/// Maps renderer kinds to factories.
///
/// Hosts register their renderers up front. Once the registry has been handed
/// to a widget it is sealed and further registration fails with
/// [`FormError::RegistrySealed`].
pub struct RendererRegistry {
    factories: RwLock<BTreeMap<RendererKind, RendererFactory>>,
    sealed: AtomicBool,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(BTreeMap::new()),
            sealed: AtomicBool::new(false),
        }
    }

    /// Registers a factory for a renderer kind.
    pub fn register<F>(&self, kind: RendererKind, factory: F) -> Result<()>
    where
        F: Fn() -> SharedRenderer + Send + Sync + 'static,
    {
        if self.is_sealed() {
            return Err(FormError::RegistrySealed { kind });
        }
        let mut factories = self.factories.write();
        if factories.contains_key(&kind) {
            return Err(FormError::DuplicateRendererKind { kind });
        }
        tracing::debug!(target: targets::FORM, kind = %kind, "renderer registered");
        factories.insert(kind, Arc::new(factory));
        Ok(())
    }

    pub fn contains(&self, kind: &RendererKind) -> bool {
        self.factories.read().contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<RendererKind> {
        self.factories.read().keys().cloned().collect()
    }

    /// All registered kinds with their factories.
    pub fn entries(&self) -> Vec<(RendererKind, RendererFactory)> {
        self.factories
            .read()
            .iter()
            .map(|(kind, factory)| (kind.clone(), factory.clone()))
            .collect()
    }

    pub fn factory(&self, kind: &RendererKind) -> Option<RendererFactory> {
        self.factories.read().get(kind).cloned()
    }

    /// Creates a renderer of the given kind.
    pub fn create(&self, kind: &RendererKind) -> Option<SharedRenderer> {
        self.factory(kind).map(|factory| factory())
    }

    /// Prevents further registration.
    pub fn seal(&self) {
        if !self.sealed.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: targets::FORM, kinds = self.factories.read().len(), "renderer registry sealed");
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("kinds", &self.kinds())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullRenderer {
        base: RendererBase,
    }

    impl Renderer for NullRenderer {
        fn base(&self) -> &RendererBase {
            &self.base
        }

        fn configure(&self, _row: &Row) {}

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn null_factory() -> SharedRenderer {
        Arc::new(NullRenderer {
            base: RendererBase::new(RendererKind::LABEL),
        })
    }

    #[test]
    fn test_register_and_create() {
        let registry = RendererRegistry::new();
        registry.register(RendererKind::LABEL, null_factory).unwrap();

        let renderer = registry.create(&RendererKind::LABEL).unwrap();
        assert_eq!(renderer.kind(), RendererKind::LABEL);
        assert!(renderer.bound_row().is_none());
        assert!(registry.create(&RendererKind::MAP).is_none());
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let registry = RendererRegistry::new();
        registry.register(RendererKind::LABEL, null_factory).unwrap();
        let err = registry
            .register(RendererKind::LABEL, null_factory)
            .unwrap_err();
        assert!(matches!(err, FormError::DuplicateRendererKind { .. }));
    }

    #[test]
    fn test_sealed_registry_rejects_registration() {
        let registry = RendererRegistry::new();
        registry.seal();
        assert!(registry.is_sealed());
        let err = registry
            .register(RendererKind::LABEL, null_factory)
            .unwrap_err();
        assert!(matches!(err, FormError::RegistrySealed { .. }));
    }

    #[test]
    fn test_renderer_binding() {
        let renderer = null_factory();
        let row = Row::label("Name");
        renderer.set_bound_row(Some(row.clone()));
        assert!(renderer.bound_row().unwrap().ptr_eq(&row));
        renderer.set_bound_row(None);
        assert!(renderer.bound_row().is_none());
    }

    #[test]
    fn test_renderer_ids_are_unique() {
        assert_ne!(null_factory().id(), null_factory().id());
    }
}
