//! Prelude module for Horizon Forms.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use horizon_forms::prelude::*;
//! ```
//!
//! This provides access to:
//! - Rows, sections and forms (`Row`, `Section`, `Form`)
//! - Values and row kinds (`Value`, `RowKind`, `RendererKind`)
//! - Options rows and their selection screen (`OptionsRow`, `SelectionScreen`)
//! - Widget, renderer and navigation seams (`ListWidget`, `Renderer`, `Navigator`)

// ============================================================================
// Data Model
// ============================================================================

pub use crate::form::{Form, WeakForm};
pub use crate::row::{Row, RowId, WeakRow};
pub use crate::section::Section;
pub use crate::value::{Choice, Coordinate, Value};

// ============================================================================
// Row Kinds
// ============================================================================

pub use crate::kind::{
    DateConfig, DatePickerMode, MapConfig, NumberConfig, RendererKind, RowKind, SelectionConfig,
    SliderConfig, TextConfig,
};

// ============================================================================
// Options and Selection
// ============================================================================

pub use crate::options::{Grouping, OptionItem, OptionsRow};
pub use crate::selection::{SelectionScreen, SelectionState};

// ============================================================================
// Widget, Renderer and Navigation Seams
// ============================================================================

pub use crate::navigation::{FormScreen, Navigator, Screen};
pub use crate::renderer::{Renderer, RendererBase, RendererRegistry, SharedRenderer};
pub use crate::widget::{IndexPath, ListWidget, RowAnimation, ScrollPosition};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{FormError, Result};
