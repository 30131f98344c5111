//! Horizon Forms - declarative, list-based forms with two-way data binding.
//!
//! A form is an ordered list of titled [`Section`]s, each an ordered list of
//! [`Row`]s. Every row holds one value; the form acts as the data source of a
//! sectioned [`ListWidget`] and keeps each on-screen [`Renderer`] bound to the
//! row it shows, so writing a value refreshes the screen and user input
//! writes back into the row.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_forms::headless::{self, NavigationStack};
//! use horizon_forms::prelude::*;
//! use horizon_forms::MainLoop;
//!
//! fn main() -> horizon_forms::Result<()> {
//!     let animals = OptionsRow::builder("Animal", vec!["Cow", "Dog", "Sheep"])
//!         .with_selected("Dog")
//!         .build()?;
//!     let form = Form::new(headless::renderer_registry()?).with_sections(vec![
//!         Section::new(vec![Row::text_field("Name"), animals.row().clone()]).with_title("Farm"),
//!     ]);
//!
//!     let main_loop = Arc::new(MainLoop::new());
//!     let stack = NavigationStack::new(main_loop.clone());
//!     stack.push(Arc::new(FormScreen::new(form)));
//!
//!     // Tap the animal row, then pick "Sheep" on the selection screen.
//!     stack.top_widget().unwrap().tap(IndexPath::new(0, 1));
//!     main_loop.run_cycle();
//!     stack.top_widget().unwrap().tap(IndexPath::new(0, 2));
//!
//!     assert_eq!(animals.selected_option(), Some("Sheep"));
//!     assert_eq!(stack.depth(), 1);
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! Everything is instrumented with `tracing` under the `horizon_forms`
//! targets listed in [`horizon_forms_core::logging::targets`]. The library
//! never installs a subscriber.

pub mod error;
pub mod form;
pub mod headless;
pub mod kind;
pub mod navigation;
pub mod options;
pub mod prelude;
pub mod remote;
pub mod renderer;
pub mod row;
pub mod section;
pub mod selection;
pub mod value;
pub mod widget;

pub use error::{FormError, Result};
pub use form::{Form, FormSignals, WeakForm};
pub use horizon_forms_core::{MainLoop, ObjectId, Signal};
pub use kind::{RendererKind, RowKind};
pub use navigation::{FormScreen, Navigator, Screen};
pub use options::{OptionItem, OptionsRow, OptionsRowBuilder};
pub use remote::{RemoteForm, RemoteFormSchema, RemoteRowRegistry, SubmitRequest};
pub use renderer::{Renderer, RendererBase, RendererFactory, RendererRegistry, SharedRenderer};
pub use row::{Row, RowId, RowSignals, WeakRow};
pub use section::Section;
pub use selection::{SelectionScreen, SelectionState};
pub use value::{Choice, Coordinate, Value};
pub use widget::{IndexPath, ListWidget, RowAnimation, ScrollPosition};

static_assertions::assert_impl_all!(Row: Send, Sync, Clone);
static_assertions::assert_impl_all!(Form: Send, Sync, Clone);
static_assertions::assert_impl_all!(Section: Send, Sync);
static_assertions::assert_impl_all!(RemoteForm: Send, Sync);
static_assertions::assert_impl_all!(SelectionScreen<String>: Send, Sync);
