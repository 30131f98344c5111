//! Core systems for Horizon Forms.
//!
//! This crate provides the foundational pieces the form layer is built on:
//!
//! - **Object identity**: Process-unique [`ObjectId`]s for rows, forms and renderers
//! - **Signal/Slot System**: Observer-style change notification
//! - **Property System**: Lock-protected values with change detection
//! - **Main Loop**: A UI-cycle task queue for work deferred to the next cycle
//! - **Thread Affinity**: Debug checks that UI state stays on its thread
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_forms_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use horizon_forms_core::{Property, Signal};
//!
//! struct Counter {
//!     value: Property<i32>,
//!     value_changed: Signal<i32>,
//! }
//!
//! impl Counter {
//!     fn increment(&self) {
//!         let new_value = self.value.get() + 1;
//!         if self.value.set(new_value) {
//!             self.value_changed.emit(new_value);
//!         }
//!     }
//! }
//!
//! let counter = Counter { value: Property::new(0), value_changed: Signal::new() };
//! counter.increment();
//! assert_eq!(counter.value.get(), 1);
//! ```
//!
//! # Main Loop Example
//!
//! ```
//! use horizon_forms_core::MainLoop;
//!
//! let main_loop = MainLoop::new();
//! main_loop.post(|| println!("runs on the next cycle"));
//! assert_eq!(main_loop.run_cycle(), 1);
//! ```

mod event_loop;
mod id;
pub mod logging;
pub mod property;
pub mod signal;
pub mod thread_check;

pub use event_loop::{MainLoop, TaskId};
pub use id::ObjectId;
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;

static_assertions::assert_impl_all!(Signal<i32>: Send, Sync);
static_assertions::assert_impl_all!(Property<String>: Send, Sync);
static_assertions::assert_impl_all!(MainLoop: Send, Sync);
