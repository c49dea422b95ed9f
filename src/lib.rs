//! # pipes-rs: In-process message plumbing
//!
//! A small routing fabric for passing messages between loosely coupled
//! modules. Messages flow through a graph of connectable fittings; some
//! stages transform, buffer, duplicate or merge them, and can be
//! reconfigured at run time by control messages sent down the same line.
//!
//! ## Architecture
//!
//! - **Fittings**: `Pipe`, `Filter`, `Queue`, `TeeSplit`, `TeeMerge` and
//!   `PipeListener`, all behind the `PipeFitting` trait
//! - **Messages**: data messages with opaque header/body and a priority,
//!   plus filter and queue control messages addressed by stage name
//! - **Junctions**: per-module registries of named input and output pipes
//! - **Configuration**: TOML/JSON descriptions of a junction's pipes,
//!   assembled by `JunctionBuilder`
//!
//! ## Example
//!
//! ```
//! use pipes_rs::plumbing::{Filter, FilterControl, Message, Pipe, PipeFitting, PipeListener};
//! use std::rc::Rc;
//!
//! let doubled = Rc::new(Filter::new("double").with_filter(|message, _params| {
//!     if let Some(n) = message.borrow_mut().body_mut::<i32>() {
//!         *n *= 2;
//!     }
//!     Ok(message)
//! }));
//! doubled.connect(Rc::new(PipeListener::new(|message| {
//!     println!("{:?}", message.borrow().body::<i32>());
//! })));
//!
//! let pipe = Pipe::new();
//! pipe.connect(doubled.clone());
//! assert!(pipe.write(Message::normal().with_body(21).into_ref()));
//!
//! // Switch the filter off by name, on the same line.
//! pipe.write(Message::filter_control("double", FilterControl::Bypass).into_ref());
//! assert!(doubled.is_bypassed());
//! ```

pub mod config;
pub mod error;
pub mod plumbing;

// Re-export commonly used types
pub use config::{JunctionConfig, PipeConfig, StageConfig};
pub use error::{PipesError, Result, ResultExt};
pub use plumbing::{
    FittingRef, Junction, JunctionBuilder, JunctionMediator, Message, MessageKind, MessageRef,
    PipeDirection, PipeFitting, Priority,
};
