//! Message plumbing: fittings, control messages and junctions.
//!
//! # Architecture
//!
//! ```text
//! Producer ──▶ Pipe ──▶ Filter("scale") ──▶ Queue ──▶ TeeSplit ──┬──▶ PipeListener
//!                                                                └──▶ PipeListener
//!
//! Pipe A ──┐
//!          ├──▶ TeeMerge ──▶ PipeListener
//! Pipe B ──┘
//! ```
//!
//! Every stage implements [`PipeFitting`]: `connect` fills its output slot,
//! `disconnect` empties it and hands back what was there, and `write`
//! pushes a message downstream, reporting `false` if it did not get
//! through. Control messages travel on the same line as data and are
//! addressed to a stage by name: a [`Filter`] reacts to
//! `FilterControl` for its own name, a [`Queue`] to `QueueControl`.
//!
//! A [`Junction`] registers pipes by name so a module can listen on its
//! inputs and send on its outputs without holding the fittings, and a
//! [`JunctionMediator`] accepts pipes handed over by notification.
//!
//! Everything here is single-threaded and synchronous: `write` is an
//! ordinary call that recurses through the graph.

pub mod builder;
pub mod direction;
pub mod fitting;
pub mod fittings;
pub mod junction;
pub mod mediator;
pub mod message;
pub mod stage_type;

#[cfg(test)]
pub(crate) mod test_util;

pub use builder::JunctionBuilder;
pub use direction::PipeDirection;
pub use fitting::{same_fitting, FittingRef, PipeFitting};
pub use fittings::{
    filter_fn, param_as, Filter, FilterFn, FilterMode, Pipe, PipeChain, PipeFilter, PipeListener,
    PipeMessageHandler, Queue, QueueMode, TeeMerge, TeeSplit,
};
pub use junction::Junction;
pub use mediator::{JunctionMediator, PipeNotification, ACCEPT_INPUT_PIPE, ACCEPT_OUTPUT_PIPE};
pub use message::{
    ConfigValue, FilterControl, FilterParams, Message, MessageKind, MessageRef, Payload, Priority,
    QueueControl,
};
pub use stage_type::StageType;
