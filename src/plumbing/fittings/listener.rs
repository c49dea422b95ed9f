//! PipeListener: terminal adapter from a callback to a fitting.

use crate::plumbing::fitting::{FittingRef, PipeFitting};
use crate::plumbing::message::MessageRef;
use std::rc::Rc;

/// Something that consumes messages at the end of a pipe.
///
/// Any `Fn(MessageRef)` closure is a handler.
#[cfg_attr(test, mockall::automock)]
pub trait PipeMessageHandler {
    fn handle_pipe_message(&self, message: MessageRef);
}

impl<F> PipeMessageHandler for F
where
    F: Fn(MessageRef),
{
    fn handle_pipe_message(&self, message: MessageRef) {
        self(message)
    }
}

/// Sink fitting that hands each message to a `PipeMessageHandler`.
///
/// A listener has no downstream: `connect` always fails.
pub struct PipeListener {
    handler: Rc<dyn PipeMessageHandler>,
}

impl PipeListener {
    /// Create a listener from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(MessageRef) + 'static,
    {
        Self {
            handler: Rc::new(handler),
        }
    }

    /// Create a listener around a shared handler.
    pub fn from_handler(handler: Rc<dyn PipeMessageHandler>) -> Self {
        Self { handler }
    }
}

impl PipeFitting for PipeListener {
    fn connect(&self, _output: FittingRef) -> bool {
        tracing::debug!("PipeListener refused connect: listeners are sinks");
        false
    }

    fn disconnect(&self) -> Option<FittingRef> {
        None
    }

    fn write(&self, message: MessageRef) -> bool {
        self.handler.handle_pipe_message(message);
        true
    }
}
