//! Pipe: the plain single-hop fitting.

use crate::plumbing::fitting::{FittingRef, OutputSlot, PipeFitting};
use crate::plumbing::message::MessageRef;

/// Forwards every message to its one output.
#[derive(Default)]
pub struct Pipe {
    output: OutputSlot,
}

impl Pipe {
    pub fn new() -> Self {
        Self {
            output: OutputSlot::new(),
        }
    }

    /// Create a pipe already connected to `output`.
    pub fn with_output(output: FittingRef) -> Self {
        Self {
            output: OutputSlot::with(output),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.output.is_connected()
    }
}

impl PipeFitting for Pipe {
    fn connect(&self, output: FittingRef) -> bool {
        let connected = self.output.connect(output);
        if !connected {
            tracing::debug!("Pipe refused connect: output already attached");
        }
        connected
    }

    fn disconnect(&self) -> Option<FittingRef> {
        self.output.disconnect()
    }

    fn write(&self, message: MessageRef) -> bool {
        self.output.write(message)
    }
}
