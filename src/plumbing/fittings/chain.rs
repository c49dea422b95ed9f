//! PipeChain: a run of stages treated as one fitting.
//!
//! Used when a named junction pipe is more than a single `Pipe`, e.g.
//! `Filter -> Queue`. Writes enter at the first stage; connect and
//! disconnect act on the last one, so a listener attached to the chain ends
//! up behind every stage.

use crate::error::{PipesError, Result};
use crate::plumbing::fitting::{FittingRef, PipeFitting};
use crate::plumbing::message::MessageRef;

pub struct PipeChain {
    stages: Vec<FittingRef>,
}

impl PipeChain {
    /// Wire `stages` together in order.
    pub fn new(stages: Vec<FittingRef>) -> Result<Self> {
        if stages.is_empty() {
            return Err(PipesError::EmptyChain);
        }
        for (index, pair) in stages.windows(2).enumerate() {
            if !pair[0].connect(pair[1].clone()) {
                return Err(PipesError::Config(format!(
                    "stage {} of chain already has an output",
                    index
                )));
            }
        }
        Ok(Self { stages })
    }

    pub fn head(&self) -> &FittingRef {
        &self.stages[0]
    }

    pub fn tail(&self) -> &FittingRef {
        &self.stages[self.stages.len() - 1]
    }

    pub fn stages(&self) -> &[FittingRef] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl PipeFitting for PipeChain {
    fn connect(&self, output: FittingRef) -> bool {
        self.tail().connect(output)
    }

    fn disconnect(&self) -> Option<FittingRef> {
        self.tail().disconnect()
    }

    fn write(&self, message: MessageRef) -> bool {
        self.head().write(message)
    }
}
