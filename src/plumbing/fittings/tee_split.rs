//! TeeSplit: fan-out to an ordered list of outputs.

use crate::plumbing::fitting::{same_fitting, FittingRef, PipeFitting};
use crate::plumbing::message::MessageRef;
use std::cell::RefCell;

/// Writes every message to each of its outputs, in connection order.
///
/// All outputs receive the same message handle. `disconnect` takes outputs
/// off the end, so teardown runs in reverse connection order.
pub struct TeeSplit {
    outputs: RefCell<Vec<FittingRef>>,
}

impl TeeSplit {
    pub fn new(output1: FittingRef, output2: FittingRef) -> Self {
        Self {
            outputs: RefCell::new(vec![output1, output2]),
        }
    }

    /// Remove a specific output, wherever it sits in the list.
    pub fn disconnect_fitting(&self, target: &FittingRef) -> Option<FittingRef> {
        let mut outputs = self.outputs.borrow_mut();
        let index = outputs.iter().position(|o| same_fitting(o, target))?;
        Some(outputs.remove(index))
    }

    pub fn output_count(&self) -> usize {
        self.outputs.borrow().len()
    }
}

impl PipeFitting for TeeSplit {
    /// Append another output. Always succeeds.
    fn connect(&self, output: FittingRef) -> bool {
        self.outputs.borrow_mut().push(output);
        true
    }

    fn disconnect(&self) -> Option<FittingRef> {
        self.outputs.borrow_mut().pop()
    }

    /// Every output is written even after a failure; the result is `true`
    /// only if all of them accepted the message.
    fn write(&self, message: MessageRef) -> bool {
        let outputs = self.outputs.borrow().clone();
        let mut success = true;
        for output in outputs {
            if !output.write(message.clone()) {
                success = false;
            }
        }
        success
    }
}
