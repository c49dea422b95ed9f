//! The fitting abstraction.
//!
//! Every node in the routing graph is a `PipeFitting`: it can be connected to
//! a downstream fitting, disconnected from it, and written to. Fittings are
//! shared as `FittingRef` (`Rc<dyn PipeFitting>`) and use interior
//! mutability, so a graph can be rewired through shared handles.
//!
//! Topology refusals are plain `bool` / `Option` results. Nothing here
//! panics or returns an error.

use crate::plumbing::message::MessageRef;
use std::cell::RefCell;
use std::rc::Rc;

/// A node in the routing graph.
pub trait PipeFitting {
    /// Attach `output` downstream. Returns `false` (and changes nothing) if
    /// this fitting cannot take another output.
    fn connect(&self, output: FittingRef) -> bool;

    /// Detach and return the most recently connected output.
    fn disconnect(&self) -> Option<FittingRef>;

    /// Push a message into this fitting. The result reports whether the
    /// message was accepted all the way down.
    fn write(&self, message: MessageRef) -> bool;
}

/// Shared handle to any fitting.
pub type FittingRef = Rc<dyn PipeFitting>;

/// Whether two handles point at the same fitting, regardless of the static
/// type each handle was taken as.
pub fn same_fitting<A: ?Sized, B: ?Sized>(a: &Rc<A>, b: &Rc<B>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A single downstream slot, shared by every single-output fitting.
///
/// The slot never holds its borrow while calling into the connected
/// fitting, so downstream code may rewire this fitting from inside `write`.
#[derive(Default)]
pub(crate) struct OutputSlot {
    output: RefCell<Option<FittingRef>>,
}

impl OutputSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(output: FittingRef) -> Self {
        Self {
            output: RefCell::new(Some(output)),
        }
    }

    pub(crate) fn connect(&self, output: FittingRef) -> bool {
        let mut slot = self.output.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(output);
        true
    }

    pub(crate) fn disconnect(&self) -> Option<FittingRef> {
        self.output.borrow_mut().take()
    }

    pub(crate) fn get(&self) -> Option<FittingRef> {
        self.output.borrow().clone()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.output.borrow().is_some()
    }

    /// Forward to the connected fitting; `false` when nothing is connected.
    pub(crate) fn write(&self, message: MessageRef) -> bool {
        match self.get() {
            Some(output) => output.write(message),
            None => false,
        }
    }
}
