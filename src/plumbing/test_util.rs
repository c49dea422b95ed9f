//! Shared helpers for unit tests.

use crate::plumbing::fitting::FittingRef;
use crate::plumbing::fittings::{PipeListener, PipeMessageHandler};
use crate::plumbing::message::MessageRef;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every message it is handed.
#[derive(Default)]
pub(crate) struct Collector {
    messages: RefCell<Vec<MessageRef>>,
}

impl Collector {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A listener fitting feeding this collector.
    pub(crate) fn listener(self: &Rc<Self>) -> FittingRef {
        Rc::new(PipeListener::from_handler(self.clone()))
    }

    pub(crate) fn received(&self) -> Vec<MessageRef> {
        self.messages.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl PipeMessageHandler for Collector {
    fn handle_pipe_message(&self, message: MessageRef) {
        self.messages.borrow_mut().push(message);
    }
}
