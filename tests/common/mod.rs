//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use pipes_rs::plumbing::{FittingRef, MessageRef, PipeListener, PipeMessageHandler};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary; honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Listener target that keeps every message it receives.
#[derive(Default)]
pub struct Collector {
    messages: RefCell<Vec<MessageRef>>,
}

impl Collector {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn listener(self: &Rc<Self>) -> FittingRef {
        Rc::new(PipeListener::from_handler(self.clone()))
    }

    pub fn received(&self) -> Vec<MessageRef> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }

    /// Header values of the received messages, for order assertions.
    pub fn headers<T: Clone + 'static>(&self) -> Vec<Option<T>> {
        self.messages
            .borrow()
            .iter()
            .map(|m| m.borrow().header::<T>().cloned())
            .collect()
    }
}

impl PipeMessageHandler for Collector {
    fn handle_pipe_message(&self, message: MessageRef) {
        self.messages.borrow_mut().push(message);
    }
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
