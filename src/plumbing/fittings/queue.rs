//! Queue: buffering stage with FIFO or priority-sorted flush.
//!
//! Data written to a queue is held until a `Flush` control message arrives.
//! The buffer always keeps arrival order; the mode in force at flush time
//! decides the delivery order:
//!
//! - `Fifo` delivers in write order.
//! - `Sort` delivers by priority (`HIGH` first), ties in write order.
//!
//! Queue control messages without a target apply to any queue they reach.
//! A targeted message applies only to the queue with that name and is
//! forwarded by every other queue.

use crate::plumbing::fitting::{FittingRef, OutputSlot, PipeFitting};
use crate::plumbing::message::{MessageKind, MessageRef, QueueControl};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Flush ordering of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueMode {
    #[default]
    Fifo,
    Sort,
}

struct QueueState {
    mode: QueueMode,
    buffer: Vec<MessageRef>,
}

enum Route {
    Store,
    Control(QueueControl),
    PassThrough,
}

/// Buffering stage.
pub struct Queue {
    name: Option<String>,
    output: OutputSlot,
    state: RefCell<QueueState>,
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    /// Create an unnamed FIFO queue.
    pub fn new() -> Self {
        Self {
            name: None,
            output: OutputSlot::new(),
            state: RefCell::new(QueueState {
                mode: QueueMode::Fifo,
                buffer: Vec::new(),
            }),
        }
    }

    /// Create a FIFO queue addressable by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Attach the output. Ignored, with a debug log, if one is already set.
    pub fn with_output(self, output: FittingRef) -> Self {
        if !self.output.connect(output) {
            tracing::debug!("Queue {:?} kept its existing output", self.name);
        }
        self
    }

    pub fn with_mode(self, mode: QueueMode) -> Self {
        self.state.borrow_mut().mode = mode;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mode(&self) -> QueueMode {
        self.state.borrow().mode
    }

    /// Number of messages waiting for a flush.
    pub fn len(&self) -> usize {
        self.state.borrow().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn route(&self, message: &MessageRef) -> Route {
        match message.borrow().kind() {
            MessageKind::QueueControl { target, action } => match target {
                Some(target) if self.name.as_deref() != Some(target.as_str()) => {
                    Route::PassThrough
                }
                _ => Route::Control(*action),
            },
            _ => Route::Store,
        }
    }

    fn flush(&self) -> bool {
        let Some(output) = self.output.get() else {
            tracing::warn!(
                "Queue {:?} flushed with no output; keeping {} messages",
                self.name,
                self.len()
            );
            return false;
        };

        let (mode, mut batch) = {
            let mut state = self.state.borrow_mut();
            (state.mode, std::mem::take(&mut state.buffer))
        };

        if mode == QueueMode::Sort {
            // Stable: equal priorities keep write order.
            batch.sort_by_key(|m| m.borrow().priority());
        }

        tracing::debug!("Queue {:?} flushing {} messages ({:?})", self.name, batch.len(), mode);

        let mut success = true;
        for message in batch {
            if !output.write(message) {
                success = false;
            }
        }
        success
    }
}

impl PipeFitting for Queue {
    fn connect(&self, output: FittingRef) -> bool {
        let connected = self.output.connect(output);
        if !connected {
            tracing::debug!("Queue {:?} refused connect: output already attached", self.name);
        }
        connected
    }

    fn disconnect(&self) -> Option<FittingRef> {
        self.output.disconnect()
    }

    fn write(&self, message: MessageRef) -> bool {
        match self.route(&message) {
            Route::Store => {
                self.state.borrow_mut().buffer.push(message);
                true
            }
            Route::Control(QueueControl::Flush) => self.flush(),
            Route::Control(QueueControl::Sort) => {
                self.state.borrow_mut().mode = QueueMode::Sort;
                true
            }
            Route::Control(QueueControl::Fifo) => {
                self.state.borrow_mut().mode = QueueMode::Fifo;
                true
            }
            Route::PassThrough => self.output.write(message),
        }
    }
}
