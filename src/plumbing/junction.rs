//! Junction: named registry of a module's pipes.
//!
//! A junction lets its owner talk to pipes by name instead of holding the
//! fittings itself. Input pipes deliver to listeners attached through the
//! junction; output pipes are written to with `send_message`. A name is
//! unique across both directions, and registering an existing name replaces
//! the earlier pipe.

use crate::plumbing::direction::PipeDirection;
use crate::plumbing::fitting::FittingRef;
use crate::plumbing::fittings::{PipeListener, PipeMessageHandler};
use crate::plumbing::message::MessageRef;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

struct RegisteredPipe {
    direction: PipeDirection,
    fitting: FittingRef,
}

/// Name-addressed facade over a set of input and output pipes.
#[derive(Default)]
pub struct Junction {
    pipes: HashMap<String, RegisteredPipe>,
}

impl Junction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fitting` under `name`, replacing any pipe already known by
    /// that name. Returns `true` once registered.
    pub fn register_pipe(
        &mut self,
        name: impl Into<String>,
        direction: PipeDirection,
        fitting: FittingRef,
    ) -> bool {
        let name = name.into();
        if let Some(previous) = self.pipes.get(&name) {
            tracing::warn!(
                "Junction replacing {} pipe '{}' with a new {} pipe",
                previous.direction,
                name,
                direction
            );
        } else {
            tracing::info!("Junction registered {} pipe '{}'", direction, name);
        }
        self.pipes
            .insert(name, RegisteredPipe { direction, fitting });
        true
    }

    pub fn has_pipe(&self, name: &str) -> bool {
        self.pipes.contains_key(name)
    }

    pub fn has_input_pipe(&self, name: &str) -> bool {
        self.direction_of(name) == Some(PipeDirection::Input)
    }

    pub fn has_output_pipe(&self, name: &str) -> bool {
        self.direction_of(name) == Some(PipeDirection::Output)
    }

    pub fn direction_of(&self, name: &str) -> Option<PipeDirection> {
        self.pipes.get(name).map(|p| p.direction)
    }

    pub fn retrieve_pipe(&self, name: &str) -> Option<FittingRef> {
        self.pipes.get(name).map(|p| p.fitting.clone())
    }

    /// Forget the pipe registered as `name` and hand it back.
    /// The fitting itself is left wired as it was.
    pub fn remove_pipe(&mut self, name: &str) -> Option<FittingRef> {
        let removed = self.pipes.remove(name)?;
        tracing::info!("Junction removed {} pipe '{}'", removed.direction, name);
        Some(removed.fitting)
    }

    /// Attach `handler` as the listener at the end of input pipe `name`.
    ///
    /// Fails for unknown names, output pipes, and pipes that already have a
    /// downstream.
    pub fn add_pipe_listener(&self, name: &str, handler: Rc<dyn PipeMessageHandler>) -> bool {
        let Some(pipe) = self.pipes.get(name) else {
            tracing::debug!("Junction has no pipe '{}' to listen on", name);
            return false;
        };
        if pipe.direction != PipeDirection::Input {
            tracing::debug!("Junction pipe '{}' is not an input pipe", name);
            return false;
        }
        pipe.fitting
            .connect(Rc::new(PipeListener::from_handler(handler)))
    }

    /// Write `message` to output pipe `name`.
    pub fn send_message(&self, name: &str, message: MessageRef) -> bool {
        match self.pipes.get(name) {
            Some(pipe) if pipe.direction == PipeDirection::Output => pipe.fitting.write(message),
            Some(_) => {
                tracing::debug!("Junction pipe '{}' is not an output pipe", name);
                false
            }
            None => {
                tracing::debug!("Junction has no pipe '{}' to send on", name);
                false
            }
        }
    }

    /// Names of the registered input pipes, sorted.
    pub fn input_pipe_names(&self) -> Vec<&str> {
        self.names_for(PipeDirection::Input)
    }

    /// Names of the registered output pipes, sorted.
    pub fn output_pipe_names(&self) -> Vec<&str> {
        self.names_for(PipeDirection::Output)
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    fn names_for(&self, direction: PipeDirection) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .pipes
            .iter()
            .filter(|(_, p)| p.direction == direction)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pipes: BTreeMap<&str, PipeDirection> = self
            .pipes
            .iter()
            .map(|(name, p)| (name.as_str(), p.direction))
            .collect();
        f.debug_struct("Junction").field("pipes", &pipes).finish()
    }
}
