//! JunctionMediator: notification surface for handing pipes to a module.
//!
//! Modules exchange pipes by notification: the sender names the pipe and
//! hands over the fitting, and the receiving module's mediator registers it
//! on its junction. Only two notifications are understood, one per
//! direction.

use crate::plumbing::direction::PipeDirection;
use crate::plumbing::fitting::FittingRef;
use crate::plumbing::fittings::PipeMessageHandler;
use crate::plumbing::junction::Junction;
use std::rc::Rc;

/// Notification carrying a pipe to be registered as an input.
pub const ACCEPT_INPUT_PIPE: &str = "__ACCEPT_INPUT_PIPE__";

/// Notification carrying a pipe to be registered as an output.
pub const ACCEPT_OUTPUT_PIPE: &str = "__ACCEPT_OUTPUT_PIPE__";

/// Body of an accept-pipe notification.
#[derive(Clone)]
pub struct PipeNotification {
    pub name: String,
    pub fitting: FittingRef,
}

impl PipeNotification {
    pub fn new(name: impl Into<String>, fitting: FittingRef) -> Self {
        Self {
            name: name.into(),
            fitting,
        }
    }
}

impl std::fmt::Debug for PipeNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeNotification")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Owns a module's junction and registers pipes delivered to it.
pub struct JunctionMediator {
    name: String,
    junction: Junction,
    inbound: Option<Rc<dyn PipeMessageHandler>>,
}

impl JunctionMediator {
    pub fn new(name: impl Into<String>, junction: Junction) -> Self {
        Self {
            name: name.into(),
            junction,
            inbound: None,
        }
    }

    /// Handler attached as the listener of every accepted input pipe.
    pub fn with_inbound(mut self, handler: Rc<dyn PipeMessageHandler>) -> Self {
        self.inbound = Some(handler);
        self
    }

    pub fn mediator_name(&self) -> &str {
        &self.name
    }

    pub fn junction(&self) -> &Junction {
        &self.junction
    }

    pub fn junction_mut(&mut self) -> &mut Junction {
        &mut self.junction
    }

    pub fn list_notification_interests(&self) -> &'static [&'static str] {
        &[ACCEPT_INPUT_PIPE, ACCEPT_OUTPUT_PIPE]
    }

    /// Register the pipe carried by an accept notification.
    ///
    /// Returns `false` for notification names this mediator is not
    /// interested in, or when an inbound handler could not be attached.
    pub fn handle_notification(&mut self, notification: &str, body: PipeNotification) -> bool {
        let PipeNotification { name, fitting } = body;
        match notification {
            ACCEPT_INPUT_PIPE => {
                self.junction
                    .register_pipe(name.clone(), PipeDirection::Input, fitting);
                match &self.inbound {
                    Some(handler) => {
                        let attached = self.junction.add_pipe_listener(&name, handler.clone());
                        if !attached {
                            tracing::warn!(
                                "{}: could not attach inbound handler to '{}'",
                                self.name,
                                name
                            );
                        }
                        attached
                    }
                    None => true,
                }
            }
            ACCEPT_OUTPUT_PIPE => self
                .junction
                .register_pipe(name, PipeDirection::Output, fitting),
            other => {
                tracing::debug!("{}: ignoring notification '{}'", self.name, other);
                false
            }
        }
    }
}
