//! Filter: named transformation stage.
//!
//! A filter applies an application-supplied function to every data message
//! on its way through. It is addressed by name: filter control messages that
//! carry its name switch it between filtering and bypass, or replace its
//! parameters or its function. Control messages for other filters, queue
//! control and custom kinds pass through untouched, so several filters can
//! share one line of pipe.
//!
//! A filter function stops a message by returning `Err`; the filter then
//! reports `false` from `write` and forwards nothing. A panic inside the
//! function is caught at the filter and treated the same way.

use crate::error::Result;
use crate::plumbing::fitting::{FittingRef, OutputSlot, PipeFitting};
use crate::plumbing::message::{FilterControl, FilterParams, MessageKind, MessageRef};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Transformation applied by a `Filter` to data messages.
///
/// Returning `Ok` forwards the returned message (normally the same handle,
/// possibly mutated in place). Returning `Err` drops the message.
pub trait PipeFilter {
    fn apply(&self, message: MessageRef, params: Option<&FilterParams>) -> Result<MessageRef>;
}

impl<F> PipeFilter for F
where
    F: Fn(MessageRef, Option<&FilterParams>) -> Result<MessageRef>,
{
    fn apply(&self, message: MessageRef, params: Option<&FilterParams>) -> Result<MessageRef> {
        self(message, params)
    }
}

/// Shared filter function, as carried by `FilterControl::SetFilter`.
pub type FilterFn = Rc<dyn PipeFilter>;

/// Wrap a closure as a `FilterFn`.
pub fn filter_fn<F>(f: F) -> FilterFn
where
    F: Fn(MessageRef, Option<&FilterParams>) -> Result<MessageRef> + 'static,
{
    Rc::new(f)
}

/// Read filter parameters as `T`.
pub fn param_as<T: Any>(params: Option<&FilterParams>) -> Option<&T> {
    params.and_then(|p| p.downcast_ref::<T>())
}

/// Whether a filter applies its function or lets data through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Filter,
    Bypass,
}

struct FilterState {
    filter: Option<FilterFn>,
    params: Option<FilterParams>,
    mode: FilterMode,
}

enum Route {
    Data,
    Control(FilterControl),
    PassThrough,
}

/// Named filter stage.
pub struct Filter {
    name: String,
    output: OutputSlot,
    state: RefCell<FilterState>,
}

impl Filter {
    /// Create a filter with no function, parameters or output.
    /// Until a function is set it passes data through.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: OutputSlot::new(),
            state: RefCell::new(FilterState {
                filter: None,
                params: None,
                mode: FilterMode::Filter,
            }),
        }
    }

    /// Attach the output. Ignored, with a debug log, if one is already set.
    pub fn with_output(self, output: FittingRef) -> Self {
        if !self.output.connect(output) {
            tracing::debug!("Filter '{}' kept its existing output", self.name);
        }
        self
    }

    pub fn with_filter<F>(self, f: F) -> Self
    where
        F: Fn(MessageRef, Option<&FilterParams>) -> Result<MessageRef> + 'static,
    {
        self.with_filter_fn(filter_fn(f))
    }

    pub fn with_filter_fn(self, f: FilterFn) -> Self {
        self.state.borrow_mut().filter = Some(f);
        self
    }

    pub fn with_params<T: Any>(self, params: T) -> Self {
        self.with_shared_params(Rc::new(params))
    }

    pub fn with_shared_params(self, params: FilterParams) -> Self {
        self.state.borrow_mut().params = Some(params);
        self
    }

    pub fn with_mode(self, mode: FilterMode) -> Self {
        self.state.borrow_mut().mode = mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> FilterMode {
        self.state.borrow().mode
    }

    pub fn is_bypassed(&self) -> bool {
        self.mode() == FilterMode::Bypass
    }

    pub fn has_filter(&self) -> bool {
        self.state.borrow().filter.is_some()
    }

    fn route(&self, message: &MessageRef) -> Route {
        match message.borrow().kind() {
            MessageKind::Normal => Route::Data,
            MessageKind::FilterControl { target, action } if *target == self.name => {
                Route::Control(action.clone())
            }
            _ => Route::PassThrough,
        }
    }

    fn apply_control(&self, action: FilterControl) {
        tracing::debug!("Filter '{}' applying {}", self.name, action.as_str());
        let mut state = self.state.borrow_mut();
        match action {
            FilterControl::Bypass => state.mode = FilterMode::Bypass,
            FilterControl::Filter => state.mode = FilterMode::Filter,
            FilterControl::SetParams(params) => state.params = Some(params),
            FilterControl::SetFilter(f) => state.filter = Some(f),
        }
    }

    fn filter_and_forward(&self, message: MessageRef) -> bool {
        // Copy what the call needs so no borrow is held while user code runs.
        let (mode, filter, params) = {
            let state = self.state.borrow();
            (state.mode, state.filter.clone(), state.params.clone())
        };

        let outgoing = match (mode, filter) {
            (FilterMode::Filter, Some(f)) => {
                let applied =
                    panic::catch_unwind(AssertUnwindSafe(|| f.apply(message, params.as_ref())));
                match applied {
                    Ok(Ok(m)) => m,
                    Ok(Err(e)) => {
                        tracing::debug!("Filter '{}' stopped message: {}", self.name, e);
                        return false;
                    }
                    Err(cause) => {
                        tracing::warn!(
                            "Filter '{}' function panicked: {}",
                            self.name,
                            panic_message(cause.as_ref())
                        );
                        return false;
                    }
                }
            }
            _ => message,
        };

        self.output.write(outgoing)
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(s) = cause.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

impl PipeFitting for Filter {
    fn connect(&self, output: FittingRef) -> bool {
        let connected = self.output.connect(output);
        if !connected {
            tracing::debug!("Filter '{}' refused connect: output already attached", self.name);
        }
        connected
    }

    fn disconnect(&self) -> Option<FittingRef> {
        self.output.disconnect()
    }

    fn write(&self, message: MessageRef) -> bool {
        match self.route(&message) {
            Route::Control(action) => {
                self.apply_control(action);
                true
            }
            Route::PassThrough => self.output.write(message),
            Route::Data => self.filter_and_forward(message),
        }
    }
}
