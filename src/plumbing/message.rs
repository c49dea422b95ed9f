//! Messages travelling through the plumbing.
//!
//! A `Message` is an envelope: a kind, a priority and two opaque payload
//! slots. The core only ever looks at the kind and the priority; header and
//! body belong to the application and are read back with typed downcasts.
//!
//! Messages move through the graph as `MessageRef` handles. Every stage
//! forwards the handle it was given, so the instance a listener sees is the
//! instance the producer wrote (compare with `Rc::ptr_eq`).

use crate::plumbing::fittings::filter::FilterFn;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a message in flight.
pub type MessageRef = Rc<RefCell<Message>>;

/// Opaque application payload.
pub type Payload = Box<dyn Any>;

/// Parameters handed to a filter function.
pub type FilterParams = Rc<dyn Any>;

/// Message priority. Lower values are delivered first by a sorting queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub u32);

impl Priority {
    pub const HIGH: Priority = Priority(1);
    pub const MED: Priority = Priority(5);
    pub const LOW: Priority = Priority(10);

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::MED
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Priority::HIGH => write!(f, "high"),
            Priority::MED => write!(f, "med"),
            Priority::LOW => write!(f, "low"),
            Priority(v) => write!(f, "{}", v),
        }
    }
}

/// Reconfiguration instruction for a named filter.
#[derive(Clone)]
pub enum FilterControl {
    /// Forward data unchanged.
    Bypass,
    /// Resume applying the filter function.
    Filter,
    /// Replace the filter parameters.
    SetParams(FilterParams),
    /// Replace the filter function.
    SetFilter(FilterFn),
}

impl FilterControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterControl::Bypass => "bypass",
            FilterControl::Filter => "filter",
            FilterControl::SetParams(_) => "set-params",
            FilterControl::SetFilter(_) => "set-filter",
        }
    }
}

impl fmt::Debug for FilterControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instruction for a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueControl {
    /// Deliver everything buffered, then clear.
    Flush,
    /// Flush in priority order from now on.
    Sort,
    /// Flush in arrival order from now on.
    Fifo,
}

impl QueueControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueControl::Flush => "flush",
            QueueControl::Sort => "sort",
            QueueControl::Fifo => "fifo",
        }
    }
}

/// What a message is.
#[derive(Debug, Clone)]
pub enum MessageKind {
    /// Ordinary data.
    Normal,
    /// Control message for the filter named `target`.
    FilterControl {
        target: String,
        action: FilterControl,
    },
    /// Control message for a queue. `None` addresses any queue it reaches.
    QueueControl {
        target: Option<String>,
        action: QueueControl,
    },
    /// Application-defined kind. Stages treat it as data.
    Custom(String),
}

impl MessageKind {
    /// Short type name, used in logs.
    pub fn type_name(&self) -> String {
        match self {
            MessageKind::Normal => "normal".to_string(),
            MessageKind::FilterControl { action, .. } => {
                format!("filter-control/{}", action.as_str())
            }
            MessageKind::QueueControl { action, .. } => format!("queue/{}", action.as_str()),
            MessageKind::Custom(name) => name.clone(),
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(
            self,
            MessageKind::FilterControl { .. } | MessageKind::QueueControl { .. }
        )
    }
}

/// The message envelope.
pub struct Message {
    kind: MessageKind,
    header: Option<Payload>,
    body: Option<Payload>,
    priority: Priority,
}

impl Message {
    /// Create a message of the given kind with no payload and `MED` priority.
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            header: None,
            body: None,
            priority: Priority::default(),
        }
    }

    /// Create an empty data message.
    pub fn normal() -> Self {
        Self::new(MessageKind::Normal)
    }

    /// Create a control message addressed to the filter named `target`.
    pub fn filter_control(target: impl Into<String>, action: FilterControl) -> Self {
        Self::new(MessageKind::FilterControl {
            target: target.into(),
            action,
        })
    }

    /// Create a control message for whichever queue receives it.
    pub fn queue_control(action: QueueControl) -> Self {
        Self::new(MessageKind::QueueControl {
            target: None,
            action,
        })
    }

    /// Create a control message for the queue named `target`.
    pub fn queue_control_for(target: impl Into<String>, action: QueueControl) -> Self {
        Self::new(MessageKind::QueueControl {
            target: Some(target.into()),
            action,
        })
    }

    pub fn with_header<T: Any>(mut self, header: T) -> Self {
        self.header = Some(Box::new(header));
        self
    }

    pub fn with_body<T: Any>(mut self, body: T) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Wrap the message in a shared handle, ready to be written.
    pub fn into_ref(self) -> MessageRef {
        Rc::new(RefCell::new(self))
    }

    pub fn kind(&self) -> &MessageKind {
        &self.kind
    }

    pub fn is_normal(&self) -> bool {
        matches!(self.kind, MessageKind::Normal)
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Borrow the header as `T`. `None` if absent or of another type.
    pub fn header<T: Any>(&self) -> Option<&T> {
        self.header.as_ref().and_then(|h| h.downcast_ref::<T>())
    }

    pub fn header_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.header.as_mut().and_then(|h| h.downcast_mut::<T>())
    }

    pub fn set_header<T: Any>(&mut self, header: T) {
        self.header = Some(Box::new(header));
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Borrow the body as `T`. `None` if absent or of another type.
    pub fn body<T: Any>(&self) -> Option<&T> {
        self.body.as_ref().and_then(|b| b.downcast_ref::<T>())
    }

    pub fn body_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.body.as_mut().and_then(|b| b.downcast_mut::<T>())
    }

    pub fn set_body<T: Any>(&mut self, body: T) {
        self.body = Some(Box::new(body));
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("has_header", &self.header.is_some())
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Scalar values that can be supplied as filter parameters from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value; integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(v) => Some(*v),
            ConfigValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(v) => Some(v),
            _ => None,
        }
    }
}
