//! Stage type enumeration for config-driven pipe assembly.
//!
//! Each stage of a configured junction pipe is one of these kinds. The
//! builder turns them into fittings; tee fittings are wired by hand and do
//! not appear here.

use serde::{Deserialize, Serialize};

/// Kinds of fitting that can appear as a stage in a configured pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    /// Plain pass-through pipe.
    Pipe,
    /// Named filter applying a registered filter function.
    Filter,
    /// Buffering queue, released by a flush control message.
    Queue,
}

impl StageType {
    pub fn display_name(&self) -> &'static str {
        match self {
            StageType::Pipe => "Pipe",
            StageType::Filter => "Filter",
            StageType::Queue => "Queue",
        }
    }

    /// All stage types, in declaration order.
    pub fn all() -> &'static [StageType] {
        &[StageType::Pipe, StageType::Filter, StageType::Queue]
    }

    /// Whether a stage of this type holds messages back until told otherwise.
    pub fn is_buffering(&self) -> bool {
        matches!(self, StageType::Queue)
    }

    /// Whether this stage reacts to control messages addressed to it.
    pub fn accepts_control(&self) -> bool {
        matches!(self, StageType::Filter | StageType::Queue)
    }

    pub fn description(&self) -> &'static str {
        match self {
            StageType::Pipe => {
                "Forwards every message to its single output.\n\
                 Fails the write when nothing is connected."
            }
            StageType::Filter => {
                "Applies a registered filter function to normal messages.\n\
                 Responds to filter control messages sent to its name.\n\
                 Can be bypassed or given new parameters at run time."
            }
            StageType::Queue => {
                "Buffers normal messages until flushed.\n\
                 Switches between FIFO and priority order on request."
            }
        }
    }
}

impl std::fmt::Display for StageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_unique_display_names() {
        let mut names: Vec<_> = StageType::all().iter().map(|t| t.display_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), StageType::all().len());
    }

    #[test]
    fn test_control_and_buffering_flags() {
        assert!(!StageType::Pipe.accepts_control());
        assert!(StageType::Filter.accepts_control());
        assert!(StageType::Queue.is_buffering());
        assert!(!StageType::Filter.is_buffering());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&StageType::Queue).unwrap();
        assert_eq!(json, "\"queue\"");
        let parsed: StageType = serde_json::from_str("\"filter\"").unwrap();
        assert_eq!(parsed, StageType::Filter);
    }
}
