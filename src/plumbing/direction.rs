//! Pipe direction as seen from a junction.
//!
//! An `Input` pipe carries messages into the junction's owner (listeners are
//! attached to it); an `Output` pipe carries messages away (the owner sends on
//! it).

use crate::error::PipesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a junction pipe is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeDirection {
    Input,
    Output,
}

impl PipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipeDirection::Input => "input",
            PipeDirection::Output => "output",
        }
    }
}

impl fmt::Display for PipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipeDirection {
    type Err = PipesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" => Ok(PipeDirection::Input),
            "output" => Ok(PipeDirection::Output),
            _ => Err(PipesError::InvalidDirection(s.to_string())),
        }
    }
}
