//! Dump status types.
//!
//! Dump creation is acknowledged with a string uid and polled through
//! `GET /dumps/{uid}/status`. The terminal vocabulary differs from tasks
//! (`done`/`failed` instead of `succeeded`/`failed`/`canceled`); the polling
//! machinery itself is shared.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpState {
    /// The dump is being written
    InProgress,
    /// The dump finished successfully (terminal)
    Done,
    /// The dump failed (terminal)
    Failed,
    /// A state string this SDK version does not know about; non-terminal
    Unknown(String),
}

impl DumpState {
    /// Wire string for this state.
    pub fn as_wire_str(&self) -> &str {
        match self {
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Unknown(other) => other,
        }
    }

    /// Map a wire string back to a state, falling back to `Unknown`.
    pub fn from_wire_str(value: &str) -> Self {
        match value {
            "in_progress" => Self::InProgress,
            "done" => Self::Done,
            "failed" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// True once the service will never change this state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for DumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for DumpState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl<'de> Deserialize<'de> for DumpState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire_str(&value))
    }
}

/// Snapshot of a dump's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpInfo {
    /// Dump identifier issued at creation time
    pub uid: String,

    /// Current state
    pub status: DumpState,
}

impl DumpInfo {
    /// True once the service will never change this snapshot again.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
