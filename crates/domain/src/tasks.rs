//! Task snapshot types returned by the service.
//!
//! Every mutating call is acknowledged with a [`TaskHandle`]; the service
//! then mutates the task on its own schedule and the client reads successive
//! [`Task`] snapshots by uid. A snapshot is terminal once its status is
//! `Succeeded`, `Failed` or `Canceled`.
//!
//! Status and kind values are mapped to their wire strings through explicit
//! lookup tables with an `Unknown` fallback, so new service-side values
//! degrade gracefully instead of failing deserialization.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::errors::ApiErrorDetails;

/// Lifecycle status of an asynchronous task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Accepted by the service, not started yet
    Enqueued,
    /// Currently being worked on
    Processing,
    /// Finished successfully (terminal)
    Succeeded,
    /// Finished with an error (terminal)
    Failed,
    /// Cancelled before completion (terminal)
    Canceled,
    /// A status string this SDK version does not know about.
    /// Treated as non-terminal so pollers keep watching rather than
    /// misreporting completion.
    Unknown(String),
}

impl TaskStatus {
    /// Wire string for this status.
    pub fn as_wire_str(&self) -> &str {
        match self {
            Self::Enqueued => "enqueued",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Unknown(other) => other,
        }
    }

    /// Map a wire string back to a status, falling back to `Unknown`.
    pub fn from_wire_str(value: &str) -> Self {
        match value {
            "enqueued" => Self::Enqueued,
            "processing" => Self::Processing,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceled" => Self::Canceled,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// True once the service will never change this status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire_str(&value))
    }
}

/// Kind of operation a task performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Creation of a new index
    IndexCreation,
    /// Update of index metadata
    IndexUpdate,
    /// Deletion of an index
    IndexDeletion,
    /// Document upload (add or replace)
    DocumentAdditionOrUpdate,
    /// Document deletion
    DocumentDeletion,
    /// Settings change on an index
    SettingsUpdate,
    /// Dump creation
    DumpCreation,
    /// Snapshot creation
    SnapshotCreation,
    /// Cancellation of other tasks
    TaskCancelation,
    /// Deletion of finished tasks
    TaskDeletion,
    /// A kind string this SDK version does not know about
    Unknown(String),
}

impl TaskKind {
    /// Wire string for this kind.
    pub fn as_wire_str(&self) -> &str {
        match self {
            Self::IndexCreation => "indexCreation",
            Self::IndexUpdate => "indexUpdate",
            Self::IndexDeletion => "indexDeletion",
            Self::DocumentAdditionOrUpdate => "documentAdditionOrUpdate",
            Self::DocumentDeletion => "documentDeletion",
            Self::SettingsUpdate => "settingsUpdate",
            Self::DumpCreation => "dumpCreation",
            Self::SnapshotCreation => "snapshotCreation",
            Self::TaskCancelation => "taskCancelation",
            Self::TaskDeletion => "taskDeletion",
            Self::Unknown(other) => other,
        }
    }

    /// Map a wire string back to a kind, falling back to `Unknown`.
    pub fn from_wire_str(value: &str) -> Self {
        match value {
            "indexCreation" => Self::IndexCreation,
            "indexUpdate" => Self::IndexUpdate,
            "indexDeletion" => Self::IndexDeletion,
            "documentAdditionOrUpdate" => Self::DocumentAdditionOrUpdate,
            "documentDeletion" => Self::DocumentDeletion,
            "settingsUpdate" => Self::SettingsUpdate,
            "dumpCreation" => Self::DumpCreation,
            "snapshotCreation" => Self::SnapshotCreation,
            "taskCancelation" => Self::TaskCancelation,
            "taskDeletion" => Self::TaskDeletion,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for TaskKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl<'de> Deserialize<'de> for TaskKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire_str(&value))
    }
}

/// Acknowledgement returned by every mutating endpoint.
///
/// Carries the uid to hand to `GET /tasks/{uid}` or a status poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    /// Identifier of the enqueued task
    pub task_uid: u64,

    /// Index the task operates on, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_uid: Option<String>,

    /// Status at enqueue time (always `Enqueued` in practice)
    pub status: TaskStatus,

    /// Kind of operation
    #[serde(rename = "type")]
    pub kind: TaskKind,

    /// When the service accepted the task
    pub enqueued_at: DateTime<Utc>,
}

/// Point-in-time snapshot of an asynchronous task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier, unique per service instance
    pub uid: u64,

    /// Index the task operates on, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_uid: Option<String>,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Kind of operation
    #[serde(rename = "type")]
    pub kind: TaskKind,

    /// When the service accepted the task
    pub enqueued_at: DateTime<Utc>,

    /// When processing began
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the task reached a terminal status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Failure detail, present only on failed tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDetails>,
}

impl Task {
    /// True once the service will never change this snapshot again.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
