//! Collaborators the editor talks to: the diagram service, the lock service
//! and the user-facing notifier.

use std::fmt;

use flowboard_core::model::{DiagramRecord, LockInfo};

use crate::FlowboardError;

/// The editing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: String,
    username: String,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Loads and stores diagrams.
pub trait DiagramService {
    /// Fetches a diagram record, including its serialized content.
    fn fetch(&mut self, diagram_id: u64) -> Result<DiagramRecord, FlowboardError>;

    /// Replaces the stored content of a diagram.
    fn update(&mut self, diagram_id: u64, content: &str) -> Result<(), FlowboardError>;
}

/// Grants and releases advisory edit locks.
pub trait LockService {
    /// Returns the lock currently held on a diagram, if any.
    fn current(&mut self, diagram_id: u64) -> Result<Option<LockInfo>, FlowboardError>;

    /// Locks a diagram for `user`.
    ///
    /// Fails with [`FlowboardError::LockConflict`] when another user holds the
    /// lock. Re-acquiring one's own lock succeeds.
    fn acquire(&mut self, diagram_id: u64, user: &User) -> Result<LockInfo, FlowboardError>;

    /// Releases `user`'s lock on a diagram.
    fn release(&mut self, diagram_id: u64, user: &User) -> Result<(), FlowboardError>;
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        })
    }
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    level: NoticeLevel,
    message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Shows notices to the user.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}
