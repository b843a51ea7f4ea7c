//! # Session States and Presentation Outcomes

use serde::{Deserialize, Serialize};

/// Lifecycle state of one checkout session cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No active descriptor or handle
    Idle,
    /// One intent fetch in flight
    Fetching,
    /// Handle built and available for presentation
    Ready,
    /// Handle handed to the UI layer, one presentation in flight
    Presenting,
    /// Last presentation completed (handle discarded)
    Completed,
    /// Last presentation was canceled (handle kept, reusable)
    Canceled,
    /// Fetch or presentation failed (handle discarded)
    Failed,
}

impl SessionState {
    /// True for states that end a presentation attempt
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Canceled | SessionState::Failed
        )
    }

    /// True while a fetch or presentation is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Fetching | SessionState::Presenting)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Fetching => "fetching",
            SessionState::Ready => "ready",
            SessionState::Presenting => "presenting",
            SessionState::Completed => "completed",
            SessionState::Canceled => "canceled",
            SessionState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Terminal value produced exactly once per presentation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// Payment or setup confirmed
    Completed,
    /// Customer dismissed the UI without confirming
    Canceled,
    /// Confirmation failed
    Failed { reason: String },
}

impl CompletionOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        CompletionOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CompletionOutcome::Completed)
    }
}

impl std::fmt::Display for CompletionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionOutcome::Completed => write!(f, "completed"),
            CompletionOutcome::Canceled => write!(f, "canceled"),
            CompletionOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}
