use std::fmt;
use std::sync::Arc;

use crate::media::Media;

/// Coarse classification of why a fetch failed. Display data only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FetchFailureKind {
    Network,
    Timeout,
    Unauthorized,
    Parse,
    Unknown,
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailureKind::Network => write!(f, "network"),
            FetchFailureKind::Timeout => write!(f, "timeout"),
            FetchFailureKind::Unauthorized => write!(f, "unauthorized"),
            FetchFailureKind::Parse => write!(f, "parse"),
            FetchFailureKind::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

/// Lifecycle of one source's fetch for the current search.
///
/// Owned and written by the fetch subsystem; everything downstream only reads
/// it. A fresh source starts out `Working`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaSourceState {
    #[default]
    Working,
    Disabled,
    Failed(FetchFailure),
    Succeeded(Arc<[Media]>),
}

impl MediaSourceState {
    pub fn succeeded(results: impl Into<Arc<[Media]>>) -> Self {
        MediaSourceState::Succeeded(results.into())
    }

    pub fn failed(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        MediaSourceState::Failed(FetchFailure::new(kind, message))
    }

    pub fn is_working(&self) -> bool {
        matches!(self, MediaSourceState::Working)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, MediaSourceState::Disabled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MediaSourceState::Failed(_))
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, MediaSourceState::Succeeded(_))
    }

    pub fn kind(&self) -> MediaSourceStateKind {
        match self {
            MediaSourceState::Working => MediaSourceStateKind::Working,
            MediaSourceState::Disabled => MediaSourceStateKind::Disabled,
            MediaSourceState::Failed(_) => MediaSourceStateKind::Failed,
            MediaSourceState::Succeeded(_) => MediaSourceStateKind::Succeeded,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            MediaSourceState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&[Media]> {
        match self {
            MediaSourceState::Succeeded(results) => Some(results),
            _ => None,
        }
    }
}

/// Payload-free discriminant of [`MediaSourceState`], handy for logging and
/// serialised snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MediaSourceStateKind {
    Working,
    Disabled,
    Failed,
    Succeeded,
}

impl fmt::Display for MediaSourceStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSourceStateKind::Working => write!(f, "Working"),
            MediaSourceStateKind::Disabled => write!(f, "Disabled"),
            MediaSourceStateKind::Failed => write!(f, "Failed"),
            MediaSourceStateKind::Succeeded => write!(f, "Succeeded"),
        }
    }
}
