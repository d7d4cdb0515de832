use thiserror::Error;

/// Failures of the scaffolding around the presentation layer.
///
/// Source failures never show up here: they travel as
/// `MediaSourceState::Failed` data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("no tokio runtime available to host subscriptions")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, ScopeError>;
