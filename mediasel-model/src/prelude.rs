//! Flat re-export of the model surface for presentation crates.

pub use super::error::ModelError;
pub use super::ids::MediaSourceId;
pub use super::media::Media;
pub use super::source_state::{
    FetchFailure, FetchFailureKind, MediaSourceState, MediaSourceStateKind,
};
