//! Core data model definitions shared across mediasel crates.
#![allow(missing_docs)]

#[cfg(feature = "chrono")]
pub use ::chrono;

pub mod error;
pub mod ids;
pub mod media;
pub mod prelude;
pub mod source_state;

pub use error::{ModelError, Result as ModelResult};
pub use ids::MediaSourceId;
pub use media::Media;
pub use source_state::{
    FetchFailure, FetchFailureKind, MediaSourceState, MediaSourceStateKind,
};
