//! Trait surfaces the fetch subsystem implements for mediasel consumers.

pub mod source_result;

/// Frequently used items for presentation crates.
pub mod prelude {
    pub use super::source_result::MediaSourceResult;
    pub use mediasel_model::prelude::*;
}
