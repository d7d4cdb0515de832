//! # mediasel-core
//!
//! Presentation layer between per-source media fetch tasks and a source
//! picker UI.
//!
//! ## Overview
//!
//! - [`presentation::MediaSourceResultPresentation`]: wraps one
//!   [`MediaSourceResult`](mediasel_contracts::source_result::MediaSourceResult)
//!   and exposes its state, derived flags and result count as synchronous
//!   reads.
//! - [`aggregate::MediaSelectorSourceResults`]: the fixed set of wrappers for
//!   one search with a display-sorted view and summary counters.
//! - [`session::MediaSelectorSession`]: swaps aggregates as the set of
//!   sources changes and cancels the previous generation.
//! - [`scope::TaskScope`] and [`notify`]: the subscription lifetime and
//!   invalidation plumbing underneath.
//!
//! ## Feature Flags
//!
//! - `test-utils`: exports [`testing`], hand-driven fake sources.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mediasel_contracts::source_result::MediaSourceResult;
//! use mediasel_core::{MediaSelectorSession, PresentationOptions, TaskScope};
//!
//! async fn show(sources: Vec<Arc<dyn MediaSourceResult>>) -> Result<(), Box<dyn std::error::Error>> {
//!     let scope = TaskScope::current()?;
//!     let session = MediaSelectorSession::new(&scope, PresentationOptions::default());
//!     let results = session.replace(sources);
//!
//!     let mut updates = results.subscribe();
//!     while updates.changed().await.is_ok() {
//!         for entry in results.list_sorted().iter() {
//!             println!("{} {}", entry.media_source_id(), entry.total_count());
//!         }
//!         if !results.any_loading() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Multi-source aggregate and its display ordering
pub mod aggregate;

/// Error types
pub mod error;

/// Version counters and memoised derived values
pub mod notify;

/// Per-source presentation wrapper
pub mod presentation;

/// Cancellation scopes for stream subscriptions
pub mod scope;

/// Aggregate lifecycle across searches
pub mod session;

/// Fake sources for tests
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod testing;

pub use aggregate::{
    MediaSelectorSourceResults, SourceEntrySnapshot, SourceResultsSnapshot,
};
pub use error::ScopeError;
pub use presentation::{MediaSourceResultPresentation, PresentationOptions};
pub use scope::TaskScope;
pub use session::MediaSelectorSession;
