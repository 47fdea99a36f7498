//! # Research Roster
//!
//! Browse a dataset of researchers, their employment history and their
//! publications, with publication lists deduplicated by title and paged.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PublicationRecord, Researcher, EmploymentRecord)
//! - [`store`]: Data access behind the [`RosterStore`] trait (SQLite and in-memory)
//! - [`browser`]: Search and detail queries combining a store, ranking and paging
//! - [`utils`]: Publication ranking, pagination and display helpers
//! - [`config`]: Configuration management
//! - [`ui`]: Styled terminal output

pub mod browser;
pub mod config;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use browser::{BrowseError, Browser};
pub use models::{PublicationRecord, Researcher};
pub use store::{InMemoryStore, RosterStore, SqliteStore};
pub use utils::{rank, Pagination};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
