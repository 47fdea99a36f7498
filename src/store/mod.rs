//! Read access to the researcher dataset.
//!
//! The [`RosterStore`] trait is the seam between the browser and whatever holds
//! the rows. Two backends are provided:
//!
//! - [`SqliteStore`]: the relational database the roster normally lives in
//! - [`InMemoryStore`]: a vector-backed store with the same query semantics,
//!   used in tests and for browsing a JSON dataset without a database
//!
//! # Matching rules
//!
//! Researcher search is a case-insensitive substring match (ASCII case folding)
//! on the full name or on any department in the researcher's employment
//! history. Researchers without a name never match. Results are ordered by name
//! and paged with an offset and limit applied by the backend.

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{EmploymentRecord, PublicationRecord, Researcher};

/// Errors that can occur in a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be opened
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// A query failed to execute
    #[error("Query execution failed: {0}")]
    Query(String),

    /// A dataset file could not be read or written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A row that cannot be stored
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// No researcher matches the given name or ORCID iD
    #[error("Researcher not found: {0}")]
    NotFound(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Queries the browser needs from a data source
pub trait RosterStore: Send {
    /// Researchers whose name or department contains `term`, ordered by name
    fn search_researchers(
        &self,
        term: &str,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Researcher>>;

    /// Number of researchers [`search_researchers`](Self::search_researchers) can return for `term`
    fn count_researchers(&self, term: &str) -> StoreResult<usize>;

    /// Look up a researcher by ORCID iD or exact full name; the ORCID iD wins
    fn find_researcher(&self, key: &str) -> StoreResult<Option<Researcher>>;

    /// All publication rows attributed to a researcher, duplicates included
    fn fetch_publications(&self, orcid_id: &str) -> StoreResult<Vec<PublicationRecord>>;

    /// Employment history, newest position first
    fn fetch_employment(&self, orcid_id: &str) -> StoreResult<Vec<EmploymentRecord>>;

    /// Like [`find_researcher`](Self::find_researcher), but a miss is an error
    fn require_researcher(&self, key: &str) -> StoreResult<Researcher> {
        self.find_researcher(key)?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

/// A complete roster, as exchanged in JSON files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub researchers: Vec<Researcher>,

    #[serde(default)]
    pub employment: Vec<EmploymentRecord>,

    #[serde(default)]
    pub publications: Vec<PublicationRecord>,
}

impl Dataset {
    /// Load a dataset from a JSON file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Case-insensitive substring test using ASCII folding, matching SQLite `LIKE`.
pub(crate) fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
