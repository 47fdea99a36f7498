//! Vector-backed store for tests and JSON datasets.

use super::{contains_ignore_ascii_case, Dataset, RosterStore, StoreResult};
use crate::models::{sort_employment, EmploymentRecord, PublicationRecord, Researcher};

/// A store holding the whole roster in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    dataset: Dataset,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over an existing dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn add_researcher(&mut self, researcher: Researcher) {
        self.dataset.researchers.push(researcher);
    }

    pub fn add_employment(&mut self, record: EmploymentRecord) {
        self.dataset.employment.push(record);
    }

    pub fn add_publication(&mut self, record: PublicationRecord) {
        self.dataset.publications.push(record);
    }

    fn matches(&self, researcher: &Researcher, term: &str) -> bool {
        let Some(name) = researcher.full_name.as_deref() else {
            return false;
        };

        contains_ignore_ascii_case(name, term)
            || self.dataset.employment.iter().any(|e| {
                e.orcid_id == researcher.orcid_id
                    && e
                        .department
                        .as_deref()
                        .is_some_and(|d| contains_ignore_ascii_case(d, term))
            })
    }

    fn matching(&self, term: &str) -> Vec<&Researcher> {
        let mut found: Vec<&Researcher> = self
            .dataset
            .researchers
            .iter()
            .filter(|r| self.matches(r, term))
            .collect();

        found.sort_by_key(|r| {
            (
                r.full_name.as_deref().unwrap_or_default().to_ascii_lowercase(),
                r.orcid_id.clone(),
            )
        });
        found
    }
}

impl RosterStore for InMemoryStore {
    fn search_researchers(
        &self,
        term: &str,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Researcher>> {
        Ok(self
            .matching(term)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_researchers(&self, term: &str) -> StoreResult<usize> {
        Ok(self.matching(term).len())
    }

    fn find_researcher(&self, key: &str) -> StoreResult<Option<Researcher>> {
        let researchers = &self.dataset.researchers;
        Ok(researchers
            .iter()
            .find(|r| r.orcid_id == key)
            .or_else(|| researchers.iter().find(|r| r.full_name.as_deref() == Some(key)))
            .cloned())
    }

    fn fetch_publications(&self, orcid_id: &str) -> StoreResult<Vec<PublicationRecord>> {
        Ok(self
            .dataset
            .publications
            .iter()
            .filter(|p| p.orcid_id.as_deref() == Some(orcid_id))
            .cloned()
            .collect())
    }

    fn fetch_employment(&self, orcid_id: &str) -> StoreResult<Vec<EmploymentRecord>> {
        let mut records: Vec<EmploymentRecord> = self
            .dataset
            .employment
            .iter()
            .filter(|e| e.orcid_id == orcid_id)
            .cloned()
            .collect();
        sort_employment(&mut records);
        Ok(records)
    }
}
