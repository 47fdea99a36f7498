//! Publication model representing one bibliographic entry attributed to a researcher.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A publication row as delivered by the data store
///
/// Records are read-only inputs: ranking selects and reorders them but never
/// rewrites a field. Columns the model does not know about are kept in
/// [`extra`](Self::extra) and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PublicationRecord {
    /// Publication title. Always present in well-formed data; `None` marks a
    /// record the ranker refuses.
    #[serde(default)]
    pub title: Option<String>,

    /// Link to the work itself
    #[serde(default)]
    pub url: Option<String>,

    /// Resolver link for the DOI
    #[serde(default)]
    pub doi_url: Option<String>,

    /// Publication year
    #[serde(default)]
    pub year: Option<i32>,

    /// ORCID iD of the researcher the record is attributed to
    #[serde(default)]
    pub orcid_id: Option<String>,

    /// Opaque fields carried through unchanged
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl PublicationRecord {
    /// Create a record with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Lower-cased title used for duplicate detection and ordering.
    ///
    /// Returns `None` when the record has no title.
    pub fn normalized_title(&self) -> Option<String> {
        self.title.as_deref().map(normalize_title)
    }

    /// Title for display, or an empty string when the title is missing
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Check whether the record links to the work
    pub fn has_url(&self) -> bool {
        self.url.is_some()
    }
}

/// Fold a title to the key used for comparison.
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

/// Builder for constructing PublicationRecord objects
#[derive(Debug, Clone, Default)]
pub struct PublicationBuilder {
    record: PublicationRecord,
}

impl PublicationBuilder {
    /// Create a new builder with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            record: PublicationRecord::new(title),
        }
    }

    /// Create a builder for a record with no title
    pub fn untitled() -> Self {
        Self::default()
    }

    /// Set the work URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.record.url = Some(url.into());
        self
    }

    /// Set the DOI URL
    pub fn doi_url(mut self, doi_url: impl Into<String>) -> Self {
        self.record.doi_url = Some(doi_url.into());
        self
    }

    /// Set publication year
    pub fn year(mut self, year: i32) -> Self {
        self.record.year = Some(year);
        self
    }

    /// Set the researcher the record belongs to
    pub fn orcid_id(mut self, orcid_id: impl Into<String>) -> Self {
        self.record.orcid_id = Some(orcid_id.into());
        self
    }

    /// Add an opaque field
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.record.extra.insert(key.into(), value);
        self
    }

    /// Build the PublicationRecord
    pub fn build(self) -> PublicationRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_builder() {
        let record = PublicationBuilder::new("Deep Sea Vents")
            .url("https://example.org/work/1")
            .doi_url("https://doi.org/10.1234/vents")
            .year(2019)
            .orcid_id("0000-0002-1825-0097")
            .build();

        assert_eq!(record.title.as_deref(), Some("Deep Sea Vents"));
        assert_eq!(record.url.as_deref(), Some("https://example.org/work/1"));
        assert_eq!(record.year, Some(2019));
        assert!(record.has_url());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_normalized_title() {
        let record = PublicationRecord::new("Über GRAPHS");
        assert_eq!(record.normalized_title().as_deref(), Some("über graphs"));
        assert_eq!(record.display_title(), "Über GRAPHS");

        let untitled = PublicationBuilder::untitled().build();
        assert_eq!(untitled.normalized_title(), None);
        assert_eq!(untitled.display_title(), "");
    }

    #[test]
    fn test_extra_fields_survive_json() {
        let json = r#"{
            "title": "Tidal Models",
            "url": null,
            "journal": "Ocean Letters",
            "citations": 12
        }"#;

        let record: PublicationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("Tidal Models"));
        assert_eq!(record.url, None);
        assert_eq!(record.extra["journal"], serde_json::json!("Ocean Letters"));
        assert_eq!(record.extra["citations"], serde_json::json!(12));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["journal"], serde_json::json!("Ocean Letters"));
    }

    #[test]
    fn test_missing_title_deserializes_as_none() {
        let record: PublicationRecord = serde_json::from_str(r#"{"url": "u"}"#).unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.url.as_deref(), Some("u"));
    }
}
