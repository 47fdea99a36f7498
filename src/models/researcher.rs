//! Researcher and employment models.

use serde::{Deserialize, Serialize};

/// A person identified by an ORCID iD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Researcher {
    /// Persistent unique identifier
    pub orcid_id: String,

    /// Full display name
    #[serde(default)]
    pub full_name: Option<String>,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
}

impl Researcher {
    /// Create a researcher with a name and no email
    pub fn new(orcid_id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            orcid_id: orcid_id.into(),
            full_name: Some(full_name.into()),
            email: None,
        }
    }

    /// Set the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name for display, falling back to the ORCID iD
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.orcid_id)
    }
}

/// One position in a researcher's employment history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    pub orcid_id: String,

    #[serde(default)]
    pub organization: Option<String>,

    #[serde(default)]
    pub department: Option<String>,

    #[serde(default)]
    pub role_title: Option<String>,

    #[serde(default)]
    pub start_year: Option<i32>,

    /// `None` for a current position
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl EmploymentRecord {
    /// Check whether the position is still held
    pub fn is_current(&self) -> bool {
        self.end_year.is_none()
    }

    /// Year span such as `2015-2019` or `2020-present`
    pub fn period(&self) -> String {
        match (self.start_year, self.end_year) {
            (Some(start), Some(end)) => format!("{}-{}", start, end),
            (Some(start), None) => format!("{}-present", start),
            (None, Some(end)) => format!("?-{}", end),
            (None, None) => String::new(),
        }
    }
}

/// Order employment rows newest first, undated rows last.
pub fn sort_employment(records: &mut [EmploymentRecord]) {
    records.sort_by(|a, b| match (a.start_year, b.start_year) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(start: Option<i32>, end: Option<i32>) -> EmploymentRecord {
        EmploymentRecord {
            orcid_id: "0000-0001".to_string(),
            organization: Some("Harbour University".to_string()),
            department: Some("Marine Biology".to_string()),
            role_title: None,
            start_year: start,
            end_year: end,
        }
    }

    #[test]
    fn test_period() {
        assert_eq!(job(Some(2015), Some(2019)).period(), "2015-2019");
        assert_eq!(job(Some(2020), None).period(), "2020-present");
        assert_eq!(job(None, Some(2001)).period(), "?-2001");
        assert_eq!(job(None, None).period(), "");
        assert!(job(Some(2020), None).is_current());
    }

    #[test]
    fn test_sort_employment_newest_first() {
        let mut jobs = vec![job(None, None), job(Some(2010), Some(2014)), job(Some(2018), None)];
        sort_employment(&mut jobs);
        let starts: Vec<_> = jobs.iter().map(|j| j.start_year).collect();
        assert_eq!(starts, vec![Some(2018), Some(2010), None]);
    }

    #[test]
    fn test_display_name_fallback() {
        let named = Researcher::new("0000-0001", "Ada Byron").with_email("ada@example.org");
        assert_eq!(named.display_name(), "Ada Byron");

        let anonymous = Researcher {
            orcid_id: "0000-0002".to_string(),
            full_name: None,
            email: None,
        };
        assert_eq!(anonymous.display_name(), "0000-0002");
    }
}
