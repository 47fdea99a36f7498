//! Core data models for researchers, employment and publications.

mod publication;
mod researcher;

pub use publication::{normalize_title, PublicationBuilder, PublicationRecord};
pub use researcher::{sort_employment, EmploymentRecord, Researcher};
