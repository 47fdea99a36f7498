//! Search and detail queries over a [`RosterStore`].
//!
//! This is the layer the CLI talks to: it resolves researchers, ranks their
//! publications and works out page windows.

use serde::Serialize;

use crate::models::{EmploymentRecord, PublicationRecord, Researcher};
use crate::store::{RosterStore, StoreError};
use crate::utils::{rank_with, PageError, PageWindow, Pagination, RankError, UrlPreference};

/// Errors surfaced while browsing
#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Rank(#[from] RankError),

    #[error(transparent)]
    Page(#[from] PageError),
}

/// One page of researcher search results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub term: String,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub researchers: Vec<Researcher>,
}

impl SearchPage {
    /// View the page as a [`PageWindow`] for summaries
    pub fn window(&self) -> PageWindow<'_, Researcher> {
        PageWindow {
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
            items: &self.researchers,
        }
    }
}

/// A researcher with their ranked, deduplicated publications
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationList {
    pub researcher: Researcher,
    pub publications: Vec<PublicationRecord>,
}

/// A researcher with their employment history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmploymentHistory {
    pub researcher: Researcher,
    pub employment: Vec<EmploymentRecord>,
}

/// Query front-end over a store
#[derive(Debug)]
pub struct Browser<S> {
    store: S,
    pager: Pagination,
    preference: UrlPreference,
}

impl<S: RosterStore> Browser<S> {
    pub fn new(store: S, pager: Pagination, preference: UrlPreference) -> Self {
        Self {
            store,
            pager,
            preference,
        }
    }

    pub fn pager(&self) -> Pagination {
        self.pager
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch one page of researchers matching `term`.
    ///
    /// The page bounds are checked against the match count first, then only the
    /// visible rows are read from the store.
    pub fn search(&self, term: &str, page: usize) -> Result<SearchPage, BrowseError> {
        let total_items = self.store.count_researchers(term)?;
        let offset = self.pager.offset(page, total_items)?;
        let researchers =
            self.store
                .search_researchers(term, offset, self.pager.page_size())?;

        tracing::debug!(term, page, total_items, "Researcher search");
        Ok(SearchPage {
            term: term.to_string(),
            page,
            page_size: self.pager.page_size(),
            total_pages: self.pager.total_pages(total_items),
            total_items,
            researchers,
        })
    }

    /// Resolve a researcher and rank their publications
    pub fn publications(&self, key: &str) -> Result<PublicationList, BrowseError> {
        let researcher = self.store.require_researcher(key)?;
        let rows = self.store.fetch_publications(&researcher.orcid_id)?;
        let fetched = rows.len();
        let publications = rank_with(rows, self.preference)?;

        if publications.len() < fetched {
            tracing::info!(
                researcher = %researcher.orcid_id,
                fetched,
                kept = publications.len(),
                "Collapsed duplicate publication titles"
            );
        }

        Ok(PublicationList {
            researcher,
            publications,
        })
    }

    /// Resolve a researcher and fetch their employment history
    pub fn employment(&self, key: &str) -> Result<EmploymentHistory, BrowseError> {
        let researcher = self.store.require_researcher(key)?;
        let employment = self.store.fetch_employment(&researcher.orcid_id)?;
        Ok(EmploymentHistory {
            researcher,
            employment,
        })
    }

    /// Window a ranked publication list for a 1-indexed page
    pub fn publication_page<'a>(
        &self,
        list: &'a PublicationList,
        page: usize,
    ) -> Result<PageWindow<'a, PublicationRecord>, BrowseError> {
        Ok(self.pager.window(&list.publications, page)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicationBuilder;
    use crate::store::InMemoryStore;

    fn browser_with(publications: usize) -> Browser<InMemoryStore> {
        let mut store = InMemoryStore::new();
        store.add_researcher(Researcher::new("0000-0001", "Ada Byron"));
        store.add_researcher(Researcher::new("0000-0002", "Adam Smith"));
        for i in 0..publications {
            store.add_publication(
                PublicationBuilder::new(format!("Paper {:02}", i))
                    .orcid_id("0000-0001")
                    .build(),
            );
        }
        Browser::new(store, Pagination::new(10).unwrap(), UrlPreference::default())
    }

    #[test]
    fn test_search_page() {
        let browser = browser_with(0);
        let page = browser.search("ada", 1).unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.researchers[0].orcid_id, "0000-0001");
        assert_eq!(page.window().last_item_number(), 2);
    }

    #[test]
    fn test_search_without_matches_has_one_page() {
        let browser = browser_with(0);
        let page = browser.search("zzz", 1).unwrap();
        assert!(page.researchers.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(matches!(
            browser.search("zzz", 2),
            Err(BrowseError::Page(PageError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_publication_pages() {
        let browser = browser_with(25);
        let list = browser.publications("Ada Byron").unwrap();
        assert_eq!(list.publications.len(), 25);

        let last = browser.publication_page(&list, 3).unwrap();
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0].display_title(), "Paper 20");
        assert!(browser.publication_page(&list, 4).is_err());
    }

    #[test]
    fn test_publications_for_unknown_researcher() {
        let browser = browser_with(0);
        assert!(matches!(
            browser.publications("Nobody"),
            Err(BrowseError::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn test_publications_with_untitled_row() {
        let mut store = InMemoryStore::new();
        store.add_researcher(Researcher::new("0000-0001", "Ada Byron"));
        store.add_publication(PublicationBuilder::untitled().orcid_id("0000-0001").build());
        let browser = Browser::new(store, Pagination::default(), UrlPreference::default());

        assert!(matches!(
            browser.publications("0000-0001"),
            Err(BrowseError::Rank(RankError::InvalidRecord { position: 0 }))
        ));
    }

    #[test]
    fn test_employment() {
        let browser = browser_with(0);
        let history = browser.employment("0000-0002").unwrap();
        assert_eq!(history.researcher.display_name(), "Adam Smith");
        assert!(history.employment.is_empty());
    }
}
