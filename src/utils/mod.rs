//! Utility modules supporting the roster browser.
//!
//! - [`rank`] / [`rank_with`]: deduplicate a researcher's publications by
//!   case-insensitive title and order them by that title
//! - [`find_title_collisions`]: report duplicate groups without removing anything
//! - [`UrlPreference`]: which linked duplicate survives
//! - [`Pagination`] / [`PageWindow`]: fixed-size page windows with a page tally
//! - [`truncate_to_width`]: width-aware truncation for terminal tables
//!
//! # Ranking and paging
//!
//! ```rust
//! use research_roster::models::PublicationBuilder;
//! use research_roster::utils::{rank, Pagination};
//!
//! let records = vec![
//!     PublicationBuilder::new("Beta Decay").build(),
//!     PublicationBuilder::new("alpha particles").url("https://example.org/a").build(),
//!     PublicationBuilder::new("BETA DECAY").url("https://example.org/b").build(),
//! ];
//!
//! let ranked = rank(records).unwrap();
//! assert_eq!(ranked.len(), 2);
//! assert_eq!(ranked[1].url.as_deref(), Some("https://example.org/b"));
//!
//! let pager = Pagination::new(1).unwrap();
//! let page = pager.window(&ranked, 2).unwrap();
//! assert_eq!(page.total_pages, 2);
//! assert_eq!(page.items[0].display_title(), "BETA DECAY");
//! ```

mod display;
mod paginate;
mod rank;

pub use display::{
    display_width, format_year, is_terminal, terminal_width, title_column_width,
    truncate_to_width, DEFAULT_WIDTH,
};
pub use paginate::{PageError, PageWindow, Pagination, DEFAULT_PAGE_SIZE};
pub use rank::{find_title_collisions, rank, rank_with, RankError, UrlPreference};
