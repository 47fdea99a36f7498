//! Styled status lines and section headers for the terminal.
//!
//! Status messages go to stderr so that JSON on stdout stays machine-readable.

use owo_colors::OwoColorize;

use crate::models::Researcher;
use crate::utils::PageWindow;

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg.yellow()),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
        Status::Search => eprintln!("{} {}", icon.yellow(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print the name, ORCID iD and email of a researcher.
pub fn print_researcher_header(researcher: &Researcher) {
    println!();
    println!("{}", researcher.display_name().bold());
    println!("  ORCID: {}", researcher.orcid_id.cyan());
    if let Some(email) = &researcher.email {
        println!("  Email: {}", email);
    }
}

/// One-line summary of where a page sits in the full list.
///
/// `noun` is the plural name of the listed items.
pub fn page_summary<T>(window: &PageWindow<'_, T>, noun: &str) -> String {
    if window.total_items == 0 {
        return format!("Page 1 of 1 (no {})", noun);
    }
    format!(
        "Page {} of {} ({}-{} of {} {})",
        window.page,
        window.total_pages,
        window.first_item_number(),
        window.last_item_number(),
        window.total_items,
        noun
    )
}

/// Print the page summary dimmed, with a hint for the next page.
pub fn print_page_footer<T>(window: &PageWindow<'_, T>, noun: &str) {
    let mut line = page_summary(window, noun);
    if window.has_next() {
        line.push_str(&format!(" - next: --page {}", window.page + 1));
    }
    eprintln!("{}", line.dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Pagination;

    #[test]
    fn test_status_icons() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Warning), "⚠");
    }

    #[test]
    fn test_page_summary() {
        let items: Vec<u32> = (1..=25).collect();
        let pager = Pagination::new(10).unwrap();

        let window = pager.window(&items, 2).unwrap();
        assert_eq!(
            page_summary(&window, "publications"),
            "Page 2 of 3 (11-20 of 25 publications)"
        );

        let last = pager.window(&items, 3).unwrap();
        assert_eq!(
            page_summary(&last, "publications"),
            "Page 3 of 3 (21-25 of 25 publications)"
        );
    }

    #[test]
    fn test_page_summary_empty() {
        let items: Vec<u32> = vec![];
        let window = Pagination::default().window(&items, 1).unwrap();
        assert_eq!(page_summary(&window, "researchers"), "Page 1 of 1 (no researchers)");
    }
}
