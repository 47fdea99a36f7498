//! Width-aware text helpers for table and plain output.

use std::io::{self, IsTerminal};
use unicode_width::UnicodeWidthChar;

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

const ELLIPSIS: &str = "...";

/// Current terminal width in columns.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Display width of `text`, counting wide characters as two columns.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(1)).sum()
}

/// Shorten `text` to at most `max_width` columns, ending in `...` when cut.
///
/// ```
/// use research_roster::utils::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Coastal Erosion Models", 10), "Coastal...");
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// ```
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return ELLIPSIS[..max_width].to_string();
    }

    let budget = max_width - ELLIPSIS.len();
    let mut used = 0;
    let mut kept = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(1);
        if used + w > budget {
            break;
        }
        used += w;
        kept.push(c);
    }

    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

/// Width for the title column of the publication table.
///
/// The remaining columns (number, year, link) take roughly 50 columns including
/// borders; the title gets what is left, but never less than 20.
pub fn title_column_width(terminal_width: usize) -> usize {
    terminal_width.saturating_sub(50).max(20)
}

/// Format an optional year, blank when missing
pub fn format_year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate_to_width("Hello", 5), "Hello");
        assert_eq!(truncate_to_width("", 5), "");
    }

    #[test]
    fn test_truncate_cuts_with_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Hello World", 9), "Hello...");
    }

    #[test]
    fn test_truncate_tiny_width() {
        assert_eq!(truncate_to_width("Hello World", 0), "");
        assert_eq!(truncate_to_width("Hello World", 2), "..");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // each CJK character is two columns wide
        assert_eq!(display_width("海洋学"), 6);
        assert_eq!(truncate_to_width("海洋学研究", 7), "海洋...");
    }

    #[test]
    fn test_title_column_width() {
        assert_eq!(title_column_width(120), 70);
        assert_eq!(title_column_width(40), 20);
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(Some(2020)), "2020");
        assert_eq!(format_year(None), "");
    }
}
