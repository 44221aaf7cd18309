//! # Document Numbering
//!
//! Formatting and parsing of sequential document numbers.
//!
//! ## Format
//! ```text
//!   FACT-001   FACT-002   ...   FACT-999   FACT-1000   FACT-1001
//!   └┬─┘ └┬┘
//!  prefix  counter, zero-padded to 3 digits, no upper bound
//! ```
//!
//! The store keeps one counter per prefix and increments it inside the
//! transaction that inserts the owning sale or quote. These functions are
//! the pure half of that: they seed the counter from the last issued
//! number and render the next one.

/// Minimum width of the numeric part.
pub const NUMBER_WIDTH: usize = 3;

/// Renders `{prefix}-{n:03}`.
///
/// ## Example
/// ```rust
/// use tendero_core::sequence::format_document_number;
///
/// assert_eq!(format_document_number("FACT", 7), "FACT-007");
/// assert_eq!(format_document_number("FACT", 1000), "FACT-1000");
/// ```
pub fn format_document_number(prefix: &str, n: u64) -> String {
    format!("{}-{:0width$}", prefix, n, width = NUMBER_WIDTH)
}

/// Parses the trailing run of digits after the last `-`.
///
/// Anything that doesn't match (no dash, no digits, overflow) counts as 0
/// so numbering restarts at 1 instead of failing.
///
/// ## Example
/// ```rust
/// use tendero_core::sequence::parse_document_number;
///
/// assert_eq!(parse_document_number("FACT-042"), 42);
/// assert_eq!(parse_document_number("manual"), 0);
/// ```
pub fn parse_document_number(number: &str) -> u64 {
    let Some((_, tail)) = number.rsplit_once('-') else {
        return 0;
    };

    if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
        return 0;
    }

    tail.parse().unwrap_or(0)
}
