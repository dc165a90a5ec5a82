//! Text clean-up for extracted PDF pages
//!
//! Text pulled out of FIA timing sheets has a few recurring problems:
//! - Control characters from embedded fonts
//! - Non-breaking and other Unicode spaces between columns
//! - Runs of spaces that vary with column widths
//!
//! This module normalizes page text line by line without interpreting it.

/// Clean one page of extracted text.
///
/// Control characters other than `\n` and `\t` are dropped, Unicode spaces become
/// ASCII spaces, and each line has its whitespace collapsed and trimmed. Empty
/// lines are removed.
pub fn normalize_page_text(page: &str) -> String {
    let mut result = String::with_capacity(page.len());

    for line in page.lines() {
        let cleaned: String = line
            .chars()
            .filter_map(|ch| match ch {
                '\t' => Some(' '),
                '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{3000}' => Some(' '),
                c if c.is_control() => None,
                c => Some(c),
            })
            .collect();

        let mut words = cleaned.split_whitespace();
        let Some(first) = words.next() else {
            continue;
        };
        result.push_str(first);
        for word in words {
            result.push(' ');
            result.push_str(word);
        }
        result.push('\n');
    }

    result
}

/// Split extracted document text into pages.
///
/// The PDF backend separates pages with form feeds. Text without any form feed
/// is treated as a single page.
pub fn split_pages(text: &str) -> Vec<String> {
    text.split('\x0C')
        .map(normalize_page_text)
        .filter(|page| !page.is_empty())
        .collect()
}
