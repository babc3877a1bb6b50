//! BibTeX formatting module
//!
//! Converts parsed entries back to BibTeX text. Entries and their fields are
//! written in the order they are stored; no sorting is applied.

use super::entry::BibTeXEntry;
use super::parser::BibTeXParseResult;

/// Format a single BibTeX entry to string
pub fn format_entry(entry: &BibTeXEntry) -> String {
    let mut result = String::new();

    result.push('@');
    result.push_str(entry.entry_type.as_str());
    result.push('{');
    result.push_str(&entry.cite_key);
    result.push(',');
    result.push('\n');

    for field in &entry.fields {
        result.push_str("    ");
        result.push_str(&field.key);
        result.push_str(" = ");
        result.push_str(&format_field_value(&field.value));
        result.push(',');
        result.push('\n');
    }

    result.push('}');
    result
}

/// Format a field value, choosing appropriate delimiters
fn format_field_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    // Braces keep LaTeX commands and case-protection markup intact
    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}

/// Format a @string definition
pub fn format_string_definition(key: &str, value: &str) -> String {
    format!("@string{{{} = {{{}}}}}", key, value)
}

/// Format a @preamble
pub fn format_preamble(text: &str) -> String {
    format!("@preamble{{{{{}}}}}", text)
}

/// Format a @comment block
pub fn format_comment(text: &str) -> String {
    format!("@comment{{{}}}", text)
}

/// Format a complete BibTeX file with comments, strings, preambles, and entries
pub fn format_complete(
    comments: &[String],
    strings: &[(String, String)],
    preambles: &[String],
    entries: &[BibTeXEntry],
) -> String {
    let mut result = String::new();

    for comment in comments {
        result.push_str(&format_comment(comment));
        result.push_str("\n\n");
    }

    for preamble in preambles {
        result.push_str(&format_preamble(preamble));
        result.push_str("\n\n");
    }

    for (key, value) in strings {
        result.push_str(&format_string_definition(key, value));
        result.push_str("\n\n");
    }

    for entry in entries {
        result.push_str(&format_entry(entry));
        result.push_str("\n\n");
    }

    let mut result = result.trim_end().to_string();
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

/// Format everything a parse produced, in file order
pub fn format_bibliography(bibliography: &BibTeXParseResult) -> String {
    format_complete(
        &bibliography.comments,
        &bibliography.strings,
        &bibliography.preambles,
        &bibliography.entries,
    )
}
