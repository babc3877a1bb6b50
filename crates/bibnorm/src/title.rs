//! Title capitalization
//!
//! Titles are brace-stripped, title-cased word by word, and re-wrapped in a
//! single pair of braces so BibTeX styles keep the chosen casing.

use tracing::debug;

use crate::entry::BibTeXEntry;

/// Words kept lowercase unless they start the title.
pub const STOP_WORDS: [&str; 13] = [
    "of", "and", "in", "on", "for", "with", "a", "an", "the", "at", "by", "from", "to",
];

/// Returns true if `word` is a stop word, ignoring case
pub fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Capitalize a title and wrap it in braces.
///
/// An empty title, or one with no words once braces are removed, is returned
/// unchanged.
///
/// ```
/// use bibnorm::capitalize_title;
///
/// assert_eq!(capitalize_title("a survey of {3d} mapping"), "{A Survey of 3D Mapping}");
/// assert_eq!(capitalize_title(""), "");
/// ```
pub fn capitalize_title(title: &str) -> String {
    let stripped: String = title.chars().filter(|c| *c != '{' && *c != '}').collect();

    let mut words = stripped.split_whitespace();
    let Some(first) = words.next() else {
        return title.to_string();
    };

    let mut capitalized = vec![upper_first(first)];
    capitalized.extend(words.map(capitalize_word));

    let joined = capitalized
        .join(" ")
        .replace("3d", "3D")
        .replace("2d", "2D");

    format!("{{{}}}", joined)
}

/// Rewrite the `title` field of every entry that has one.
///
/// Returns the number of titles visited.
pub fn capitalize_titles(entries: &mut [BibTeXEntry]) -> usize {
    let mut count = 0;
    for entry in entries.iter_mut() {
        let Some(title) = entry.title() else {
            continue;
        };
        let capitalized = capitalize_title(title);
        debug!(cite_key = %entry.cite_key, title = %capitalized, "capitalized title");
        entry.set_field("title", capitalized);
        count += 1;
    }
    count
}

/// Capitalize a non-initial word.
///
/// For hyphenated words only the part before the first hyphen is
/// capitalized, and stop words are not checked.
fn capitalize_word(word: &str) -> String {
    match word.split_once('-') {
        Some((head, tail)) => format!("{}-{}", capitalize(head), tail),
        None if is_stop_word(word) => word.to_lowercase(),
        None => capitalize(word),
    }
}

/// First character uppercase, the rest lowercase
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// First character uppercase, the rest untouched
fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
