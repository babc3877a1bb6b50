//! BibTeX bibliography normalization
//!
//! Reads a BibTeX file, title-cases every `title`, rewrites conference and
//! journal names to canonical venue strings, and writes the entries back in
//! their original order.
//!
//! Features:
//! - Nom-based parser that keeps entry order, field order and key casing
//! - Title capitalization with stop words and 2D/3D handling
//! - Ordered keyword table for venue names, first match wins
//! - Optional TOML config for paths, match mode and extra venue rules

mod config;
mod entry;
mod error;
mod formatter;
mod normalize;
pub mod parser;
mod title;
mod venue;

pub use config::{Config, CONFIG_FILE_NAME, DEFAULT_INPUT, DEFAULT_OUTPUT};
pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use error::{Error, Result};
pub use formatter::{format_bibliography, format_comment, format_complete, format_entry};
pub use normalize::{load_bibliography, NormalizeStats, Normalizer};
pub use parser::{parse, parse_entry, BibTeXParseError, BibTeXParseResult, ParseError};
pub use title::{capitalize_title, capitalize_titles, is_stop_word, STOP_WORDS};
pub use venue::{builtin_rules, MatchMode, VenueMapper, VenueRule, DEFAULT_VENUE_FIELDS};
