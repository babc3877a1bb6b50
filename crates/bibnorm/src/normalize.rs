//! The load → capitalize → map → write pipeline

use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::formatter::format_bibliography;
use crate::parser::{parse, BibTeXParseResult};
use crate::title::capitalize_titles;
use crate::venue::{VenueMapper, DEFAULT_VENUE_FIELDS};

/// Counts reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub entries: usize,
    pub titles: usize,
    pub venues: usize,
}

/// Parse BibTeX text, failing on the first malformed entry
pub fn load_bibliography(input: &str) -> Result<BibTeXParseResult> {
    let mut bibliography = parse(input)?;
    if !bibliography.errors.is_empty() {
        let first = bibliography.errors.swap_remove(0);
        return Err(Error::Parse {
            line: first.line,
            message: first.message,
        });
    }
    Ok(bibliography)
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    mapper: VenueMapper,
    venue_fields: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(
            VenueMapper::new(),
            DEFAULT_VENUE_FIELDS.iter().map(|f| f.to_string()).collect(),
        )
    }
}

impl Normalizer {
    pub fn new(mapper: VenueMapper, venue_fields: Vec<String>) -> Self {
        Self {
            mapper,
            venue_fields,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.venue_mapper()?, config.venue_fields.clone()))
    }

    /// Capitalize all titles, then map all venues, in place
    pub fn normalize(&self, bibliography: &mut BibTeXParseResult) -> NormalizeStats {
        let titles = capitalize_titles(&mut bibliography.entries);
        let venues = self
            .mapper
            .map_venues(&mut bibliography.entries, &self.venue_fields);

        NormalizeStats {
            entries: bibliography.entries.len(),
            titles,
            venues,
        }
    }

    /// Normalize BibTeX text and return the formatted result
    pub fn normalize_str(&self, input: &str) -> Result<(String, NormalizeStats)> {
        let mut bibliography = load_bibliography(input)?;
        let stats = self.normalize(&mut bibliography);
        Ok((format_bibliography(&bibliography), stats))
    }

    /// Read `input`, normalize it and write `output`.
    ///
    /// Nothing is written unless reading and parsing succeed.
    pub fn normalize_file(&self, input: &Path, output: &Path) -> Result<NormalizeStats> {
        let content = std::fs::read_to_string(input).map_err(|source| Error::Read {
            path: input.to_path_buf(),
            source,
        })?;
        debug!(path = %input.display(), bytes = content.len(), "read bibliography");

        let (formatted, stats) = self.normalize_str(&content)?;

        std::fs::write(output, formatted).map_err(|source| Error::Write {
            path: output.to_path_buf(),
            source,
        })?;
        info!(
            input = %input.display(),
            output = %output.display(),
            entries = stats.entries,
            titles = stats.titles,
            venues = stats.venues,
            "normalized bibliography"
        );

        Ok(stats)
    }
}
