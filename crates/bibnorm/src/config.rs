//! Run configuration
//!
//! Every key is optional; a missing file means the defaults, which reproduce
//! the fixed paths and rules of a plain `format-bib` run.
//!
//! ```toml
//! input = "body/ref.bib.bk"
//! output = "body/ref.bib"
//! match_mode = "substring"          # or "whole-word"
//! venue_fields = ["booktitle", "journal"]
//!
//! [[venue_rules]]
//! keywords = ["l4dc", "learning for dynamics and control"]
//! canonical = "In the Proceedings of Learning for Dynamics and Control Conference"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::venue::{MatchMode, VenueMapper, VenueRule, DEFAULT_VENUE_FIELDS};

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "format-bib.toml";

pub const DEFAULT_INPUT: &str = "body/ref.bib.bk";
pub const DEFAULT_OUTPUT: &str = "body/ref.bib";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// BibTeX file to read
    pub input: PathBuf,
    /// BibTeX file to write
    pub output: PathBuf,
    pub match_mode: MatchMode,
    /// Fields rewritten by the venue mapper
    pub venue_fields: Vec<String>,
    /// Rules tried after the builtin table
    pub venue_rules: Vec<VenueRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            match_mode: MatchMode::default(),
            venue_fields: DEFAULT_VENUE_FIELDS.iter().map(|f| f.to_string()).collect(),
            venue_rules: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text. `path` is only used in error messages.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.normalized(path)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::from_toml_str(&content, path)
    }

    /// Load from standard locations.
    ///
    /// Tries `{project_root}/format-bib.toml`, then
    /// `~/.format-bib/config.toml`, and falls back to the defaults.
    pub fn load_standard(project_root: &Path) -> Result<Self> {
        Self::load_with_home(project_root, dirs::home_dir().as_deref())
    }

    fn load_with_home(project_root: &Path, home: Option<&Path>) -> Result<Self> {
        let project_file = project_root.join(CONFIG_FILE_NAME);
        if project_file.is_file() {
            return Self::load(&project_file);
        }

        match home {
            Some(home) => {
                let user_file = home.join(".format-bib").join("config.toml");
                if user_file.is_file() {
                    return Self::load(&user_file);
                }
            }
            None => warn!("home directory not found, skipping user config"),
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Build the venue mapper this config describes
    pub fn venue_mapper(&self) -> Result<VenueMapper> {
        VenueMapper::with_rules(self.venue_rules.clone(), self.match_mode)
    }

    fn normalized(mut self, path: &Path) -> Result<Self> {
        let invalid = |message: String| Error::Config {
            path: path.to_path_buf(),
            message,
        };

        for rule in &self.venue_rules {
            if rule.canonical.trim().is_empty() {
                return Err(invalid("venue rule with empty canonical name".to_string()));
            }
            if rule.keywords.is_empty() {
                return Err(invalid(format!(
                    "venue rule {:?} has no keywords",
                    rule.canonical
                )));
            }
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(invalid(format!(
                    "venue rule {:?} has an empty keyword",
                    rule.canonical
                )));
            }
        }

        self.venue_rules = self
            .venue_rules
            .into_iter()
            .map(|rule| VenueRule::new(&rule.keywords, rule.canonical))
            .collect();
        Ok(self)
    }
}
