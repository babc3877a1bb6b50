//! Venue name normalization
//!
//! Rewrites `booktitle`/`journal` values to a canonical venue name using an
//! ordered table of keyword rules. The first rule with a keyword contained in
//! the (lowercased, brace-stripped) field value wins.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::entry::BibTeXEntry;
use crate::error::{Error, Result};

/// Fields the mapper rewrites by default
pub const DEFAULT_VENUE_FIELDS: [&str; 2] = ["booktitle", "journal"];

const WORKSHOP_MARKER: &str = "workshop";
const WORKSHOP_SUFFIX: &str = " Workshops";

/// A keyword set mapped to one canonical venue name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VenueRule {
    pub keywords: Vec<String>,
    pub canonical: String,
}

impl VenueRule {
    /// Create a rule; keywords are stored lowercase
    pub fn new<K: AsRef<str>>(keywords: &[K], canonical: impl Into<String>) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.as_ref().to_lowercase()).collect(),
            canonical: canonical.into(),
        }
    }
}

/// How keywords are matched against a venue value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Keyword may occur anywhere, including inside longer words
    #[default]
    Substring,
    /// Keyword must start and end on a word boundary
    WholeWord,
}

lazy_static! {
    /// Builtin rules, in match priority order.
    static ref BUILTIN_RULES: Vec<VenueRule> = vec![
        VenueRule::new(
            &["icra", "international conference on robotics and automation"],
            "In the Proceedings of IEEE International Conference on Robotics and Automation",
        ),
        VenueRule::new(
            &["iros", "intelligent robots and systems"],
            "In the Proceedings of IEEE/RSJ International Conference on Intelligent Robots and Systems",
        ),
        VenueRule::new(
            &["iccv", "international conference on computer vision"],
            "In the Proceedings of IEEE/CVF International Conference on Computer Vision",
        ),
        VenueRule::new(
            &["cvpr", "computer vision and pattern recognition"],
            "In the Proceedings of IEEE/CVF Conference on Computer Vision and Pattern Recognition",
        ),
        VenueRule::new(
            &["eccv", "european conference on computer vision"],
            "In the Proceedings of European Conference on Computer Vision",
        ),
        VenueRule::new(
            &["icml", "international conference on machine learning"],
            "In the Proceedings of International Conference on Machine Learning",
        ),
        VenueRule::new(
            &["nips", "neural information processing systems"],
            "In the Proceedings of Advances in Neural Information Processing Systems",
        ),
        VenueRule::new(
            &["aaai", "association for the advancement of artificial intelligence"],
            "In the Proceedings of AAAI Conference on Artificial Intelligence",
        ),
        VenueRule::new(
            &["ijcai", "international joint conference on artificial intelligence"],
            "In the Proceedings of International Joint Conference on Artificial Intelligence",
        ),
        VenueRule::new(
            &["iclr", "international conference on learning representations"],
            "In the Proceedings of International Conference on Learning Representations",
        ),
        VenueRule::new(
            &["rss", "robotics: science and systems"],
            "In the Proceedings of Robotics: Science and Systems",
        ),
        VenueRule::new(
            &["pami", "ieee transactions on pattern analysis and machine intelligence"],
            "IEEE Transactions on Pattern Analysis and Machine Intelligence",
        ),
        VenueRule::new(
            &["ijcv", "international journal of computer vision"],
            "International Journal of Computer Vision",
        ),
        VenueRule::new(
            &["mm", "acm multimedia"],
            "In the Proceedings of ACM International Conference on Multimedia",
        ),
        VenueRule::new(
            &["ral", "ieee robotics and automation letters"],
            "IEEE Robotics and Automation Letters",
        ),
        VenueRule::new(
            &["corl", "conference on robot learning"],
            "In the Proceedings of Conference on Robot Learning",
        ),
        VenueRule::new(
            &["siggraph", "special interest group on computer graphics and interactive techniques"],
            "In the Proceedings of ACM SIGGRAPH Conference on Computer Graphics and Interactive Techniques",
        ),
        // Shadowed by the rule above: every value containing these keywords
        // also contains a SIGGRAPH keyword.
        VenueRule::new(
            &[
                "siggraph asia",
                "special interest group on computer graphics and interactive techniques asia",
            ],
            "In the Proceedings of ACM SIGGRAPH Asia Conference on Computer Graphics and Interactive Techniques",
        ),
        VenueRule::new(&["tog", "acm transactions on graphics"], "ACM Transactions on Graphics"),
        VenueRule::new(
            &["tvcg", "ieee transactions on visualization and computer graphics"],
            "IEEE Transactions on Visualization and Computer Graphics",
        ),
        VenueRule::new(
            &["tip", "ieee transactions on image processing"],
            "IEEE Transactions on Image Processing",
        ),
        VenueRule::new(
            &["miccai", "medical image computing and computer assisted intervention"],
            "In the Proceedings of International Conference on Medical Image Computing and Computer Assisted Intervention",
        ),
        VenueRule::new(
            &["ismar", "international symposium on mixed and augmented reality"],
            "In the Proceedings of IEEE International Symposium on Mixed and Augmented Reality",
        ),
        VenueRule::new(
            &["vr", "virtual reality"],
            "In the Proceedings of IEEE Conference on Virtual Reality and 3D User Interfaces",
        ),
        VenueRule::new(
            &["3dv", "international conference on 3d vision"],
            "In the Proceedings of International Conference on 3D Vision",
        ),
        VenueRule::new(
            &["wacv", "winter conference on applications of computer vision"],
            "In the Proceedings of IEEE Winter Conference on Applications of Computer Vision",
        ),
        VenueRule::new(
            &["accv", "asian conference on computer vision"],
            "In the Proceedings of Asian Conference on Computer Vision",
        ),
        VenueRule::new(&["tro", "ieee transactions on robotics"], "IEEE Transactions on Robotics"),
    ];
}

/// The builtin rule table in match priority order
pub fn builtin_rules() -> &'static [VenueRule] {
    &BUILTIN_RULES
}

/// A rule plus the word-boundary patterns used in [`MatchMode::WholeWord`]
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: VenueRule,
    patterns: Vec<Regex>,
}

impl CompiledRule {
    fn compile(rule: VenueRule, mode: MatchMode) -> Result<Self> {
        let patterns = match mode {
            MatchMode::Substring => Vec::new(),
            MatchMode::WholeWord => rule
                .keywords
                .iter()
                .map(|keyword| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(keyword))).map_err(|source| {
                        Error::Rule {
                            keyword: keyword.clone(),
                            source,
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(Self { rule, patterns })
    }

    fn matches(&self, value: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Substring => self.rule.keywords.iter().any(|k| value.contains(k.as_str())),
            MatchMode::WholeWord => self.patterns.iter().any(|p| p.is_match(value)),
        }
    }
}

/// Maps venue field values to canonical names.
///
/// Immutable once built; rule order is fixed at construction.
#[derive(Debug, Clone)]
pub struct VenueMapper {
    rules: Vec<CompiledRule>,
    mode: MatchMode,
}

impl Default for VenueMapper {
    fn default() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|rule| CompiledRule {
                    rule: rule.clone(),
                    patterns: Vec::new(),
                })
                .collect(),
            mode: MatchMode::Substring,
        }
    }
}

impl VenueMapper {
    /// Mapper with the builtin rules and substring matching
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapper with the builtin rules followed by `extra` rules.
    ///
    /// Extra rules never take precedence over builtin ones.
    pub fn with_rules(extra: Vec<VenueRule>, mode: MatchMode) -> Result<Self> {
        let rules = BUILTIN_RULES
            .iter()
            .cloned()
            .chain(extra)
            .map(|rule| CompiledRule::compile(rule, mode))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules, mode })
    }

    /// Rules in match priority order
    pub fn rules(&self) -> impl Iterator<Item = &VenueRule> {
        self.rules.iter().map(|r| &r.rule)
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Canonical braced value for `value`, or `None` when no rule matches
    pub fn map_value(&self, value: &str) -> Option<String> {
        let normalized: String = value
            .to_lowercase()
            .chars()
            .filter(|c| *c != '{' && *c != '}')
            .collect();
        let is_workshop = normalized.contains(WORKSHOP_MARKER);

        let matched = self
            .rules
            .iter()
            .find(|rule| rule.matches(&normalized, self.mode))?;

        let mut canonical = matched.rule.canonical.clone();
        if is_workshop {
            canonical.push_str(WORKSHOP_SUFFIX);
        }
        Some(format!("{{{}}}", canonical))
    }

    /// Rewrite one field of `entry` in place.
    ///
    /// Returns true if the field exists and a rule matched.
    pub fn apply(&self, entry: &mut BibTeXEntry, field: &str) -> bool {
        let Some(value) = entry.get_field(field) else {
            return false;
        };
        let Some(mapped) = self.map_value(value) else {
            return false;
        };
        debug!(cite_key = %entry.cite_key, field, venue = %mapped, "mapped venue");
        entry.set_field(field, mapped)
    }

    /// Apply the mapper to each of `fields` on every entry.
    ///
    /// Returns the number of fields rewritten.
    pub fn map_venues<S: AsRef<str>>(&self, entries: &mut [BibTeXEntry], fields: &[S]) -> usize {
        let mut count = 0;
        for entry in entries.iter_mut() {
            for field in fields {
                if self.apply(entry, field.as_ref()) {
                    count += 1;
                }
            }
        }
        count
    }
}
