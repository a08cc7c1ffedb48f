//! Ticket reference extraction from commit messages.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Finds project-key-prefixed ticket identifiers in free text.
///
/// A reference is a known project key, an optional `-`, `_` or whitespace
/// separator, and a run of digits. Matching ignores case; identifiers are
/// normalized to `KEY-123` using the configured spelling of the key.
#[derive(Debug, Clone)]
pub struct TicketExtractor {
    pattern: Option<Regex>,
    keys: Vec<String>,
}

impl TicketExtractor {
    /// Builds an extractor for the given project keys.
    ///
    /// Blank keys are ignored. With no usable keys the extractor matches
    /// nothing.
    pub fn new<I, S>(project_keys: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = project_keys
            .into_iter()
            .map(|key| key.as_ref().trim().to_uppercase())
            .filter(|key| !key.is_empty())
            .collect();

        if keys.is_empty() {
            debug!("No project keys available; ticket extraction disabled");
            return Ok(Self {
                pattern: None,
                keys,
            });
        }

        let alternatives: Vec<String> = keys.iter().map(|key| regex::escape(key)).collect();

        let pattern = RegexBuilder::new(&format!(r"({})[-_\s]?([0-9]+)", alternatives.join("|")))
            .case_insensitive(true)
            .multi_line(true)
            .build()?;

        debug!(
            key_count = alternatives.len(),
            "Built ticket reference pattern"
        );

        Ok(Self {
            pattern: Some(pattern),
            keys,
        })
    }

    /// Returns the ticket identifiers in `message` in order of appearance.
    ///
    /// A ticket mentioned several times is returned once per mention.
    pub fn extract(&self, message: &str) -> Vec<String> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(message)
            .filter_map(|caps| {
                let key = self.known_key(caps.get(1)?.as_str())?;
                let number = caps.get(2)?.as_str();
                Some(format!("{key}-{number}"))
            })
            .collect()
    }

    /// Maps matched text back to a configured key.
    ///
    /// The regex folds case over all of Unicode (KELVIN SIGN matches `k`);
    /// only text whose uppercase form equals a key is accepted.
    fn known_key(&self, matched: &str) -> Option<&str> {
        let upper = matched.to_uppercase();
        self.keys
            .iter()
            .find(|key| **key == upper)
            .map(String::as_str)
    }
}
