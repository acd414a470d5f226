// Ignore-pattern compilation and path matching

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid ignore pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// A single compiled ignore pattern
///
/// `*` in the source pattern matches any character sequence (including the
/// empty one and path separators); everything else is matched literally.
/// The match is anchored to the full path, not a substring search.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: String,
    regex: Regex,
}

impl IgnoreRule {
    fn compile(pattern: &str) -> Result<Self, FilterError> {
        let expanded: Vec<String> = pattern.split('*').map(regex::escape).collect();
        let anchored = format!("^{}$", expanded.join(".*"));

        let regex = Regex::new(&anchored).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compiled set of ignore rules
///
/// Rule order has no significance: a path is excluded if any rule matches
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    rules: Vec<IgnoreRule>,
}

impl IgnoreFilter {
    /// Compile a list of wildcard patterns
    ///
    /// Pure function of the rule list; the compiled filter is passed
    /// explicitly wherever matching happens
    pub fn compile(patterns: &[String]) -> Result<Self, FilterError> {
        let rules = patterns
            .iter()
            .map(|pattern| IgnoreRule::compile(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// True iff any rule fully matches the path
    ///
    /// Matches are reported at debug level with the path and the rule,
    /// so skipped files can be diagnosed from the log
    pub fn matches(&self, path: &str) -> bool {
        for rule in &self.rules {
            if rule.matches(path) {
                tracing::debug!("skipping {}: matches ignore pattern {}", path, rule.pattern());
                return true;
            }
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
