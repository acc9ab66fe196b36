use super::SearchError;
use regex::{Regex, RegexBuilder};

const MAX_PATTERN_LENGTH: usize = 255;
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// A compiled file-name pattern. `*` matches any run of characters, every
/// other character matches itself, and the whole name must match.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    pub fn compile(pattern: &str) -> Result<Self, SearchError> {
        let invalid = |reason: &str| SearchError::Pattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };
        if pattern.is_empty() {
            return Err(invalid("pattern must be non-empty"));
        }
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(invalid("pattern is too long"));
        }
        if pattern.contains(['/', '\\']) {
            return Err(invalid("patterns match file names and may not contain path separators"));
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = RegexBuilder::new(&format!("^(?s:{body})$"))
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|err| invalid(&err.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_any_run_including_empty() {
        let pattern = NamePattern::compile("*.py").expect("compile");
        assert!(pattern.is_match("a.py"));
        assert!(pattern.is_match(".py"));
        assert!(!pattern.is_match("a.pyc"));
        assert!(!pattern.is_match("apy"));
    }

    #[test]
    fn other_metacharacters_are_literal() {
        let pattern = NamePattern::compile("a?b").expect("compile");
        assert!(pattern.is_match("a?b"));
        assert!(!pattern.is_match("axb"));

        let pattern = NamePattern::compile("[draft](1).txt").expect("compile");
        assert!(pattern.is_match("[draft](1).txt"));
        assert!(!pattern.is_match("d(1).txt"));
    }

    #[test]
    fn repeated_stars_and_inner_stars_compile() {
        let pattern = NamePattern::compile("re**port*.md").expect("compile");
        assert!(pattern.is_match("report.md"));
        assert!(pattern.is_match("re-2024-port-final.md"));
        assert_eq!(pattern.as_str(), "re**port*.md");
    }

    #[test]
    fn structurally_invalid_patterns_are_rejected() {
        for bad in ["", "src/*.py", "a\\b"] {
            let err = NamePattern::compile(bad).expect_err("invalid");
            assert!(matches!(err, SearchError::Pattern { .. }), "{bad}");
        }
        let long = "x".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(NamePattern::compile(&long).is_err());
    }
}
