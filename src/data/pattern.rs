// ---------------------------------------------------------------------------
// Ignore patterns: anchored, case-insensitive globs over field names
// ---------------------------------------------------------------------------

/// Fields dropped from every record before anything else happens.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "category",
    "*thumbnail*",
    "*flare*",
    "*flare*effect",
    "*afterburner*effect*",
    "*description*",
    "unplunderable",
    "display name",
];

/// A compiled glob where `*` matches zero or more characters and every other
/// character is literal. The whole field name must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern {
    /// Lower-cased literal pieces between the `*`s.
    segments: Vec<String>,
}

impl IgnorePattern {
    pub fn new(glob: &str) -> Self {
        Self {
            segments: glob.to_lowercase().split('*').map(str::to_string).collect(),
        }
    }

    pub fn matches(&self, field: &str) -> bool {
        let field = field.to_lowercase();

        // No wildcard: exact (case-insensitive) match.
        let [first, middle @ .., last] = self.segments.as_slice() else {
            return self.segments.first().is_some_and(|s| *s == field);
        };

        if field.len() < first.len() + last.len()
            || !field.starts_with(first.as_str())
            || !field.ends_with(last.as_str())
        {
            return false;
        }

        let mut rest = &field[first.len()..field.len() - last.len()];
        for segment in middle {
            match rest.find(segment.as_str()) {
                Some(pos) => rest = &rest[pos + segment.len()..],
                None => return false,
            }
        }
        true
    }
}

/// The full set of ignore patterns applied by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreSet {
    pub fn new<I, S>(globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: globs
                .into_iter()
                .map(|g| IgnorePattern::new(g.as_ref()))
                .collect(),
        }
    }

    pub fn matches(&self, field: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(field))
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_is_exact_and_case_insensitive() {
        let p = IgnorePattern::new("category");
        assert!(p.matches("category"));
        assert!(p.matches("Category"));
        assert!(!p.matches("categoryx"));
        assert!(!p.matches("sub category"));
    }

    #[test]
    fn surrounding_wildcards_match_anywhere() {
        let p = IgnorePattern::new("*flare*");
        assert!(p.matches("flare"));
        assert!(p.matches("Steering Flare Sprite"));
        assert!(p.matches("reverse flare sound"));
        assert!(!p.matches("flar"));
    }

    #[test]
    fn inner_segments_must_appear_in_order() {
        let p = IgnorePattern::new("*afterburner*effect*");
        assert!(p.matches("afterburner effect"));
        assert!(p.matches("Afterburner Effect Sprite"));
        assert!(!p.matches("effect afterburner"));
        assert!(!p.matches("afterburner thrust"));
    }

    #[test]
    fn trailing_literal_is_anchored() {
        let p = IgnorePattern::new("*flare*effect");
        assert!(p.matches("flare effect"));
        assert!(!p.matches("flare effects"));
    }

    #[test]
    fn prefix_and_suffix_may_not_overlap() {
        let p = IgnorePattern::new("ab*ba");
        assert!(!p.matches("aba"));
        assert!(p.matches("abba"));
        assert!(p.matches("ab-ba"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let p = IgnorePattern::new("a.b");
        assert!(p.matches("a.b"));
        assert!(!p.matches("axb"));
    }

    #[test]
    fn default_set_covers_canonical_fields() {
        let set = IgnoreSet::default();
        for field in [
            "category",
            "thumbnail",
            "flare sprite",
            "afterburner effect",
            "description",
            "Unplunderable",
            "display name",
        ] {
            assert!(set.matches(field), "{field} should be ignored");
        }
        for field in ["name", "thrust", "engine capacity", "licenses"] {
            assert!(!set.matches(field), "{field} should be kept");
        }
    }
}
