/// Skills assumed when the run config does not name any.
pub const DEFAULT_REQUIRED_SKILLS: &[&str] = &["communication", "motivation"];

/// Keyword matcher over free-text skill lists.
///
/// Required keywords are normalized once at construction (split, trimmed,
/// lower-cased). Matching is plain substring containment against the
/// lower-cased candidate text: "postgresql" satisfies "sql".
#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatchEngine {
    required: Vec<String>,
}

impl SkillMatchEngine {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let required = required
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { required }
    }

    pub fn total_required(&self) -> usize {
        self.required.len()
    }

    /// Returns (matched count, match percentage in 0..=100, unrounded).
    pub fn evaluate(&self, skills_text: &str) -> (usize, f64) {
        if skills_text.trim().is_empty() || self.required.is_empty() {
            return (0, 0.0);
        }

        let haystack = skills_text.to_lowercase();
        let matched = self
            .required
            .iter()
            .filter(|keyword| haystack.contains(keyword.as_str()))
            .count();

        let pct = matched as f64 / self.required.len() as f64 * 100.0;
        (matched, pct)
    }
}

/// Split a comma-delimited list, trimming entries and dropping blanks.
pub fn split_delimited(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SkillMatchEngine {
        SkillMatchEngine::new(["python", "sql", "aws"])
    }

    #[test]
    fn test_partial_match() {
        let (matched, pct) = engine().evaluate("Python, SQL");
        assert_eq!(matched, 2);
        assert!((pct - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_full_match_is_case_insensitive() {
        let (matched, pct) = engine().evaluate("AWS; sql; PYTHON");
        assert_eq!(matched, 3);
        assert_eq!(pct, 100.0);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(engine().evaluate("JavaScript, React"), (0, 0.0));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(engine().evaluate(""), (0, 0.0));
        assert_eq!(engine().evaluate("   "), (0, 0.0));
    }

    #[test]
    fn test_empty_required_list() {
        let engine = SkillMatchEngine::new(Vec::<String>::new());
        assert_eq!(engine.evaluate("Python"), (0, 0.0));
        assert_eq!(engine.total_required(), 0);
    }

    #[test]
    fn test_substring_not_tokenized() {
        let engine = SkillMatchEngine::new(["sql"]);
        assert_eq!(engine.evaluate("PostgreSQL").0, 1);
    }

    #[test]
    fn test_delimited_skills_normalize_once() {
        let engine = SkillMatchEngine::new(split_delimited(" Python , SQL,, AWS "));
        assert_eq!(engine, SkillMatchEngine::new(["python", "sql", "aws"]));
        assert_eq!(engine.evaluate("AWS, Python").0, 2);
    }
}
