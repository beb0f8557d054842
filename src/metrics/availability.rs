use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Phrases that mark a candidate as immediately available. Matched
/// case-insensitively at the start of a word, so "immédiatement" counts.
pub const IMMEDIATE_PREFIXES: &[&str] = &["immédiat", "immediat", "maintenant"];

/// Short synonyms that only count as whole words: "unknown" is not "now".
pub const IMMEDIATE_WORDS: &[&str] = &["now", "asap"];

/// Lag assigned to anything that is not explicit immediate phrasing.
pub const DEFAULT_LAG_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    /// Non-immediate text always gets the default lag.
    #[default]
    Fixed,
    /// ISO dates (YYYY-MM-DD) are turned into a day count from the run date.
    Calendar,
}

/// Classifies free-text availability into (lag days, available now).
#[derive(Debug, Clone)]
pub struct AvailabilityEvaluator {
    policy: AvailabilityPolicy,
    default_lag_days: u32,
    today: NaiveDate,
}

impl AvailabilityEvaluator {
    pub fn new(policy: AvailabilityPolicy, default_lag_days: u32, today: NaiveDate) -> Self {
        Self {
            policy,
            default_lag_days,
            today,
        }
    }

    pub fn evaluate(&self, text: &str) -> (u32, bool) {
        let lowered = text.to_lowercase();
        if is_immediate(&lowered) {
            return (0, true);
        }

        match self.policy {
            AvailabilityPolicy::Fixed => (self.default_lag_days, false),
            AvailabilityPolicy::Calendar => {
                let lag = parse_iso_date(&lowered)
                    .map(|date| (date - self.today).num_days().clamp(1, u32::MAX as i64) as u32)
                    .unwrap_or(self.default_lag_days);
                (lag, false)
            }
        }
    }
}

impl Default for AvailabilityEvaluator {
    fn default() -> Self {
        Self::new(
            AvailabilityPolicy::Fixed,
            DEFAULT_LAG_DAYS,
            chrono::Local::now().date_naive(),
        )
    }
}

fn is_immediate(lowered: &str) -> bool {
    IMMEDIATE_PREFIXES.iter().any(|term| contains_word(lowered, term, false))
        || IMMEDIATE_WORDS.iter().any(|term| contains_word(lowered, term, true))
}

/// `term` occurs starting at a word boundary; with `whole`, it must also
/// end at one.
fn contains_word(haystack: &str, term: &str, whole: bool) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric)
            && (!whole || !after.is_some_and(char::is_alphanumeric))
    })
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let candidate = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d").ok()
}
