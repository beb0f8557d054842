use serde_json::Value;

/// Lower bounds (inclusive) of each experience band and the score it earns.
/// Checked from the top; anything below one year falls through to 20.
const BANDS: [(f64, f64); 4] = [(10.0, 100.0), (5.0, 85.0), (2.0, 65.0), (1.0, 40.0)];
const FLOOR_SCORE: f64 = 20.0;

/// Parses heterogeneous "years of experience" values and maps them onto the
/// banded experience score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExperienceScorer;

impl ExperienceScorer {
    /// Extract the first run of digits from the textual form of `value`.
    ///
    /// Plain numbers, "5 ans", "5-7 years", blanks and prose all go through
    /// the same rule. A sign is not part of a digit run, so "-5" reads as 5.
    /// No digits (or no value) yields 0.0.
    pub fn parse_years(value: Option<&Value>) -> f64 {
        let text = match value {
            None | Some(Value::Null) => return 0.0,
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        Self::parse_years_str(&text)
    }

    pub fn parse_years_str(text: &str) -> f64 {
        let digits: String = text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();

        if digits.is_empty() {
            return 0.0;
        }
        digits.parse::<f64>().unwrap_or(0.0)
    }

    /// Map years onto the coarse seniority curve:
    /// [0,1)→20, [1,2)→40, [2,5)→65, [5,10)→85, [10,∞)→100.
    pub fn score(years: f64) -> f64 {
        BANDS
            .iter()
            .find(|(lower, _)| years >= *lower)
            .map(|(_, score)| *score)
            .unwrap_or(FLOOR_SCORE)
    }
}
