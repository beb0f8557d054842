use serde_json::{Map, Value};

/// Commentary strings longer than this are cut.
pub const MAX_COMMENT_CHARS: usize = 280;

const COMMENTARY_KEYS: &[&str] = &["strength", "risk", "reasoning"];

/// Free-text assessment attached to a candidate. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commentary {
    pub strength: Option<String>,
    pub risk: Option<String>,
    pub reasoning: Option<String>,
}

impl Commentary {
    pub fn is_empty(&self) -> bool {
        self.strength.is_none() && self.risk.is_none() && self.reasoning.is_none()
    }

    pub fn note(reasoning: &str) -> Self {
        Self {
            reasoning: clean_comment(Some(&Value::String(reasoning.to_string()))),
            ..Self::default()
        }
    }
}

/// What could be salvaged from one judge response.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeVerdict {
    /// Raw, untrusted sub-score values keyed by name.
    pub scores: Map<String, Value>,
    pub commentary: Commentary,
}

/// Parse a judge response into sub-scores and commentary.
///
/// Returns `None` when no JSON object can be recovered from the text. Scores
/// are read from a nested `scores` object when present, otherwise from the
/// top level. Values are left raw; coercion happens during scoring.
pub fn parse_verdict(text: &str) -> Option<JudgeVerdict> {
    let object = extract_json_object(text)?;

    let commentary = Commentary {
        strength: clean_comment(object.get("strength")),
        risk: clean_comment(object.get("risk")),
        reasoning: clean_comment(object.get("reasoning")),
    };

    let scores = match object.get("scores") {
        Some(Value::Object(scores)) => scores.clone(),
        _ => object
            .into_iter()
            .filter(|(key, _)| !COMMENTARY_KEYS.contains(&key.as_str()))
            .collect(),
    };

    Some(JudgeVerdict { scores, commentary })
}

/// Recover a JSON object embedded in free text.
///
/// Models wrap JSON in prose or code fences, so try the widest span first
/// (first `{` to last `}`), then the first balanced span.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        if let Ok(Value::Object(map)) = serde_json::from_str(&text[start..=end]) {
            return Some(map);
        }
    }

    let span = first_balanced_span(&text[start..])?;
    match serde_json::from_str(span) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// First `{...}` span with matching braces, ignoring braces inside strings.
fn first_balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn clean_comment(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(truncate_chars(text, MAX_COMMENT_CHARS))
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_clean_response() {
        let verdict = parse_verdict(
            r#"{"scores": {"fit": 32}, "strength": "Strong SQL", "risk": "No cloud", "reasoning": "Solid"}"#,
        )
        .unwrap();
        assert_eq!(verdict.scores.get("fit"), Some(&json!(32)));
        assert_eq!(verdict.commentary.strength.as_deref(), Some("Strong SQL"));
        assert_eq!(verdict.commentary.risk.as_deref(), Some("No cloud"));
        assert_eq!(verdict.commentary.reasoning.as_deref(), Some("Solid"));
    }

    #[test]
    fn test_parse_flat_response() {
        let verdict = parse_verdict(r#"{"fit": "28", "reasoning": "ok"}"#).unwrap();
        assert_eq!(verdict.scores.get("fit"), Some(&json!("28")));
        assert!(!verdict.scores.contains_key("reasoning"));
    }

    #[test]
    fn test_parse_response_wrapped_in_prose() {
        let text = "Here is my assessment:\n```json\n{\"scores\": {\"fit\": 20}}\n```\nThanks!";
        let verdict = parse_verdict(text).unwrap();
        assert_eq!(verdict.scores.get("fit"), Some(&json!(20)));
        assert!(verdict.commentary.is_empty());
    }

    #[test]
    fn test_falls_back_to_first_balanced_span() {
        // The widest span covers two objects and does not parse.
        let text = r#"{"scores": {"fit": 15}, "risk": "late {start}"} and also {"other": 1}"#;
        let verdict = parse_verdict(text).unwrap();
        assert_eq!(verdict.scores.get("fit"), Some(&json!(15)));
        assert_eq!(verdict.commentary.risk.as_deref(), Some("late {start}"));
    }

    #[test]
    fn test_unparseable_responses() {
        assert!(parse_verdict("").is_none());
        assert!(parse_verdict("no json here").is_none());
        assert!(parse_verdict("} backwards {").is_none());
        assert!(parse_verdict("{\"fit\": ").is_none());
        assert!(parse_verdict("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_mistyped_commentary_is_absent() {
        let verdict =
            parse_verdict(r#"{"fit": 10, "strength": 42, "risk": "  ", "reasoning": null}"#).unwrap();
        assert!(verdict.commentary.is_empty());
    }

    #[test]
    fn test_long_commentary_truncated() {
        let long = "é".repeat(400);
        let text = json!({ "fit": 1, "reasoning": long }).to_string();
        let verdict = parse_verdict(&text).unwrap();
        let reasoning = verdict.commentary.reasoning.unwrap();
        assert_eq!(reasoning.chars().count(), MAX_COMMENT_CHARS);
    }

    #[test]
    fn test_non_object_scores_fall_back_to_top_level() {
        let verdict = parse_verdict(r#"{"scores": 90, "fit": 12}"#).unwrap();
        assert_eq!(verdict.scores.get("fit"), Some(&json!(12)));
        assert_eq!(verdict.scores.get("scores"), Some(&json!(90)));
    }
}
