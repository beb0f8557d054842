use super::config::{ScoringConfig, ScoringMode};
use std::collections::HashSet;

const REQUIRED_CEILING: i64 = 100;
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.preset.is_some() && (config.sub_scores.is_some() || config.bonus.is_some()) {
        errors.push(
            "scoring.preset: cannot be combined with scoring.sub_scores or scoring.bonus"
                .to_string(),
        );
    }

    // Weighted mode ignores the rubric entirely.
    if config.mode == ScoringMode::Rubric {
        validate_rubric(config, &mut errors);
    }

    if let Some(ref weights) = config.weights {
        for (name, value) in [
            ("experience", weights.experience),
            ("skills", weights.skills),
            ("availability", weights.availability),
        ] {
            if !(value >= 0.0) {
                errors.push(format!("scoring.weights.{}: must be non-negative", name));
            }
        }
        let total = weights.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            errors.push(format!("scoring.weights: must sum to 1.0 (got {})", total));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rubric(config: &ScoringConfig, errors: &mut Vec<String>) {
    let schema = config.schema();

    if schema.sub_scores.is_empty() {
        errors.push("scoring.sub_scores: at least one sub-score is required".to_string());
        return;
    }

    let mut seen = HashSet::new();
    for (i, sub) in schema.sub_scores.iter().enumerate() {
        let name = sub.name.trim();
        if name.is_empty() {
            errors.push(format!("scoring.sub_scores[{}].name: must not be empty", i));
        } else if !seen.insert(name.to_lowercase()) {
            errors.push(format!(
                "scoring.sub_scores[{}].name: duplicate sub-score '{}'",
                i, name
            ));
        }
        if sub.max < 0 {
            errors.push(format!(
                "scoring.sub_scores[{}].max: must be non-negative (got {})",
                i, sub.max
            ));
        }
    }

    let total: i64 = schema.sub_scores.iter().map(|s| s.max).sum();
    if total != REQUIRED_CEILING {
        errors.push(format!(
            "scoring.sub_scores: maxima must sum to {} (got {})",
            REQUIRED_CEILING, total
        ));
    }

    if let Some(ref bonus) = schema.bonus {
        if bonus.field.trim().is_empty() {
            errors.push("scoring.bonus.field: must not be empty".to_string());
        }
        for (label, points) in &bonus.points {
            if *points < 0 {
                errors.push(format!(
                    "scoring.bonus.points.{}: must be non-negative (got {})",
                    label, points
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{BonusConfig, RubricPreset, SubScore, SubScoreSource, Weights};
    use std::collections::BTreeMap;

    fn rubric(sub_scores: Vec<SubScore>) -> ScoringConfig {
        ScoringConfig {
            mode: ScoringMode::Rubric,
            preset: None,
            sub_scores: Some(sub_scores),
            bonus: None,
            weights: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [RubricPreset::Flat, RubricPreset::CoreSkills] {
            let config = ScoringConfig {
                mode: ScoringMode::Rubric,
                preset: Some(preset),
                sub_scores: None,
                bonus: None,
                weights: None,
            };
            assert!(validate_scoring(&config).is_ok(), "{:?} should validate", preset);
        }
    }

    #[test]
    fn test_empty_rubric() {
        let errors = validate_scoring(&rubric(vec![])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least one"));
    }

    #[test]
    fn test_maxima_must_sum_to_one_hundred() {
        let errors = validate_scoring(&rubric(vec![
            SubScore::judged("fit", 40),
            SubScore::local("skills", 40, SubScoreSource::Skills),
        ]))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("got 80"));
    }

    #[test]
    fn test_negative_values_rejected() {
        let config = ScoringConfig {
            bonus: Some(BonusConfig {
                field: "institution_tier".to_string(),
                points: BTreeMap::from([("tier_1".to_string(), -5)]),
            }),
            ..rubric(vec![SubScore::judged("fit", 110), SubScore::judged("risk", -10)])
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("sub_scores[1].max"));
        assert!(errors[1].contains("bonus.points.tier_1"));
    }

    #[test]
    fn test_duplicate_and_blank_names() {
        let errors = validate_scoring(&rubric(vec![
            SubScore::judged("fit", 50),
            SubScore::judged("FIT", 25),
            SubScore::judged(" ", 25),
        ]))
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("duplicate"));
        assert!(errors[1].contains("must not be empty"));
    }

    #[test]
    fn test_preset_conflicts_with_inline_rubric() {
        let config = ScoringConfig {
            preset: Some(RubricPreset::Flat),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.preset"));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = ScoringConfig {
            mode: ScoringMode::Weighted,
            weights: Some(Weights {
                experience: 0.5,
                skills: 0.5,
                availability: 0.5,
            }),
            ..rubric(vec![])
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("sum to 1.0"));
    }

    #[test]
    fn test_negative_weight() {
        let config = ScoringConfig {
            mode: ScoringMode::Weighted,
            weights: Some(Weights {
                experience: 1.2,
                skills: -0.2,
                availability: 0.0,
            }),
            ..rubric(vec![])
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("weights.skills"));
    }

    #[test]
    fn test_multiple_errors() {
        let config = ScoringConfig {
            weights: Some(Weights {
                experience: -1.0,
                skills: 0.0,
                availability: 0.0,
            }),
            ..rubric(vec![SubScore::judged("fit", 10)])
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
