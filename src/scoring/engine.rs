use super::config::{ScoreSchema, ScoringConfig, ScoringMode, SubScore, SubScoreSource, Weights};
use super::factors::{availability_term, clamp_sub_score, coerce_to_int, scale_to_max, Tier};
use crate::candidates::CandidateRecord;
use crate::metrics::Signals;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "fit", "experience", "Bonus: institution_tier"
    pub description: String, // e.g. "judge proposed 55, clamped to 40/40"
    pub before: f64,         // Score before this factor
    pub after: f64,          // Score after this factor
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub mode: ScoringMode,
    pub ceiling: f64,
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub tier: Tier,
    /// Judge-sourced sub-scores were expected but no judge data arrived.
    pub incomplete: bool,
    pub breakdown: ScoreBreakdown,
}

impl ScoreResult {
    /// Sentinel for candidates that could not be assessed at all.
    pub fn zero(config: &ScoringConfig, reason: &str) -> Self {
        let ceiling = match config.mode {
            ScoringMode::Rubric => config.schema().ceiling() as f64,
            ScoringMode::Weighted => 100.0,
        };
        ScoreResult {
            score: 0.0,
            tier: Tier::Weak,
            incomplete: true,
            breakdown: ScoreBreakdown {
                mode: config.mode,
                ceiling,
                factors: vec![FactorContribution {
                    label: "Unreadable".to_string(),
                    description: reason.to_string(),
                    before: 0.0,
                    after: 0.0,
                }],
            },
        }
    }
}

/// Combine local signals and (optional) judge sub-scores into one composite.
///
/// `judged` is the raw sub-score object from the judge, `None` when the judge
/// was not configured or failed. Values from it are never trusted: each is
/// coerced to an integer and clamped to its declared maximum before summing.
pub fn calculate_score(
    record: &CandidateRecord,
    signals: &Signals,
    judged: Option<&Map<String, Value>>,
    config: &ScoringConfig,
) -> ScoreResult {
    match config.mode {
        ScoringMode::Rubric => rubric_score(record, signals, judged, &config.schema()),
        ScoringMode::Weighted => weighted_score(signals, &config.effective_weights()),
    }
}

fn rubric_score(
    record: &CandidateRecord,
    signals: &Signals,
    judged: Option<&Map<String, Value>>,
    schema: &ScoreSchema,
) -> ScoreResult {
    let ceiling = schema.ceiling() as f64;
    let mut score = 0.0;
    let mut factors = Vec::with_capacity(schema.sub_scores.len() + 1);

    for sub in &schema.sub_scores {
        let before = score;
        let (points, description) = sub_score_points(sub, signals, judged);
        score += points;
        factors.push(FactorContribution {
            label: sub.name.clone(),
            description,
            before,
            after: score,
        });
    }

    if let Some(ref bonus) = schema.bonus {
        if let Some(category) = record.category(&bonus.field) {
            if let Some(points) = bonus.points_for(&category) {
                let before = score;
                // The bonus can never lift a candidate past the ceiling.
                score = (score + points.max(0) as f64).min(ceiling);
                factors.push(FactorContribution {
                    label: format!("Bonus: {}", bonus.field),
                    description: format!("matched '{}' -> +{}", category, points),
                    before,
                    after: score,
                });
            }
        }
    }

    let score = score.clamp(0.0, ceiling);
    ScoreResult {
        score,
        tier: Tier::from_score(score),
        incomplete: judged.is_none() && schema.has_judge_inputs(),
        breakdown: ScoreBreakdown {
            mode: ScoringMode::Rubric,
            ceiling,
            factors,
        },
    }
}

fn sub_score_points(
    sub: &SubScore,
    signals: &Signals,
    judged: Option<&Map<String, Value>>,
) -> (f64, String) {
    match sub.source {
        SubScoreSource::Judge => {
            let Some(judged) = judged else {
                return (0.0, "judge unavailable".to_string());
            };
            let Some(raw) = lookup(judged, &sub.name) else {
                return (0.0, "missing from judge response".to_string());
            };
            let proposed = coerce_to_int(Some(raw));
            let clamped = clamp_sub_score(proposed, sub.max);
            let description = if proposed != clamped {
                format!("judge proposed {}, clamped to {}/{}", raw, clamped, sub.max)
            } else {
                format!("{}/{} from judge", clamped, sub.max)
            };
            (clamped as f64, description)
        }
        SubScoreSource::Experience => (
            scale_to_max(signals.experience_score, sub.max),
            format!(
                "{} years -> band {:.0}/100",
                signals.years_experience, signals.experience_score
            ),
        ),
        SubScoreSource::Skills => (
            scale_to_max(signals.match_percentage, sub.max),
            format!(
                "{}/{} required skills ({:.1}%)",
                signals.skill_match_count, signals.total_required_skills, signals.match_percentage
            ),
        ),
        SubScoreSource::Availability => (
            scale_to_max(availability_term(signals.availability_days), sub.max),
            availability_description(signals),
        ),
    }
}

/// Exact key first, then a case-insensitive match.
fn lookup<'a>(judged: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    judged.get(name).or_else(|| {
        judged
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn availability_description(signals: &Signals) -> String {
    if signals.available {
        "available immediately".to_string()
    } else {
        format!("{} days lag", signals.availability_days)
    }
}

fn weighted_score(signals: &Signals, weights: &Weights) -> ScoreResult {
    let terms = [
        (
            "Experience",
            signals.experience_score,
            weights.experience,
            format!("band {:.0} x {}", signals.experience_score, weights.experience),
        ),
        (
            "Skills",
            signals.match_percentage,
            weights.skills,
            format!("{:.1}% matched x {}", signals.match_percentage, weights.skills),
        ),
        (
            "Availability",
            availability_term(signals.availability_days),
            weights.availability,
            format!("{} x {}", availability_description(signals), weights.availability),
        ),
    ];

    let mut score = 0.0;
    let mut factors = Vec::with_capacity(terms.len());
    for (label, value, weight, description) in terms {
        let before = score;
        score += value * weight;
        factors.push(FactorContribution {
            label: label.to_string(),
            description,
            before,
            after: score,
        });
    }

    let score = score.clamp(0.0, 100.0);
    ScoreResult {
        score,
        tier: Tier::from_score(score),
        incomplete: false,
        breakdown: ScoreBreakdown {
            mode: ScoringMode::Weighted,
            ceiling: 100.0,
            factors,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{BonusConfig, RubricPreset};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn signals(years: f64, band: f64, matched: usize, total: usize, lag: u32) -> Signals {
        let pct = if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64 * 100.0
        };
        Signals {
            years_experience: years,
            experience_score: band,
            skill_match_count: matched,
            total_required_skills: total,
            match_percentage: pct,
            availability_days: lag,
            available: lag == 0,
            meets_minimum_years: years >= 2.0,
        }
    }

    fn record(value: Value) -> CandidateRecord {
        CandidateRecord::new(0, value.as_object().cloned().unwrap())
    }

    fn judge_only(sub_scores: Vec<SubScore>) -> ScoringConfig {
        ScoringConfig {
            mode: ScoringMode::Rubric,
            preset: None,
            sub_scores: Some(sub_scores),
            bonus: None,
            weights: None,
        }
    }

    fn judged(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_rubric_clamps_each_sub_score() {
        let config = judge_only(vec![
            SubScore::judged("technical", 60),
            SubScore::judged("soft", 40),
        ]);
        let scores = judged(json!({ "technical": 500, "soft": -20 }));
        let result = calculate_score(
            &record(json!({})),
            &signals(0.0, 20.0, 0, 0, 30),
            Some(&scores),
            &config,
        );
        assert_eq!(result.score, 60.0);
        assert_eq!(result.tier, Tier::Average);
        assert!(!result.incomplete);
        assert_eq!(result.breakdown.factors.len(), 2);
        assert_eq!(result.breakdown.factors[0].after, 60.0);
        assert!(result.breakdown.factors[0].description.contains("clamped"));
        assert_eq!(result.breakdown.factors[1].after, 60.0);
    }

    #[test]
    fn test_rubric_coerces_untrusted_values() {
        let config = judge_only(vec![
            SubScore::judged("a", 25),
            SubScore::judged("b", 25),
            SubScore::judged("c", 25),
            SubScore::judged("d", 25),
        ]);
        let scores = judged(json!({ "a": "20", "b": 12.9, "c": "excellent", "d": null }));
        let result = calculate_score(
            &record(json!({})),
            &signals(0.0, 20.0, 0, 0, 30),
            Some(&scores),
            &config,
        );
        assert_eq!(result.score, 32.0);
    }

    #[test]
    fn test_rubric_sum_never_exceeds_ceiling() {
        let config = ScoringConfig {
            preset: Some(RubricPreset::Flat),
            ..judge_only(vec![])
        };
        let scores: Map<String, Value> = RubricPreset::Flat
            .schema()
            .sub_scores
            .iter()
            .map(|s| (s.name.clone(), json!(1_000_000)))
            .collect();
        let result = calculate_score(
            &record(json!({})),
            &signals(0.0, 20.0, 0, 0, 30),
            Some(&scores),
            &config,
        );
        assert_eq!(result.score, 100.0);
        assert_eq!(result.tier, Tier::Excellent);
    }

    #[test]
    fn test_judge_keys_match_case_insensitively() {
        let config = judge_only(vec![SubScore::judged("fit", 100)]);
        let scores = judged(json!({ "FIT": 70 }));
        let result = calculate_score(
            &record(json!({})),
            &signals(0.0, 20.0, 0, 0, 30),
            Some(&scores),
            &config,
        );
        assert_eq!(result.score, 70.0);
        assert_eq!(result.tier, Tier::Good);
    }

    #[test]
    fn test_missing_judge_keeps_deterministic_sub_scores() {
        let config = ScoringConfig::default();
        let result = calculate_score(
            &record(json!({})),
            &signals(5.0, 85.0, 2, 2, 0),
            None,
            &config,
        );
        // fit 0/40, experience 85% of 25, skills 25/25, availability 10/10
        assert!((result.score - 56.25).abs() < 1e-9);
        assert!(result.incomplete);
        assert_eq!(result.breakdown.factors[0].description, "judge unavailable");
    }

    #[test]
    fn test_bonus_is_clamped_to_ceiling() {
        let config = ScoringConfig {
            bonus: Some(BonusConfig {
                field: "institution_tier".to_string(),
                points: BTreeMap::from([("tier_1".to_string(), 10)]),
            }),
            ..judge_only(vec![SubScore::judged("fit", 100)])
        };
        let rec = record(json!({ "institution_tier": "Tier_1" }));
        let s = signals(0.0, 20.0, 0, 0, 30);

        let near_max = judged(json!({ "fit": 95 }));
        let result = calculate_score(&rec, &s, Some(&near_max), &config);
        assert_eq!(result.score, 100.0);
        let bonus = result.breakdown.factors.last().unwrap();
        assert_eq!(bonus.label, "Bonus: institution_tier");
        assert_eq!(bonus.before, 95.0);
        assert_eq!(bonus.after, 100.0);

        let mid = judged(json!({ "fit": 60 }));
        let result = calculate_score(&rec, &s, Some(&mid), &config);
        assert_eq!(result.score, 70.0);
    }

    #[test]
    fn test_school_tier_alias_earns_preset_bonus() {
        let config = ScoringConfig {
            preset: Some(RubricPreset::CoreSkills),
            ..judge_only(vec![])
        };
        let scores = judged(json!({ "core_skills": 40, "education": 10, "soft_skills": 10 }));
        let s = signals(10.0, 100.0, 0, 0, 30);

        let by_institution = calculate_score(
            &record(json!({ "institution_tier": "tier_1" })),
            &s,
            Some(&scores),
            &config,
        );
        let by_school = calculate_score(
            &record(json!({ "school_tier": "tier_1" })),
            &s,
            Some(&scores),
            &config,
        );
        assert_eq!(by_institution.score, 90.0);
        assert_eq!(by_school.score, 90.0);
    }

    #[test]
    fn test_bonus_ignored_for_unknown_category() {
        let config = ScoringConfig {
            preset: Some(RubricPreset::CoreSkills),
            ..judge_only(vec![])
        };
        let scores = judged(json!({ "core_skills": 40, "education": 10, "soft_skills": 10 }));
        let result = calculate_score(
            &record(json!({ "institution_tier": "tier_9" })),
            &signals(10.0, 100.0, 0, 0, 30),
            Some(&scores),
            &config,
        );
        assert_eq!(result.score, 80.0);
        assert!(!result
            .breakdown
            .factors
            .iter()
            .any(|f| f.label.starts_with("Bonus")));
    }

    #[test]
    fn test_weighted_mode() {
        let config = ScoringConfig {
            mode: ScoringMode::Weighted,
            ..ScoringConfig::default()
        };
        // 85*0.35 + 100*0.5 + 100*0.15
        let result = calculate_score(
            &record(json!({})),
            &signals(5.0, 85.0, 3, 3, 0),
            None,
            &config,
        );
        assert!((result.score - 94.75).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Excellent);
        assert!(!result.incomplete);
        assert_eq!(result.breakdown.factors.len(), 3);
    }

    #[test]
    fn test_weighted_mode_penalises_lag() {
        let config = ScoringConfig {
            mode: ScoringMode::Weighted,
            ..ScoringConfig::default()
        };
        // 20*0.35 + 0 + 0
        let result = calculate_score(
            &record(json!({})),
            &signals(0.0, 20.0, 0, 3, 30),
            None,
            &config,
        );
        assert!((result.score - 7.0).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Weak);
    }

    #[test]
    fn test_zero_sentinel() {
        let result = ScoreResult::zero(&ScoringConfig::default(), "scan has no text");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.tier, Tier::Weak);
        assert_eq!(result.breakdown.ceiling, 100.0);
        assert_eq!(result.breakdown.factors[0].description, "scan has no text");
    }
}
