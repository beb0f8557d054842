use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main scoring configuration.
///
/// Two modes share the same tiering and ranking:
/// - `rubric`: a clamped sum of declared sub-scores, most of them proposed by
///   the judge, plus an optional categorical bonus.
/// - `weighted`: a fixed blend of the deterministic signals only.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   mode: rubric
///   sub_scores:
///     - { name: fit, max: 40 }
///     - { name: experience, max: 30, source: experience }
///     - { name: skills, max: 30, source: skills }
///   bonus:
///     field: institution_tier
///     points: { tier_1: 10, tier_2: 5 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub mode: ScoringMode,

    /// Built-in rubric; mutually exclusive with `sub_scores`/`bonus`.
    #[serde(default)]
    pub preset: Option<RubricPreset>,

    #[serde(default)]
    pub sub_scores: Option<Vec<SubScore>>,

    #[serde(default)]
    pub bonus: Option<BonusConfig>,

    /// Blend used by `weighted` mode (default 0.35 / 0.50 / 0.15).
    #[serde(default)]
    pub weights: Option<Weights>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mode: ScoringMode::Rubric,
            preset: None,
            sub_scores: Some(vec![
                SubScore::judged("fit", 40),
                SubScore::local("experience", 25, SubScoreSource::Experience),
                SubScore::local("skills", 25, SubScoreSource::Skills),
                SubScore::local("availability", 10, SubScoreSource::Availability),
            ]),
            bonus: None,
            weights: Some(Weights::default()),
        }
    }
}

impl ScoringConfig {
    /// Resolve the rubric actually used for scoring. A preset wins over
    /// inline sub-scores; missing sub-scores mean an empty rubric.
    pub fn schema(&self) -> ScoreSchema {
        if let Some(preset) = self.preset {
            return preset.schema();
        }
        ScoreSchema {
            sub_scores: self.sub_scores.clone().unwrap_or_default(),
            bonus: self.bonus.clone(),
        }
    }

    pub fn effective_weights(&self) -> Weights {
        self.weights.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    Rubric,
    Weighted,
}

/// Where a sub-score's raw value comes from.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubScoreSource {
    /// Read from the judge response under the sub-score's name.
    #[default]
    Judge,
    /// Experience band score (0-100) scaled into the sub-score's range.
    Experience,
    /// Skill match percentage scaled into the sub-score's range.
    Skills,
    /// Availability term (100 when immediate, 0 at 30+ days) scaled likewise.
    Availability,
}

/// One rubric line: a named sub-score and its declared maximum.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubScore {
    pub name: String,
    pub max: i64,
    #[serde(default)]
    pub source: SubScoreSource,
}

impl SubScore {
    pub fn judged(name: &str, max: i64) -> Self {
        Self {
            name: name.to_string(),
            max,
            source: SubScoreSource::Judge,
        }
    }

    pub fn local(name: &str, max: i64, source: SubScoreSource) -> Self {
        Self {
            name: name.to_string(),
            max,
            source,
        }
    }
}

/// Fixed points granted per category of a locally known field, e.g. the tier
/// of the candidate's institution. Labels match case-insensitively.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BonusConfig {
    pub field: String,
    pub points: BTreeMap<String, i64>,
}

impl BonusConfig {
    pub fn points_for(&self, category: &str) -> Option<i64> {
        let category = category.trim();
        self.points
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(category))
            .map(|(_, points)| *points)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    pub experience: f64,
    pub skills: f64,
    pub availability: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            experience: 0.35,
            skills: 0.50,
            availability: 0.15,
        }
    }
}

impl Weights {
    pub fn total(&self) -> f64 {
        self.experience + self.skills + self.availability
    }
}

/// Rubric resolved from configuration, shared by every candidate in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSchema {
    pub sub_scores: Vec<SubScore>,
    pub bonus: Option<BonusConfig>,
}

impl ScoreSchema {
    /// Sum of declared maxima; the composite never exceeds it.
    pub fn ceiling(&self) -> i64 {
        self.sub_scores.iter().map(|s| s.max.max(0)).sum()
    }

    pub fn has_judge_inputs(&self) -> bool {
        self.sub_scores
            .iter()
            .any(|s| s.source == SubScoreSource::Judge)
    }

    pub fn judge_names(&self) -> Vec<&str> {
        self.sub_scores
            .iter()
            .filter(|s| s.source == SubScoreSource::Judge)
            .map(|s| s.name.as_str())
            .collect()
    }
}

/// Historical rubrics kept as data so switching between them is a config
/// change.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RubricPreset {
    /// Eight judge-assessed factors on 100.
    Flat,
    /// Core skills carry half the score; institution tier earns a bonus.
    CoreSkills,
}

impl RubricPreset {
    pub fn schema(self) -> ScoreSchema {
        match self {
            RubricPreset::Flat => ScoreSchema {
                sub_scores: vec![
                    SubScore::judged("technical_skills", 15),
                    SubScore::judged("relevant_experience", 15),
                    SubScore::judged("achievements", 15),
                    SubScore::judged("stability", 15),
                    SubScore::judged("education", 10),
                    SubScore::judged("communication", 10),
                    SubScore::judged("leadership", 10),
                    SubScore::judged("culture_fit", 10),
                ],
                bonus: None,
            },
            RubricPreset::CoreSkills => ScoreSchema {
                sub_scores: vec![
                    SubScore::judged("core_skills", 50),
                    SubScore::local("experience", 20, SubScoreSource::Experience),
                    SubScore::judged("education", 15),
                    SubScore::judged("soft_skills", 15),
                ],
                bonus: Some(BonusConfig {
                    field: "institution_tier".to_string(),
                    points: BTreeMap::from([
                        ("tier_1".to_string(), 10),
                        ("tier_2".to_string(), 5),
                    ]),
                }),
            },
        }
    }
}
