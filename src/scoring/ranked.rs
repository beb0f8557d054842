use super::engine::{ScoreBreakdown, ScoreResult};
use super::factors::Tier;
use crate::candidates::CandidateRecord;
use crate::judge::Commentary;
use crate::metrics::Signals;

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateStatus {
    Scored,
    /// Judge configured but produced no usable sub-scores for this candidate.
    JudgeUnavailable,
    /// Attached document had no readable text.
    Unreadable(String),
}

impl CandidateStatus {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, CandidateStatus::Scored)
    }
}

/// Final, per-candidate outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMetrics {
    pub position: usize,
    pub name: String,
    pub email: String,
    pub years_experience: f64,
    pub experience_score: f64,
    pub skill_match_count: usize,
    pub total_required_skills: usize,
    pub match_percentage: f64,
    pub availability_days: u32,
    pub available: bool,
    pub meets_minimum_years: bool,
    pub score: f64,
    pub tier: Tier,
    /// Some declared sub-scores had no input and counted as zero.
    pub incomplete: bool,
    pub status: CandidateStatus,
    pub breakdown: ScoreBreakdown,
    pub commentary: Commentary,
}

impl CandidateMetrics {
    pub fn new(
        record: &CandidateRecord,
        signals: Signals,
        result: ScoreResult,
        status: CandidateStatus,
        commentary: Commentary,
    ) -> Self {
        Self {
            position: record.position,
            name: record.name(),
            email: record.email(),
            years_experience: signals.years_experience,
            experience_score: signals.experience_score,
            skill_match_count: signals.skill_match_count,
            total_required_skills: signals.total_required_skills,
            match_percentage: signals.match_percentage,
            availability_days: signals.availability_days,
            available: signals.available,
            meets_minimum_years: signals.meets_minimum_years,
            score: result.score,
            tier: result.tier,
            incomplete: result.incomplete,
            status,
            breakdown: result.breakdown,
            commentary,
        }
    }
}

/// Sort by score, best first. The sort is stable so equal scores keep their
/// input order.
pub fn rank(mut candidates: Vec<CandidateMetrics>) -> Vec<CandidateMetrics> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scoring::ScoringMode;

    pub(crate) fn sample(position: usize, name: &str, score: f64) -> CandidateMetrics {
        CandidateMetrics {
            position,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            years_experience: 3.0,
            experience_score: 65.0,
            skill_match_count: 1,
            total_required_skills: 2,
            match_percentage: 50.0,
            availability_days: 0,
            available: true,
            meets_minimum_years: true,
            score,
            tier: Tier::from_score(score),
            incomplete: false,
            status: CandidateStatus::Scored,
            breakdown: ScoreBreakdown {
                mode: ScoringMode::Rubric,
                ceiling: 100.0,
                factors: vec![],
            },
            commentary: Commentary::default(),
        }
    }

    #[test]
    fn test_rank_descending() {
        let ranked = rank(vec![
            sample(0, "Low", 30.0),
            sample(1, "High", 90.0),
            sample(2, "Mid", 60.0),
        ]);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let ranked = rank(vec![
            sample(0, "First", 70.0),
            sample(1, "Top", 95.0),
            sample(2, "Second", 70.0),
            sample(3, "Third", 70.0),
        ]);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "First", "Second", "Third"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(vec![]).is_empty());
    }

    #[test]
    fn test_status_degraded() {
        assert!(!CandidateStatus::Scored.is_degraded());
        assert!(CandidateStatus::JudgeUnavailable.is_degraded());
        assert!(CandidateStatus::Unreadable("scan".to_string()).is_degraded());
    }
}
