pub mod availability;
pub mod experience;
pub mod skills;

pub use availability::{AvailabilityEvaluator, AvailabilityPolicy, DEFAULT_LAG_DAYS};
pub use experience::ExperienceScorer;
pub use skills::{split_delimited, SkillMatchEngine, DEFAULT_REQUIRED_SKILLS};

use crate::candidates::CandidateRecord;

/// Deterministic, locally computed signals for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    pub years_experience: f64,
    pub experience_score: f64,
    pub skill_match_count: usize,
    pub total_required_skills: usize,
    pub match_percentage: f64,
    pub availability_days: u32,
    pub available: bool,
    pub meets_minimum_years: bool,
}

/// Runs the three extractors over a record with run-wide settings.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    skills: SkillMatchEngine,
    availability: AvailabilityEvaluator,
    min_years: f64,
}

impl SignalExtractor {
    pub fn new(skills: SkillMatchEngine, availability: AvailabilityEvaluator, min_years: f64) -> Self {
        Self {
            skills,
            availability,
            min_years,
        }
    }

    pub fn total_required_skills(&self) -> usize {
        self.skills.total_required()
    }

    pub fn extract(&self, record: &CandidateRecord) -> Signals {
        let years_experience = ExperienceScorer::parse_years(record.years_raw());
        let experience_score = ExperienceScorer::score(years_experience);
        let (skill_match_count, match_percentage) = self.skills.evaluate(&record.skills());
        let (availability_days, available) = self.availability.evaluate(&record.availability());

        Signals {
            years_experience,
            experience_score,
            skill_match_count,
            total_required_skills: self.skills.total_required(),
            match_percentage,
            availability_days,
            available,
            meets_minimum_years: years_experience >= self.min_years,
        }
    }

    /// Signals for a candidate whose document could not be read: nothing was
    /// learned, so every metric sits at its floor.
    pub fn unreadable(&self) -> Signals {
        Signals {
            years_experience: 0.0,
            experience_score: 0.0,
            skill_match_count: 0,
            total_required_skills: self.skills.total_required(),
            match_percentage: 0.0,
            availability_days: self.availability_default_lag(),
            available: false,
            meets_minimum_years: self.min_years <= 0.0,
        }
    }

    fn availability_default_lag(&self) -> u32 {
        self.availability.evaluate("").0
    }
}
