pub mod config;
pub mod engine;
pub mod factors;
pub mod ranked;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, FactorContribution, ScoreBreakdown, ScoreResult};
pub use factors::{coerce_to_int, Tier};
pub use ranked::{rank, CandidateMetrics, CandidateStatus};
pub use validation::validate_scoring;
