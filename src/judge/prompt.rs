use super::response::truncate_chars;
use crate::scoring::{ScoreSchema, SubScoreSource};
use crate::stats::AggregateStats;
use std::fmt::Write;

/// Only the head of a document is sent; long CVs are cut here.
pub const MAX_DOCUMENT_CHARS: usize = 6000;
pub const MAX_ROLE_CHARS: usize = 1500;

/// Prompt asking the judge to grade one candidate against the role.
///
/// Only judge-sourced sub-scores are requested, each with its allowed range.
pub fn build_candidate_prompt(role: &str, candidate: &str, schema: &ScoreSchema) -> String {
    let mut scores = String::new();
    for sub in schema
        .sub_scores
        .iter()
        .filter(|s| s.source == SubScoreSource::Judge)
    {
        let _ = writeln!(scores, "    \"{}\": <integer 0-{}>,", sub.name, sub.max);
    }

    format!(
        "You are an expert recruiter. Assess how well this candidate fits the role.\n\
         Answer with STRICT JSON only, using exactly these keys:\n\
         {{\n  \"scores\": {{\n{scores}  }},\n  \"strength\": \"their greatest asset\",\n  \
         \"risk\": \"what is missing\",\n  \"reasoning\": \"short justification of the scores\"\n}}\n\n\
         ROLE:\n{role}\n\nCANDIDATE:\n{candidate}\n",
        scores = scores,
        role = truncate_chars(role.trim(), MAX_ROLE_CHARS),
        candidate = truncate_chars(candidate.trim(), MAX_DOCUMENT_CHARS),
    )
}

/// Prompt for the optional executive summary over the whole pool.
pub fn build_summary_prompt(role: &str, stats: &AggregateStats) -> String {
    let mut facts = String::new();
    let _ = writeln!(facts, "- candidates: {}", stats.total_candidates);
    let _ = writeln!(facts, "- average experience: {:.1} years", stats.average_years);
    let _ = writeln!(facts, "- average skill match: {:.1}%", stats.average_match_percentage);
    let _ = writeln!(facts, "- available immediately: {}", stats.available_now);
    for (tier, count) in &stats.tier_distribution {
        let _ = writeln!(facts, "- {}: {}", tier, count);
    }
    for top in &stats.top_candidates {
        let _ = writeln!(facts, "- top candidate: {} ({:.1}, {})", top.name, top.score, top.tier);
    }

    format!(
        "You are an expert recruiter writing for a hiring manager.\n\
         Summarise this candidate pool in at most five sentences and recommend next steps.\n\
         Answer with STRICT JSON only: {{\"summary\": \"...\"}}\n\n\
         ROLE:\n{role}\n\nPOOL:\n{facts}",
        role = truncate_chars(role.trim(), MAX_ROLE_CHARS),
        facts = facts,
    )
}
