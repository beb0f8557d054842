use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{CandidateMetrics, CandidateStatus, Tier};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a composite score with one decimal, trailing ".0" trimmed.
/// If incomplete is true, appends asterisk to indicate partial scoring
pub fn format_score(score: f64, incomplete: bool) -> String {
    let formatted = format!("{:.1}", score);
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);

    if incomplete {
        format!("{}*", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn colored_tier(tier: Tier, use_colors: bool) -> String {
    let padded = format!("{:<9}", tier.label());
    if !use_colors {
        return padded;
    }
    match tier {
        Tier::Excellent => padded.green().bold().to_string(),
        Tier::Good => padded.cyan().to_string(),
        Tier::Average => padded.yellow().to_string(),
        Tier::Weak => padded.red().to_string(),
    }
}

fn availability_label(candidate: &CandidateMetrics) -> String {
    if candidate.available {
        "now".to_string()
    } else {
        format!("{}d", candidate.availability_days)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the ranking as a table with columns: Index, Score, Tier, Match,
/// Availability, Name. No headers.
/// Score column is right-aligned, 6 chars wide (fits "100.0*")
pub fn format_scored_table(candidates: &[CandidateMetrics], use_colors: bool) -> String {
    if candidates.is_empty() {
        return "No candidates found.".to_string();
    }

    let term_width = get_terminal_width();
    let score_width = 6;
    let separator = "  ";
    // index(3) + space + score + tier(9) + match(4) + avail(4) + separators
    let fixed_width = 3 + 1 + score_width + 9 + 4 + 4 + separator.len() * 4;

    candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!(
                "{:>width$}",
                format_score(candidate.score, candidate.incomplete),
                width = score_width
            );
            let match_str = format!("{:>3.0}%", candidate.match_percentage);
            let avail_str = format!("{:>4}", availability_label(candidate));

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&candidate.name, width - fixed_width)
                }
                Some(_) => truncate_name(&candidate.name, 20),
                None => candidate.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    colored_tier(candidate.tier, true),
                    separator,
                    match_str,
                    separator,
                    avail_str.dimmed(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str,
                    score_padded,
                    separator,
                    colored_tier(candidate.tier, false),
                    separator,
                    match_str,
                    separator,
                    avail_str,
                    separator,
                    name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: rank, score, tier, name, email, years, match_pct, availability_days, status
/// (no headers, no colors)
pub fn format_tsv(candidates: &[CandidateMetrics]) -> String {
    if candidates.is_empty() {
        return String::new();
    }

    candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            format!(
                "{}\t{:.2}\t{}\t{}\t{}\t{}\t{:.2}\t{}\t{}",
                idx + 1,
                c.score,
                c.tier,
                c.name,
                c.email,
                c.years_experience,
                c.match_percentage,
                c.availability_days,
                status_label(&c.status)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_label(status: &CandidateStatus) -> &'static str {
    match status {
        CandidateStatus::Scored => "scored",
        CandidateStatus::JudgeUnavailable => "judge_unavailable",
        CandidateStatus::Unreadable(_) => "unreadable",
    }
}

/// Format a single candidate with detailed multi-line output, including the
/// score breakdown.
pub fn format_candidate_detail(candidate: &CandidateMetrics, rank: usize, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let header = format!("#{} {}", rank, candidate.name);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });
    lines.push(format!(
        "  Score: {} / {}  {}",
        format_score(candidate.score, candidate.incomplete),
        format_score(candidate.breakdown.ceiling, false),
        colored_tier(candidate.tier, use_colors).trim_end()
    ));
    if !candidate.email.is_empty() {
        lines.push(format!("  Email: {}", candidate.email));
    }
    lines.push(format!(
        "  Experience: {} years (band {:.0}){}",
        candidate.years_experience,
        candidate.experience_score,
        if candidate.meets_minimum_years {
            ""
        } else {
            ", below minimum"
        }
    ));
    lines.push(format!(
        "  Skills: {}/{} ({:.1}%)",
        candidate.skill_match_count, candidate.total_required_skills, candidate.match_percentage
    ));
    lines.push(format!("  Availability: {}", availability_label(candidate)));
    match &candidate.status {
        CandidateStatus::Scored => {}
        CandidateStatus::JudgeUnavailable => {
            lines.push("  Status: judge unavailable, judge sub-scores counted as 0".to_string())
        }
        CandidateStatus::Unreadable(reason) => {
            lines.push(format!("  Status: unreadable ({})", reason))
        }
    }

    lines.push("  Breakdown:".to_string());
    for factor in &candidate.breakdown.factors {
        let delta = factor.after - factor.before;
        let line = format!(
            "    {:<24} {:>+7.2}  {}",
            factor.label, delta, factor.description
        );
        lines.push(if use_colors {
            line.dimmed().to_string()
        } else {
            line
        });
    }

    for (label, text) in [
        ("Strength", &candidate.commentary.strength),
        ("Risk", &candidate.commentary.risk),
        ("Reasoning", &candidate.commentary.reasoning),
    ] {
        if let Some(text) = text {
            lines.push(format!("  {}: {}", label, text));
        }
    }

    lines.join("\n")
}
