use crate::scoring::{CandidateMetrics, Tier};
use crate::stats::PoolStats;
use chrono::{DateTime, Local};
use std::fmt::Write;

pub const DEFAULT_TOP_N: usize = 5;

/// Everything a rendered report needs. Rendering is pure; the same context
/// always produces the same bytes.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub generated_at: DateTime<Local>,
    pub summary: &'a str,
    pub stats: &'a PoolStats,
    pub ranked: &'a [CandidateMetrics],
    pub top_n: usize,
}

const STYLE: &str = "\
body { font-family: 'Segoe UI', Arial, sans-serif; line-height: 1.6; color: #333; background: #f4f4f4; padding: 20px; }
.container { max-width: 800px; margin: 0 auto; background: #fff; padding: 30px; border-radius: 8px; }
.header { border-bottom: 2px solid #2c3e50; padding-bottom: 16px; margin-bottom: 16px; }
.header h1 { margin: 0; color: #2c3e50; font-size: 24px; }
.timestamp { color: #7f8c8d; font-size: 14px; }
.section-title { background: #3498db; color: #fff; padding: 8px 14px; border-radius: 4px; margin-top: 28px; font-weight: bold; }
.summary { background: #f8f9fa; border-left: 5px solid #3498db; padding: 16px; margin: 16px 0; white-space: pre-line; }
.metrics { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 12px; margin: 16px 0; }
.metric { border: 1px solid #e0e0e0; padding: 12px; text-align: center; border-radius: 6px; }
.metric-val { font-size: 24px; font-weight: bold; color: #2c3e50; }
.metric-lbl { font-size: 12px; color: #7f8c8d; text-transform: uppercase; }
.candidate { border: 1px solid #eee; padding: 12px; margin-bottom: 10px; border-radius: 6px; }
.cand-name { font-size: 18px; font-weight: bold; color: #2980b9; }
.cand-meta { font-size: 14px; color: #555; }
.cand-note { font-size: 13px; color: #e67e22; }
.badge { display: inline-block; padding: 2px 8px; border-radius: 12px; font-size: 11px; color: #fff; margin-left: 8px; }
.badge-EXCELLENT { background: #27ae60; }
.badge-GOOD { background: #2980b9; }
.badge-AVERAGE { background: #f39c12; }
.badge-WEAK { background: #c0392b; }
";

pub fn render_html(ctx: &ReportContext) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{style}</style>\n</head>\n<body>\n<div class=\"container\">\n\
         <div class=\"header\"><h1>{title}</h1><div class=\"timestamp\">Generated {timestamp}</div></div>\n",
        title = escape_html(ctx.title),
        style = STYLE,
        timestamp = ctx.generated_at.format("%Y-%m-%d %H:%M"),
    );

    html.push_str("<div class=\"metrics\">\n");
    for (value, label) in headline_metrics(ctx.stats) {
        let _ = writeln!(
            html,
            "<div class=\"metric\"><div class=\"metric-val\">{}</div><div class=\"metric-lbl\">{}</div></div>",
            escape_html(&value),
            label
        );
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"section-title\">Executive Summary</div>\n");
    let _ = writeln!(html, "<div class=\"summary\">{}</div>", escape_html(ctx.summary.trim()));

    let _ = writeln!(
        html,
        "<div class=\"section-title\">Top {} Candidates</div>",
        ctx.top_n.min(ctx.ranked.len())
    );
    if ctx.ranked.is_empty() {
        html.push_str("<p>No candidates were found in the source.</p>\n");
    }
    for candidate in ctx.ranked.iter().take(ctx.top_n) {
        html.push_str(&candidate_card(candidate));
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn candidate_card(candidate: &CandidateMetrics) -> String {
    let tier = candidate.tier.label();
    let email = if candidate.email.is_empty() {
        "N/A"
    } else {
        candidate.email.as_str()
    };

    let mut card = String::new();
    let _ = writeln!(
        card,
        "<div class=\"candidate\">\n<div class=\"cand-name\">{name} <span class=\"badge badge-{tier}\">{tier}</span> {score:.0}/100</div>",
        name = escape_html(&candidate.name),
        tier = tier,
        score = candidate.score,
    );
    let _ = writeln!(
        card,
        "<div class=\"cand-meta\">{} | {:.0} years exp | Match: {:.0}% | Availability: {}</div>",
        escape_html(email),
        candidate.years_experience,
        candidate.match_percentage,
        availability_label(candidate),
    );
    for (label, text) in [
        ("Strength", &candidate.commentary.strength),
        ("Risk", &candidate.commentary.risk),
        ("Reasoning", &candidate.commentary.reasoning),
    ] {
        if let Some(text) = text {
            let _ = writeln!(
                card,
                "<div class=\"cand-note\">{}: {}</div>",
                label,
                escape_html(text)
            );
        }
    }
    card.push_str("</div>\n");
    card
}

/// Plain-text alternative body for mail clients without HTML.
pub fn render_plain(ctx: &ReportContext) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", ctx.title);
    let _ = writeln!(text, "Generated {}\n", ctx.generated_at.format("%Y-%m-%d %H:%M"));

    for (value, label) in headline_metrics(ctx.stats) {
        let _ = writeln!(text, "{}: {}", label, value);
    }

    let _ = writeln!(text, "\n{}\n", ctx.summary.trim());

    for (idx, candidate) in ctx.ranked.iter().take(ctx.top_n).enumerate() {
        let _ = writeln!(
            text,
            "{}. {} [{}] {:.0}/100 - {:.0} years, {:.0}% match, {}",
            idx + 1,
            candidate.name,
            candidate.tier,
            candidate.score,
            candidate.years_experience,
            candidate.match_percentage,
            availability_label(candidate),
        );
    }
    text
}

fn headline_metrics(stats: &PoolStats) -> Vec<(String, &'static str)> {
    match stats.summary() {
        None => vec![
            ("0".to_string(), "Total Profiles"),
            ("0".to_string(), "Available Now"),
            ("-".to_string(), "Avg Match"),
        ],
        Some(stats) => {
            let top_tier = stats
                .tier_distribution
                .get(&Tier::Excellent)
                .copied()
                .unwrap_or(0);
            vec![
                (stats.total_candidates.to_string(), "Total Profiles"),
                (stats.available_now.to_string(), "Available Now"),
                (format!("{:.0}%", stats.average_match_percentage), "Avg Match"),
                (format!("{:.1}", stats.average_years), "Avg Years"),
                (top_tier.to_string(), "Excellent"),
            ]
        }
    }
}

fn availability_label(candidate: &CandidateMetrics) -> String {
    if candidate.available {
        "immediate".to_string()
    } else {
        format!("{} days", candidate.availability_days)
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::Commentary;
    use crate::scoring::ranked::tests::sample;
    use crate::stats::aggregate;
    use chrono::TimeZone;

    fn context<'a>(ranked: &'a [CandidateMetrics], stats: &'a PoolStats) -> ReportContext<'a> {
        ReportContext {
            title: "Recruitment report",
            generated_at: Local.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap(),
            summary: "Strong pool.",
            stats,
            ranked,
            top_n: DEFAULT_TOP_N,
        }
    }

    #[test]
    fn test_render_html_contains_cards_and_metrics() {
        let mut alice = sample(0, "Alice", 88.0);
        alice.commentary = Commentary {
            strength: Some("Deep SQL".to_string()),
            risk: None,
            reasoning: Some("Fits the role".to_string()),
        };
        let ranked = vec![alice, sample(1, "Bob", 50.0)];
        let stats = aggregate(&ranked);
        let html = render_html(&context(&ranked, &stats));

        assert!(html.contains("<title>Recruitment report</title>"));
        assert!(html.contains("Generated 2024-02-01 09:30"));
        assert!(html.contains("badge badge-EXCELLENT"));
        assert!(html.contains("badge badge-AVERAGE"));
        assert!(html.contains("Strength: Deep SQL"));
        assert!(!html.contains("Risk:"));
        assert!(html.contains("<div class=\"metric-val\">2</div>"));
        assert!(html.contains("Top 2 Candidates"));
    }

    #[test]
    fn test_render_html_limits_to_top_n() {
        let ranked: Vec<CandidateMetrics> = (0..8)
            .map(|i| sample(i, &format!("Cand{}", i), 90.0 - i as f64))
            .collect();
        let stats = aggregate(&ranked);
        let html = render_html(&context(&ranked, &stats));
        assert!(html.contains("Cand4"));
        assert!(!html.contains("Cand5"));
    }

    #[test]
    fn test_render_html_escapes_untrusted_text() {
        let ranked = vec![sample(0, "<script>alert(1)</script>", 70.0)];
        let stats = aggregate(&ranked);
        let html = render_html(&context(&ranked, &stats));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_empty_pool() {
        let stats = PoolStats::Empty;
        let html = render_html(&context(&[], &stats));
        assert!(html.contains("No candidates were found"));
        let plain = render_plain(&context(&[], &stats));
        assert!(plain.contains("Total Profiles: 0"));
    }

    #[test]
    fn test_render_plain() {
        let ranked = vec![sample(0, "Alice", 88.0)];
        let stats = aggregate(&ranked);
        let plain = render_plain(&context(&ranked, &stats));
        assert!(plain.starts_with("Recruitment report\n"));
        assert!(plain.contains("1. Alice [EXCELLENT] 88/100"));
        assert!(plain.contains("immediate"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#39;s");
    }
}
