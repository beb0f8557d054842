use crate::candidates::{load_candidates, read_document, CandidateRecord, Document, SourceError};
use crate::config::{Config, RunConfig};
use crate::delivery::{DeliveryError, DeliveryReceipt, DeliveryRouter, RenderedReport};
use crate::judge::{
    build_candidate_prompt, build_summary_prompt, extract_json_object, parse_verdict, Commentary,
    Judge,
};
use crate::metrics::{AvailabilityEvaluator, SignalExtractor, SkillMatchEngine};
use crate::report::{render_html, render_plain, ReportContext};
use crate::scoring::{
    calculate_score, rank, CandidateMetrics, CandidateStatus, ScoreResult, ScoreSchema,
    ScoringMode, Tier,
};
use crate::stats::{aggregate, AggregateStats, PoolStats};
use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;

// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NO_DATA: i32 = 2;
pub const EXIT_PARTIAL: i32 = 3;
pub const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Source was readable but held no candidates.
    NoData,
    /// Results were produced but something degraded along the way.
    Partial,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => EXIT_SUCCESS,
            RunStatus::NoData => EXIT_NO_DATA,
            RunStatus::Partial => EXIT_PARTIAL,
        }
    }

    /// Fold a delivery receipt into the status: a fallback after a
    /// transmission fault makes the run partial.
    pub fn with_receipt(self, receipt: &DeliveryReceipt) -> Self {
        match self {
            RunStatus::Success if receipt.fell_back => RunStatus::Partial,
            other => other,
        }
    }
}

/// Result of scoring and ranking the whole pool.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub ranked: Vec<CandidateMetrics>,
    pub stats: PoolStats,
    pub summary: String,
    pub status: RunStatus,
}

impl Evaluation {
    pub fn degraded(&self) -> usize {
        self.ranked.iter().filter(|c| c.status.is_degraded()).count()
    }
}

/// One run over a candidate source. Candidates are processed sequentially;
/// the judge call is the only await point per candidate.
pub struct Pipeline<'a, J> {
    config: &'a Config,
    run: &'a RunConfig,
    judge: Option<&'a J>,
    extractor: SignalExtractor,
    schema: ScoreSchema,
}

impl<'a, J: Judge> Pipeline<'a, J> {
    pub fn new(config: &'a Config, run: &'a RunConfig, judge: Option<&'a J>, today: NaiveDate) -> Self {
        let extractor = SignalExtractor::new(
            SkillMatchEngine::new(&run.required_skills),
            AvailabilityEvaluator::new(
                config.availability.policy,
                config.availability.default_lag_days,
                today,
            ),
            run.min_years,
        );

        Self {
            config,
            run,
            judge,
            extractor,
            schema: config.scoring.schema(),
        }
    }

    /// Load, score, rank and summarise every candidate in the source.
    pub async fn evaluate(&self) -> Result<Evaluation, SourceError> {
        let records = load_candidates(&self.run.source)?;
        tracing::info!(
            source = %self.run.source.display(),
            candidates = records.len(),
            "loaded candidates"
        );

        if records.is_empty() {
            return Ok(Evaluation {
                ranked: Vec::new(),
                stats: PoolStats::Empty,
                summary: deterministic_summary(&PoolStats::Empty),
                status: RunStatus::NoData,
            });
        }

        let ranked = self.rank_records(&records).await;
        let stats = aggregate(&ranked);
        let summary = self.summarize(&stats).await;

        let status = if ranked.iter().any(|c| c.status.is_degraded()) {
            RunStatus::Partial
        } else {
            RunStatus::Success
        };

        Ok(Evaluation {
            ranked,
            stats,
            summary,
            status,
        })
    }

    pub async fn rank_records(&self, records: &[CandidateRecord]) -> Vec<CandidateMetrics> {
        let mut scored = Vec::with_capacity(records.len());
        for record in records {
            scored.push(self.score_record(record).await);
        }
        rank(scored)
    }

    /// Score one candidate. Never fails: unreadable documents and judge
    /// faults degrade the result instead.
    pub async fn score_record(&self, record: &CandidateRecord) -> CandidateMetrics {
        let candidate_text = match record.document_path() {
            Some(path) => match read_document(&path, self.document_dir().as_deref()) {
                Document::Text(text) => text,
                Document::Unreadable(reason) => {
                    tracing::warn!(candidate = %record.name(), %reason, "document unreadable");
                    return CandidateMetrics::new(
                        record,
                        self.extractor.unreadable(),
                        ScoreResult::zero(&self.config.scoring, &reason),
                        CandidateStatus::Unreadable(reason),
                        Commentary::note("Document could not be read."),
                    );
                }
            },
            None => record.summary_json(),
        };

        let signals = self.extractor.extract(record);

        let (verdict, status) = match self.scoring_judge() {
            None => (None, CandidateStatus::Scored),
            Some(judge) => {
                let prompt = build_candidate_prompt(&self.config.role, &candidate_text, &self.schema);
                match judge.generate(&prompt).await {
                    Ok(text) => match parse_verdict(&text) {
                        Some(verdict) => (Some(verdict), CandidateStatus::Scored),
                        None => {
                            tracing::warn!(candidate = %record.name(), "judge response had no JSON object");
                            (None, CandidateStatus::JudgeUnavailable)
                        }
                    },
                    Err(e) => {
                        tracing::warn!(candidate = %record.name(), error = %e, "judge call failed");
                        (None, CandidateStatus::JudgeUnavailable)
                    }
                }
            }
        };

        let result = calculate_score(
            record,
            &signals,
            verdict.as_ref().map(|v| &v.scores),
            &self.config.scoring,
        );
        tracing::debug!(candidate = %record.name(), score = result.score, tier = %result.tier, "scored");

        CandidateMetrics::new(
            record,
            signals,
            result,
            status,
            verdict.map(|v| v.commentary).unwrap_or_default(),
        )
    }

    /// Executive summary of the pool: from the judge when enabled, otherwise
    /// (or on any judge fault) a deterministic one.
    pub async fn summarize(&self, stats: &PoolStats) -> String {
        let (Some(judge), Some(stats_summary)) = (self.judge, stats.summary()) else {
            return deterministic_summary(stats);
        };
        if !self.config.judge.as_ref().is_some_and(|j| j.summary) {
            return deterministic_summary(stats);
        }

        let prompt = build_summary_prompt(&self.config.role, stats_summary);
        match judge.generate(&prompt).await {
            Ok(text) => {
                let summary = extract_json_object(&text)
                    .and_then(|obj| obj.get("summary").and_then(|s| s.as_str()).map(str::to_string))
                    .filter(|s| !s.trim().is_empty());
                match summary {
                    Some(summary) => summary.trim().to_string(),
                    None => {
                        tracing::warn!("judge summary had no usable text");
                        deterministic_summary(stats)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "judge summary failed");
                deterministic_summary(stats)
            }
        }
    }

    /// The judge, when some declared sub-score actually reads its output.
    /// Weighted mode and rubrics without judged sub-scores never call it.
    fn scoring_judge(&self) -> Option<&'a J> {
        let uses_judge =
            self.config.scoring.mode == ScoringMode::Rubric && self.schema.has_judge_inputs();
        self.judge.filter(|_| uses_judge)
    }

    /// Relative document paths resolve against the source file's directory.
    fn document_dir(&self) -> Option<PathBuf> {
        self.run
            .source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
    }
}

pub fn deterministic_summary(stats: &PoolStats) -> String {
    let Some(stats) = stats.summary() else {
        return "No candidates were found in the source.".to_string();
    };
    summary_from(stats)
}

fn summary_from(stats: &AggregateStats) -> String {
    let count = |tier: Tier| stats.tier_distribution.get(&tier).copied().unwrap_or(0);
    let mut summary = format!(
        "{} candidates assessed: {} excellent, {} good, {} average, {} weak.\n\
         Average experience {:.1} years, average skill match {:.0}%, {} available immediately.",
        stats.total_candidates,
        count(Tier::Excellent),
        count(Tier::Good),
        count(Tier::Average),
        count(Tier::Weak),
        stats.average_years,
        stats.average_match_percentage,
        stats.available_now,
    );
    if let Some(top) = stats.top_candidates.first() {
        summary.push_str(&format!(
            "\nTop candidate: {} ({:.1}, {}).",
            top.name, top.score, top.tier
        ));
    }
    summary
}

/// Render the report and hand it to the router.
pub async fn deliver_report(
    config: &Config,
    run: &RunConfig,
    evaluation: &Evaluation,
    router: &DeliveryRouter,
    generated_at: DateTime<Local>,
) -> Result<DeliveryReceipt, DeliveryError> {
    let shown = config.report.top_n.min(evaluation.ranked.len());
    let subject = config
        .delivery
        .subject
        .clone()
        .unwrap_or_else(|| format!("Recruitment report - top {} candidates", shown));

    let ctx = ReportContext {
        title: &subject,
        generated_at,
        summary: &evaluation.summary,
        stats: &evaluation.stats,
        ranked: &evaluation.ranked,
        top_n: config.report.top_n,
    };
    let report = RenderedReport {
        subject: subject.clone(),
        plain: render_plain(&ctx),
        html: render_html(&ctx),
    };

    router.deliver(&report, &run.recipients).await
}
