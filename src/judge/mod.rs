pub mod client;
pub mod prompt;
pub mod response;

pub use client::{Judge, JudgeError, OllamaJudge};
pub use prompt::{build_candidate_prompt, build_summary_prompt};
pub use response::{extract_json_object, parse_verdict, Commentary, JudgeVerdict};
