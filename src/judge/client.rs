use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("judge request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("judge returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("judge returned an empty response")]
    Empty,
}

/// Free-text generation capability used to grade candidates.
///
/// One call per prompt, no retries. Implementations must bound the call with
/// a timeout.
pub trait Judge {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, JudgeError>> + Send;
}

/// Judge backed by an Ollama-compatible `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaJudge {
    base_url: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'static str,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Options {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaJudge {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self, JudgeError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .build()?;

        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl Judge for OllamaJudge {
    async fn generate(&self, prompt: &str) -> Result<String, JudgeError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: Options { temperature: 0.0 },
        };

        tracing::debug!(model = %self.model, chars = prompt.len(), "sending judge request");
        let response = self.client.post(self.url()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: GenerateResponse = response.json().await?;
        if body.response.trim().is_empty() {
            return Err(JudgeError::Empty);
        }
        Ok(body.response)
    }
}
