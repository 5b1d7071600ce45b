use super::traits::{OracleFuture, ScoringOracle};
use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::gate::Classification;
use crate::scoring::Tier;
use crate::utils::text::truncate_with_ellipsis;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;
use std::time::Duration;

const ORACLE_NAME: &str = "openai-compatible";
const MAX_HISTORY_TURNS: usize = 6;

const SCORE_PROMPT: &str = "You rate how emotionally or intellectually deep a single chat \
message is. 0.0 means small talk or filler, 1.0 means deeply personal, reflective disclosure. \
Reply with one number between 0.0 and 1.0 and nothing else.";

const CLASSIFY_PROMPT: &str = "You judge how a user is engaging with a conversation. \
Classify the LATEST message with exactly one label: genuine (real engagement), honest_attempt \
(trying but short or unsure), dismissive (brushing the conversation off), non_engagement \
(no real content), spam (junk, ads, keyboard mashing). Reply with the label only.";

/// Scoring oracle backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct HttpOracle {
    base_url: String,
    model: String,
    temperature: f64,
    auth_header: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HttpOracle {
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            auth_header: config
                .api_key
                .as_deref()
                .filter(|key| !key.is_empty())
                .map(|key| format!("Bearer {key}")),
            client: Client::builder()
                // The engine enforces the real budget; this only reclaims stuck sockets.
                .timeout(Duration::from_millis(config.timeout_ms.saturating_mul(4).max(1000)))
                .connect_timeout(Duration::from_secs(10))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn build_request(&self, system_prompt: &str, user_content: String) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: self.temperature,
            max_tokens: 8,
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url).json(request);
        if let Some(auth) = &self.auth_header {
            builder = builder.header("Authorization", auth);
        }

        let response = builder.send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Status {
                oracle: ORACLE_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ChatResponse = response.json().await.map_err(request_error)?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Parse {
                oracle: ORACLE_NAME.to_string(),
                raw: "<empty choices>".to_string(),
            })
    }
}

fn request_error(error: reqwest::Error) -> OracleError {
    OracleError::Request {
        oracle: ORACLE_NAME.to_string(),
        message: error.to_string(),
    }
}

fn parse_error(raw: &str) -> OracleError {
    OracleError::Parse {
        oracle: ORACLE_NAME.to_string(),
        raw: truncate_with_ellipsis(raw.trim(), 80),
    }
}

/// First number in the answer, e.g. "0.7", "Score: 0.70.", "0.7/1".
pub(crate) fn parse_score(raw: &str) -> Result<f64, OracleError> {
    let value = raw
        .split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .map(|token| token.trim_end_matches('.'))
        .find_map(|token| token.parse::<f64>().ok())
        .ok_or_else(|| parse_error(raw))?;

    if !value.is_finite() {
        return Err(OracleError::NonFinite {
            oracle: ORACLE_NAME.to_string(),
        });
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Label answer, tolerant of case, spacing, hyphens and trailing punctuation.
pub(crate) fn parse_classification(raw: &str) -> Result<Classification, OracleError> {
    let label = raw
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
        .replace([' ', '-'], "_");
    match Classification::from_str(&label) {
        Ok(Classification::InvalidFormat) | Err(_) => Err(parse_error(raw)),
        Ok(classification) => Ok(classification),
    }
}

impl ScoringOracle for HttpOracle {
    fn name(&self) -> &str {
        ORACLE_NAME
    }

    fn score<'a>(&'a self, text: &'a str, tier: Tier) -> OracleFuture<'a, f64> {
        Box::pin(async move {
            tracing::debug!(tier = %tier, model = %self.model, "oracle.score request");
            let request = self.build_request(SCORE_PROMPT, text.to_string());
            let answer = self.complete(&request).await?;
            parse_score(&answer)
        })
    }

    fn classify<'a>(
        &'a self,
        text: &'a str,
        history: &'a [String],
    ) -> OracleFuture<'a, Classification> {
        Box::pin(async move {
            let request = self.build_request(CLASSIFY_PROMPT, classify_content(text, history));
            let answer = self.complete(&request).await?;
            parse_classification(&answer)
        })
    }
}

/// User content for a classification request: the most recent history
/// turns, then the message being judged.
fn classify_content(text: &str, history: &[String]) -> String {
    let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);
    let mut content = String::new();
    if skip < history.len() {
        content.push_str("Earlier messages from this user:\n");
        for earlier in &history[skip..] {
            let _ = writeln!(content, "- {}", truncate_with_ellipsis(earlier, 200));
        }
        content.push('\n');
    }
    let _ = write!(content, "LATEST: {text}");
    content
}
