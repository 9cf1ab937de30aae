use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;
use crate::error::{AppError, Result};
use crate::llm::{ChatBackend, ChatRequest, Message, ResponseFormat};

pub const MODEL: &str = "llama-3.1-8b-instant";
pub const TEMPERATURE: f32 = 0.1;
pub const MAX_TOKENS: u32 = 200;

pub const FALLBACK_SUMMARY: &str = "Failed to generate summary.";

const SYSTEM_PROMPT: &str = "You are a sophisticated AI assistant for analyzing customer call transcripts. \
Your goal is to determine the sentiment, considering both the initial problem and the final resolution.\n\n\
**CRITICAL SENTIMENT RULES:**\n\
1. **Problem/Complaint = Negative:** If a customer calls about a company error (e.g., broken product, billing mistake), \
their sentiment starts as **Negative**. If the resolution is standard, the sentiment remains Negative.\n\
2. **The 'Exceptional Resolution' Exception:** However, if the agent provides a resolution that is far above and beyond \
a standard fix, causing the customer to express genuine delight or surprise (e.g., 'Wow, that's amazing!', \
'You've really turned this around', 'That's perfect!'), you should classify the final sentiment as **Positive**.\n\
3. **Information/Question = Neutral:** If the customer's main purpose is to ask questions or get information \
(e.g., product details, order status), the sentiment is **Neutral**. Standard politeness ('thank you') does not make it positive.\n\
4. **Praise/Compliment = Positive:** If the customer's primary reason for calling is to give a compliment, \
the sentiment is **Positive**.\n\n\
Provide your output in a clean JSON format with 'summary' and 'sentiment' keys.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unknown,
    /// Any other label the model produced, already capitalized.
    Other(String),
}

impl Sentiment {
    /// Capitalizes the raw label (first character upper, rest lower) and maps it to a known variant.
    pub fn normalize(raw: &str) -> Self {
        match capitalize(raw).as_str() {
            "Positive" => Sentiment::Positive,
            "Negative" => Sentiment::Negative,
            "Neutral" => Sentiment::Neutral,
            "Unknown" => Sentiment::Unknown,
            other => Sentiment::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Unknown => "Unknown",
            Sentiment::Other(label) => label,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub summary: String,
    pub sentiment: Sentiment,
}

impl AnalysisResult {
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            sentiment: Sentiment::Unknown,
        }
    }
}

/// What the model's reply turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Analyzed(AnalysisResult),
    /// The reply was not a usable JSON object; `reason` describes why.
    ParseFailure { reason: String },
}

impl AnalysisOutcome {
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, AnalysisOutcome::ParseFailure { .. })
    }

    /// The result to show and log; parse failures collapse to the fixed fallback.
    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Analyzed(result) => result,
            AnalysisOutcome::ParseFailure { .. } => AnalysisResult::fallback(),
        }
    }
}

pub struct Analyzer {
    backend: Option<Arc<dyn ChatBackend>>,
}

impl Analyzer {
    pub fn new(backend: Option<Arc<dyn ChatBackend>>) -> Self {
        Self { backend }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Sends one completion request for `transcript` and interprets the reply.
    ///
    /// Fails with [`AppError::ConnectionError`] when no client exists, with
    /// [`AppError::LlmError`] when the request itself fails, and with
    /// [`AppError::ParseError`] for reply shapes [`parse_reply`] rejects.
    pub async fn analyze(&self, transcript: &str) -> Result<AnalysisOutcome> {
        let backend = self.backend.as_ref().ok_or(AppError::ConnectionError)?;

        let reply = backend.complete(&build_request(transcript)).await?;

        let outcome = parse_reply(&reply)?;
        if let AnalysisOutcome::ParseFailure { reason } = &outcome {
            warn!("Error parsing Groq API response: {}", reason);
        }
        Ok(outcome)
    }
}

pub fn build_request(transcript: &str) -> ChatRequest {
    ChatRequest {
        model: MODEL.to_string(),
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!(
                "Please analyze the following transcript:\n\n---START OF TRANSCRIPT---\n{}\n---END OF TRANSCRIPT---",
                transcript
            )),
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        response_format: ResponseFormat::json_object(),
    }
}

/// Interprets the model's reply.
///
/// Invalid JSON and a missing `summary` become [`AnalysisOutcome::ParseFailure`].
/// A body that is not an object, or a `sentiment` that is present but not a
/// string, is an [`AppError::ParseError`] and nothing gets logged for it.
pub fn parse_reply(reply: &str) -> Result<AnalysisOutcome> {
    let failure = |reason: String| -> Result<AnalysisOutcome> { Ok(AnalysisOutcome::ParseFailure { reason }) };

    let value: Value = match serde_json::from_str(reply) {
        Ok(value) => value,
        Err(e) => return failure(e.to_string()),
    };
    let Some(object) = value.as_object() else {
        return Err(AppError::ParseError(format!("expected a JSON object, got {}", kind_of(&value))));
    };

    let sentiment = match object.get("sentiment") {
        None => Sentiment::Unknown,
        Some(Value::String(label)) => Sentiment::normalize(label),
        Some(other) => {
            return Err(AppError::ParseError(format!(
                "'sentiment' must be a string, got {}",
                kind_of(other)
            )));
        }
    };

    let summary = match object.get("summary") {
        Some(Value::String(summary)) => summary.clone(),
        Some(_) => return failure("'summary' is not a string".to_string()),
        None => return failure("missing key 'summary'".to_string()),
    };

    Ok(AnalysisOutcome::Analyzed(AnalysisResult { summary, sentiment }))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
