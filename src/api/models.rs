use serde::Deserialize;

/// Form body of `POST /analyze`. A missing field is treated like an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub transcript: String,
}

impl AnalyzeForm {
    pub fn trimmed(&self) -> &str {
        self.transcript.trim()
    }
}
