pub mod analyzer;
pub mod api;
pub mod call_log;
pub mod config;
pub mod error;
pub mod llm;

use std::sync::Arc;
use analyzer::Analyzer;
use call_log::CallLog;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub call_log: Arc<CallLog>,
}
