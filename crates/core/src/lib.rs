//! Tubekit Core Library
//!
//! Builds prompts from a video description, asks a hosted model for titles,
//! a description, tags and thumbnail concepts, and parses the answers into a
//! per-session state that can be exported.

pub mod analyzer;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod session;
pub mod types;

// Re-export commonly used items at crate root
pub use analyzer::analyze;
pub use client::{
    FailureKind, GenerationClient, GenerationError, HttpGenerationClient, RetryPolicy,
    generate_with_retry,
};
pub use config::{ENDPOINTS, Endpoint, Provider, default_secrets_path, resolve_api_key};
pub use error::{Result, TubekitError};
pub use export::{ExportFormat, write_export};
pub use format::format_session_readable;
pub use parse::{DEFAULT_MAX_TITLES, extract_tags, extract_titles};
pub use pipeline::{GenerationOptions, Pipeline, ProgressSink, RunReport};
pub use session::SessionState;
pub use types::{
    ContentMetrics, GenerationRequest, GenerationStep, HistoryEntry, TagSet, TargetAudience,
    Tone, VideoLength, VideoType,
};
