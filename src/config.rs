//! Configuration types for question analysis.
//!
//! All pipeline behaviour is controlled through [`AnalysisConfig`], built via
//! its [`AnalysisConfigBuilder`]. The two API keys are the only secrets in
//! the process; they are read once at start-up and handed to the
//! [`crate::analyze::Analyzer`] explicitly rather than looked up globally,
//! so tests can run with fake keys against a fake transport.

use crate::error::RecurioError;
use crate::prompts::PromptVariant;
use std::fmt;

/// Default OCR endpoint (OCR.space).
pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";

/// Default chat-completion endpoint (OpenRouter, OpenAI-compatible).
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

/// Environment variable holding the OCR API key.
pub const ENV_OCR_API_KEY: &str = "OCR_API_KEY";

/// Environment variable holding the completion API key.
pub const ENV_COMPLETION_API_KEY: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "RECURIO_MODEL";

/// Configuration for analysing one batch of uploads.
///
/// Built via [`AnalysisConfig::builder()`], [`AnalysisConfig::from_env()`]
/// or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use recurio::{AnalysisConfig, PromptVariant};
///
/// let config = AnalysisConfig::builder()
///     .completion_api_key("sk-or-test")
///     .prompt_variant(PromptVariant::TopTen)
///     .build()
///     .unwrap();
/// assert_eq!(config.prompt_variant, PromptVariant::TopTen);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Key sent as the `apikey` form field of every OCR request.
    pub ocr_api_key: String,

    /// Bearer token for the completion API.
    ///
    /// An empty key is not rejected here: the API answers 401 and that
    /// status is shown to the user like any other upstream error.
    pub completion_api_key: String,

    /// OCR service URL. Default: [`DEFAULT_OCR_ENDPOINT`].
    pub ocr_endpoint: String,

    /// `language` form field. Default: `eng`.
    pub ocr_language: String,

    /// `OCREngine` form field. Default: `2`.
    pub ocr_engine: String,

    /// Chat-completion URL. Default: [`DEFAULT_COMPLETION_ENDPOINT`].
    pub completion_endpoint: String,

    /// Model identifier sent in the request body. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Instruction template appended to the corpus.
    pub prompt_variant: PromptVariant,

    /// Reduce uploaded filenames to a safe basename before use. Default: true.
    pub sanitize_filenames: bool,

    /// Files extracted at once. Default: 1 (strictly sequential).
    ///
    /// Output order is upload order regardless of this value.
    pub extract_concurrency: usize,

    /// Per-request timeout for OCR calls in seconds. Default: 60.
    pub ocr_timeout_secs: u64,

    /// Per-request timeout for the completion call in seconds. Default: 120.
    pub completion_timeout_secs: u64,

    /// Largest accepted request body on the upload route. Default: 32 MiB.
    pub max_upload_bytes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ocr_api_key: String::new(),
            completion_api_key: String::new(),
            ocr_endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
            ocr_language: "eng".to_string(),
            ocr_engine: "2".to_string(),
            completion_endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt_variant: PromptVariant::default(),
            sanitize_filenames: true,
            extract_concurrency: 1,
            ocr_timeout_secs: 60,
            completion_timeout_secs: 120,
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("ocr_api_key", &redact(&self.ocr_api_key))
            .field("completion_api_key", &redact(&self.completion_api_key))
            .field("ocr_endpoint", &self.ocr_endpoint)
            .field("ocr_language", &self.ocr_language)
            .field("ocr_engine", &self.ocr_engine)
            .field("completion_endpoint", &self.completion_endpoint)
            .field("model", &self.model)
            .field("prompt_variant", &self.prompt_variant)
            .field("sanitize_filenames", &self.sanitize_filenames)
            .field("extract_concurrency", &self.extract_concurrency)
            .field("ocr_timeout_secs", &self.ocr_timeout_secs)
            .field("completion_timeout_secs", &self.completion_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults plus the keys (and optional model) found in the environment.
    ///
    /// Missing variables leave the field at its default; nothing is validated.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var(ENV_OCR_API_KEY) {
            config.ocr_api_key = key;
        }
        if let Ok(key) = std::env::var(ENV_COMPLETION_API_KEY) {
            config.completion_api_key = key;
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        config
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn ocr_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.ocr_api_key = key.into();
        self
    }

    pub fn completion_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.completion_api_key = key.into();
        self
    }

    pub fn ocr_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.ocr_endpoint = url.into();
        self
    }

    pub fn ocr_language(mut self, language: impl Into<String>) -> Self {
        self.config.ocr_language = language.into();
        self
    }

    pub fn ocr_engine(mut self, engine: impl Into<String>) -> Self {
        self.config.ocr_engine = engine.into();
        self
    }

    pub fn completion_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.completion_endpoint = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn prompt_variant(mut self, variant: PromptVariant) -> Self {
        self.config.prompt_variant = variant;
        self
    }

    pub fn sanitize_filenames(mut self, v: bool) -> Self {
        self.config.sanitize_filenames = v;
        self
    }

    pub fn extract_concurrency(mut self, n: usize) -> Self {
        self.config.extract_concurrency = n;
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout_secs = secs;
        self
    }

    pub fn completion_timeout_secs(mut self, secs: u64) -> Self {
        self.config.completion_timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Empty API keys are accepted.
    pub fn build(self) -> Result<AnalysisConfig, RecurioError> {
        let c = &self.config;
        if c.ocr_endpoint.trim().is_empty() {
            return Err(RecurioError::InvalidConfig("OCR endpoint must not be empty".into()));
        }
        if c.completion_endpoint.trim().is_empty() {
            return Err(RecurioError::InvalidConfig(
                "Completion endpoint must not be empty".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(RecurioError::InvalidConfig("Model must not be empty".into()));
        }
        if c.extract_concurrency == 0 {
            return Err(RecurioError::InvalidConfig(
                "Extraction concurrency must be ≥ 1".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(RecurioError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on, e.g. `127.0.0.1:5000`.
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
        }
    }
}
