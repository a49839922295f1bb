//! Sanitize service - orchestrates one masking request
//!
//! Validates the request, asks the entity source for entities, and runs the
//! masking engine, all under a request-wide time budget. Everything that can
//! be rejected without calling the detector is rejected first.

use crate::adapters::language::{EntitySource, LanguageClient};
use crate::config::ScrubberConfig;
use crate::domain::{Result, ScrubError};
use crate::masking::{MaskingEngine, MaskingOutcome, MaskingPolicy};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// Language hint meaning "let the detector decide"
pub const AUTO_LANGUAGE: &str = "auto";

/// Body of a sanitize request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SanitizeRequest {
    /// Text to mask
    #[serde(default)]
    pub text: String,

    /// `redact`, `pseudo` or `hash`; the configured default when absent
    #[serde(default)]
    pub policy: Option<String>,

    /// ISO language code or `auto`; the configured default when absent
    #[serde(default)]
    pub language: Option<String>,
}

impl SanitizeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Masking service shared by the HTTP handlers and the CLI
pub struct ScrubService {
    engine: MaskingEngine,
    source: Arc<dyn EntitySource>,
    request_timeout: Duration,
}

impl ScrubService {
    /// Create a service from an engine and an entity source
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the source reports offsets in a
    /// different unit than the engine expects.
    pub fn new(
        engine: MaskingEngine,
        source: Arc<dyn EntitySource>,
        request_timeout: Duration,
    ) -> Result<Self> {
        if engine.offset_unit() != source.offset_unit() {
            return Err(ScrubError::Configuration(format!(
                "Entity source reports {} offsets but the engine expects {}",
                source.offset_unit(),
                engine.offset_unit()
            )));
        }

        Ok(Self {
            engine,
            source,
            request_timeout,
        })
    }

    /// Create a service backed by the configured language service
    pub fn from_config(config: &ScrubberConfig) -> Result<Self> {
        config
            .require_detector()
            .map_err(ScrubError::Configuration)?;

        let client = LanguageClient::new(&config.language)?;
        let engine = MaskingEngine::new(config.masking.clone(), config.language.string_index_type)?;

        Self::new(
            engine,
            Arc::new(client),
            Duration::from_secs(config.server.request_timeout_seconds),
        )
    }

    /// Masking engine
    pub fn engine(&self) -> &MaskingEngine {
        &self.engine
    }

    /// Parse a policy name, falling back to the configured default
    pub fn resolve_policy(&self, policy: Option<&str>) -> Result<MaskingPolicy> {
        match policy {
            Some(name) => MaskingPolicy::from_str(name),
            None => Ok(self.engine.config().default_policy),
        }
    }

    /// Resolve the language hint passed to the entity source
    ///
    /// `None` means the source should detect the language.
    pub fn resolve_language(&self, language: Option<&str>) -> Result<Option<String>> {
        let language = match language.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang,
            _ => self.engine.config().default_language.trim(),
        };

        if language.eq_ignore_ascii_case(AUTO_LANGUAGE) {
            return Ok(None);
        }

        let well_formed = language.len() <= 16
            && language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(ScrubError::InvalidInput(
                "Invalid 'language'. Use an ISO language code or 'auto'.".to_string(),
            ));
        }

        Ok(Some(language.to_string()))
    }

    /// Mask the text of `request`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` / `InvalidPolicy` before any detection call
    /// - `UpstreamDetection` when the entity source fails
    /// - `Timeout` when the request budget is exceeded
    pub async fn sanitize(&self, request: &SanitizeRequest) -> Result<MaskingOutcome> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("sanitize", request_id = %request_id);

        let result = self.process(&request_id, request).instrument(span).await;
        if let Err(ref e) = result {
            crate::log_request_failed!(request_id, e);
        }
        result
    }

    async fn process(&self, request_id: &str, request: &SanitizeRequest) -> Result<MaskingOutcome> {
        let policy = self.resolve_policy(request.policy.as_deref())?;
        let language = self.resolve_language(request.language.as_deref())?;
        self.engine.validate_text(&request.text)?;

        let work = async {
            let detection = self
                .source
                .detect(&request.text, language.as_deref())
                .await?;
            self.engine
                .mask_detection(request_id, &request.text, &detection, policy)
        };

        match tokio::time::timeout(self.request_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(ScrubError::Timeout(format!(
                "Request exceeded {}ms",
                self.request_timeout.as_millis()
            ))),
        }
    }
}
