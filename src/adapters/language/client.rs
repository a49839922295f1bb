//! Language service client
//!
//! Calls the PII entity recognition endpoint of an Azure AI Language
//! resource:
//!
//! ```text
//! POST {endpoint}/text/analytics/{api_version}/entities/recognition/pii?stringIndexType={unit}
//! Ocp-Apim-Subscription-Key: {key}
//! ```

use super::models::{PiiRequest, PiiResponse, DOCUMENT_ID};
use super::EntitySource;
use crate::config::{LanguageConfig, RetryConfig, SecretString};
use crate::domain::{Result, ScrubError};
use crate::masking::{Detection, OffsetUnit};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::time::Duration;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// HTTP client for the language service
///
/// # Example
///
/// ```no_run
/// use scrubber::adapters::language::{EntitySource, LanguageClient};
/// use scrubber::config::{secret_string, LanguageConfig};
///
/// # async fn example() -> scrubber::domain::Result<()> {
/// let config = LanguageConfig {
///     endpoint: "https://my-resource.cognitiveservices.azure.com".to_string(),
///     key: Some(secret_string("subscription-key".to_string())),
///     ..Default::default()
/// };
/// let client = LanguageClient::new(&config)?;
/// let detection = client.detect("Call 0601020304 now", None).await?;
/// println!("{} entities", detection.entities.len());
/// # Ok(())
/// # }
/// ```
pub struct LanguageClient {
    url: String,
    key: SecretString,
    unit: OffsetUnit,
    retry: RetryConfig,
    client: Client,
}

impl LanguageClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint or key is missing, or
    /// if the HTTP client cannot be built.
    pub fn new(config: &LanguageConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(ScrubError::Configuration(
                "Language service endpoint is not configured".to_string(),
            ));
        }

        let key = match config.key {
            Some(ref key) if !key.expose_secret().is_empty() => key.clone(),
            _ => {
                return Err(ScrubError::Configuration(
                    "Language service key is not configured".to_string(),
                ))
            }
        };

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .build()
            .map_err(|e| ScrubError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: format!(
                "{endpoint}/text/analytics/{}/entities/recognition/pii",
                config.api_version
            ),
            key,
            unit: config.string_index_type,
            retry: config.retry.clone(),
            client,
        })
    }

    /// Recognition endpoint URL, without query string
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request, without retrying
    async fn send_once(&self, payload: &PiiRequest) -> Result<PiiResponse> {
        let key: &str = self.key.expose_secret().as_ref();

        let resp = self
            .client
            .post(&self.url)
            .query(&[("stringIndexType", self.unit.as_str())])
            .header(SUBSCRIPTION_KEY_HEADER, key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScrubError::Timeout(format!("Language service request timed out: {e}"))
                } else {
                    ScrubError::Connection(format!("Failed to reach language service: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            return Err(ScrubError::UpstreamDetection {
                status: Some(status.as_u16()),
                message: format!("Language service returned {status}"),
                details: Some(details),
            });
        }

        resp.json::<PiiResponse>()
            .await
            .map_err(|e| ScrubError::UpstreamDetection {
                status: Some(status.as_u16()),
                message: format!("Invalid response from language service: {e}"),
                details: None,
            })
    }

    /// Retry a request with exponential backoff
    ///
    /// Only throttling, server errors, timeouts and connection failures are
    /// retried.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    attempt += 1;
                    let delay_ms = self.retry.delay_ms(attempt);
                    crate::log_retry_attempt!(attempt, max_retries, delay_ms, e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_retryable(error: &ScrubError) -> bool {
    match error {
        ScrubError::UpstreamDetection {
            status: Some(status),
            ..
        } => *status == 429 || *status >= 500,
        ScrubError::Connection(_) | ScrubError::Timeout(_) => true,
        _ => false,
    }
}

/// Report a transport failure that outlived its retries as a detector failure
fn into_detection_failure(error: ScrubError) -> ScrubError {
    match error {
        ScrubError::Connection(reason) => ScrubError::UpstreamDetection {
            status: None,
            message: "Language service is unreachable".to_string(),
            details: Some(json!({ "kind": "connection", "reason": reason })),
        },
        other => other,
    }
}

/// Pull the entities of our single document out of a response
fn extract_entities(response: PiiResponse) -> Result<Detection> {
    if !response.errors.is_empty() {
        let code = response.errors[0].error.code.clone();
        return Err(ScrubError::UpstreamDetection {
            status: None,
            message: format!("Language service rejected the document ({code})"),
            details: serde_json::to_value(&response.errors).ok(),
        });
    }

    let document = response
        .documents
        .into_iter()
        .find(|d| d.id == DOCUMENT_ID)
        .ok_or_else(|| ScrubError::upstream("Language service returned no result for the document"))?;

    if !document.warnings.is_empty() {
        tracing::warn!(
            count = document.warnings.len(),
            "Language service returned warnings"
        );
    }

    Ok(document.into_detection())
}

#[async_trait]
impl EntitySource for LanguageClient {
    async fn detect(&self, text: &str, language: Option<&str>) -> Result<Detection> {
        let payload = PiiRequest::single(text, language);

        tracing::debug!(
            language = language.unwrap_or("auto"),
            string_index_type = %self.unit,
            "Requesting PII entity recognition"
        );

        let response = self
            .retry_request(|| self.send_once(&payload))
            .await
            .map_err(into_detection_failure)?;
        let detection = extract_entities(response)?;

        tracing::debug!(
            count = detection.entities.len(),
            unreadable = detection.unreadable,
            "Language service returned entities"
        );
        Ok(detection)
    }

    fn offset_unit(&self) -> OffsetUnit {
        self.unit
    }
}
