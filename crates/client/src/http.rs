//! Reqwest-based insight client.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use caller_insight_core::config::ClientConfig;
use caller_insight_core::{CallerInsight, Error, InsightClient, PhoneNumber, Result};

/// Insight client backed by one HTTP POST per lookup.
pub struct HttpInsightClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<Secret<String>>,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    phone_number: &'a str,
}

/// Backend response document. Every field may be missing or null; the
/// conversion below supplies the documented defaults.
#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    web_link: Option<String>,
    #[serde(default)]
    web_title: Option<String>,
}

impl From<AnalyzeResponse> for CallerInsight {
    fn from(r: AnalyzeResponse) -> Self {
        CallerInsight {
            risk_level: r.risk_level.unwrap_or_else(|| "unknown".to_string()),
            summary: r.summary.unwrap_or_else(|| "No info".to_string()),
            confidence: r.confidence,
            web_link: r.web_link,
            web_title: r.web_title,
        }
    }
}

impl HttpInsightClient {
    /// Build a client from configuration.
    ///
    /// The connect timeout is short, the read timeout long: the backend runs
    /// scoring on a cold path and legitimate responses can take tens of
    /// seconds, but an unreachable host must fail fast.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::network(format!("request timed out: {e}"))
    } else {
        Error::network(e.to_string())
    }
}

#[async_trait]
impl InsightClient for HttpInsightClient {
    async fn analyze(&self, number: &PhoneNumber) -> Result<CallerInsight> {
        tracing::debug!(number = %number, "Requesting caller insight");

        let mut req = self.http.post(&self.endpoint).json(&AnalyzeRequest {
            phone_number: number.as_str(),
        });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.expose_secret());
        }

        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(
                number = %number,
                status = status.as_u16(),
                "Backend rejected insight lookup"
            );
            return Err(Error::backend(status.as_u16(), body));
        }

        let parsed: AnalyzeResponse =
            serde_json::from_str(&body).map_err(|e| Error::malformed(e.to_string()))?;
        Ok(parsed.into())
    }
}
