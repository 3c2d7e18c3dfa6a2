//! Review API client.
//!
//! One authenticated GET per cycle; retry policy lives in the poll loop.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use homework_common::error::BotError;

/// Source of raw homework-status responses.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Fetch submissions reviewed at or after `from_date` (Unix seconds).
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, BotError>;
}

/// HTTP client for the homework-status endpoint.
pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl PracticumClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Config(format!("не удалось создать HTTP-клиент: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }
}

#[async_trait]
impl ReviewApi for PracticumClient {
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, BotError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("from_date", from_date)]);

        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("OAuth {}", token));
        }

        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, "Review API request failed");
            // The URL carries `from_date`, which changes every cycle.
            BotError::Connection {
                status: None,
                message: e.without_url().to_string(),
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "Review API answered with non-OK status");
            return Err(BotError::Connection {
                status: Some(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            BotError::MalformedResponse(format!("тело ответа не JSON: {}", e.without_url()))
        })
    }
}
