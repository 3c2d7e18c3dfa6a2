//! Notification delivery.
//!
//! The poller only ever sees the [`Notifier`] trait: delivery is best-effort,
//! failures are logged here and never reach the caller.
//!
//! [`TelegramNotifier`] delivers through the Telegram Bot API `sendMessage`
//! method.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use homework_common::error::BotError;

/// Best-effort text delivery to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` to `chat_id`. Never fails from the caller's perspective.
    async fn notify(&self, chat_id: &str, text: &str);
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Telegram Bot API client.
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl TelegramNotifier {
    pub fn new(
        api_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Config(format!("не удалось создать HTTP-клиент: {}", e)))?;

        let api_url: String = api_url.into();

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Deliver a single message, reporting any failure.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| BotError::Config("не задан токен бота".to_string()))?;

        if chat_id.is_empty() {
            return Err(BotError::Config("не задан идентификатор чата".to_string()));
        }

        let url = format!("{}/bot{}/sendMessage", self.api_url, token);
        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            // reqwest errors embed the URL, which carries the token.
            .map_err(|e| BotError::Delivery(e.without_url().to_string()))?;

        let status = response.status();
        let body: Option<TelegramResponse> = response.json().await.ok();

        match body {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse {
                description: Some(description),
                ..
            }) => Err(BotError::Delivery(format!("HTTP {}: {}", status.as_u16(), description))),
            _ => Err(BotError::Delivery(format!("HTTP {}", status.as_u16()))),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, chat_id: &str, text: &str) {
        match self.send_message(chat_id, text).await {
            Ok(()) => tracing::info!(chars = text.chars().count(), "Message sent"),
            Err(e) => tracing::warn!(error = %e, "Message not sent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn notifier(url: &str, token: Option<&str>) -> TelegramNotifier {
        TelegramNotifier::new(url, token.map(String::from), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_posts_chat_and_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTOKEN/sendMessage")
            .match_body(Matcher::Json(
                serde_json::json!({"chat_id": "42", "text": "hello"}),
            ))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{}}"#)
            .create_async()
            .await;

        notifier(&server.url(), Some("TOKEN"))
            .send_message("42", "hello")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_reports_api_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/botTOKEN/sendMessage")
            .with_status(400)
            .with_body(r#"{"ok":false,"description":"Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let err = notifier(&server.url(), Some("TOKEN"))
            .send_message("42", "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Delivery(ref m) if m.contains("chat not found")));
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = notifier(&server.url(), None)
            .send_message("42", "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Config(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_chat_id_is_rejected() {
        let err = notifier("http://127.0.0.1:9", Some("TOKEN"))
            .send_message("", "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }

    #[tokio::test]
    async fn test_notify_swallows_delivery_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTOKEN/sendMessage")
            .with_status(500)
            .create_async()
            .await;

        // Must return normally even though delivery fails.
        notifier(&server.url(), Some("TOKEN"))
            .notify("42", "hello")
            .await;

        mock.assert_async().await;
    }
}
