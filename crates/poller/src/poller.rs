use std::time::Duration;

use chrono::Utc;

use homework_common::config::Credentials;
use homework_common::error::BotError;
use homework_notifier::Notifier;

use crate::api::ReviewApi;
use crate::status::parse_status;
use crate::validator::extract_latest;

/// Prefix of the diagnostic sent when a cycle fails.
const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Sent (best-effort) when every secret is missing at startup.
const MISSING_CONFIG_MESSAGE: &str = "Отсутствие обязательных переменных окружения";

/// Last messages delivered to the chat, used to suppress immediate repeats.
/// Lives only as long as the poller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DedupState {
    pub previous_status: String,
    pub previous_error_message: String,
}

/// What a single cycle ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new verdict was sent.
    Notified,
    /// The verdict matched the previous one; nothing sent.
    Unchanged,
    /// The API returned no submissions for the window; nothing sent.
    NoSubmissions,
    /// Fetch, validation or translation failed. `notified` is false when the
    /// diagnostic repeated the previous one.
    Failed { notified: bool },
}

/// Polls the review API on a fixed interval and reports status changes.
pub struct StatusPoller<A, N> {
    api: A,
    notifier: N,
    credentials: Credentials,
    interval: Duration,
    state: DedupState,
}

impl<A: ReviewApi, N: Notifier> StatusPoller<A, N> {
    pub fn new(api: A, notifier: N, credentials: Credentials, interval: Duration) -> Self {
        Self {
            api,
            notifier,
            credentials,
            interval,
            state: DedupState::default(),
        }
    }

    pub fn state(&self) -> &DedupState {
        &self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run forever: startup check, then one cycle per interval.
    /// Only an external cancellation stops it.
    pub async fn run(&mut self) {
        self.startup_check().await;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Status poller started"
        );

        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Verify that at least one secret is configured. A failed check is
    /// reported but never stops the poller.
    pub async fn startup_check(&self) -> bool {
        if self.credentials.any_present() {
            return true;
        }

        tracing::error!(critical = true, "{}", MISSING_CONFIG_MESSAGE);
        self.notify(MISSING_CONFIG_MESSAGE).await;
        false
    }

    /// One cycle anchored at the current wall-clock time.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.run_cycle_at(Utc::now().timestamp()).await
    }

    /// One poll → validate → translate → notify cycle for `timestamp`.
    pub async fn run_cycle_at(&mut self, timestamp: i64) -> CycleOutcome {
        match self.check_once(timestamp).await {
            Ok(verdict) => {
                if verdict == self.state.previous_status {
                    tracing::debug!("Status unchanged, notification suppressed");
                    return CycleOutcome::Unchanged;
                }

                self.notify(&verdict).await;
                self.state.previous_status = verdict;
                CycleOutcome::Notified
            }
            Err(BotError::EmptySubmissionList) => {
                tracing::debug!(from_date = timestamp, "No submissions in the poll window");
                CycleOutcome::NoSubmissions
            }
            Err(e) => {
                let message = format!("{}: {}", FAILURE_PREFIX, e);
                tracing::error!(error = %e, http_status = ?e.status(), "Poll cycle failed");

                if message == self.state.previous_error_message {
                    tracing::debug!("Repeated failure, notification suppressed");
                    return CycleOutcome::Failed { notified: false };
                }

                self.notify(&message).await;
                self.state.previous_error_message = message;
                CycleOutcome::Failed { notified: true }
            }
        }
    }

    async fn check_once(&self, timestamp: i64) -> Result<String, BotError> {
        let response = self.api.fetch_statuses(timestamp).await?;
        let latest = extract_latest(&response)?;
        parse_status(&latest)
    }

    async fn notify(&self, text: &str) {
        let chat_id = self.credentials.channel_id.as_deref().unwrap_or_default();
        self.notifier.notify(chat_id, text).await;
    }
}
