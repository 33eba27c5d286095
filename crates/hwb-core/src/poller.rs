//! The poll loop: fetch → validate → detect change → notify → sleep.
//!
//! Failures during one iteration never escape it. Fetch-phase errors are
//! logged and the loop moves on; validation-phase errors additionally get
//! relayed to the chat as a diagnostic, so operators can watch both success
//! and failure from the notification channel itself.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    domain::{extract_latest_status, validate_response},
    ports::{MessagingPort, StatusSource},
    Error,
};

/// Loop-private state, mutated once per iteration.
#[derive(Debug)]
struct PollState {
    last_timestamp: i64,
    last_message: Option<String>,
}

pub struct Poller {
    cfg: Arc<Config>,
    source: Arc<dyn StatusSource>,
    messenger: Arc<dyn MessagingPort>,
    state: PollState,
}

impl Poller {
    pub fn new(
        cfg: Arc<Config>,
        source: Arc<dyn StatusSource>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            source,
            messenger,
            state: PollState {
                last_timestamp: Utc::now().timestamp(),
                last_message: None,
            },
        }
    }

    /// Run the poll loop until the token is cancelled.
    ///
    /// The binary passes a token that is never cancelled (the process is
    /// stopped from outside); tests use it to stop the loop.
    pub async fn run(&mut self, cancel: CancellationToken) {
        info!(
            interval_secs = self.cfg.poll_interval.as_secs(),
            "starting homework status poller"
        );

        loop {
            self.poll_once().await;

            tokio::select! {
              _ = cancel.cancelled() => break,
              _ = sleep(self.cfg.poll_interval) => {}
            }
        }

        info!("poller stopped");
    }

    /// One poll tick. Errors are contained here; this never panics the loop.
    pub async fn poll_once(&mut self) {
        let raw = match self.source.fetch(self.state.last_timestamp).await {
            Ok(v) => v,
            Err(e) => {
                // Fetch failures stay out of the chat; the next tick retries.
                error!("status fetch failed: {e}");
                return;
            }
        };

        let response = match validate_response(&raw) {
            Ok(r) => r,
            Err(e) => {
                self.report_failure(&e).await;
                return;
            }
        };

        let update = match extract_latest_status(&response.homeworks) {
            Ok(u) => u,
            Err(e) => {
                self.report_failure(&e).await;
                return;
            }
        };

        let Some(update) = update else {
            debug!("no homework status changes");
            return;
        };

        let message = update.message();
        if self.state.last_message.as_deref() == Some(message.as_str()) {
            debug!("status unchanged, suppressing duplicate notification");
        } else {
            if let Err(e) = self
                .messenger
                .send_text(self.cfg.telegram_chat_id, &message)
                .await
            {
                // Leave state untouched: the next tick re-detects the change
                // and attempts delivery again.
                error!("notification delivery failed: {e}");
                return;
            }
            debug!("notification delivered");
            self.state.last_message = Some(message);
        }

        if let Some(ts) = response.current_date {
            self.state.last_timestamp = ts;
        }
    }

    /// Log a recoverable iteration failure and relay it to the chat.
    async fn report_failure(&self, err: &Error) {
        error!("iteration failed: {err}");
        let diagnostic = format!("Сбой в работе программы: {err}");
        if let Err(e) = self
            .messenger
            .send_text(self.cfg.telegram_chat_id, &diagnostic)
            .await
        {
            warn!("failed to relay failure diagnostic: {e}");
        }
    }
}
