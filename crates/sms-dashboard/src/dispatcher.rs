//! Background message dispatcher.
//!
//! Once per second the dispatcher takes the oldest queued messages, up to
//! `SEND_PER_SECOND`, and hands them to the SMS provider one at a time.
//! Consent and the daily cap are re-checked at send time since both can
//! change after a campaign was queued.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::models::{MessageStatus, QueuedMessage};
use crate::db::queries::{campaign, message};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::result_ext::ResultExt;
use crate::sms::SmsProvider;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

const NO_CONSENT: &str = "no consent or opted out";
const DAILY_CAP: &str = "daily cap reached";
const INTERRUPTED: &str = "interrupted during send";

/// Limits applied by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct DispatchLimits {
    /// Messages attempted per tick
    pub per_tick: u32,
    /// Messages a contact may receive per UTC day
    pub max_daily_per_contact: u32,
}

impl From<&AppConfig> for DispatchLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            per_tick: config.send_per_second,
            max_daily_per_contact: config.max_daily_per_contact,
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Messages whose bookkeeping failed; logged and left for the next run
    pub errors: usize,
    pub completed_campaigns: Vec<i64>,
}

impl TickSummary {
    fn is_idle(&self) -> bool {
        self.sent == 0
            && self.failed == 0
            && self.skipped == 0
            && self.errors == 0
            && self.completed_campaigns.is_empty()
    }
}

/// Drains the message queue through an SMS provider.
#[derive(Clone)]
pub struct Dispatcher {
    db: DbPool,
    provider: Arc<dyn SmsProvider>,
    limits: DispatchLimits,
}

impl Dispatcher {
    pub fn new(db: DbPool, provider: Arc<dyn SmsProvider>, limits: DispatchLimits) -> Self {
        Self {
            db,
            provider,
            limits,
        }
    }

    /// Fail messages a previous process left in `sending`.
    ///
    /// Whether the provider accepted them is unknown, so they are not
    /// re-sent.
    pub async fn recover_interrupted(&self) -> AppResult<u64> {
        let n = message::fail_interrupted(&self.db, INTERRUPTED).await?;
        if n > 0 {
            tracing::warn!(count = n, "Marked interrupted messages as failed");
        }
        Ok(n)
    }

    /// Process one batch of queued messages and close drained campaigns.
    pub async fn tick(&self) -> AppResult<TickSummary> {
        let mut summary = TickSummary::default();
        let batch = message::fetch_queued(&self.db, i64::from(self.limits.per_tick)).await?;

        // A database error on one message must not hold up the rest of the batch.
        for queued in batch {
            match self.process(&queued).await.log("dispatch message") {
                Ok(MessageStatus::Sent) => summary.sent += 1,
                Ok(MessageStatus::Failed) => summary.failed += 1,
                Ok(MessageStatus::Skipped) => summary.skipped += 1,
                Ok(MessageStatus::Queued | MessageStatus::Sending) => {}
                Err(_) => summary.errors += 1,
            }
        }

        summary.completed_campaigns = campaign::complete_drained(&self.db).await?;
        for id in &summary.completed_campaigns {
            tracing::info!(campaign_id = id, "Campaign completed");
        }

        Ok(summary)
    }

    /// Send or skip a single message, returning its final status.
    async fn process(&self, queued: &QueuedMessage) -> AppResult<MessageStatus> {
        if !queued.consented || queued.opted_out {
            message::mark_finished_with_error(&self.db, queued.id, MessageStatus::Skipped, NO_CONSENT)
                .await?;
            tracing::debug!(message_id = queued.id, "Skipped, no consent");
            return Ok(MessageStatus::Skipped);
        }

        let sent_today = message::count_sent_today(&self.db, queued.contact_id).await?;
        if sent_today >= i64::from(self.limits.max_daily_per_contact) {
            message::mark_finished_with_error(&self.db, queued.id, MessageStatus::Skipped, DAILY_CAP)
                .await?;
            tracing::debug!(
                message_id = queued.id,
                contact_id = queued.contact_id,
                sent_today,
                "Skipped, daily cap reached"
            );
            return Ok(MessageStatus::Skipped);
        }

        if !message::mark_sending(&self.db, queued.id).await? {
            return Ok(MessageStatus::Sending);
        }

        match self.provider.send(&queued.to_phone, &queued.body).await {
            Ok(provider_id) => {
                if let Err(e) = message::mark_sent(&self.db, queued.id, &provider_id).await {
                    tracing::error!(
                        message_id = queued.id,
                        provider_id = %provider_id,
                        error = %e,
                        "Message accepted by provider but not recorded as sent"
                    );
                    return Err(e);
                }
                tracing::info!(
                    message_id = queued.id,
                    campaign_id = queued.campaign_id,
                    provider = self.provider.name(),
                    provider_id = %provider_id,
                    "Message sent"
                );
                Ok(MessageStatus::Sent)
            }
            Err(e) => {
                let error = e.to_string();
                message::mark_finished_with_error(&self.db, queued.id, MessageStatus::Failed, &error)
                    .await?;
                tracing::warn!(
                    message_id = queued.id,
                    campaign_id = queued.campaign_id,
                    error = %error,
                    "Message failed"
                );
                Ok(MessageStatus::Failed)
            }
        }
    }

    /// Tick forever. Errors are logged and the loop keeps going.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Ok(summary) = self.tick().await.log("dispatch tick") {
                if !summary.is_idle() {
                    tracing::debug!(
                        sent = summary.sent,
                        failed = summary.failed,
                        skipped = summary.skipped,
                        errors = summary.errors,
                        "Dispatch tick"
                    );
                }
            }
        }
    }

    /// Start the dispatcher on the runtime. Abort the handle to stop it.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tracing::info!(
            per_tick = self.limits.per_tick,
            max_daily_per_contact = self.limits.max_daily_per_contact,
            provider = self.provider.name(),
            "Dispatcher started"
        );
        tokio::spawn(self.run())
    }
}
