//! Outbound notification of issued receipts, with bounded retry.
//!
//! Notification runs strictly after a receipt has been stored. Its outcome
//! is reported, never propagated: a failed delivery leaves the receipt
//! untouched.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use wipecert_core::Receipt;

/// A delivery attempt failed.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Something that can tell an operator a receipt was issued (mail, webhook, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, receipt: &Receipt) -> Result<(), NotifyError>;
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Wait after the first failure; doubles after each further failure.
    pub base_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries immediately.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Wait before the attempt following failed attempt number `attempt` (1-based).
    ///
    /// delay = min(base * 2^(attempt - 1), max_delay)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base_ms = self.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Outcome of [`deliver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: bool,
    /// Attempts actually made.
    pub attempts: u32,
    /// Message of the most recent failure, if any.
    pub last_error: Option<String>,
}

/// Notify about `receipt`, retrying per `policy`.
pub async fn deliver<N>(notifier: &N, receipt: &Receipt, policy: &RetryPolicy) -> DeliveryReport
where
    N: Notifier + ?Sized,
{
    let max = policy.attempts();
    let mut last_error = None;

    for attempt in 1..=max {
        match notifier.notify(receipt).await {
            Ok(()) => {
                info!(receipt_id = %receipt.id, attempt, "notification delivered");
                return DeliveryReport {
                    delivered: true,
                    attempts: attempt,
                    last_error,
                };
            }
            Err(e) => {
                warn!(receipt_id = %receipt.id, attempt, max, reason = %e, "notification attempt failed");
                last_error = Some(e.to_string());
                if attempt < max {
                    let delay = policy.delay_for(attempt);
                    debug!(attempt, delay_ms = delay.as_millis() as u64, "scheduling retry");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    warn!(receipt_id = %receipt.id, attempts = max, "notification retries exhausted");
    DeliveryReport {
        delivered: false,
        attempts: max,
        last_error,
    }
}
