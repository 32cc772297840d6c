//! Transaction submission.

use super::PaymentError;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Mirror of the contract's start-of-game event, emitted once the payable
/// `startGame()` call is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStarted {
    /// Paying account.
    pub payer: String,
    /// Block timestamp, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Amount sent, in native units.
    pub amount_paid: String,
}

/// Submits the entry transaction and waits for the chain's verdict.
///
/// Retries and backoff are the implementor's business.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Sends `amount` (native units, decimal string) to the game contract.
    async fn submit(&self, amount: &str) -> Result<GameStarted, PaymentError>;
}

/// What [`MockPaymentProcessor`] answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    /// Every submission confirms.
    Confirm,
    /// Every submission is rejected with this reason.
    Reject(String),
}

/// In-memory processor for tests and offline play.
#[derive(Debug, Clone)]
pub struct MockPaymentProcessor {
    payer: String,
    behavior: Arc<Mutex<MockBehavior>>,
    latency: Duration,
    submitted: Arc<Mutex<Vec<String>>>,
}

impl MockPaymentProcessor {
    /// Creates a processor that confirms immediately.
    pub fn new(payer: impl Into<String>) -> Self {
        Self {
            payer: payer.into(),
            behavior: Arc::new(Mutex::new(MockBehavior::Confirm)),
            latency: Duration::ZERO,
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers with `behavior` from now on.
    pub fn with_behavior(self, behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            ..self
        }
    }

    /// Waits `latency` before answering, like a block confirmation.
    pub fn with_latency(self, latency: Duration) -> Self {
        Self { latency, ..self }
    }

    /// Changes the answer for later submissions.
    pub async fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().await = behavior;
    }

    /// Amounts submitted so far, oldest first.
    pub async fn submitted(&self) -> Vec<String> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    #[instrument(skip(self), fields(payer = %self.payer))]
    async fn submit(&self, amount: &str) -> Result<GameStarted, PaymentError> {
        self.submitted.lock().await.push(amount.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let behavior = self.behavior.lock().await.clone();
        match behavior {
            MockBehavior::Confirm => {
                info!(amount, "Mock payment confirmed");
                Ok(GameStarted {
                    payer: self.payer.clone(),
                    timestamp: Utc::now().timestamp(),
                    amount_paid: amount.to_string(),
                })
            }
            MockBehavior::Reject(reason) => {
                warn!(amount, reason = %reason, "Mock payment rejected");
                Err(PaymentError::Rejected(reason))
            }
        }
    }
}
