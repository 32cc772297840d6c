//! Async driver that runs a [`Session`] against the payment boundary.
//!
//! The session itself never waits. The driver owns the two suspensions of a
//! round: the entry payment and the computer's thinking pause.

use crate::config::AppConfig;
use crate::controller::{AppliedMove, ControllerPhase};
use crate::gate::SessionState;
use crate::ledger::ScoreTally;
use crate::payment::{PaymentProcessor, PriceFeed, estimate_native_amount_for_fiat};
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Shared handle to a session plus the collaborators that feed it.
///
/// Clones share the same session.
#[derive(Clone)]
pub struct GameDriver {
    session: Arc<Mutex<Session>>,
    price_feed: Arc<dyn PriceFeed>,
    processor: Arc<dyn PaymentProcessor>,
    fallback_native_usd_price: f64,
    thinking_delay: Duration,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for GameDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameDriver")
            .field("fallback_native_usd_price", &self.fallback_native_usd_price)
            .field("thinking_delay", &self.thinking_delay)
            .finish_non_exhaustive()
    }
}

impl GameDriver {
    /// Wraps `session` with the given collaborators.
    pub fn new(
        session: Session,
        price_feed: Arc<dyn PriceFeed>,
        processor: Arc<dyn PaymentProcessor>,
        fallback_native_usd_price: f64,
        thinking_delay: Duration,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            price_feed,
            processor,
            fallback_native_usd_price,
            thinking_delay,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Takes fallback price and thinking delay from `config`.
    pub fn from_config(
        config: &AppConfig,
        session: Session,
        price_feed: Arc<dyn PriceFeed>,
        processor: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self::new(
            session,
            price_feed,
            processor,
            *config.fallback_native_usd_price(),
            config.thinking_delay(),
        )
    }

    /// Requests a round, prices the fee and submits the payment.
    ///
    /// Returns true once the round is active. The session lock is not held
    /// while the price lookup and the submission are in flight.
    #[instrument(skip(self))]
    pub async fn start_session(&self) -> bool {
        let request = self.session.lock().await.request_start_session();
        let Some(request) = request else {
            return false;
        };

        let amount = estimate_native_amount_for_fiat(
            self.price_feed.as_ref(),
            request.usd_amount,
            self.fallback_native_usd_price,
        )
        .await;
        info!(usd = request.usd_amount, amount = %amount, "Submitting entry payment");

        let result = self.processor.submit(&amount).await;
        let mut session = self.session.lock().await;
        match result {
            Ok(receipt) => {
                info!(
                    payer = %receipt.payer,
                    timestamp = receipt.timestamp,
                    amount_paid = %receipt.amount_paid,
                    "Game started on chain"
                );
                session.notify_payment_confirmed()
            }
            Err(e) => {
                warn!(error = %e, "Entry payment failed");
                session.notify_payment_failed(&e.to_string());
                false
            }
        }
    }

    /// Human move at board index 0-8. If the round continues, the computer's
    /// reply is scheduled after the thinking delay.
    #[instrument(skip(self))]
    pub async fn request_move(&self, index: usize) -> Option<AppliedMove> {
        let applied = {
            let mut session = self.session.lock().await;
            let applied = session.request_move(index)?;
            if session.phase() != ControllerPhase::ComputerThinking {
                return Some(applied);
            }
            applied
        };
        self.schedule_computer_turn().await;
        Some(applied)
    }

    async fn schedule_computer_turn(&self) {
        let session = Arc::clone(&self.session);
        let delay = self.thinking_delay;
        debug!(delay_ms = delay.as_millis() as u64, "Scheduling computer turn");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.lock().await.play_computer_turn();
        });
        *self.pending.lock().await = Some(handle);
    }

    /// Waits for a scheduled computer turn, if any.
    #[instrument(skip(self))]
    pub async fn settle(&self) {
        let handle = self.pending.lock().await.take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Computer turn task failed");
        }
    }

    /// See [`Session::request_reset`].
    pub async fn request_reset(&self) -> bool {
        self.session.lock().await.request_reset()
    }

    /// See [`Session::request_score_reset`].
    pub async fn request_score_reset(&self) {
        self.session.lock().await.request_score_reset();
    }

    /// Gate state.
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Controller phase.
    pub async fn phase(&self) -> ControllerPhase {
        self.session.lock().await.phase()
    }

    /// Current score.
    pub async fn tally(&self) -> ScoreTally {
        self.session.lock().await.tally()
    }

    /// Renders the board for a terminal.
    pub async fn board_display(&self) -> String {
        self.session.lock().await.board().board().display()
    }
}
