//! Paidplay - payment-gated tic-tac-toe against a minimax opponent
//!
//! Each round costs a small entry fee. Once the payment confirms, the human
//! plays X against a computer that mixes random moves into a perfect search.
//!
//! # Architecture
//!
//! - **Engine** (`paidplay_tictactoe`): board, outcome detection, search, difficulty
//! - **Gate**: idle / awaiting payment / active / round over
//! - **Controller**: turn alternation and the computer's thinking phase
//! - **Ledger**: process-lifetime score
//! - **Session**: the three above behind one event-emitting facade
//! - **Payment**: price feed and transaction submission
//! - **Driver**: async glue between a session and the payment boundary
//!
//! # Example
//!
//! ```no_run
//! use paidplay::{Session, event_channel};
//!
//! let (tx, _rx) = event_channel();
//! let mut session = Session::with_defaults(tx);
//! if session.request_start_session().is_some() {
//!     session.notify_payment_confirmed();
//!     session.request_move(4);
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod controller;
mod driver;
mod events;
mod gate;
mod ledger;
mod payment;
mod session;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, PRICE_API_URL_ENV};

// Crate-level exports - Round orchestration
pub use controller::{AppliedMove, ControllerPhase, GameController, MoveRejection};
pub use driver::GameDriver;
pub use gate::{SessionGate, SessionState, TransitionError};
pub use ledger::{ScoreLedger, ScoreTally};
pub use session::Session;

// Crate-level exports - Events
pub use events::{EventReceiver, EventSender, GameEvent, event_channel};

// Crate-level exports - Payment boundary
pub use payment::{
    CoinGeckoPriceFeed, DEFAULT_ENTRY_FEE_USD, DEFAULT_FALLBACK_NATIVE_USD_PRICE, FixedPriceFeed,
    GameStarted, MockBehavior, MockPaymentProcessor, NATIVE_DECIMALS, PaymentError,
    PaymentProcessor, PaymentRequest, PriceFeed, estimate_native_amount_for_fiat,
};

// Crate-level exports - Engine types
pub use paidplay_tictactoe::{
    Board, BoardState, DifficultyPolicy, MoveError, Player, Position, RandomSource, RngSource,
    RoundOutcome, ScriptedSource, Square, WinningLine,
};
