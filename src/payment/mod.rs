//! Boundary to the chain: price lookup and transaction submission.
//!
//! The session core never talks to a wallet. It asks for a
//! [`PaymentRequest`], and whoever drives the session turns that into a
//! native amount through a [`PriceFeed`] and submits it through a
//! [`PaymentProcessor`].

mod price;
mod processor;

pub use price::{CoinGeckoPriceFeed, FixedPriceFeed, PriceFeed, estimate_native_amount_for_fiat};
pub use processor::{GameStarted, MockBehavior, MockPaymentProcessor, PaymentProcessor};

use serde::{Deserialize, Serialize};

/// Default entry fee in USD.
pub const DEFAULT_ENTRY_FEE_USD: f64 = 0.10;

/// USD per native unit used when the price feed is unavailable.
pub const DEFAULT_FALLBACK_NATIVE_USD_PRICE: f64 = 2000.0;

/// Decimal places of the native amount string (wei precision).
pub const NATIVE_DECIMALS: usize = 18;

/// Charge needed to unlock one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Fiat amount, converted to native units at submission time.
    pub usd_amount: f64,
}

/// Failure at the payment boundary.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PaymentError {
    /// The price lookup failed.
    #[display("Price unavailable: {}", _0)]
    PriceUnavailable(String),
    /// The wallet or chain refused the transaction.
    #[display("Payment rejected: {}", _0)]
    Rejected(String),
    /// Transport failure talking to a remote service.
    #[display("Network error: {}", _0)]
    Network(String),
}

impl std::error::Error for PaymentError {}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Network(err.to_string())
    }
}
