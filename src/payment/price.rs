//! Native token price lookup and fiat conversion.

use super::{NATIVE_DECIMALS, PaymentError};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Supplies the current USD price of one native unit.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// USD per native unit.
    async fn native_usd_price(&self) -> Result<f64, PaymentError>;
}

/// Price lookup against the CoinGecko simple price API.
#[derive(Debug, Clone)]
pub struct CoinGeckoPriceFeed {
    client: reqwest::Client,
    base_url: String,
    coin_id: String,
}

impl CoinGeckoPriceFeed {
    /// Creates a feed for `coin_id` (e.g. `ethereum`) under `base_url`.
    #[instrument(
        skip(base_url, coin_id),
        fields(base_url = %base_url.as_ref(), coin_id = %coin_id.as_ref())
    )]
    pub fn new(base_url: impl AsRef<str>, coin_id: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            coin_id: coin_id.as_ref().to_string(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url, self.coin_id
        )
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoPriceFeed {
    #[instrument(skip(self), fields(coin_id = %self.coin_id))]
    async fn native_usd_price(&self) -> Result<f64, PaymentError> {
        let url = self.url();
        debug!(url = %url, "Fetching native price");

        let body: HashMap<String, HashMap<String, f64>> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let price = body
            .get(&self.coin_id)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| {
                PaymentError::PriceUnavailable(format!("no usd quote for {}", self.coin_id))
            })?;

        info!(price, "Fetched native price");
        Ok(price)
    }
}

/// Constant price, for tests and offline play.
#[derive(Debug, Clone, Copy)]
pub struct FixedPriceFeed {
    price: f64,
}

impl FixedPriceFeed {
    /// Always reports `price` USD per native unit.
    pub fn new(price: f64) -> Self {
        Self { price }
    }
}

#[async_trait]
impl PriceFeed for FixedPriceFeed {
    async fn native_usd_price(&self) -> Result<f64, PaymentError> {
        Ok(self.price)
    }
}

/// Converts `usd_amount` into a native amount string with 18 decimals.
///
/// A failed lookup, or a price that is not a positive finite number, falls
/// back to `fallback_price`.
#[instrument(skip(feed))]
pub async fn estimate_native_amount_for_fiat(
    feed: &dyn PriceFeed,
    usd_amount: f64,
    fallback_price: f64,
) -> String {
    let price = match feed.native_usd_price().await {
        Ok(price) if price.is_finite() && price > 0.0 => price,
        Ok(price) => {
            warn!(price, fallback_price, "Unusable native price, using fallback");
            fallback_price
        }
        Err(e) => {
            warn!(error = %e, fallback_price, "Price lookup failed, using fallback");
            fallback_price
        }
    };

    let amount = format!("{:.*}", NATIVE_DECIMALS, usd_amount / price);
    debug!(usd_amount, price, amount = %amount, "Estimated native amount");
    amount
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingFeed;

    #[async_trait]
    impl PriceFeed for FailingFeed {
        async fn native_usd_price(&self) -> Result<f64, PaymentError> {
            Err(PaymentError::Network("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_converts_at_feed_price() {
        let amount =
            estimate_native_amount_for_fiat(&FixedPriceFeed::new(4000.0), 0.10, 2000.0).await;
        assert_eq!(amount, "0.000025000000000000");
    }

    #[tokio::test]
    async fn test_falls_back_on_error() {
        let amount = estimate_native_amount_for_fiat(&FailingFeed, 0.10, 2000.0).await;
        assert_eq!(amount, "0.000050000000000000");
    }

    #[tokio::test]
    async fn test_falls_back_on_nonsense_price() {
        let zero =
            estimate_native_amount_for_fiat(&FixedPriceFeed::new(0.0), 0.10, 2000.0).await;
        let nan =
            estimate_native_amount_for_fiat(&FixedPriceFeed::new(f64::NAN), 0.10, 2000.0).await;
        assert_eq!(zero, "0.000050000000000000");
        assert_eq!(nan, zero);
    }

    #[test]
    fn test_url_shape() {
        let feed = CoinGeckoPriceFeed::new("https://api.example.com/v3/", "ethereum");
        assert_eq!(
            feed.url(),
            "https://api.example.com/v3/simple/price?ids=ethereum&vs_currencies=usd"
        );
    }
}
