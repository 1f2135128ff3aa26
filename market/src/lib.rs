//! Market-data reader boundary.
//!
//! Supplies the current price and market cap for a tracked token, in the
//! same USD convention as the stored signal/update records. The engine
//! performs no unit conversion.

pub mod client;
pub mod errors;
pub mod types;

use async_trait::async_trait;
use corelib::models::Token;

pub use client::DexScreenerClient;
pub use errors::ScreenerError;
pub use types::MarketSnapshot;

/// Anything that can produce a current market reading for a token.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn snapshot(&self, token: &Token) -> anyhow::Result<MarketSnapshot>;
}
