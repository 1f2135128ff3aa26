//! Storage boundary for signals and price updates.
//!
//! The decision engine never touches storage itself; the tracker reads
//! the signal, the most recent update and the update count through this
//! trait and hands them to the engine as plain values.

pub mod sqlite;

use async_trait::async_trait;
use corelib::models::{PriceUpdateRecord, SignalRecord, Token};

pub use sqlite::SqliteSignalStore;

#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Every token with a recorded signal.
    async fn tracked_tokens(&self) -> anyhow::Result<Vec<Token>>;

    async fn signal_for(&self, token: &Token) -> anyhow::Result<Option<SignalRecord>>;

    /// Most recent price update for the token, if any.
    async fn latest_update(&self, token: &Token) -> anyhow::Result<Option<PriceUpdateRecord>>;

    /// Total number of price updates sent for the token.
    async fn update_count(&self, token: &Token) -> anyhow::Result<u64>;

    /// Record (or replace) the signal that starts tracking a token.
    async fn record_signal(&self, token: &Token, signal: &SignalRecord) -> anyhow::Result<()>;

    /// Append one sent price update.
    async fn record_update(&self, token: &Token, update: &PriceUpdateRecord)
    -> anyhow::Result<()>;

    /// Stop tracking: remove the signal and all updates for the token.
    async fn delete_token(&self, token: &Token) -> anyhow::Result<()>;
}
