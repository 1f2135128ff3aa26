use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use corelib::models::{PriceUpdateRecord, SignalRecord, Token};
use market::{MarketSnapshot, MarketSource};
use store::SignalStore;

#[derive(Default, Clone)]
pub struct MockStore {
    pub map: Arc<Mutex<HashMap<String, (Token, SignalRecord, Vec<PriceUpdateRecord>)>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test convenience
    pub async fn insert_signal(&self, token: Token, signal: SignalRecord) {
        self.map
            .lock()
            .await
            .insert(token.id(), (token, signal, Vec::new()));
    }

    pub async fn updates_for(&self, token: &Token) -> Vec<PriceUpdateRecord> {
        self.map
            .lock()
            .await
            .get(&token.id())
            .map(|(_, _, updates)| updates.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SignalStore for MockStore {
    async fn tracked_tokens(&self) -> anyhow::Result<Vec<Token>> {
        Ok(self
            .map
            .lock()
            .await
            .values()
            .map(|(token, _, _)| token.clone())
            .collect())
    }

    async fn signal_for(&self, token: &Token) -> anyhow::Result<Option<SignalRecord>> {
        Ok(self
            .map
            .lock()
            .await
            .get(&token.id())
            .map(|(_, signal, _)| signal.clone()))
    }

    async fn latest_update(&self, token: &Token) -> anyhow::Result<Option<PriceUpdateRecord>> {
        Ok(self
            .map
            .lock()
            .await
            .get(&token.id())
            .and_then(|(_, _, updates)| {
                updates.iter().max_by_key(|u| u.created_at_ms).cloned()
            }))
    }

    async fn update_count(&self, token: &Token) -> anyhow::Result<u64> {
        Ok(self
            .map
            .lock()
            .await
            .get(&token.id())
            .map(|(_, _, updates)| updates.len() as u64)
            .unwrap_or(0))
    }

    async fn record_signal(&self, token: &Token, signal: &SignalRecord) -> anyhow::Result<()> {
        let mut map = self.map.lock().await;
        match map.get_mut(&token.id()) {
            Some(entry) => entry.1 = signal.clone(),
            None => {
                map.insert(token.id(), (token.clone(), signal.clone(), Vec::new()));
            }
        }
        Ok(())
    }

    async fn record_update(
        &self,
        token: &Token,
        update: &PriceUpdateRecord,
    ) -> anyhow::Result<()> {
        let mut map = self.map.lock().await;
        let entry = map
            .get_mut(&token.id())
            .ok_or_else(|| anyhow::anyhow!("unknown token"))?;
        entry.2.push(update.clone());
        Ok(())
    }

    async fn delete_token(&self, token: &Token) -> anyhow::Result<()> {
        self.map.lock().await.remove(&token.id());
        Ok(())
    }
}

/// Market source backed by a fixed map; tokens without an entry error.
#[derive(Default, Clone)]
pub struct MockMarket {
    pub snapshots: Arc<Mutex<HashMap<String, MarketSnapshot>>>,
}

impl MockMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_snapshot(&self, token: &Token, snapshot: MarketSnapshot) {
        self.snapshots.lock().await.insert(token.id(), snapshot);
    }
}

#[async_trait]
impl MarketSource for MockMarket {
    async fn snapshot(&self, token: &Token) -> anyhow::Result<MarketSnapshot> {
        self.snapshots
            .lock()
            .await
            .get(&token.id())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no market data for {}", token.id()))
    }
}
