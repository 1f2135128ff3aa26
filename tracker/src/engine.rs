//! The main tracker engine.
//!
//! For each polling pass, per tracked token, it:
//!   1. Loads the signal, latest update and update count from the store.
//!   2. Fetches the current price/market cap from the market source.
//!   3. Runs the decision engine over the combined snapshot.
//!   4. On a passing decision, persists the new update record and emits
//!      an `UpdateNotification` to the notifier queue.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, debug, info, warn};

use common::logger::{TraceId, poll_span, token_span};
use corelib::models::{PriceUpdateRecord, Token};
use engine::{DecisionEngine, MetricContext};
use market::MarketSource;
use store::SignalStore;

use super::config::TrackerConfig;
use super::types::{NotifySender, UpdateNotification};

pub struct TrackerEngine<S: SignalStore, M: MarketSource> {
    cfg: TrackerConfig,
    store: Arc<S>,
    market: Arc<M>,
    notify_tx: NotifySender,
}

impl<S: SignalStore, M: MarketSource> TrackerEngine<S, M> {
    pub fn new(cfg: TrackerConfig, store: Arc<S>, market: Arc<M>, notify_tx: NotifySender) -> Self {
        Self {
            cfg,
            store,
            market,
            notify_tx,
        }
    }

    /// Run one pass over every tracked token.
    ///
    /// A failure for one token (market API down, storage hiccup) is logged
    /// and does not abort the rest of the pass. `now_ms` is taken once per
    /// pass so every token in it is judged against the same clock.
    pub async fn on_poll_tick(&self, now_ms: i64) -> anyhow::Result<()> {
        let trace_id = TraceId::new();

        async {
            let tokens = self
                .store
                .tracked_tokens()
                .await
                .context("load tracked tokens")?;

            if tokens.is_empty() {
                debug!("no tracked tokens this pass");
                return Ok(());
            }

            info!(count = tokens.len(), "polling tracked tokens");

            for token in &tokens {
                let result = self
                    .poll_token(token, now_ms)
                    .instrument(token_span(&token.id()))
                    .await;

                if let Err(e) = result {
                    warn!(token = %token.id(), error = %format!("{e:#}"), "token poll failed");
                }
            }

            Ok(())
        }
        .instrument(poll_span(&trace_id))
        .await
    }

    async fn poll_token(&self, token: &Token, now_ms: i64) -> anyhow::Result<()> {
        let Some(signal) = self.store.signal_for(token).await? else {
            warn!("tracked token has no signal record");
            return Ok(());
        };

        let snapshot = self
            .market
            .snapshot(token)
            .await
            .context("fetch market snapshot")?;

        let last_update = self.store.latest_update(token).await?;
        let update_count = self.store.update_count(token).await?;

        let context = MetricContext::new(
            signal,
            token.clone(),
            snapshot.price_usd,
            snapshot.market_cap_usd,
            last_update,
            update_count,
            now_ms,
        );

        let price_multiplier = context.price_multiplier();
        let market_cap_multiplier = context.market_cap_multiplier();

        let decision = DecisionEngine::new(context, self.cfg.engine.clone())
            .evaluate()
            .await;

        if !decision.passes {
            debug!(reason = %decision.reason, "update suppressed");
            return Ok(());
        }

        let update = PriceUpdateRecord {
            created_at_ms: now_ms,
            price: snapshot.price_usd,
            market_cap: snapshot.market_cap_usd,
        };

        self.store
            .record_update(token, &update)
            .await
            .context("persist price update")?;

        info!(
            price_multiplier,
            market_cap_multiplier,
            update_number = update_count + 1,
            "price update announced"
        );

        let notification = UpdateNotification {
            token: token.clone(),
            price_usd: snapshot.price_usd,
            market_cap_usd: snapshot.market_cap_usd,
            price_multiplier,
            market_cap_multiplier,
            update_number: update_count + 1,
            reason: decision.reason,
        };

        self.notify_tx
            .send(notification)
            .await
            .context("notification queue closed")?;

        Ok(())
    }
}

/// Drive the tracker from a fixed interval until the process stops.
pub async fn run_tracker<S: SignalStore, M: MarketSource>(
    tracker: TrackerEngine<S, M>,
    poll_every: Duration,
) -> anyhow::Result<()> {
    let mut ticker = interval(poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(every_ms = poll_every.as_millis() as u64, "tracker poller started");

    loop {
        ticker.tick().await;

        let now_ms = Utc::now().timestamp_millis();
        if let Err(e) = tracker.on_poll_tick(now_ms).await {
            warn!(error = %format!("{e:#}"), "polling pass failed");
        }
    }
}
