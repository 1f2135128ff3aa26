//! Derived metrics for one evaluation call.
//
//  This module is deliberately pure: no async, no IO, no validation.

use corelib::models::{PriceUpdateRecord, SignalRecord, Token};
use serde_json::json;

/// Immutable snapshot of everything the rules need, built once per
/// evaluation call and discarded afterwards.
///
/// Derived fields are computed at construction time and never recomputed.
/// Inputs are not validated: a zero signal price yields an `Infinity`
/// multiplier and flows through under IEEE-754 semantics; this is
/// intentional and relied upon by the threshold rules.
#[derive(Debug, Clone)]
pub struct MetricContext {
    signal: SignalRecord,
    token: Token,
    current_price: f64,
    current_market_cap: f64,
    last_update: Option<PriceUpdateRecord>,
    update_count: u64,
    now_ms: i64,

    // Derived
    time_since_signal_ms: i64,
    time_since_last_update_ms: Option<i64>,
    price_multiplier: f64,
    market_cap_multiplier: f64,
}

impl MetricContext {
    /// `now_ms` is supplied by the caller so that repeated evaluations
    /// with identical inputs are deterministic.
    ///
    /// Invariant (caller-owned, not cross-validated here):
    /// `update_count == 0` iff `last_update` is `None`.
    pub fn new(
        signal: SignalRecord,
        token: Token,
        current_price: f64,
        current_market_cap: f64,
        last_update: Option<PriceUpdateRecord>,
        update_count: u64,
        now_ms: i64,
    ) -> Self {
        let time_since_signal_ms = now_ms - signal.created_at_ms;
        let time_since_last_update_ms =
            last_update.as_ref().map(|u| now_ms - u.created_at_ms);
        let price_multiplier = current_price / signal.price;
        let market_cap_multiplier = current_market_cap / signal.market_cap;

        Self {
            signal,
            token,
            current_price,
            current_market_cap,
            last_update,
            update_count,
            now_ms,
            time_since_signal_ms,
            time_since_last_update_ms,
            price_multiplier,
            market_cap_multiplier,
        }
    }

    pub fn signal(&self) -> &SignalRecord {
        &self.signal
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn current_market_cap(&self) -> f64 {
        self.current_market_cap
    }

    pub fn last_update(&self) -> Option<&PriceUpdateRecord> {
        self.last_update.as_ref()
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn time_since_signal_ms(&self) -> i64 {
        self.time_since_signal_ms
    }

    pub fn time_since_last_update_ms(&self) -> Option<i64> {
        self.time_since_last_update_ms
    }

    pub fn price_multiplier(&self) -> f64 {
        self.price_multiplier
    }

    pub fn market_cap_multiplier(&self) -> f64 {
        self.market_cap_multiplier
    }

    pub fn is_first_update(&self) -> bool {
        self.update_count == 0
    }

    /// Full snapshot (raw inputs plus derived fields) for diagnostics.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "token": self.token,
            "signal": self.signal,
            "current_price": self.current_price,
            "current_market_cap": self.current_market_cap,
            "last_update": self.last_update,
            "update_count": self.update_count,
            "now_ms": self.now_ms,
            "time_since_signal_ms": self.time_since_signal_ms,
            "time_since_last_update_ms": self.time_since_last_update_ms,
            "price_multiplier": self.price_multiplier,
            "market_cap_multiplier": self.market_cap_multiplier,
            "is_first_update": self.is_first_update(),
        })
    }
}
