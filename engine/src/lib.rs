//! Price update decision engine.
//!
//! Given the original signal for a token, the current price/market-cap
//! reading and the token's update history, decides whether a follow-up
//! price update should be announced.
//!
//! Data flows one direction:
//! raw observation → [`MetricContext`] → rule set (fan-out) →
//! [`DecisionEngine`] (fan-in) → caller.
//!
//! The engine is purely computational: no I/O, no shared state, every
//! call is a function of its inputs and the supplied `now_ms`.

pub mod config;
pub mod context;
pub mod decision;
pub mod rules;

pub use config::{EngineConfig, LogicOperator, RuleApplicability, Scenario, ScenarioPolicy};
pub use context::MetricContext;
pub use decision::{Decision, DecisionEngine};
pub use rules::{RuleName, RuleVerdict, Severity, UpdateRule};

use corelib::models::{PriceUpdateRecord, SignalRecord, Token};

/// Single-call convenience wrapper: build the [`MetricContext`], run the
/// rules configured in `config`, and return the combined [`Decision`].
///
/// Callers are expected to persist a new update record only when
/// `Decision::passes` is true.
#[allow(clippy::too_many_arguments)]
pub async fn evaluate_update(
    config: &EngineConfig,
    signal: SignalRecord,
    token: Token,
    current_price: f64,
    current_market_cap: f64,
    last_update: Option<PriceUpdateRecord>,
    update_count: u64,
    now_ms: i64,
) -> Decision {
    let context = MetricContext::new(
        signal,
        token,
        current_price,
        current_market_cap,
        last_update,
        update_count,
        now_ms,
    );

    DecisionEngine::new(context, config.clone()).evaluate().await
}
