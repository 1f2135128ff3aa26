//! Minimum-time-between-updates rule (cooldown).

use async_trait::async_trait;
use serde_json::json;

use super::{RuleName, RuleVerdict, UpdateRule};
use crate::context::MetricContext;

const MS_PER_MINUTE: i64 = 60_000;

/// Requires at least `cooldown_minutes` between two consecutive updates
/// for the same token. The boundary is inclusive: exactly the cooldown
/// elapsed passes.
pub struct MinimumTimeBetweenRule {
    cooldown_minutes: u64,
}

impl MinimumTimeBetweenRule {
    pub fn new(cooldown_minutes: u64) -> Self {
        Self { cooldown_minutes }
    }

    fn cooldown_ms(&self) -> i64 {
        self.cooldown_minutes as i64 * MS_PER_MINUTE
    }
}

#[async_trait]
impl UpdateRule for MinimumTimeBetweenRule {
    fn name(&self) -> RuleName {
        RuleName::MinimumTimeBetween
    }

    async fn evaluate(&self, context: &MetricContext) -> anyhow::Result<RuleVerdict> {
        let Some(elapsed_ms) = context.time_since_last_update_ms() else {
            return Ok(RuleVerdict::pass("first update; no cooldown required"));
        };

        let cooldown_ms = self.cooldown_ms();
        let elapsed_min = elapsed_ms as f64 / MS_PER_MINUTE as f64;

        let metadata = json!({
            "elapsed_ms": elapsed_ms,
            "cooldown_ms": cooldown_ms,
        });

        if elapsed_ms >= cooldown_ms {
            Ok(RuleVerdict::pass(format!(
                "cooldown elapsed: {elapsed_min:.1}min since last update ({}min required)",
                self.cooldown_minutes
            ))
            .with_metadata(metadata))
        } else {
            let remaining_min = ((cooldown_ms - elapsed_ms) as f64 / MS_PER_MINUTE as f64).ceil();

            Ok(RuleVerdict::fail(format!(
                "cooldown active: {elapsed_min:.1}min elapsed, {}min required, {remaining_min:.0}min remaining",
                self.cooldown_minutes
            ))
            .with_metadata(metadata))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::models::{PriceUpdateRecord, SignalRecord, Token};

    /// Context whose last update was `elapsed_ms` ago.
    fn ctx_with_elapsed(elapsed_ms: Option<i64>) -> MetricContext {
        let now_ms = 10_000_000;
        let last_update = elapsed_ms.map(|e| PriceUpdateRecord {
            created_at_ms: now_ms - e,
            price: 200.0,
            market_cap: 2_000_000.0,
        });
        let update_count = u64::from(last_update.is_some());

        MetricContext::new(
            SignalRecord {
                created_at_ms: 0,
                price: 100.0,
                market_cap: 1_000_000.0,
            },
            Token::new("0xabc", "ethereum"),
            300.0,
            3_000_000.0,
            last_update,
            update_count,
            now_ms,
        )
    }

    #[tokio::test]
    async fn first_update_needs_no_cooldown() {
        let rule = MinimumTimeBetweenRule::new(60);

        let verdict = rule.evaluate(&ctx_with_elapsed(None)).await.unwrap();

        assert!(verdict.passed);
        assert!(verdict.reason.contains("no cooldown required"));
    }

    #[tokio::test]
    async fn exactly_at_cooldown_boundary_passes() {
        let rule = MinimumTimeBetweenRule::new(60);

        let verdict = rule
            .evaluate(&ctx_with_elapsed(Some(60 * 60 * 1000)))
            .await
            .unwrap();

        assert!(verdict.passed, "{}", verdict.reason);
    }

    #[tokio::test]
    async fn one_minute_short_fails_with_remaining() {
        let rule = MinimumTimeBetweenRule::new(60);

        let verdict = rule
            .evaluate(&ctx_with_elapsed(Some(59 * 60 * 1000)))
            .await
            .unwrap();

        assert!(!verdict.passed);
        assert!(verdict.reason.contains("59.0min elapsed"), "{}", verdict.reason);
        assert!(verdict.reason.contains("1min remaining"), "{}", verdict.reason);
    }

    #[tokio::test]
    async fn partial_minute_remaining_rounds_up() {
        let rule = MinimumTimeBetweenRule::new(60);

        // 58.5 minutes elapsed → 1.5min short → reported as 2min remaining.
        let verdict = rule
            .evaluate(&ctx_with_elapsed(Some(58 * 60 * 1000 + 30_000)))
            .await
            .unwrap();

        assert!(!verdict.passed);
        assert!(verdict.reason.contains("2min remaining"), "{}", verdict.reason);
    }
}
