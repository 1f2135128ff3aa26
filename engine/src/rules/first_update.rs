//! First-update threshold rule.

use async_trait::async_trait;
use serde_json::json;

use super::{RuleName, RuleVerdict, Severity, UpdateRule, fmt_multiplier};
use crate::context::MetricContext;

/// Gates the very first update: either the price or the market cap must
/// have reached the configured multiplier since signal time.
///
/// For any later update the rule passes vacuously; it is scenario-gated
/// (only required in the first-update scenario), not value-gated.
pub struct FirstUpdateThresholdRule {
    threshold: f64,
}

impl FirstUpdateThresholdRule {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

#[async_trait]
impl UpdateRule for FirstUpdateThresholdRule {
    fn name(&self) -> RuleName {
        RuleName::FirstUpdateThreshold
    }

    async fn evaluate(&self, context: &MetricContext) -> anyhow::Result<RuleVerdict> {
        if !context.is_first_update() {
            return Ok(RuleVerdict::pass("not first update; threshold rule does not apply")
                .with_severity(Severity::Info));
        }

        let price = context.price_multiplier();
        let mcap = context.market_cap_multiplier();

        let metadata = json!({
            "price_multiplier": price,
            "market_cap_multiplier": mcap,
            "threshold": self.threshold,
        });

        if price >= self.threshold || mcap >= self.threshold {
            // Report whichever metric cleared the bar, price first.
            let (value, label) = if price >= self.threshold {
                (price, "price")
            } else {
                (mcap, "mcap")
            };

            Ok(RuleVerdict::pass(format!(
                "threshold reached: {value:.2}x {label} (threshold {}x)",
                fmt_multiplier(self.threshold)
            ))
            .with_metadata(metadata))
        } else {
            Ok(RuleVerdict::fail(format!(
                "below {}x threshold: {price:.2}x price, {mcap:.2}x mcap",
                fmt_multiplier(self.threshold)
            ))
            .with_metadata(metadata))
        }
    }
}
