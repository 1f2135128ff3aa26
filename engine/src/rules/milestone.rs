//! Milestone-multiplier-crossed rule.

use async_trait::async_trait;
use serde_json::json;

use super::{RuleName, RuleVerdict, UpdateRule, fmt_multiplier};
use crate::context::MetricContext;

/// Passes when the token's best multiplier has newly crossed a configured
/// milestone since the previous update.
///
/// "Newly" is recomputed per call from the snapshot: a milestone counts if
/// the current max multiplier reaches it and the max multiplier as of the
/// previous update did not. With no previous update, every milestone at or
/// below the current max is new.
///
/// Once growth exceeds the highest configured milestone and that milestone
/// has been announced, the rule can never pass again for the token
/// ("Beyond all milestones!"). Known product dead end, reproduced as-is.
pub struct MilestoneMultiplierRule {
    /// Ascending multipliers, each announced at most once.
    milestones: Vec<f64>,
}

impl MilestoneMultiplierRule {
    pub fn new(milestones: Vec<f64>) -> Self {
        Self { milestones }
    }
}

#[async_trait]
impl UpdateRule for MilestoneMultiplierRule {
    fn name(&self) -> RuleName {
        RuleName::MilestoneMultiplier
    }

    async fn evaluate(&self, context: &MetricContext) -> anyhow::Result<RuleVerdict> {
        let price = context.price_multiplier();
        let mcap = context.market_cap_multiplier();
        let max = price.max(mcap);

        // Max multiplier as of the previous update, against the same signal
        // baseline. None for the first update.
        let previous_max = context.last_update().map(|u| {
            let prev_price = u.price / context.signal().price;
            let prev_mcap = u.market_cap / context.signal().market_cap;
            prev_price.max(prev_mcap)
        });

        let highest_new = self
            .milestones
            .iter()
            .copied()
            .filter(|&m| max >= m && previous_max.is_none_or(|prev| prev < m))
            .fold(f64::NEG_INFINITY, f64::max);

        if highest_new.is_finite() {
            // Label by whichever metric reaches the crossed milestone.
            let metric = if price >= highest_new { "price" } else { "market cap" };

            return Ok(RuleVerdict::pass(format!(
                "new milestone crossed: {}x via {metric} ({max:.2}x max)",
                fmt_multiplier(highest_new)
            ))
            .with_metadata(json!({
                "milestone": highest_new,
                "max_multiplier": max,
                "previous_max_multiplier": previous_max,
                "metric": metric,
            })));
        }

        match self.milestones.iter().copied().find(|&m| m > max) {
            Some(next) => {
                // Multiplier-ratio progress towards the next milestone, not
                // room remaining.
                let progress_pct = (max / next * 100.0).floor();

                Ok(RuleVerdict::fail(format!(
                    "no new milestone: {max:.2}x max, {progress_pct:.0}% to {}x",
                    fmt_multiplier(next)
                ))
                .with_metadata(json!({
                    "max_multiplier": max,
                    "next_milestone": next,
                    "progress_pct": progress_pct,
                })))
            }
            None => Ok(RuleVerdict::fail(format!(
                "Beyond all milestones! {max:.2}x max, highest milestone already announced"
            ))
            .with_metadata(json!({ "max_multiplier": max }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::models::{PriceUpdateRecord, SignalRecord, Token};

    const SIGNAL_PRICE: f64 = 100.0;
    const SIGNAL_MCAP: f64 = 1_000_000.0;

    fn default_milestones() -> Vec<f64> {
        vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0]
    }

    /// Context at `current_mult` with an optional previous update recorded
    /// at `prev_mult` (both applied to price and market cap together).
    fn ctx(current_mult: f64, prev_mult: Option<f64>) -> MetricContext {
        let last_update = prev_mult.map(|p| PriceUpdateRecord {
            created_at_ms: 1_000,
            price: SIGNAL_PRICE * p,
            market_cap: SIGNAL_MCAP * p,
        });
        let update_count = u64::from(last_update.is_some());

        MetricContext::new(
            SignalRecord {
                created_at_ms: 0,
                price: SIGNAL_PRICE,
                market_cap: SIGNAL_MCAP,
            },
            Token::new("0xabc", "ethereum"),
            SIGNAL_PRICE * current_mult,
            SIGNAL_MCAP * current_mult,
            last_update,
            update_count,
            10_000,
        )
    }

    #[tokio::test]
    async fn first_update_reports_highest_newly_crossed() {
        let rule = MilestoneMultiplierRule::new(default_milestones());

        // 7x crosses both 5x and nothing higher; 5 is the highest new one.
        let verdict = rule.evaluate(&ctx(7.0, None)).await.unwrap();

        assert!(verdict.passed);
        assert!(verdict.reason.contains("5x"), "{}", verdict.reason);
        assert_eq!(verdict.metadata.as_ref().unwrap()["milestone"], 5.0);
    }

    #[tokio::test]
    async fn skips_milestones_announced_by_previous_update() {
        let rule = MilestoneMultiplierRule::new(default_milestones());

        // Previous update already sat at 5x; 7x has nothing new before 10x.
        let verdict = rule.evaluate(&ctx(7.0, Some(5.0))).await.unwrap();

        assert!(!verdict.passed);
        assert!(verdict.reason.contains("70% to 10x"), "{}", verdict.reason);
    }

    #[tokio::test]
    async fn crossing_several_milestones_reports_only_the_highest() {
        let rule = MilestoneMultiplierRule::new(default_milestones());

        // 5x announced, now 30x: both 10x and 25x are new, report 25x.
        let verdict = rule.evaluate(&ctx(30.0, Some(5.0))).await.unwrap();

        assert!(verdict.passed);
        assert!(verdict.reason.contains("25x"), "{}", verdict.reason);
        assert_eq!(verdict.metadata.as_ref().unwrap()["milestone"], 25.0);
    }

    #[tokio::test]
    async fn beyond_all_milestones_is_a_dead_end() {
        let rule = MilestoneMultiplierRule::new(default_milestones());

        // 1000x already announced, now 1500x: nothing left to announce.
        let verdict = rule.evaluate(&ctx(1500.0, Some(1000.0))).await.unwrap();

        assert!(!verdict.passed);
        assert!(
            verdict.reason.contains("Beyond all milestones!"),
            "{}",
            verdict.reason
        );
    }

    #[tokio::test]
    async fn below_first_milestone_reports_progress() {
        let rule = MilestoneMultiplierRule::new(default_milestones());

        let verdict = rule.evaluate(&ctx(2.0, None)).await.unwrap();

        assert!(!verdict.passed);
        assert!(verdict.reason.contains("40% to 5x"), "{}", verdict.reason);
    }

    #[tokio::test]
    async fn metric_label_follows_the_multiplier_that_crossed() {
        let rule = MilestoneMultiplierRule::new(default_milestones());

        // Market cap at 6x, price lagging at 2x: milestone 5 via market cap.
        let context = MetricContext::new(
            SignalRecord {
                created_at_ms: 0,
                price: SIGNAL_PRICE,
                market_cap: SIGNAL_MCAP,
            },
            Token::new("0xabc", "ethereum"),
            SIGNAL_PRICE * 2.0,
            SIGNAL_MCAP * 6.0,
            None,
            0,
            10_000,
        );

        let verdict = rule.evaluate(&context).await.unwrap();

        assert!(verdict.passed);
        assert!(verdict.reason.contains("market cap"), "{}", verdict.reason);
    }

    #[tokio::test]
    async fn decline_since_previous_update_crosses_nothing() {
        let rule = MilestoneMultiplierRule::new(default_milestones());

        // Announced at 10x, dropped back to 6x.
        let verdict = rule.evaluate(&ctx(6.0, Some(10.0))).await.unwrap();

        assert!(!verdict.passed);
    }
}
