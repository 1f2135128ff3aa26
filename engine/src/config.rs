//! Engine configuration.
//!
//! Scenario policy is configuration, not branching logic: the engine looks
//! up which rules are required for the current scenario and how their
//! verdicts combine, so policy can be tested independently of the rule
//! implementations.

use std::fmt;

use serde::Serialize;

use crate::rules::RuleName;

/// How the verdicts of the required rules combine into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicOperator {
    /// Every required rule must pass.
    And,
    /// At least one required rule must pass.
    Or,
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicOperator::And => "AND",
            LogicOperator::Or => "OR",
        };
        f.write_str(s)
    }
}

/// Which kind of update is being considered for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// No update has ever been sent for this token.
    FirstUpdate,
    /// At least one update exists already.
    SubsequentUpdates,
}

impl Scenario {
    pub fn for_update_count(update_count: u64) -> Self {
        if update_count == 0 {
            Scenario::FirstUpdate
        } else {
            Scenario::SubsequentUpdates
        }
    }
}

/// Rule requirements for one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioPolicy {
    pub required_rules: Vec<RuleName>,
    pub operator: LogicOperator,
}

/// Per-scenario policies, keyed by [`Scenario`].
#[derive(Debug, Clone)]
pub struct RuleApplicability {
    pub first_update: ScenarioPolicy,
    pub subsequent_updates: ScenarioPolicy,
}

impl RuleApplicability {
    pub fn policy(&self, scenario: Scenario) -> &ScenarioPolicy {
        match scenario {
            Scenario::FirstUpdate => &self.first_update,
            Scenario::SubsequentUpdates => &self.subsequent_updates,
        }
    }
}

/// Fully-resolved engine configuration. All fields have defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum elapsed time between two consecutive updates.
    pub cooldown_minutes: u64,

    /// Multiplier either price or market cap must reach before the very
    /// first update is announced.
    pub first_update_threshold_multiplier: f64,

    /// Ascending multiplier milestones, each announced at most once.
    pub milestone_thresholds: Vec<f64>,

    pub rule_applicability: RuleApplicability,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: 60,
            first_update_threshold_multiplier: 2.0,
            milestone_thresholds: vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0],
            rule_applicability: RuleApplicability {
                first_update: ScenarioPolicy {
                    required_rules: vec![RuleName::FirstUpdateThreshold],
                    operator: LogicOperator::And,
                },
                subsequent_updates: ScenarioPolicy {
                    required_rules: vec![
                        RuleName::MinimumTimeBetween,
                        RuleName::MilestoneMultiplier,
                    ],
                    operator: LogicOperator::And,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_selection_follows_update_count() {
        assert_eq!(Scenario::for_update_count(0), Scenario::FirstUpdate);
        assert_eq!(Scenario::for_update_count(1), Scenario::SubsequentUpdates);
        assert_eq!(Scenario::for_update_count(17), Scenario::SubsequentUpdates);
    }

    #[test]
    fn defaults_match_product_policy() {
        let cfg = EngineConfig::default();

        assert_eq!(cfg.cooldown_minutes, 60);
        assert_eq!(cfg.first_update_threshold_multiplier, 2.0);
        assert_eq!(cfg.milestone_thresholds.first(), Some(&5.0));
        assert_eq!(cfg.milestone_thresholds.last(), Some(&1000.0));

        let first = cfg.rule_applicability.policy(Scenario::FirstUpdate);
        assert_eq!(first.required_rules, vec![RuleName::FirstUpdateThreshold]);
        assert_eq!(first.operator, LogicOperator::And);

        let subsequent = cfg.rule_applicability.policy(Scenario::SubsequentUpdates);
        assert_eq!(
            subsequent.required_rules,
            vec![RuleName::MinimumTimeBetween, RuleName::MilestoneMultiplier]
        );
        assert_eq!(subsequent.operator, LogicOperator::And);
    }
}
