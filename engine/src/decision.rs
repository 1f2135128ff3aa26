//! Combines rule verdicts into one auditable decision.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::config::{EngineConfig, LogicOperator, Scenario};
use crate::context::MetricContext;
use crate::rules::{self, RuleName, RuleVerdict, Severity, UpdateRule};

/// Final outcome of one evaluation call.
///
/// `passed_rule_names` / `failed_rule_names` cover only the rules required
/// for the scenario; `all_verdicts` carries every rule's result for
/// observability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub passes: bool,
    pub reason: String,
    pub passed_rule_names: Vec<RuleName>,
    pub failed_rule_names: Vec<RuleName>,
    pub all_verdicts: BTreeMap<RuleName, RuleVerdict>,
}

/// Runs every registered rule against one [`MetricContext`] and combines
/// the required verdicts under the scenario's logic operator.
///
/// Holds no state beyond the snapshot and config it was built with;
/// construct one per evaluation call.
pub struct DecisionEngine {
    context: MetricContext,
    config: EngineConfig,
    rules: Vec<Box<dyn UpdateRule>>,
}

impl DecisionEngine {
    pub fn new(context: MetricContext, config: EngineConfig) -> Self {
        let rules = rules::build_rules(&config);
        Self::with_rules(context, config, rules)
    }

    /// Explicit rule list, for callers (and tests) that supply their own
    /// evaluators instead of the config-built set.
    pub fn with_rules(
        context: MetricContext,
        config: EngineConfig,
        rules: Vec<Box<dyn UpdateRule>>,
    ) -> Self {
        Self {
            context,
            config,
            rules,
        }
    }

    pub fn context(&self) -> &MetricContext {
        &self.context
    }

    /// Evaluate all rules and combine the required ones.
    ///
    /// Never fails: a rule error becomes a synthetic critical failing
    /// verdict for that rule and evaluation continues.
    pub async fn evaluate(&self) -> Decision {
        let mut all_verdicts = BTreeMap::new();

        for rule in &self.rules {
            let name = rule.name();
            let verdict = match rule.evaluate(&self.context).await {
                Ok(v) => v,
                Err(e) => {
                    warn!(rule = %name, error = %e, "rule evaluation failed");
                    RuleVerdict::fail(format!("rule evaluation error: {e:#}"))
                        .with_severity(Severity::Critical)
                }
            };
            all_verdicts.insert(name, verdict);
        }

        let scenario = Scenario::for_update_count(self.context.update_count());
        let policy = self.config.rule_applicability.policy(scenario);

        let mut passed_rule_names = Vec::new();
        let mut failed_rule_names = Vec::new();

        for &name in &policy.required_rules {
            match all_verdicts.get(&name) {
                Some(v) if v.passed => passed_rule_names.push(name),
                Some(_) => failed_rule_names.push(name),
                None => {
                    // Config names a rule that is not registered. The name
                    // contributes nothing to the partition; surface it.
                    warn!(rule = %name, "required rule not registered; ignored");
                }
            }
        }

        let passes = match policy.operator {
            LogicOperator::Or => !passed_rule_names.is_empty(),
            LogicOperator::And => failed_rule_names.is_empty(),
        };

        let reason = if passes {
            format!("required rules satisfied under {}", policy.operator)
        } else {
            let failures: Vec<String> = failed_rule_names
                .iter()
                .filter_map(|n| all_verdicts.get(n).map(|v| format!("{n}: {}", v.reason)))
                .collect();
            format!("{}: {}", policy.operator, failures.join("; "))
        };

        Decision {
            passes,
            reason,
            passed_rule_names,
            failed_rule_names,
            all_verdicts,
        }
    }
}
