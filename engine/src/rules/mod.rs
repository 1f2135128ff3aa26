//! The rule set: independent, pluggable evaluators over a [`MetricContext`].
//!
//! Rules are stateless across calls; anything resembling "has this been
//! seen before" is recomputed per call from the snapshot, never cached.

pub mod cooldown;
pub mod first_update;
pub mod milestone;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::context::MetricContext;

pub use cooldown::MinimumTimeBetweenRule;
pub use first_update::FirstUpdateThresholdRule;
pub use milestone::MilestoneMultiplierRule;

/// Identifies one of the registered rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RuleName {
    FirstUpdateThreshold,
    MinimumTimeBetween,
    MilestoneMultiplier,
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleName::FirstUpdateThreshold => "FIRST_UPDATE_THRESHOLD",
            RuleName::MinimumTimeBetween => "MINIMUM_TIME_BETWEEN",
            RuleName::MilestoneMultiplier => "MILESTONE_MULTIPLIER",
        };
        f.write_str(s)
    }
}

/// Informational severity attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// Outcome of a single rule evaluation.
///
/// `reason` is human-readable and embeds the concrete numeric values that
/// drove the verdict; `metadata` carries the same numbers in structured
/// form for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleVerdict {
    pub passed: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl RuleVerdict {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
            severity: None,
            metadata: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
            severity: None,
            metadata: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Uniform contract for all rules.
///
/// `evaluate` is async so that future rules may consult external state;
/// the current three are pure and return immediately. An `Err` from a
/// rule is caught by the decision engine and converted into a synthetic
/// critical failing verdict, so it never aborts the whole evaluation.
#[async_trait]
pub trait UpdateRule: Send + Sync {
    fn name(&self) -> RuleName;

    async fn evaluate(&self, context: &MetricContext) -> anyhow::Result<RuleVerdict>;
}

/// Construct the full rule list from config.
///
/// Built fresh per engine instance; there is no global registry.
pub fn build_rules(config: &EngineConfig) -> Vec<Box<dyn UpdateRule>> {
    vec![
        Box::new(FirstUpdateThresholdRule::new(
            config.first_update_threshold_multiplier,
        )),
        Box::new(MinimumTimeBetweenRule::new(config.cooldown_minutes)),
        Box::new(MilestoneMultiplierRule::new(
            config.milestone_thresholds.clone(),
        )),
    ]
}

/// Render a milestone/threshold multiplier without a trailing `.0`
/// (`5.0` → `"5"`, `2.5` → `"2.5"`).
pub(crate) fn fmt_multiplier(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
