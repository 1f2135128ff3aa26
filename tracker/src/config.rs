use engine::EngineConfig;
use market::client::DEXSCREENER_BASE_URL;

#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Database connection string.
    pub database_url: String,

    /// Base URL of the market-data API.
    pub screener_base_url: String,

    /// Seconds between two polling passes over the tracked set.
    pub poll_interval_secs: u64,

    /// Capacity of the async channel between tracker and notifier.
    ///
    /// Acts as backpressure: if the notifier slows down, the tracker
    /// naturally blocks instead of growing memory.
    pub notify_queue_capacity: usize,

    /// Decision engine configuration for this deployment.
    pub engine: EngineConfig,
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://tracker_dev.db".to_string());

        let screener_base_url = std::env::var("SCREENER_BASE_URL")
            .unwrap_or_else(|_| DEXSCREENER_BASE_URL.to_string());

        let mut engine = EngineConfig::default();
        if let Some(minutes) = env_parse::<u64>("UPDATE_COOLDOWN_MINUTES") {
            engine.cooldown_minutes = minutes;
        }
        if let Some(threshold) = env_parse::<f64>("FIRST_UPDATE_THRESHOLD") {
            engine.first_update_threshold_multiplier = threshold;
        }
        if let Some(milestones) = env_milestones("MILESTONE_MULTIPLIERS") {
            engine.milestone_thresholds = milestones;
        }

        Self {
            database_url,
            screener_base_url,
            poll_interval_secs: env_parse("POLL_INTERVAL_SECS").unwrap_or(60),
            notify_queue_capacity: env_parse("NOTIFY_QUEUE_CAPACITY").unwrap_or(256),
            engine,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}

fn env_milestones(key: &str) -> Option<Vec<f64>> {
    parse_milestones(&std::env::var(key).ok()?)
}

/// Comma-separated ascending multipliers, e.g. `"5,10,25,50"`.
fn parse_milestones(raw: &str) -> Option<Vec<f64>> {
    let parsed: Vec<f64> = raw
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    (!parsed.is_empty()).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::parse_milestones;

    #[test]
    fn milestone_parsing_handles_whitespace_and_garbage() {
        assert_eq!(
            parse_milestones("5, 10,abc, 25"),
            Some(vec![5.0, 10.0, 25.0])
        );
    }

    #[test]
    fn milestone_parsing_rejects_values_with_no_numbers() {
        assert_eq!(parse_milestones(""), None);
        assert_eq!(parse_milestones("abc, ,"), None);
    }
}
