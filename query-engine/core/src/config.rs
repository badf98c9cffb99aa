use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONCURRENCY_LIMIT: usize = 8;

/// Tuning knobs of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Maximum number of reads of one tree level in flight at the same time.
    pub concurrency_limit: usize,

    /// Maximum number of values in one `IN` list. Longer lists are split into several reads.
    pub max_bind_values: Option<usize>,

    /// Timeout of a whole resolution, in milliseconds.
    pub query_timeout: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            max_bind_values: None,
            query_timeout: None,
        }
    }
}

impl ResolverConfig {
    /// Reads `QUERY_CONCURRENCY_LIMIT`, `QUERY_BATCH_SIZE` and `QUERY_TIMEOUT_MS`. Absent or
    /// unparsable values keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = Self::default();

        Self {
            concurrency_limit: parse("QUERY_CONCURRENCY_LIMIT")
                .filter(|limit| *limit > 0)
                .map(|limit| limit as usize)
                .unwrap_or(defaults.concurrency_limit),
            max_bind_values: parse("QUERY_BATCH_SIZE")
                .filter(|size| *size > 0)
                .map(|size| size as usize)
                .or(defaults.max_bind_values),
            query_timeout: parse("QUERY_TIMEOUT_MS").or(defaults.query_timeout),
        }
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn with_max_bind_values(mut self, max: usize) -> Self {
        self.max_bind_values = Some(max);
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.query_timeout.map(Duration::from_millis)
    }

    /// The concurrency limit, never below one.
    pub(crate) fn effective_concurrency(&self) -> usize {
        self.concurrency_limit.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn environment_overrides_defaults() {
        let env: HashMap<&str, &str> = [("QUERY_CONCURRENCY_LIMIT", "2"), ("QUERY_BATCH_SIZE", "500")].into();
        let config = ResolverConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.concurrency_limit, 2);
        assert_eq!(config.max_bind_values, Some(500));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let env: HashMap<&str, &str> = [("QUERY_CONCURRENCY_LIMIT", "many"), ("QUERY_TIMEOUT_MS", "-3")].into();
        let config = ResolverConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{ "queryTimeout": 250 }"#).unwrap();

        assert_eq!(config.concurrency_limit, 8);
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
    }
}
