use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PARAMETER_PREFIX: &str = "/lacework";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings read from the function environment once per cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Deployment label used as the integration name prefix.
    pub environment: Option<String>,
    pub parameter_prefix: String,
    pub api_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: None,
            parameter_prefix: DEFAULT_PARAMETER_PREFIX.to_string(),
            api_url: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let parameter_prefix = non_empty("LACEWORK_PARAMETER_PREFIX")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_PARAMETER_PREFIX.to_string());

        let request_timeout = match non_empty("LACEWORK_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("LACEWORK_TIMEOUT_SECS is not a number: {raw}"))?;
                if secs == 0 {
                    bail!("LACEWORK_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            environment: non_empty("ENVIRONMENT"),
            parameter_prefix,
            api_url: non_empty("LACEWORK_API_URL"),
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reads_every_variable() {
        let settings = settings(&[
            ("ENVIRONMENT", "production"),
            ("LACEWORK_PARAMETER_PREFIX", "/security/lacework/"),
            ("LACEWORK_API_URL", "http://localhost:8080"),
            ("LACEWORK_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(settings.environment.as_deref(), Some("production"));
        assert_eq!(settings.parameter_prefix, "/security/lacework");
        assert_eq!(settings.api_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_environment_counts_as_unset() {
        let settings = settings(&[("ENVIRONMENT", "  ")]).unwrap();
        assert!(settings.environment.is_none());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = settings(&[("LACEWORK_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = settings(&[("LACEWORK_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("LACEWORK_TIMEOUT_SECS"));
    }
}
