use std::time::Duration;

use anyhow::Context;
use url::Url;

pub const DEFAULT_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:11434/api/generate";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Settings for talking to the extraction service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub model: String,
    pub endpoint: Url,
    pub connect_timeout: Duration,
}

/// Values given on the command line; `None` defers to the environment and
/// then to the defaults.
#[derive(Clone, Debug, Default)]
pub struct ServiceOverrides {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

impl ServiceConfig {
    /// Resolve settings: flag, then `CONFNORM_*` variable, then default.
    pub fn resolve(overrides: ServiceOverrides) -> anyhow::Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        overrides: ServiceOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let model = overrides
            .model
            .or_else(|| env("CONFNORM_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let endpoint = overrides
            .endpoint
            .or_else(|| env("CONFNORM_URL"))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint)
            .with_context(|| format!("invalid extraction service URL: {endpoint}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!("extraction service URL must be http(s): {endpoint}");
        }

        let connect_timeout_secs = match overrides.connect_timeout_secs {
            Some(secs) => secs,
            None => match env("CONFNORM_CONNECT_TIMEOUT") {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid CONFNORM_CONNECT_TIMEOUT: {v}"))?,
                None => DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        };

        Ok(Self {
            model,
            endpoint,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}
