// src/config.rs
use anyhow::Context;
use std::time::Duration;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_DELAY_MS: u64 = 2000;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
const DEFAULT_PAYMENT_EMAIL: &str = "payment@vectortracepro.com";
const DEFAULT_SUPPORT_EMAIL: &str = "support@vectortracepro.com";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub analysis_delay: Duration,
    /// Sessions untouched for this long are dropped.
    pub session_ttl: Duration,
    pub payment_email: String,
    pub support_email: String,
    /// Pins the estimator's random source. Unset means seeded from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            analysis_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            payment_email: DEFAULT_PAYMENT_EMAIL.to_string(),
            support_email: DEFAULT_SUPPORT_EMAIL.to_string(),
            rng_seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let analysis_delay = match lookup("VECTORQUOTE_ANALYSIS_DELAY_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("VECTORQUOTE_ANALYSIS_DELAY_MS={raw:?}"))?,
            ),
            None => defaults.analysis_delay,
        };

        let session_ttl = match lookup("VECTORQUOTE_SESSION_TTL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("VECTORQUOTE_SESSION_TTL_SECS={raw:?}"))?;
                anyhow::ensure!(secs > 0, "VECTORQUOTE_SESSION_TTL_SECS must be positive");
                Duration::from_secs(secs)
            }
            None => defaults.session_ttl,
        };

        let rng_seed = lookup("VECTORQUOTE_RNG_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("VECTORQUOTE_RNG_SEED={raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            bind_addr: lookup("VECTORQUOTE_BIND").unwrap_or(defaults.bind_addr),
            analysis_delay,
            session_ttl,
            payment_email: lookup("VECTORQUOTE_PAYMENT_EMAIL").unwrap_or(defaults.payment_email),
            support_email: lookup("VECTORQUOTE_SUPPORT_EMAIL").unwrap_or(defaults.support_email),
            rng_seed,
        })
    }
}
