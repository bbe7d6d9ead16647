//! Best-effort country detection from the device time zone.
//!
//! A [`TimeZoneProvider`] reports an IANA zone id (a network lookup in a
//! full deployment, the environment here). [`detect_country`] maps it to a
//! country and falls back to the system zone. Failures and timeouts are
//! logged and swallowed; the caller only ever sees `Option<String>`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::CountryTable;

/// Default upper bound for one provider lookup.
pub const DEFAULT_DETECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetectError {
    #[error("time zone not available")]
    Unavailable,

    #[error("time zone lookup failed: {0}")]
    Lookup(String),
}

#[async_trait]
pub trait TimeZoneProvider: Send + Sync {
    /// Short name for log output.
    fn name(&self) -> &'static str;

    async fn time_zone(&self) -> Result<String, DetectError>;
}

/// Reads the zone from the `TZ` environment variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvTimeZone;

#[async_trait]
impl TimeZoneProvider for EnvTimeZone {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn time_zone(&self) -> Result<String, DetectError> {
        std::env::var("TZ")
            .ok()
            .and_then(|tz| normalize_zone(&tz))
            .ok_or(DetectError::Unavailable)
    }
}

/// Always reports the same zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTimeZone(pub String);

#[async_trait]
impl TimeZoneProvider for FixedTimeZone {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn time_zone(&self) -> Result<String, DetectError> {
        Ok(self.0.clone())
    }
}

/// Strips the POSIX `:` prefix and surrounding whitespace. `None` when blank.
fn normalize_zone(raw: &str) -> Option<String> {
    let zone = raw.trim().trim_start_matches(':').trim();
    (!zone.is_empty()).then(|| zone.to_string())
}

/// System time zone: `TZ`, then `/etc/timezone`.
pub fn system_time_zone() -> Option<String> {
    std::env::var("TZ")
        .ok()
        .and_then(|tz| normalize_zone(&tz))
        .or_else(|| {
            std::fs::read_to_string("/etc/timezone")
                .ok()
                .and_then(|contents| normalize_zone(&contents))
        })
}

/// Asks `provider` for the current zone and maps it to a country name.
///
/// Falls back to the country of `system_time_zone` when the provider fails,
/// times out, or reports a zone no country uses. Returns `None` when neither
/// matches.
pub async fn detect_country(
    provider: &dyn TimeZoneProvider,
    countries: &CountryTable,
    system_time_zone: Option<&str>,
    timeout: Duration,
) -> Option<String> {
    let detected = match tokio::time::timeout(timeout, provider.time_zone()).await {
        Ok(Ok(zone)) => {
            debug!(provider = provider.name(), zone = %zone, "time zone detected");
            Some(zone)
        }
        Ok(Err(error)) => {
            warn!(provider = provider.name(), %error, "time zone detection failed");
            None
        }
        Err(_) => {
            warn!(
                provider = provider.name(),
                timeout_ms = timeout.as_millis() as u64,
                "time zone detection timed out"
            );
            None
        }
    };

    detected
        .as_deref()
        .and_then(|zone| countries.find_by_time_zone(zone))
        .or_else(|| system_time_zone.and_then(|zone| countries.find_by_time_zone(zone)))
        .map(|country| country.name.clone())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Country;

    struct FailingProvider;

    #[async_trait]
    impl TimeZoneProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn time_zone(&self) -> Result<String, DetectError> {
            Err(DetectError::Lookup("connection refused".to_string()))
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl TimeZoneProvider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn time_zone(&self) -> Result<String, DetectError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("Europe/Paris".to_string())
        }
    }

    fn countries() -> CountryTable {
        CountryTable::new(vec![
            Country {
                name: "France".to_string(),
                tip_percentage: dec!(0),
                time_zone: "Europe/Paris".to_string(),
            },
            Country {
                name: "Japan".to_string(),
                tip_percentage: dec!(0),
                time_zone: "Asia/Tokyo".to_string(),
            },
        ])
    }

    #[tokio::test]
    async fn detect_country_uses_provider_zone() {
        let provider = FixedTimeZone("Europe/Paris".to_string());

        let country =
            detect_country(&provider, &countries(), Some("Asia/Tokyo"), DEFAULT_DETECT_TIMEOUT)
                .await;

        assert_eq!(country.as_deref(), Some("France"));
    }

    #[tokio::test]
    async fn detect_country_falls_back_to_system_zone_on_error() {
        let country = detect_country(
            &FailingProvider,
            &countries(),
            Some("Asia/Tokyo"),
            DEFAULT_DETECT_TIMEOUT,
        )
        .await;

        assert_eq!(country.as_deref(), Some("Japan"));
    }

    #[tokio::test]
    async fn detect_country_falls_back_when_zone_is_unknown() {
        let provider = FixedTimeZone("Mars/Olympus_Mons".to_string());

        let country =
            detect_country(&provider, &countries(), Some("Asia/Tokyo"), DEFAULT_DETECT_TIMEOUT)
                .await;

        assert_eq!(country.as_deref(), Some("Japan"));
    }

    #[tokio::test]
    async fn detect_country_gives_up_after_timeout() {
        let country = detect_country(
            &SlowProvider,
            &countries(),
            None,
            Duration::from_millis(20),
        )
        .await;

        assert_eq!(country, None);
    }

    #[tokio::test]
    async fn detect_country_without_any_match_is_none() {
        let country =
            detect_country(&FailingProvider, &countries(), None, DEFAULT_DETECT_TIMEOUT).await;

        assert_eq!(country, None);
    }

    #[test]
    fn normalize_zone_strips_posix_prefix() {
        assert_eq!(normalize_zone(":Europe/Paris\n"), Some("Europe/Paris".to_string()));
        assert_eq!(normalize_zone("  "), None);
    }
}
