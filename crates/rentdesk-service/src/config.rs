//! Service configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use rentdesk_service_shared::MetricsConfig;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Interval between SSE heartbeat events.
    pub heartbeat: Duration,
    pub metrics: MetricsConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            heartbeat: Duration::from_secs(DEFAULT_HEARTBEAT_SECS),
            metrics: MetricsConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Read `SERVICE_HOST`, `SERVICE_PORT`, `SSE_HEARTBEAT_SECS` and the
    /// metrics variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Unparseable values fall back to the defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = parse_or(&lookup, "SERVICE_HOST", defaults.host);
        let port = parse_or(&lookup, "SERVICE_PORT", defaults.port);
        let heartbeat = parse_or(&lookup, "SSE_HEARTBEAT_SECS", DEFAULT_HEARTBEAT_SECS);

        Self {
            host,
            port,
            heartbeat: Duration::from_secs(heartbeat.max(1)),
            metrics: MetricsConfig::from_lookup(&lookup),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.heartbeat, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("SERVICE_HOST", "127.0.0.1"),
            ("SERVICE_PORT", "8088"),
            ("SSE_HEARTBEAT_SECS", "5"),
        ]);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8088");
        assert_eq!(config.heartbeat, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[("SERVICE_PORT", "http"), ("SSE_HEARTBEAT_SECS", "0")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.heartbeat, Duration::from_secs(1));
    }
}
