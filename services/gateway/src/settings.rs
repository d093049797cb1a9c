use config::{Config, ConfigError, Environment, Map};
use rate_types::pricing::PricingParameters;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Flat view of the process environment. Keys are the lowercased variable names.
#[derive(Debug, Clone, Deserialize)]
struct EnvSettings {
    base_rate_zar: f64,
    km_factor_zar: f64,
    min_rate_per_parcel_zar: f64,
    max_rate_per_parcel_zar: f64,
    config_version: String,
    bind_addr: String,
    snapshot_dir: PathBuf,
    ledger_path: PathBuf,
    request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Upper bound on reading a request body
    pub body_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub snapshot_dir: PathBuf,
    pub ledger_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pricing: PricingParameters,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(None)
    }

    /// Load from an explicit variable map instead of the process environment.
    pub fn from_source(source: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("base_rate_zar", 30.00)?
            .set_default("km_factor_zar", 0.125)?
            .set_default("min_rate_per_parcel_zar", 25.00)?
            .set_default("max_rate_per_parcel_zar", 80.00)?
            .set_default("config_version", "model_c_v1")?
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("snapshot_dir", "snapshots")?
            .set_default("ledger_path", "ledger/payouts_ledger.ndjson")?
            .set_default("request_timeout_secs", 10_i64)?
            .add_source(Environment::default().ignore_empty(true).source(source))
            .build()?;
        let env: EnvSettings = settings.try_deserialize()?;

        let pricing = PricingParameters {
            base_rate: env.base_rate_zar,
            distance_coefficient: env.km_factor_zar,
            min_rate: env.min_rate_per_parcel_zar,
            max_rate: env.max_rate_per_parcel_zar,
            version: env.config_version,
        };
        pricing
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid pricing parameters: {}", e)))?;

        let bind_addr = env
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Message(format!("BIND_ADDR {:?}: {}", env.bind_addr, e)))?;
        if env.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            pricing,
            server: ServerConfig {
                bind_addr,
                body_timeout: Duration::from_secs(env.request_timeout_secs),
            },
            storage: StorageConfig {
                snapshot_dir: env.snapshot_dir,
                ledger_path: env.ledger_path,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_source(vars(&[])).unwrap();
        assert_eq!(config.pricing, PricingParameters::default());
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.server.body_timeout, Duration::from_secs(10));
        assert_eq!(config.storage.snapshot_dir, PathBuf::from("snapshots"));
        assert_eq!(
            config.storage.ledger_path,
            PathBuf::from("ledger/payouts_ledger.ndjson")
        );
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_source(vars(&[
            ("BASE_RATE_ZAR", "32.5"),
            ("KM_FACTOR_ZAR", "0.2"),
            ("MIN_RATE_PER_PARCEL_ZAR", "20"),
            ("MAX_RATE_PER_PARCEL_ZAR", "95"),
            ("CONFIG_VERSION", "model_d_v2"),
            ("BIND_ADDR", "127.0.0.1:9090"),
            ("LEDGER_PATH", "/var/lib/rates/ledger.ndjson"),
        ]))
        .unwrap();
        assert_eq!(config.pricing.base_rate, 32.5);
        assert_eq!(config.pricing.distance_coefficient, 0.2);
        assert_eq!(config.pricing.min_rate, 20.0);
        assert_eq!(config.pricing.max_rate, 95.0);
        assert_eq!(config.pricing.version, "model_d_v2");
        assert_eq!(config.server.bind_addr.port(), 9090);
        assert_eq!(
            config.storage.ledger_path,
            PathBuf::from("/var/lib/rates/ledger.ndjson")
        );
    }

    #[test]
    fn test_empty_version_falls_back_to_default() {
        let config = AppConfig::from_source(vars(&[("CONFIG_VERSION", "")])).unwrap();
        assert_eq!(config.pricing.version, "model_c_v1");
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = AppConfig::from_source(vars(&[
            ("MIN_RATE_PER_PARCEL_ZAR", "90"),
            ("MAX_RATE_PER_PARCEL_ZAR", "80"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unparsable_rate_rejected() {
        assert!(AppConfig::from_source(vars(&[("BASE_RATE_ZAR", "thirty")])).is_err());
    }

    #[test]
    fn test_bad_bind_addr_rejected() {
        assert!(AppConfig::from_source(vars(&[("BIND_ADDR", "not-an-addr")])).is_err());
    }
}
