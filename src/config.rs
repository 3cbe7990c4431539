use crate::domain::{Decimal, LocationId, RegionId, SystemId};
use crate::engine::ValuationTuning;
use crate::provider::esi::DEFAULT_BASE_URL;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub sde_path: String,
    pub esi_base_url: String,
    pub highsec_region: RegionId,
    pub highsec_station: LocationId,
    pub build_system: SystemId,
    /// Snapshot lifetime for cached upstream fetches. `None` disables expiry.
    pub snapshot_ttl: Option<Duration>,
    pub tuning: ValuationTuning,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("5000")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let sde_path = env_map
            .get("SDE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("SDE_PATH".to_string()))?;

        let esi_base_url = env_map
            .get("ESI_BASE_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // The Forge / Jita 4-4 and its build system, overridable per deploy.
        let highsec_region = RegionId::new(parse_id(&env_map, "HIGHSEC_REGION", "10000002")?);
        let highsec_station = LocationId::new(parse_id(&env_map, "HIGHSEC_STATION", "60003760")?);
        let build_system = SystemId::new(parse_id(&env_map, "BUILD_SYSTEM", "30004759")?);

        let ttl_secs = env_map
            .get("SNAPSHOT_TTL_SECS")
            .map(|s| s.as_str())
            .unwrap_or("300")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SNAPSHOT_TTL_SECS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;
        let snapshot_ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));

        let defaults = ValuationTuning::default();
        let me_factor = parse_factor(
            &env_map,
            "MANUFACTURING_ME_FACTOR",
            defaults.manufacturing_me_factor,
        )?;
        // A reduction factor above 1 would inflate consumption.
        if me_factor > Decimal::one() {
            return Err(ConfigError::InvalidValue(
                "MANUFACTURING_ME_FACTOR".to_string(),
                "must not exceed 1".to_string(),
            ));
        }
        let tuning = ValuationTuning {
            manufacturing_me_factor: me_factor,
            tax_multiplier: parse_factor(
                &env_map,
                "FACILITY_TAX_MULTIPLIER",
                defaults.tax_multiplier,
            )?,
            max_job_secs: parse_seconds(&env_map, "MAX_JOB_SECS", defaults.max_job_secs)?,
            run_secs: parse_seconds(&env_map, "JOB_RUN_SECS", defaults.run_secs)?,
        };

        Ok(Config {
            port,
            sde_path,
            esi_base_url,
            highsec_region,
            highsec_station,
            build_system,
            snapshot_ttl,
            tuning,
        })
    }
}

fn parse_id(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<i64, ConfigError> {
    let value = env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .parse::<i64>()
        .map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid i64".to_string())
        })?;
    if value <= 0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(value)
}

fn parse_factor(
    env_map: &HashMap<String, String>,
    key: &str,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    let value = match env_map.get(key) {
        Some(raw) => Decimal::from_str_canonical(raw).map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid decimal".to_string())
        })?,
        None => default,
    };
    if !value.is_positive() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(value)
}

fn parse_seconds(
    env_map: &HashMap<String, String>,
    key: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    let value = match env_map.get(key) {
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid i64".to_string())
        })?,
        None => default,
    };
    if value <= 0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(value)
}
