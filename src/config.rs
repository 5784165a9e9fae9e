// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local runs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::ColocationConfig;

/// Trajectory files with more points than this are skipped.
pub const DEFAULT_MAX_TRACKPOINTS: usize = 2500;

/// Consecutive points further apart than this mark an activity invalid.
pub const DEFAULT_INVALID_GAP_SECS: f64 = 300.0;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the input layout (contains `Data/` and `labeled_ids.txt`)
    pub dataset_dir: PathBuf,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Oversize threshold for trajectory files
    pub max_trackpoints: usize,
    /// Co-location clustering parameters
    pub colocation: ColocationConfig,
    /// Gap threshold for the invalid-activities report
    pub invalid_gap_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            database_path: PathBuf::from("geolife.db"),
            max_trackpoints: DEFAULT_MAX_TRACKPOINTS,
            colocation: ColocationConfig::default(),
            invalid_gap_secs: DEFAULT_INVALID_GAP_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();
        let colocation = ColocationConfig {
            temporal_eps_secs: parse_var(
                "GEOLIFE_TEMPORAL_EPS_SECS",
                defaults.colocation.temporal_eps_secs,
            )?,
            spatial_eps_meters: parse_var(
                "GEOLIFE_SPATIAL_EPS_METERS",
                defaults.colocation.spatial_eps_meters,
            )?,
            min_cluster_size: parse_var(
                "GEOLIFE_MIN_CLUSTER_SIZE",
                defaults.colocation.min_cluster_size,
            )?,
        };

        let config = Self {
            dataset_dir: env::var("GEOLIFE_DATASET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_dir),
            database_path: env::var("GEOLIFE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            max_trackpoints: parse_var("GEOLIFE_MAX_TRACKPOINTS", defaults.max_trackpoints)?,
            colocation,
            invalid_gap_secs: parse_var("GEOLIFE_INVALID_GAP_SECS", defaults.invalid_gap_secs)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject radii and thresholds the clustering and reports cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("GEOLIFE_TEMPORAL_EPS_SECS", self.colocation.temporal_eps_secs)?;
        non_negative("GEOLIFE_SPATIAL_EPS_METERS", self.colocation.spatial_eps_meters)?;
        non_negative("GEOLIFE_INVALID_GAP_SECS", self.invalid_gap_secs)?;
        if self.colocation.min_cluster_size == 0 {
            return Err(ConfigError::OutOfRange {
                name: "GEOLIFE_MIN_CLUSTER_SIZE",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
        }),
        Err(_) => Ok(default),
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            reason: "must be a finite non-negative number",
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Value of environment variable {name} {reason}")]
    OutOfRange {
        name: &'static str,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("GEOLIFE_DATASET_DIR", "/data/geolife");
        env::set_var("GEOLIFE_MAX_TRACKPOINTS", "1000");
        env::set_var("GEOLIFE_SPATIAL_EPS_METERS", "250");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.dataset_dir, PathBuf::from("/data/geolife"));
        assert_eq!(config.max_trackpoints, 1000);
        assert_eq!(config.colocation.spatial_eps_meters, 250.0);
        assert_eq!(config.colocation.temporal_eps_secs, 60.0);
        assert_eq!(config.invalid_gap_secs, 300.0);

        env::set_var("GEOLIFE_MIN_CLUSTER_SIZE", "two");
        let err = Config::from_env().expect_err("Non-numeric size should fail");
        assert!(err.to_string().contains("GEOLIFE_MIN_CLUSTER_SIZE"));

        env::remove_var("GEOLIFE_DATASET_DIR");
        env::remove_var("GEOLIFE_MAX_TRACKPOINTS");
        env::remove_var("GEOLIFE_SPATIAL_EPS_METERS");
        env::remove_var("GEOLIFE_MIN_CLUSTER_SIZE");
    }

    #[test]
    fn test_validate_rejects_unusable_radii() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.colocation.temporal_eps_secs = -10.0;
        let err = config.validate().expect_err("Negative radius should fail");
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "GEOLIFE_TEMPORAL_EPS_SECS",
                ..
            }
        ));

        let mut config = Config::default();
        config.colocation.spatial_eps_meters = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.colocation.min_cluster_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.colocation.temporal_eps_secs = 0.0;
        assert!(config.validate().is_ok());
    }
}
