// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration

use super::ExportError;
use crate::geometry::FacetParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration file looked up by `ExportConfig::load`
pub const CONFIG_FILE_NAME: &str = "dagmc.toml";

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Maximum distance between facets and the true geometry
    pub faceting_tolerance: f64,
    /// Maximum facet edge length, zero for unlimited
    pub length_tolerance: f64,
    /// Maximum angle between adjacent facet normals, in degrees
    pub normal_tolerance: u32,
    /// Report every warning instead of rate limiting them
    pub verbose: bool,
    /// Abort the export when a curve cannot be faceted
    pub fatal_on_curves: bool,
    /// Mesh file to write
    pub output_filename: PathBuf,
    /// Number of "vertices not at ends of curve" warnings shown before
    /// the rest are suppressed
    pub curve_warning_budget: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            faceting_tolerance: 1.0e-3,
            length_tolerance: 0.0,
            normal_tolerance: 5,
            verbose: false,
            fatal_on_curves: false,
            output_filename: PathBuf::from("dagmc.json"),
            curve_warning_budget: 10,
        }
    }
}

/// A loosely typed option value, as passed by a host command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Float(v) => Some(*v),
            OptionValue::Integer(v) => Some(*v as f64),
            OptionValue::Text(s) => s.parse().ok(),
            OptionValue::Bool(_) => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(v) => Some(*v),
            OptionValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            OptionValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            OptionValue::Integer(v) => Some(*v != 0),
            OptionValue::Text(s) => s.parse().ok(),
            OptionValue::Float(_) => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Integer(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

impl ExportConfig {
    /// Build a configuration from a key/value option bundle.
    ///
    /// Missing keys keep their defaults; unknown keys and values of the
    /// wrong type are rejected.
    pub fn from_options(options: &BTreeMap<String, OptionValue>) -> Result<Self, ExportError> {
        let mut config = Self::default();
        for (key, value) in options {
            let invalid = || ExportError::Config(format!("invalid value for {}: {:?}", key, value));
            match key.as_str() {
                "faceting_tolerance" => {
                    config.faceting_tolerance = value.as_f64().ok_or_else(invalid)?
                }
                "length_tolerance" => config.length_tolerance = value.as_f64().ok_or_else(invalid)?,
                "normal_tolerance" => {
                    config.normal_tolerance = value
                        .as_i64()
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(invalid)?
                }
                "verbose" => config.verbose = value.as_bool().ok_or_else(invalid)?,
                "fatal_on_curves" => config.fatal_on_curves = value.as_bool().ok_or_else(invalid)?,
                "output_filename" | "filename" => match value {
                    OptionValue::Text(path) => config.output_filename = PathBuf::from(path),
                    _ => return Err(invalid()),
                },
                "curve_warning_budget" => {
                    config.curve_warning_budget = value
                        .as_i64()
                        .and_then(|v| usize::try_from(v).ok())
                        .ok_or_else(invalid)?
                }
                _ => return Err(ExportError::Config(format!("unknown option: {}", key))),
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ExportConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `dagmc.toml` if present, then apply `DAGMC_*` environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE_NAME).exists() {
            Self::from_file(CONFIG_FILE_NAME)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by environment variable name
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("DAGMC_FACETING_TOLERANCE").and_then(|v| v.parse().ok()) {
            self.faceting_tolerance = v;
        }
        if let Some(v) = lookup("DAGMC_LENGTH_TOLERANCE").and_then(|v| v.parse().ok()) {
            self.length_tolerance = v;
        }
        if let Some(v) = lookup("DAGMC_NORMAL_TOLERANCE").and_then(|v| v.parse().ok()) {
            self.normal_tolerance = v;
        }
        if let Some(v) = lookup("DAGMC_VERBOSE") {
            self.verbose = v.parse().unwrap_or(false);
        }
        if let Some(v) = lookup("DAGMC_FATAL_ON_CURVES") {
            self.fatal_on_curves = v.parse().unwrap_or(false);
        }
        if let Some(v) = lookup("DAGMC_OUTPUT") {
            self.output_filename = PathBuf::from(v);
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if !(self.faceting_tolerance.is_finite() && self.faceting_tolerance > 0.0) {
            return Err(ExportError::Config(format!(
                "faceting tolerance must be positive, got {}",
                self.faceting_tolerance
            )));
        }
        if !(self.length_tolerance.is_finite() && self.length_tolerance >= 0.0) {
            return Err(ExportError::Config(format!(
                "length tolerance must not be negative, got {}",
                self.length_tolerance
            )));
        }
        if self.normal_tolerance > 180 {
            return Err(ExportError::Config(format!(
                "normal tolerance must be within 0..=180 degrees, got {}",
                self.normal_tolerance
            )));
        }
        Ok(())
    }

    /// Tolerances handed to the tessellation service
    pub fn facet_params(&self) -> FacetParams {
        FacetParams {
            faceting_tolerance: self.faceting_tolerance,
            normal_tolerance: self.normal_tolerance,
            length_tolerance: self.length_tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options(pairs: &[(&str, OptionValue)]) -> BTreeMap<String, OptionValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_from_options() {
        let config = ExportConfig::from_options(&options(&[
            ("faceting_tolerance", 0.01f64.into()),
            ("normal_tolerance", 10i64.into()),
            ("fatal_on_curves", true.into()),
            ("filename", "out.json".into()),
        ]))
        .unwrap();
        assert_eq!(config.faceting_tolerance, 0.01);
        assert_eq!(config.normal_tolerance, 10);
        assert!(config.fatal_on_curves);
        assert_eq!(config.output_filename, PathBuf::from("out.json"));
        assert_eq!(config.curve_warning_budget, 10);
    }

    #[test]
    fn test_from_options_rejects_bad_input() {
        assert!(matches!(
            ExportConfig::from_options(&options(&[("make_watertight", true.into())])),
            Err(ExportError::Config(_))
        ));
        assert!(ExportConfig::from_options(&options(&[("verbose", 0.5f64.into())])).is_err());
        assert!(
            ExportConfig::from_options(&options(&[("faceting_tolerance", (-1.0f64).into())])).is_err()
        );
        assert!(ExportConfig::from_options(&options(&[("normal_tolerance", 200i64.into())])).is_err());
    }

    #[test]
    fn test_toml_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dagmc.toml");
        let config = ExportConfig {
            verbose: true,
            curve_warning_budget: 3,
            ..Default::default()
        };
        config.save(&path)?;
        assert_eq!(ExportConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_toml_uses_defaults() -> Result<()> {
        let config: ExportConfig = toml::from_str("fatal_on_curves = true")?;
        assert!(config.fatal_on_curves);
        assert_eq!(config.normal_tolerance, 5);
        Ok(())
    }

    #[test]
    fn test_overrides() {
        let mut config = ExportConfig::default();
        config.apply_overrides(|key| match key {
            "DAGMC_FACETING_TOLERANCE" => Some("0.5".to_string()),
            "DAGMC_VERBOSE" => Some("true".to_string()),
            "DAGMC_OUTPUT" => Some("model.json".to_string()),
            _ => None,
        });
        assert_eq!(config.faceting_tolerance, 0.5);
        assert!(config.verbose);
        assert_eq!(config.output_filename, PathBuf::from("model.json"));
    }
}
