// src/config.rs

use crate::error::{Result, SymmetryError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

// --- Enums ---

/// Angular tolerance used when comparing lattice angles.
///
/// `Default` derives the angular criterion from the length tolerance
/// (the tilt of each basis vector is bounded by `symprec` at its tip).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum AngleTolerance {
  #[default]
  Default,
  Degrees(f64),
}

impl AngleTolerance {
  /// Explicit angular tolerance in degrees, or `None` when the length-derived
  /// criterion applies. Non-positive values fall back to the default.
  pub fn resolve(self) -> Option<f64> {
    match self {
      AngleTolerance::Default => None,
      AngleTolerance::Degrees(d) if d > 0.0 && d.is_finite() => Some(d),
      AngleTolerance::Degrees(_) => None,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SymmetryConfig {
  /// Cartesian length tolerance (same unit as the lattice)
  pub symprec: f64,

  #[serde(default)]
  pub angle_tolerance: AngleTolerance,

  /// Bound on tolerance-relaxation attempts
  #[serde(default = "default_max_attempts")]
  pub max_attempts: usize,

  /// Factor applied to the tolerance after a failed attempt
  #[serde(default = "default_reduce_rate")]
  pub reduce_rate: f64,

  /// Capacity for operation lists; `None` means unbounded
  #[serde(default)]
  pub max_operations: Option<usize>,
}

fn default_max_attempts() -> usize {
  100
}

fn default_reduce_rate() -> f64 {
  0.95
}

impl Default for SymmetryConfig {
  fn default() -> Self {
    Self {
      symprec: 1e-5,
      angle_tolerance: AngleTolerance::Default,
      max_attempts: default_max_attempts(),
      reduce_rate: default_reduce_rate(),
      max_operations: None,
    }
  }
}

impl SymmetryConfig {
  pub fn with_symprec(symprec: f64) -> Self {
    Self {
      symprec,
      ..Default::default()
    }
  }

  /// Relaxed settings for structures straight out of a geometry optimizer
  pub fn relaxed() -> Self {
    Self {
      symprec: 1e-3,
      angle_tolerance: AngleTolerance::Degrees(1.0),
      ..Default::default()
    }
  }

  /// Settings for experimental structures with refinement noise
  pub fn experimental() -> Self {
    Self {
      symprec: 1e-1,
      angle_tolerance: AngleTolerance::Degrees(5.0),
      ..Default::default()
    }
  }

  pub fn validate(&self) -> Result<()> {
    if !(self.symprec > 0.0 && self.symprec.is_finite()) {
      return Err(SymmetryError::InvalidTolerance(self.symprec));
    }
    if !(self.reduce_rate > 0.0 && self.reduce_rate < 1.0) {
      return Err(SymmetryError::Config(format!(
        "reduce_rate must lie in (0, 1), got {}",
        self.reduce_rate
      )));
    }
    if self.max_attempts == 0 {
      return Err(SymmetryError::Config("max_attempts must be at least 1".to_string()));
    }
    Ok(())
  }

  pub fn from_json_str(text: &str) -> Result<Self> {
    let cfg: Self =
      serde_json::from_str(text).map_err(|e| SymmetryError::Config(format!("Error parsing config: {}", e)))?;
    cfg.validate()?;
    Ok(cfg)
  }

  /// Loads a config written by [`SymmetryConfig::save`]
  pub fn load(path: &Path) -> Result<Self> {
    let file =
      File::open(path).map_err(|e| SymmetryError::Config(format!("Error opening config {:?}: {}", path, e)))?;
    let reader = BufReader::new(file);
    let cfg: Self = serde_json::from_reader(reader)
      .map_err(|e| SymmetryError::Config(format!("Error parsing config {:?}: {}", path, e)))?;
    cfg.validate()?;
    log::debug!("Config loaded from {:?}", path);
    Ok(cfg)
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
          .map_err(|e| SymmetryError::Config(format!("Could not create {:?}: {}", parent, e)))?;
      }
    }
    let file = File::create(path)
      .map_err(|e| SymmetryError::Config(format!("Could not create config file {:?}: {}", path, e)))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, self)
      .map_err(|e| SymmetryError::Config(format!("Failed to save config: {}", e)))?;
    log::debug!("Config saved to {:?}", path);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_angle_tolerance_resolution() {
    assert_eq!(AngleTolerance::Default.resolve(), None);
    assert_eq!(AngleTolerance::Degrees(2.5).resolve(), Some(2.5));
    assert_eq!(AngleTolerance::Degrees(-1.0).resolve(), None);
  }

  #[test]
  fn test_missing_fields_use_defaults() {
    let cfg = SymmetryConfig::from_json_str(r#"{"symprec": 0.01}"#).unwrap();
    assert!((cfg.symprec - 0.01).abs() < 1e-15);
    assert_eq!(cfg.max_attempts, 100);
    assert!((cfg.reduce_rate - 0.95).abs() < 1e-15);
    assert_eq!(cfg.angle_tolerance, AngleTolerance::Default);
  }

  #[test]
  fn test_rejects_bad_values() {
    assert!(SymmetryConfig::with_symprec(0.0).validate().is_err());
    assert!(SymmetryConfig::from_json_str(r#"{"symprec": 1e-5, "reduce_rate": 1.5}"#).is_err());
    assert!(SymmetryConfig::from_json_str("not json").is_err());
  }

  #[test]
  fn test_save_and_load() {
    let dir = std::env::temp_dir().join(format!("symcell-config-{}", std::process::id()));
    let path = dir.join("settings.json");
    let cfg = SymmetryConfig::relaxed();
    cfg.save(&path).unwrap();
    let back = SymmetryConfig::load(&path).unwrap();
    assert_eq!(back, cfg);
    let _ = fs::remove_dir_all(&dir);
  }
}
