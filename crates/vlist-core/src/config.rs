#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! One [`EngineConfig`] covers every knob the window engine and its runtime
//! driver expose, so a host can tune list behavior from data instead of
//! code. With the `config` feature enabled it loads from TOML or JSON:
//!
//! ```toml
//! page_size = 20
//! buffer_size = 3
//! height_mode = "estimate"
//! placeholder_height = 180.0
//!
//! [units]
//! reference_width = 750.0
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("vlist.toml")?;
//! let config = EngineConfig::from_json_str(json)?;
//! ```
//!
//! Every loader runs [`EngineConfig::validate`] before returning.
//!
//! # Defaults
//!
//! `EngineConfig::default()` reproduces the classic hook behavior: pages of
//! five, two rows of over-render on each side, zero-height placeholders
//! corrected by measurement, and a 50 ms scroll throttle.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// How heights are assigned to freshly appended rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum HeightMode {
    /// Rows start at `placeholder_height` and wait for the render surface
    /// to report their real height.
    #[default]
    Measured,
    /// Rows start at an estimate: the per-item height function when one is
    /// installed, otherwise the adaptive running estimate. Estimates are in
    /// host-native units and pass through the unit scale.
    Estimate,
}

/// Native-unit to pixel conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct UnitConversion {
    /// Design width that maps onto the full window width.
    pub reference_width: f64,
}

impl Default for UnitConversion {
    fn default() -> Self {
        Self {
            reference_width: 750.0,
        }
    }
}

/// Tunable parameters for a [`WindowEngine`](crate::WindowEngine).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct EngineConfig {
    /// Rows requested per page. Passed to the loader as a hint.
    pub page_size: usize,
    /// Extra rows rendered above and below the viewport.
    pub buffer_size: usize,
    /// Distance from the end of content (px) at which loading triggers.
    pub load_margin: f64,
    /// Height assignment for new rows.
    pub height_mode: HeightMode,
    /// Placeholder height (px) and prior mean for the adaptive estimator.
    pub placeholder_height: f64,
    /// Pseudo-observations backing the placeholder in the adaptive estimator.
    pub estimate_prior_strength: f64,
    /// Minimum interval between applied scroll updates (ms).
    pub throttle_ms: u64,
    /// Optional native-unit conversion.
    pub units: Option<UnitConversion>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            buffer_size: 2,
            load_margin: 50.0,
            height_mode: HeightMode::Measured,
            placeholder_height: 0.0,
            estimate_prior_strength: 2.0,
            throttle_ms: 50,
            units: None,
        }
    }
}

impl EngineConfig {
    /// Set the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the over-render buffer.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the trailing load margin.
    #[must_use]
    pub fn with_load_margin(mut self, load_margin: f64) -> Self {
        self.load_margin = load_margin;
        self
    }

    /// Set the height mode.
    #[must_use]
    pub fn with_height_mode(mut self, mode: HeightMode) -> Self {
        self.height_mode = mode;
        self
    }

    /// Set the placeholder height.
    #[must_use]
    pub fn with_placeholder_height(mut self, px: f64) -> Self {
        self.placeholder_height = px;
        self
    }

    /// Enable native-unit conversion against `reference_width`.
    #[must_use]
    pub fn with_units(mut self, reference_width: f64) -> Self {
        self.units = Some(UnitConversion { reference_width });
        self
    }

    /// Set the scroll throttle interval.
    #[must_use]
    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    /// Check every field, collecting all problems.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.page_size == 0 {
            errors.push("page_size must be at least 1".to_string());
        }
        if !(self.load_margin.is_finite() && self.load_margin >= 0.0) {
            errors.push(format!(
                "load_margin must be a non-negative number, got {}",
                self.load_margin
            ));
        }
        if !(self.placeholder_height.is_finite() && self.placeholder_height >= 0.0) {
            errors.push(format!(
                "placeholder_height must be a non-negative number, got {}",
                self.placeholder_height
            ));
        }
        if !(self.estimate_prior_strength.is_finite() && self.estimate_prior_strength >= 0.0) {
            errors.push(format!(
                "estimate_prior_strength must be a non-negative number, got {}",
                self.estimate_prior_strength
            ));
        }
        if let Some(units) = &self.units {
            if !(units.reference_width.is_finite() && units.reference_width > 0.0) {
                errors.push(format!(
                    "units.reference_width must be positive, got {}",
                    units.reference_width
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSer)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an engine configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
