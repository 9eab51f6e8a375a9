//! # Design Settings
//!
//! Code defaults that used to live as module-level constants (default cover,
//! minimum bar size, maximum bar spacing, steel grade) are gathered here and
//! passed explicitly into the geometry and capacity functions. A different
//! code edition or office standard is modeled by loading another settings
//! file, never by mutating shared state.
//!
//! Settings serialize as human-readable JSON.
//!
//! ## Example
//!
//! ```rust
//! use column_core::settings::DesignSettings;
//!
//! let settings = DesignSettings::default();
//! assert_eq!(settings.code, "ACI 318-14");
//! assert_eq!(settings.rebar.cover_in, 1.5);
//!
//! let json = serde_json::to_string_pretty(&settings).unwrap();
//! let back: DesignSettings = serde_json::from_str(&json).unwrap();
//! assert_eq!(back, settings);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Global design settings for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Design code edition label (e.g., "ACI 318-14")
    pub code: String,

    /// Concrete defaults
    pub concrete: ConcreteDefaults,

    /// Reinforcing steel and detailing defaults
    pub rebar: RebarDefaults,

    /// Strength-reduction factor limits
    pub phi: PhiLimits,

    /// Interaction post-processing constants
    pub interaction: InteractionSettings,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            code: "ACI 318-14".to_string(),
            concrete: ConcreteDefaults::default(),
            rebar: RebarDefaults::default(),
            phi: PhiLimits::default(),
            interaction: InteractionSettings::default(),
        }
    }
}

/// Concrete material defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcreteDefaults {
    /// Unit weight of concrete (kcf)
    pub unit_weight_kcf: f64,
    /// Ultimate crushing strain
    pub ultimate_strain: f64,
}

impl Default for ConcreteDefaults {
    fn default() -> Self {
        ConcreteDefaults {
            unit_weight_kcf: 0.15,
            ultimate_strain: 0.003,
        }
    }
}

/// Reinforcing steel and detailing defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebarDefaults {
    /// Yield strength fy (ksi)
    pub fy_ksi: f64,
    /// Elastic modulus Es (ksi)
    pub es_ksi: f64,
    /// Fracture strain used by the elastic-plastic law
    pub fracture_strain: f64,
    /// Unit weight of steel (kcf)
    pub unit_weight_kcf: f64,
    /// Clear cover to ties (in)
    pub cover_in: f64,
    /// Tie bar designator
    pub tie_bar: String,
    /// Minimum longitudinal bar designator
    pub min_longitudinal_bar: String,
    /// Maximum center-to-center longitudinal bar spacing (in)
    pub max_bar_spacing_in: f64,
}

impl Default for RebarDefaults {
    fn default() -> Self {
        RebarDefaults {
            fy_ksi: 60.0,
            es_ksi: 29000.0,
            fracture_strain: 0.3,
            unit_weight_kcf: 0.49,
            cover_in: 1.5,
            tie_bar: "#3".to_string(),
            min_longitudinal_bar: "#6".to_string(),
            max_bar_spacing_in: 6.0,
        }
    }
}

/// Strength-reduction factor limits per ACI 318-14 Table 21.2.2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhiLimits {
    /// phi for compression-controlled sections (tied)
    pub compression_controlled: f64,
    /// phi for tension-controlled sections
    pub tension_controlled: f64,
    /// Net tensile strain at the tension-controlled limit
    pub tension_controlled_strain: f64,
}

impl Default for PhiLimits {
    fn default() -> Self {
        PhiLimits {
            compression_controlled: 0.65,
            tension_controlled: 0.90,
            tension_controlled_strain: 0.005,
        }
    }
}

/// Largest rounding precision that still fits an f64 mantissa
pub const MAX_ROUNDING_DECIMALS: u32 = 15;

/// Constants used when converting raw section-analysis output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Neutral-axis depth at or below which the sentinel strain is used (in)
    pub min_neutral_axis_depth_in: f64,
    /// Tensile strain assigned to effectively fully-tension sections
    pub sentinel_tensile_strain: f64,
    /// Decimal places d_n and k_u are rounded to
    pub rounding_decimals: u32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        InteractionSettings {
            min_neutral_axis_depth_in: 0.1,
            sentinel_tensile_strain: 0.1,
            rounding_decimals: 3,
        }
    }
}

impl InteractionSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if self.rounding_decimals > MAX_ROUNDING_DECIMALS {
            return Err(CalcError::invalid_input(
                "rounding_decimals",
                self.rounding_decimals.to_string(),
                format!("At most {} decimal places", MAX_ROUNDING_DECIMALS),
            ));
        }
        Ok(())
    }
}

/// Load settings from a JSON file.
///
/// Missing keys fall back to their defaults.
pub fn load_settings(path: &Path) -> CalcResult<DesignSettings> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let settings: DesignSettings =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid settings JSON in {}: {}", path.display(), e),
        })?;
    settings.interaction.validate()?;
    Ok(settings)
}

/// Save settings as pretty JSON with write-to-temp-then-rename semantics.
pub fn save_settings(settings: &DesignSettings, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(settings).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, json.as_bytes())
}

/// Write bytes to `path` through a sibling `.tmp` file and an atomic rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}
