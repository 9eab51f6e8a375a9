//! # Materials
//!
//! Constitutive models for reinforced concrete columns.
//!
//! - [`ConcreteMaterial`]: service (linear, no tension) and ultimate
//!   (rectangular stress block) laws sharing one f'c and elastic modulus
//! - [`RebarMaterial`]: elastic-perfectly-plastic reinforcing steel
//! - [`rebar::RebarTable`]: injected bar size lookup (designator → diameter, area)
//!
//! Materials are built once per column record by the functions in [`aci318`]
//! and are read-only afterwards.
//!
//! Sign convention: compressive strain and stress are positive for concrete;
//! steel is symmetric in tension and compression.
//!
//! ## Example
//!
//! ```rust
//! use column_core::materials::aci318::{build_concrete, build_rebar};
//!
//! let concrete = build_concrete(4.0, 0.15, 0.003).unwrap();
//! let steel = build_rebar(60.0, 29000.0, 0.3, 0.49).unwrap();
//!
//! assert_eq!(concrete.beta1(), 0.85);
//! assert_eq!(steel.profile.stress(0.01), 60.0);
//! ```

pub mod aci318;
pub mod rebar;

pub use rebar::{BarProperties, RebarCallout, RebarTable};

use serde::{Deserialize, Serialize};

use crate::errors::DesignWarning;

/// Linear concrete law with no tensile capacity (service level).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteLinearNoTension {
    /// Elastic modulus Ec (ksi)
    pub elastic_modulus: f64,
    /// Strain at which the concrete is considered crushed
    pub ultimate_strain: f64,
    /// Stress cap (ksi)
    pub compressive_strength: f64,
}

impl ConcreteLinearNoTension {
    /// Stress (ksi) at a compressive-positive strain.
    ///
    /// Zero in tension and beyond the ultimate strain; linear up to the
    /// capped strength, then flat.
    pub fn stress(&self, strain: f64) -> f64 {
        if strain <= 0.0 || strain > self.ultimate_strain {
            return 0.0;
        }
        (self.elastic_modulus * strain).min(self.compressive_strength)
    }
}

/// Equivalent rectangular stress block (ACI 318-14 22.2.2.4).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularStressBlock {
    /// f'c (ksi)
    pub compressive_strength: f64,
    /// Stress intensity factor (0.85)
    pub alpha: f64,
    /// Block depth factor, beta_1
    pub gamma: f64,
    /// Extreme fiber crushing strain
    pub ultimate_strain: f64,
}

impl RectangularStressBlock {
    /// Stress (ksi) at a compressive-positive strain.
    ///
    /// The block acts over the outer `gamma` fraction of the compression zone,
    /// i.e. for strains between `eps_cu * (1 - gamma)` and `eps_cu`.
    pub fn stress(&self, strain: f64) -> f64 {
        let onset = self.ultimate_strain * (1.0 - self.gamma);
        if strain >= onset && strain <= self.ultimate_strain && strain > 0.0 {
            self.alpha * self.compressive_strength
        } else {
            0.0
        }
    }

    /// Depth of the stress block `a = beta_1 * c` for neutral-axis depth `c`
    pub fn block_depth(&self, neutral_axis_depth: f64) -> f64 {
        self.gamma * neutral_axis_depth
    }
}

/// Elastic-perfectly-plastic steel law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelElasticPlastic {
    /// fy (ksi)
    pub yield_strength: f64,
    /// Es (ksi)
    pub elastic_modulus: f64,
    /// Strain magnitude at which the bar fractures
    pub fracture_strain: f64,
}

impl SteelElasticPlastic {
    /// Yield strain fy / Es
    pub fn yield_strain(&self) -> f64 {
        self.yield_strength / self.elastic_modulus
    }

    /// Stress (ksi) at a strain; zero once the fracture strain is exceeded
    pub fn stress(&self, strain: f64) -> f64 {
        if strain.abs() > self.fracture_strain {
            return 0.0;
        }
        (self.elastic_modulus * strain).clamp(-self.yield_strength, self.yield_strength)
    }
}

/// Concrete material per ACI 318-14.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMaterial {
    /// Display name (e.g., "5 ksi Concrete")
    pub name: String,
    /// f'c (ksi)
    pub compressive_strength: f64,
    /// Unit weight (kip/in³)
    pub density: f64,
    /// Ec (ksi)
    pub elastic_modulus: f64,
    /// Extreme fiber crushing strain
    pub ultimate_strain: f64,
    /// Service stress-strain law
    pub service: ConcreteLinearNoTension,
    /// Ultimate stress-strain law
    pub ultimate: RectangularStressBlock,
    /// Modulus of rupture fr (ksi)
    pub flexural_tensile_strength: f64,
    /// Non-fatal conditions raised while building the material
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DesignWarning>,
}

impl ConcreteMaterial {
    /// beta_1 used by the ultimate stress block
    pub fn beta1(&self) -> f64 {
        self.ultimate.gamma
    }
}

/// Reinforcing steel material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarMaterial {
    /// Display name (e.g., "Grade 60 Rebar")
    pub name: String,
    /// Unit weight (kip/in³)
    pub density: f64,
    /// Stress-strain law
    pub profile: SteelElasticPlastic,
}

impl RebarMaterial {
    /// fy (ksi)
    pub fn yield_strength(&self) -> f64 {
        self.profile.yield_strength
    }

    /// Es (ksi)
    pub fn elastic_modulus(&self) -> f64 {
        self.profile.elastic_modulus
    }
}
