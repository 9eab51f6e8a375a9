//! ACI 318-14 Material Builders
//!
//! Code functions for concrete and reinforcing steel, and builders that
//! assemble them into [`ConcreteMaterial`] and [`RebarMaterial`].
//!
//! | Quantity | Reference             | Expression                                  |
//! |----------|-----------------------|---------------------------------------------|
//! | beta_1   | Table 22.2.2.4.3      | 0.85 → 0.65, -0.05 per ksi above 4 ksi      |
//! | fr       | 19.2.3.1              | 7.5 λ √f'c (psi)                            |
//! | Ec       | 19.2.2.1              | 33 wc^1.5 √f'c (wc in pcf, psi)             |
//!
//! All inputs are in ksi and kcf; outputs are in ksi and kip/in³.

use log::warn;
use serde::{Deserialize, Serialize};

use super::{
    ConcreteLinearNoTension, ConcreteMaterial, RebarMaterial, RectangularStressBlock,
    SteelElasticPlastic,
};
use crate::errors::{CalcError, CalcResult, DesignWarning};
use crate::settings::DesignSettings;
use crate::units::{Kcf, KipPerIn3, Ksi, Psi};

/// beta_1 fallback used below the tabulated f'c range
pub const BETA1_FALLBACK: f64 = 0.85;

/// Stress block intensity factor alpha_1
pub const STRESS_BLOCK_ALPHA: f64 = 0.85;

/// beta_1 value with any out-of-range condition attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beta1 {
    pub value: f64,
    pub warning: Option<DesignWarning>,
}

/// beta_1 per ACI 318-14 Table 22.2.2.4.3.
///
/// f'c below 2.5 ksi is outside the table; the function falls back to 0.85
/// and returns a [`DesignWarning::Beta1OutOfRange`] with it.
///
/// ```rust
/// use column_core::materials::aci318::beta1;
///
/// assert_eq!(beta1(4.0).value, 0.85);
/// assert_eq!(beta1(9.0).value, 0.65);
/// assert!(beta1(2.0).warning.is_some());
/// ```
pub fn beta1(fpc: f64) -> Beta1 {
    let value = if (2.5..=4.0).contains(&fpc) {
        0.85
    } else if fpc > 4.0 && fpc < 8.0 {
        0.85 - 0.05 * (fpc - 4.0)
    } else if fpc >= 8.0 {
        0.65
    } else {
        warn!("f'c = {} ksi is less than 2.5 ksi - assuming beta_1 = {}", fpc, BETA1_FALLBACK);
        return Beta1 {
            value: BETA1_FALLBACK,
            warning: Some(DesignWarning::Beta1OutOfRange {
                fpc_ksi: fpc,
                fallback: BETA1_FALLBACK,
            }),
        };
    };
    Beta1 { value, warning: None }
}

/// Modulus of rupture fr (ksi).
///
/// `lambda` is the lightweight aggregate factor (1.0 for normal weight).
/// Negative f'c yields NaN; [`build_concrete`] rejects it first.
pub fn modulus_of_rupture(fpc: f64, lambda: f64) -> f64 {
    let fpc_psi: Psi = Ksi(fpc).into();
    let fr_psi = Psi(7.5 * lambda * fpc_psi.0.sqrt());
    Ksi::from(fr_psi).0
}

/// Concrete elastic modulus Ec (ksi) for unit weight `wc` in kcf.
pub fn concrete_elastic_modulus(fpc: f64, wc: f64) -> f64 {
    let fpc_psi: Psi = Ksi(fpc).into();
    let wc_pcf = wc * 1000.0;
    let ec_psi = Psi(33.0 * wc_pcf.powf(1.5) * fpc_psi.0.sqrt());
    Ksi::from(ec_psi).0
}

/// Build a concrete material per ACI 318-14.
///
/// # Arguments
///
/// * `fpc` - f'c (ksi)
/// * `wc` - unit weight of concrete (kcf), typically 0.15
/// * `eps_cu` - ultimate crushing strain, typically 0.003
pub fn build_concrete(fpc: f64, wc: f64, eps_cu: f64) -> CalcResult<ConcreteMaterial> {
    require_positive("fpc", fpc, "f'c must be a positive stress in ksi")?;
    require_positive("wc", wc, "Concrete unit weight must be positive")?;
    require_positive("eps_cu", eps_cu, "Ultimate strain must be positive")?;

    let ec = concrete_elastic_modulus(fpc, wc);

    // Service: compression only, linear, capped at 0.85 f'c
    let service = ConcreteLinearNoTension {
        elastic_modulus: ec,
        ultimate_strain: eps_cu,
        compressive_strength: 0.85 * fpc,
    };

    let b1 = beta1(fpc);
    let ultimate = RectangularStressBlock {
        compressive_strength: fpc,
        alpha: STRESS_BLOCK_ALPHA,
        gamma: b1.value,
        ultimate_strain: eps_cu,
    };

    Ok(ConcreteMaterial {
        name: format!("{} ksi Concrete", fpc),
        compressive_strength: fpc,
        density: KipPerIn3::from(Kcf(wc)).0,
        elastic_modulus: ec,
        ultimate_strain: eps_cu,
        service,
        ultimate,
        flexural_tensile_strength: modulus_of_rupture(fpc, 1.0),
        warnings: b1.warning.into_iter().collect(),
    })
}

/// Build an elastic-perfectly-plastic reinforcing steel material.
///
/// # Arguments
///
/// * `fy` - yield strength (ksi)
/// * `es` - elastic modulus (ksi), typically 29000
/// * `eps_fracture` - fracture strain
/// * `density` - unit weight of steel (kcf), typically 0.49
pub fn build_rebar(fy: f64, es: f64, eps_fracture: f64, density: f64) -> CalcResult<RebarMaterial> {
    require_positive("fy", fy, "Yield strength must be positive")?;
    require_positive("es", es, "Elastic modulus must be positive")?;
    require_positive("eps_fracture", eps_fracture, "Fracture strain must be positive")?;
    require_positive("density", density, "Steel unit weight must be positive")?;

    if eps_fracture <= fy / es {
        return Err(CalcError::invalid_input(
            "eps_fracture",
            eps_fracture.to_string(),
            "Fracture strain must exceed the yield strain",
        ));
    }

    Ok(RebarMaterial {
        name: format!("Grade {} Rebar", fy),
        density: KipPerIn3::from(Kcf(density)).0,
        profile: SteelElasticPlastic {
            yield_strength: fy,
            elastic_modulus: es,
            fracture_strain: eps_fracture,
        },
    })
}

/// Build the concrete for `fpc` using the configured unit weight and strain
pub fn concrete_from_settings(fpc: f64, settings: &DesignSettings) -> CalcResult<ConcreteMaterial> {
    build_concrete(
        fpc,
        settings.concrete.unit_weight_kcf,
        settings.concrete.ultimate_strain,
    )
}

/// Build the configured reinforcing steel
pub fn rebar_from_settings(settings: &DesignSettings) -> CalcResult<RebarMaterial> {
    let r = &settings.rebar;
    build_rebar(r.fy_ksi, r.es_ksi, r.fracture_strain, r.unit_weight_kcf)
}

fn require_positive(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}
