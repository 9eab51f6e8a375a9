//! # Interaction Points
//!
//! Converts the raw output of a cross-section analysis into phi-scaled
//! axial/moment design points, and assembles them into design curves that
//! demands are checked against.
//!
//! The analysis itself (fiber integration over the section) is not done
//! here. Any engine implementing [`SectionAnalysis`] can supply the raw
//! `(N, M, d_n, k_u)` tuples; [`RecordedAnalysis`] replays tuples saved to
//! JSON by an external engine.
//!
//! ## Net tensile strain
//!
//! With the extreme compression fiber at the crushing strain `eps_cu`, the
//! extreme tension fiber sits at `d_n / k_u` from it, so
//!
//! ```text
//! eps_t = eps_cu * (d_n / k_u - d_n) / d_n
//! ```
//!
//! For `d_n` at or below the threshold the section is effectively all
//! tension and a sentinel strain is used instead.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::column::{aci_ref, phi_factor_with_limits, TieType};
use super::section::{BendingAxis, ColumnSection};
use crate::errors::{CalcError, CalcResult};
use crate::schedule::DesignDemand;
use crate::settings::{DesignSettings, MAX_ROUNDING_DECIMALS};
use crate::units::{KipFt, KipIn, Kips};

/// One raw point from a section analysis (kips, kip-in, in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSectionResult {
    /// Axial force, compression positive
    pub n: f64,
    /// Moment about the analysis axis
    pub m: f64,
    /// Neutral-axis depth
    pub d_n: f64,
    /// Neutral-axis depth over extreme tension fiber depth
    pub k_u: f64,
}

/// Phi-scaled interaction point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionPoint {
    pub n: f64,
    pub m: f64,
    /// Rounded and clamped d_n
    pub d_n: f64,
    /// Rounded k_u
    pub k_u: f64,
    /// Net tensile strain at the extreme tension fiber
    pub eps_t: f64,
    pub phi: f64,
    /// phi * N (kips)
    pub phi_n: f64,
    /// phi * M (kip-in)
    pub phi_m: f64,
}

/// External cross-section analysis.
///
/// Returns the points of a moment interaction sweep about `axis`, ordered
/// from pure compression toward pure tension.
pub trait SectionAnalysis {
    fn interaction_results(
        &self,
        section: &ColumnSection,
        axis: BendingAxis,
    ) -> CalcResult<Vec<RawSectionResult>>;
}

/// Interaction sweeps saved by an external engine, replayed as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedAnalysis {
    #[serde(default)]
    pub x: Vec<RawSectionResult>,
    #[serde(default)]
    pub y: Vec<RawSectionResult>,
}

impl RecordedAnalysis {
    /// Load from JSON `{ "x": [...], "y": [...] }`
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid analysis dump {}: {}", path.display(), e),
        })
    }
}

impl SectionAnalysis for RecordedAnalysis {
    fn interaction_results(
        &self,
        _section: &ColumnSection,
        axis: BendingAxis,
    ) -> CalcResult<Vec<RawSectionResult>> {
        let points = match axis {
            BendingAxis::X => &self.x,
            BendingAxis::Y => &self.y,
        };
        if points.is_empty() {
            return Err(CalcError::missing_field(format!("{} axis interaction results", axis)));
        }
        Ok(points.clone())
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals.min(MAX_ROUNDING_DECIMALS) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Net tensile strain for a rounded, clamped neutral-axis depth.
fn tensile_strain(d_n: f64, k_u: f64, eps_cu: f64, settings: &DesignSettings) -> CalcResult<f64> {
    if d_n <= settings.interaction.min_neutral_axis_depth_in {
        return Ok(settings.interaction.sentinel_tensile_strain);
    }
    if k_u == 0.0 {
        return Err(CalcError::numeric_degenerate(
            "k_u",
            k_u,
            "k_u rounds to zero with a finite neutral axis",
        ));
    }
    let eps_t = eps_cu * (d_n / k_u - d_n) / d_n;
    if !eps_t.is_finite() {
        return Err(CalcError::numeric_degenerate("eps_t", eps_t, "Tensile strain is not finite"));
    }
    Ok(eps_t)
}

/// Turn raw analysis tuples into phi-scaled interaction points.
///
/// For each tuple: round `d_n` and `k_u`, clamp `d_n` to `max_depth` (the
/// section dimension along the axis), compute the net tensile strain, then
/// the tied-column phi for it.
///
/// # Errors
///
/// [`CalcError::NumericDegenerate`] for a non-finite input value, or a
/// `k_u` that rounds to zero while `d_n` is above the threshold.
/// [`CalcError::InvalidInput`] when `rounding_decimals` exceeds
/// [`MAX_ROUNDING_DECIMALS`].
pub fn process_interaction(
    results: &[RawSectionResult],
    max_depth: f64,
    fy: f64,
    es: f64,
    eps_cu: f64,
    settings: &DesignSettings,
) -> CalcResult<Vec<InteractionPoint>> {
    if !max_depth.is_finite() || max_depth <= 0.0 {
        return Err(CalcError::invalid_input(
            "max_depth",
            max_depth.to_string(),
            "Section dimension must be positive",
        ));
    }
    settings.interaction.validate()?;

    let decimals = settings.interaction.rounding_decimals;
    let mut staged = Vec::with_capacity(results.len());
    for raw in results {
        for (name, value) in [("n", raw.n), ("m", raw.m), ("d_n", raw.d_n), ("k_u", raw.k_u)] {
            if !value.is_finite() {
                return Err(CalcError::numeric_degenerate(
                    name,
                    value,
                    "Analysis output must be finite",
                ));
            }
        }
        let d_n = round_to(raw.d_n, decimals).min(max_depth);
        let k_u = round_to(raw.k_u, decimals);
        let eps_t = tensile_strain(d_n, k_u, eps_cu, settings)?;
        staged.push((raw, d_n, k_u, eps_t));
    }

    let strains: Vec<f64> = staged.iter().map(|s| s.3).collect();
    let phis = phi_factor_with_limits(&strains, fy, es, TieType::Other, &settings.phi)?;

    let points: Vec<InteractionPoint> = staged
        .into_iter()
        .zip(phis)
        .map(|((raw, d_n, k_u, eps_t), phi)| InteractionPoint {
            n: raw.n,
            m: raw.m,
            d_n,
            k_u,
            eps_t,
            phi,
            phi_n: phi * raw.n,
            phi_m: phi * raw.m,
        })
        .collect();

    debug!("Processed {} interaction points ({})", points.len(), aci_ref::PHI);
    Ok(points)
}

/// Comparison of one factored demand against a design curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandCheck {
    pub axis: BendingAxis,
    pub pu: Kips,
    pub mu: KipFt,
    /// phi*Mn at Pu, if Pu is within the curve and below the cap
    pub phi_mn: Option<KipFt>,
    /// Mu / phi*Mn
    pub utilization: Option<f64>,
    pub adequate: bool,
}

/// Design interaction curve about one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCurve {
    pub axis: BendingAxis,
    pub points: Vec<InteractionPoint>,
    /// phi * P_n,max cap line
    pub phi_pn_max: Kips,
}

impl DesignCurve {
    pub fn new(axis: BendingAxis, points: Vec<InteractionPoint>, phi_pn_max: Kips) -> Self {
        DesignCurve {
            axis,
            points,
            phi_pn_max,
        }
    }

    /// (phi*Mn, phi*Pn) for reporting, moments in kip-ft.
    ///
    /// y-axis moments change sign so both curves plot on the positive side.
    pub fn plot_series_kip_ft(&self) -> Vec<(KipFt, Kips)> {
        let sign = match self.axis {
            BendingAxis::X => 1.0,
            BendingAxis::Y => -1.0,
        };
        self.points
            .iter()
            .map(|p| (KipFt::from(KipIn(p.phi_m)) * sign, Kips(p.phi_n)))
            .collect()
    }

    /// Largest phi*Mn magnitude on the curve at axial load `pu`.
    ///
    /// `None` when `pu` exceeds the phi*P_n,max cap or lies outside the
    /// axial range of the curve.
    pub fn moment_capacity_at(&self, pu: Kips) -> Option<KipFt> {
        if pu > self.phi_pn_max {
            return None;
        }

        let mut best: Option<f64> = None;
        for pair in self.points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (lo, hi) = if a.phi_n <= b.phi_n { (a.phi_n, b.phi_n) } else { (b.phi_n, a.phi_n) };
            if pu.0 < lo || pu.0 > hi {
                continue;
            }
            let m = if (b.phi_n - a.phi_n).abs() < f64::EPSILON {
                a.phi_m.abs().max(b.phi_m.abs())
            } else {
                let t = (pu.0 - a.phi_n) / (b.phi_n - a.phi_n);
                (a.phi_m + t * (b.phi_m - a.phi_m)).abs()
            };
            best = Some(best.map_or(m, |v| v.max(m)));
        }
        best.map(|m| KipFt::from(KipIn(m)))
    }

    /// Check a factored demand against this curve
    pub fn check(&self, demand: &DesignDemand) -> DemandCheck {
        let mu = demand.moment(self.axis);
        let phi_mn = self.moment_capacity_at(demand.pu);
        let utilization = phi_mn.filter(|c| c.0 > 0.0).map(|c| mu / c);
        DemandCheck {
            axis: self.axis,
            pu: demand.pu,
            mu,
            phi_mn,
            utilization,
            adequate: utilization.is_some_and(|u| u <= 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw(n: f64, m: f64, d_n: f64, k_u: f64) -> RawSectionResult {
        RawSectionResult { n, m, d_n, k_u }
    }

    fn process(results: &[RawSectionResult], max_depth: f64) -> CalcResult<Vec<InteractionPoint>> {
        process_interaction(results, max_depth, 60.0, 29000.0, 0.003, &DesignSettings::default())
    }

    #[test]
    fn test_transition_point() {
        let pts = process(&[raw(500.0, 2000.0, 10.0, 0.5)], 24.0).unwrap();
        let p = pts[0];
        assert_relative_eq!(p.eps_t, 0.003, max_relative = 1e-12);
        assert_relative_eq!(p.phi, 0.65 + 0.25 * 27.0 / 85.0, max_relative = 1e-9);
        assert_relative_eq!(p.phi_n, p.phi * 500.0);
        assert_relative_eq!(p.phi_m, p.phi * 2000.0);
    }

    #[test]
    fn test_rounding_before_strain() {
        let pts = process(&[raw(0.0, 0.0, 10.00049, 0.49951)], 24.0).unwrap();
        assert_eq!(pts[0].d_n, 10.0);
        assert_eq!(pts[0].k_u, 0.5);
        assert_relative_eq!(pts[0].eps_t, 0.003, max_relative = 1e-12);
    }

    #[test]
    fn test_excessive_rounding_rejected() {
        let mut settings = DesignSettings::default();
        settings.interaction.rounding_decimals = 400;
        let results = [raw(0.0, 0.0, 10.0, 0.5)];
        let err = process_interaction(&results, 24.0, 60.0, 29000.0, 0.003, &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        settings.interaction.rounding_decimals = MAX_ROUNDING_DECIMALS;
        let pts = process_interaction(&results, 24.0, 60.0, 29000.0, 0.003, &settings).unwrap();
        assert_eq!(pts[0].d_n, 10.0);
    }

    #[test]
    fn test_depth_clamped_to_section() {
        let pts = process(&[raw(1800.0, 0.0, 30.0, 1.2)], 24.0).unwrap();
        assert_eq!(pts[0].d_n, 24.0);
        // 0.003 * (24 / 1.2 - 24) / 24 is compressive
        assert_relative_eq!(pts[0].eps_t, -0.0005, max_relative = 1e-9);
        assert_eq!(pts[0].phi, 0.65);
    }

    #[test]
    fn test_sentinel_strain_at_small_depth() {
        let results = [raw(-400.0, 0.0, 0.05, 0.0), raw(-390.0, 10.0, 0.1, 0.001)];
        let pts = process(&results, 24.0).unwrap();
        assert_eq!(pts[0].eps_t, 0.1);
        assert_eq!(pts[0].phi, 0.9);
        // exactly at the threshold is still the sentinel
        assert_eq!(pts[1].eps_t, 0.1);
        assert_relative_eq!(pts[1].phi_n, -351.0, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_ku_rejected() {
        let err = process(&[raw(100.0, 100.0, 5.0, 0.0004)], 24.0).unwrap_err();
        assert_eq!(err.error_code(), "NUMERIC_DEGENERATE");
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let err = process(&[raw(f64::NAN, 0.0, 5.0, 0.5)], 24.0).unwrap_err();
        assert_eq!(err.error_code(), "NUMERIC_DEGENERATE");
        assert!(process(&[raw(0.0, 0.0, 5.0, 0.5)], 0.0).is_err());
    }

    #[test]
    fn test_empty_sweep() {
        assert!(process(&[], 24.0).unwrap().is_empty());
    }

    #[test]
    fn test_recorded_analysis_json() {
        let json = r#"{ "x": [ { "n": 1.0, "m": 2.0, "d_n": 3.0, "k_u": 0.4 } ] }"#;
        let dump: RecordedAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(dump.x.len(), 1);
        assert!(dump.y.is_empty());
    }

    fn point(phi_n: f64, phi_m: f64) -> InteractionPoint {
        InteractionPoint {
            n: phi_n,
            m: phi_m,
            d_n: 0.0,
            k_u: 0.0,
            eps_t: 0.0,
            phi: 1.0,
            phi_n,
            phi_m,
        }
    }

    fn curve(axis: BendingAxis) -> DesignCurve {
        let sign = if axis == BendingAxis::Y { -1.0 } else { 1.0 };
        DesignCurve::new(
            axis,
            vec![
                point(1000.0, 0.0),
                point(600.0, sign * 2400.0),
                point(200.0, sign * 3600.0),
                point(-300.0, 0.0),
            ],
            Kips(800.0),
        )
    }

    #[test]
    fn test_plot_series() {
        let series = curve(BendingAxis::X).plot_series_kip_ft();
        assert_eq!(series[1], (KipFt(200.0), Kips(600.0)));

        let series = curve(BendingAxis::Y).plot_series_kip_ft();
        assert_eq!(series[2], (KipFt(300.0), Kips(200.0)));
    }

    #[test]
    fn test_moment_capacity_interpolation() {
        for axis in [BendingAxis::X, BendingAxis::Y] {
            let c = curve(axis);
            let at_400 = c.moment_capacity_at(Kips(400.0)).unwrap();
            let at_600 = c.moment_capacity_at(Kips(600.0)).unwrap();
            assert_relative_eq!(at_400.0, 250.0, max_relative = 1e-12);
            assert_relative_eq!(at_600.0, 200.0, max_relative = 1e-12);
            assert!(c.moment_capacity_at(Kips(900.0)).is_none());
            assert!(c.moment_capacity_at(Kips(-400.0)).is_none());
        }
    }

    #[test]
    fn test_demand_check() {
        let c = curve(BendingAxis::X);
        let demand = DesignDemand {
            pu: Kips(400.0),
            mu_x: KipFt(125.0),
            mu_y: KipFt(0.0),
        };
        let check = c.check(&demand);
        assert!(check.adequate);
        assert_relative_eq!(check.utilization.unwrap(), 0.5, max_relative = 1e-12);

        let over = DesignDemand { pu: Kips(850.0), ..demand };
        let check = c.check(&over);
        assert!(!check.adequate);
        assert!(check.phi_mn.is_none());
    }
}
