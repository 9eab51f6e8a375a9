//! # Column Capacity
//!
//! Axial capacity, strength-reduction factor, and longitudinal bar layout
//! for rectangular tied concrete columns per ACI 318-14. Slenderness is not
//! considered.
//!
//! ## Assumptions
//!
//! - Rectangular section, bars on the tie perimeter only (no interior bars)
//! - Bar coordinates measured from the section centroid, +y toward the top face
//! - Spiral reinforcement is accepted for P_n but its phi rule is not implemented
//!
//! ## Example
//!
//! ```rust
//! use column_core::calculations::column::{
//!     generate_bar_coordinates, nominal_axial_capacity, BarLayout, TieType,
//! };
//!
//! // 12x12, f'c = 10 ksi, 4-#6, Grade 60
//! let pn = nominal_axial_capacity(12.0, 12.0, 10.0, 4, 0.44, 60.0, TieType::Other);
//! assert!((pn - 1051.712).abs() < 1e-6);
//!
//! let bars = generate_bar_coordinates(14.0, 24.0, 3, 3, &BarLayout::default()).unwrap();
//! assert_eq!(bars.len(), 8);
//! ```

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::RebarTable;
use crate::settings::{DesignSettings, PhiLimits};

/// ACI 318-14 section references used by this module.
pub mod aci_ref {
    /// Maximum axial strength P_n,max
    pub const AXIAL_STRENGTH: &str = "ACI 318-14 22.4.2";
    /// Strength reduction factor for moment, axial force, or combined
    pub const PHI: &str = "ACI 318-14 Table 21.2.2";
}

/// Transverse reinforcement type.
///
/// Used both for the P_n,max factor and for selecting the phi rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TieType {
    /// Rectilinear ties ("other" in ACI 318 Table 21.2.2)
    #[default]
    Other,
    /// Spiral reinforcement
    Spiral,
}

impl TieType {
    /// P_n,max / P_0 per ACI 318-14 Table 22.4.2.1
    pub fn axial_limit_factor(&self) -> f64 {
        match self {
            TieType::Other => 0.80,
            TieType::Spiral => 0.85,
        }
    }
}

impl FromStr for TieType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "other" => Ok(TieType::Other),
            "spiral" => Ok(TieType::Spiral),
            _ => Err(CalcError::UndefinedTieType {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TieType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieType::Other => write!(f, "other"),
            TieType::Spiral => write!(f, "spiral"),
        }
    }
}

/// Nominal axial capacity P_n,max (kips), not considering slenderness.
///
/// `P0 = 0.85 f'c (Ag - Ast) + fy Ast`, then `0.80 P0` for ties or
/// `0.85 P0` for spirals.
///
/// # Arguments
///
/// * `b`, `h` - column dimensions (in)
/// * `fpc` - f'c (ksi)
/// * `num_bars` - number of longitudinal bars
/// * `bar_area` - area of one bar (in²)
/// * `fy` - yield strength of the bars (ksi)
/// * `tie` - transverse reinforcement type
pub fn nominal_axial_capacity(
    b: f64,
    h: f64,
    fpc: f64,
    num_bars: u32,
    bar_area: f64,
    fy: f64,
    tie: TieType,
) -> f64 {
    let gross_area = b * h;
    let rebar_area = f64::from(num_bars) * bar_area;
    let p0 = 0.85 * fpc * (gross_area - rebar_area) + fy * rebar_area;
    tie.axial_limit_factor() * p0
}

/// Quick axial check for a nonslender tied column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialSummary {
    /// P_n,max (kips)
    pub pn_max_kips: f64,
    /// phi * P_n,max (kips) with compression-controlled phi
    pub phi_pn_max_kips: f64,
    /// Longitudinal reinforcement ratio Ast / Ag
    pub reinforcement_ratio: f64,
}

/// phi P_n,max and reinforcement ratio for a tied column.
pub fn axial_summary(
    b: f64,
    h: f64,
    fpc: f64,
    num_bars: u32,
    bar_area: f64,
    fy: f64,
    limits: &PhiLimits,
) -> CalcResult<AxialSummary> {
    for (field, value) in [("b", b), ("h", h), ("fpc", fpc), ("bar_area", bar_area), ("fy", fy)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
        }
    }

    let steel_area = f64::from(num_bars) * bar_area;
    if steel_area >= b * h {
        return Err(CalcError::invalid_input(
            "num_bars",
            num_bars.to_string(),
            "Steel area exceeds the gross section",
        ));
    }

    let pn_max = nominal_axial_capacity(b, h, fpc, num_bars, bar_area, fy, TieType::Other);
    Ok(AxialSummary {
        pn_max_kips: pn_max,
        phi_pn_max_kips: limits.compression_controlled * pn_max,
        reinforcement_ratio: steel_area / (b * h),
    })
}

/// Cover and bar diameters used to position longitudinal bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    /// Clear cover to the ties (in)
    pub cover_in: f64,
    /// Tie bar diameter (in)
    pub tie_diameter_in: f64,
    /// Longitudinal bar diameter (in)
    pub bar_diameter_in: f64,
}

impl Default for BarLayout {
    /// 1.5 in cover, #3 ties, #6 longitudinal bars
    fn default() -> Self {
        BarLayout {
            cover_in: 1.5,
            tie_diameter_in: 0.375,
            bar_diameter_in: 0.75,
        }
    }
}

impl BarLayout {
    /// Layout for `bar` using the configured cover and tie size
    pub fn from_settings(
        settings: &DesignSettings,
        table: &RebarTable,
        bar: &str,
    ) -> CalcResult<Self> {
        Ok(BarLayout {
            cover_in: settings.rebar.cover_in,
            tie_diameter_in: table.lookup(&settings.rebar.tie_bar)?.diameter_in,
            bar_diameter_in: table.lookup(bar)?.diameter_in,
        })
    }

    /// Distance from the face to the center of a corner bar
    pub fn edge_distance(&self) -> f64 {
        self.cover_in + self.tie_diameter_in + self.bar_diameter_in / 2.0
    }
}

/// Center-to-center spacing of equally spaced bars on one face (in).
///
/// The spacing counts the corner bars. A single bar uses the padded divisor
/// `n + 2`.
pub fn spacing_per_side(col_dim: f64, n_bars: u32, layout: &BarLayout) -> CalcResult<f64> {
    if n_bars == 0 {
        return Err(CalcError::invalid_input(
            "n_bars",
            "0",
            "At least one bar is required per face",
        ));
    }

    let available = col_dim
        - 2.0 * layout.cover_in
        - 2.0 * layout.tie_diameter_in
        - layout.bar_diameter_in;
    if available < 0.0 {
        return Err(CalcError::invalid_input(
            "col_dim",
            col_dim.to_string(),
            "Cover, ties, and bar do not fit within the column dimension",
        ));
    }

    let divisor = if n_bars == 1 { n_bars + 2 } else { n_bars - 1 };
    Ok(available / f64::from(divisor))
}

/// Bar position relative to the section centroid (in)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarCoordinate {
    pub x: f64,
    pub y: f64,
}

/// Longitudinal bar centroids on the perimeter of a rectangular tie.
///
/// `n_bars_b` bars (corners included) sit on each of the top and bottom faces;
/// `n_bars_h - 2` interior bars sit on each of the left and right faces.
///
/// Order: top row left→right, bottom row left→right, left column top→bottom,
/// right column top→bottom. Total `2 n_b + 2 (n_h - 2)` bars.
pub fn generate_bar_coordinates(
    b: f64,
    h: f64,
    n_bars_b: u32,
    n_bars_h: u32,
    layout: &BarLayout,
) -> CalcResult<Vec<RebarCoordinate>> {
    for (field, n) in [("n_bars_b", n_bars_b), ("n_bars_h", n_bars_h)] {
        if n < 2 {
            return Err(CalcError::invalid_input(
                field,
                n.to_string(),
                "A rectangular tie needs at least 2 bars per face",
            ));
        }
    }

    let sx = spacing_per_side(b, n_bars_b, layout)?;
    let sy = spacing_per_side(h, n_bars_h, layout)?;

    let x1 = -b / 2.0 + layout.edge_distance();
    let y1 = h / 2.0 - layout.edge_distance();

    let total = n_bars_b
        .checked_add(n_bars_h - 2)
        .and_then(|n| n.checked_mul(2))
        .ok_or_else(|| {
            CalcError::invalid_input(
                "n_bars",
                format!("{} x {}", n_bars_b, n_bars_h),
                "Bar count overflows",
            )
        })?;
    let mut coords = Vec::with_capacity(total as usize);

    // Top and bottom rows include the corners
    for i in 0..n_bars_b {
        coords.push(RebarCoordinate { x: x1 + f64::from(i) * sx, y: y1 });
    }
    for i in 0..n_bars_b {
        coords.push(RebarCoordinate { x: x1 + f64::from(i) * sx, y: -y1 });
    }

    for i in 1..n_bars_h - 1 {
        coords.push(RebarCoordinate { x: x1, y: y1 - f64::from(i) * sy });
    }
    for i in 1..n_bars_h - 1 {
        coords.push(RebarCoordinate { x: -x1, y: y1 - f64::from(i) * sy });
    }

    debug!(
        "{}x{} section: {} bars, sx = {:.3} in, sy = {:.3} in",
        b,
        h,
        coords.len(),
        sx,
        sy
    );
    Ok(coords)
}

/// Strength-reduction factors for net tensile strains, default limits.
///
/// See [`phi_factor_with_limits`].
pub fn phi_factor(tensile_strains: &[f64], fy: f64, es: f64, tie: TieType) -> CalcResult<Vec<f64>> {
    phi_factor_with_limits(tensile_strains, fy, es, tie, &PhiLimits::default())
}

/// Strength-reduction factors per ACI 318-14 Table 21.2.2.
///
/// For tied sections: compression-controlled phi at or below the yield strain
/// `fy / Es`, tension-controlled phi at or above the limit strain, linear in
/// between. The spiral rule is not implemented and returns
/// [`CalcError::NotImplemented`].
pub fn phi_factor_with_limits(
    tensile_strains: &[f64],
    fy: f64,
    es: f64,
    tie: TieType,
    limits: &PhiLimits,
) -> CalcResult<Vec<f64>> {
    if tie == TieType::Spiral {
        return Err(CalcError::not_implemented(format!(
            "{} phi for spiral reinforcement",
            aci_ref::PHI
        )));
    }

    let yield_strain = fy / es;
    let limit_strain = limits.tension_controlled_strain;
    if !yield_strain.is_finite() || yield_strain <= 0.0 || yield_strain >= limit_strain {
        return Err(CalcError::invalid_input(
            "fy/Es",
            yield_strain.to_string(),
            "Yield strain must be positive and below the tension-controlled limit",
        ));
    }

    let phi_c = limits.compression_controlled;
    let phi_t = limits.tension_controlled;

    tensile_strains
        .iter()
        .map(|&strain| {
            if !strain.is_finite() {
                return Err(CalcError::numeric_degenerate(
                    "eps_t",
                    strain,
                    "Tensile strain must be finite",
                ));
            }
            let phi = if strain <= yield_strain {
                phi_c
            } else if strain < limit_strain {
                phi_c + (phi_t - phi_c) * (strain - yield_strain) / (limit_strain - yield_strain)
            } else {
                phi_t
            };
            Ok(phi)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nominal_axial_capacity() {
        let pn = nominal_axial_capacity(12.0, 12.0, 10.0, 4, 0.44, 60.0, TieType::Other);
        assert_relative_eq!(pn, 1051.712, max_relative = 1e-3);

        let pn = nominal_axial_capacity(14.0, 24.0, 5.0, 8, 0.79, 60.0, TieType::Other);
        assert_relative_eq!(pn, 1424.272, max_relative = 1e-3);
    }

    #[test]
    fn test_spiral_axial_factor() {
        let tied = nominal_axial_capacity(14.0, 24.0, 5.0, 8, 0.79, 60.0, TieType::Other);
        let spiral = nominal_axial_capacity(14.0, 24.0, 5.0, 8, 0.79, 60.0, TieType::Spiral);
        assert_relative_eq!(spiral / tied, 0.85 / 0.80, max_relative = 1e-12);
    }

    #[test]
    fn test_tie_type_parsing() {
        assert_eq!("other".parse::<TieType>().unwrap(), TieType::Other);
        assert_eq!(" Spiral ".parse::<TieType>().unwrap(), TieType::Spiral);
        assert_eq!(
            "hoop".parse::<TieType>().unwrap_err(),
            CalcError::UndefinedTieType { value: "hoop".into() }
        );
        assert_eq!(serde_json::to_string(&TieType::Spiral).unwrap(), "\"spiral\"");
    }

    #[test]
    fn test_axial_summary() {
        let s = axial_summary(12.0, 12.0, 5.0, 4, 0.44, 60.0, &PhiLimits::default()).unwrap();
        let pn = nominal_axial_capacity(12.0, 12.0, 5.0, 4, 0.44, 60.0, TieType::Other);
        assert_relative_eq!(s.pn_max_kips, pn);
        assert_relative_eq!(s.phi_pn_max_kips, 0.65 * pn);
        assert_relative_eq!(s.reinforcement_ratio, 1.76 / 144.0, max_relative = 1e-12);

        assert!(axial_summary(-12.0, 12.0, 5.0, 4, 0.44, 60.0, &PhiLimits::default()).is_err());
        assert!(axial_summary(2.0, 2.0, 5.0, 20, 0.44, 60.0, &PhiLimits::default()).is_err());
    }

    #[test]
    fn test_spacing_per_side() {
        let layout = BarLayout::default();
        assert_relative_eq!(spacing_per_side(24.0, 2, &layout).unwrap(), 19.5);
        assert_relative_eq!(spacing_per_side(16.0, 5, &layout).unwrap(), 2.875);
    }

    #[test]
    fn test_spacing_single_bar_uses_padded_divisor() {
        let layout = BarLayout::default();
        // (24 - 3 - 0.75 - 0.75) / 3
        assert_relative_eq!(spacing_per_side(24.0, 1, &layout).unwrap(), 6.5);
    }

    #[test]
    fn test_spacing_rejects_degenerate_input() {
        let layout = BarLayout::default();
        assert!(spacing_per_side(24.0, 0, &layout).is_err());
        assert!(spacing_per_side(4.0, 2, &layout).is_err());
    }

    #[test]
    fn test_generate_bar_coordinates() {
        let coords = generate_bar_coordinates(14.0, 24.0, 3, 3, &BarLayout::default()).unwrap();
        assert_eq!(coords.len(), 2 * 3 + 2 * (3 - 2));
        assert_eq!(coords[0], RebarCoordinate { x: -4.75, y: 9.75 });
        assert_eq!(coords.last().copied().unwrap(), RebarCoordinate { x: 4.75, y: 0.0 });
    }

    #[test]
    fn test_bar_coordinate_order() {
        let coords = generate_bar_coordinates(16.0, 20.0, 3, 4, &BarLayout::default()).unwrap();
        assert_eq!(coords.len(), 10);

        // top row, left to right
        assert!(coords[0].x < coords[1].x && coords[1].x < coords[2].x);
        assert!(coords[..3].iter().all(|c| c.y == coords[0].y));
        // bottom row mirrors top
        for i in 0..3 {
            assert_eq!(coords[3 + i].x, coords[i].x);
            assert_eq!(coords[3 + i].y, -coords[i].y);
        }
        // left interior column top to bottom, then right column
        assert!(coords[6].x == coords[0].x && coords[7].x == coords[0].x);
        assert!(coords[6].y > coords[7].y);
        assert!(coords[8].x == -coords[0].x && coords[9].x == -coords[0].x);
        assert!(coords[8].y > coords[9].y);
    }

    #[test]
    fn test_bar_coordinates_symmetric() {
        let coords = generate_bar_coordinates(18.0, 24.0, 4, 5, &BarLayout::default()).unwrap();
        for c in &coords {
            let has_mirror_x = coords
                .iter()
                .any(|o| (o.x + c.x).abs() < 1e-9 && (o.y - c.y).abs() < 1e-9);
            let has_mirror_y = coords
                .iter()
                .any(|o| (o.x - c.x).abs() < 1e-9 && (o.y + c.y).abs() < 1e-9);
            assert!(has_mirror_x && has_mirror_y, "{:?} has no mirror", c);
        }
    }

    #[test]
    fn test_bar_coordinates_need_two_per_face() {
        assert!(generate_bar_coordinates(14.0, 24.0, 1, 3, &BarLayout::default()).is_err());
        assert!(generate_bar_coordinates(14.0, 24.0, 3, 1, &BarLayout::default()).is_err());
    }

    #[test]
    fn test_bar_coordinates_reject_overflowing_count() {
        let err = generate_bar_coordinates(14.0, 24.0, 3_000_000_000, 2, &BarLayout::default())
            .unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "n_bars"));
    }

    #[test]
    fn test_phi_factor() {
        let strains = [60.0 / 29000.0, 30.0 / 29000.0, 0.005, 0.0, 0.004];
        let phis = phi_factor(&strains, 60.0, 29000.0, TieType::Other).unwrap();
        assert_eq!(phis.len(), 5);
        assert_relative_eq!(phis[0], 0.65);
        assert_relative_eq!(phis[1], 0.65);
        assert_relative_eq!(phis[2], 0.9);
        assert_relative_eq!(phis[3], 0.65);
        assert_relative_eq!(phis[4], 0.8147, max_relative = 1e-4);
    }

    #[test]
    fn test_phi_factor_large_strain() {
        let phis = phi_factor(&[0.1, 0.02], 60.0, 29000.0, TieType::Other).unwrap();
        assert_eq!(phis, vec![0.9, 0.9]);
    }

    #[test]
    fn test_phi_factor_spiral_not_implemented() {
        let err = phi_factor(&[0.004], 60.0, 29000.0, TieType::Spiral).unwrap_err();
        assert_eq!(err.error_code(), "NOT_IMPLEMENTED");
    }

    #[test]
    fn test_phi_factor_rejects_non_finite_strain() {
        let err = phi_factor(&[f64::INFINITY], 60.0, 29000.0, TieType::Other).unwrap_err();
        assert_eq!(err.error_code(), "NUMERIC_DEGENERATE");
    }

    #[test]
    fn test_layout_from_settings() {
        let layout =
            BarLayout::from_settings(&DesignSettings::default(), RebarTable::standard(), "#8")
                .unwrap();
        assert_eq!(layout.cover_in, 1.5);
        assert_eq!(layout.tie_diameter_in, 0.375);
        assert_eq!(layout.bar_diameter_in, 1.0);
        assert!(
            BarLayout::from_settings(&DesignSettings::default(), RebarTable::standard(), "#2")
                .is_err()
        );
    }
}
