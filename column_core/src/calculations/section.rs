//! # Column Section
//!
//! A rectangular tied column assembled from one schedule record: dimensions,
//! materials, and the perimeter bar arrangement. The section is immutable
//! once built and is what gets handed to the external section analysis.

use log::warn;
use serde::{Deserialize, Serialize};

use super::column::{
    aci_ref, generate_bar_coordinates, nominal_axial_capacity, spacing_per_side, BarLayout,
    RebarCoordinate, TieType,
};
use crate::errors::{CalcError, CalcResult, DesignWarning};
use crate::materials::aci318::{concrete_from_settings, rebar_from_settings};
use crate::materials::{BarProperties, ConcreteMaterial, RebarMaterial, RebarTable};
use crate::schedule::ColumnDesignRecord;
use crate::settings::DesignSettings;

/// Bending axis of an interaction analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendingAxis {
    /// Bending about x (neutral axis parallel to the b face, depth along h)
    X,
    /// Bending about y (depth along b)
    Y,
}

impl std::fmt::Display for BendingAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BendingAxis::X => write!(f, "x"),
            BendingAxis::Y => write!(f, "y"),
        }
    }
}

/// Number of bars on each face of the tie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarsPerFace {
    /// Bars along the b (x) faces, corners included
    pub along_b: u32,
    /// Bars along the h (y) faces, corners included
    pub along_h: u32,
}

impl BarsPerFace {
    /// Total bars on the tie perimeter, `2 n_b + 2 (n_h - 2)`
    pub fn total(&self) -> CalcResult<u32> {
        self.along_b
            .checked_add(self.along_h.saturating_sub(2))
            .and_then(|n| n.checked_mul(2))
            .ok_or_else(|| {
                CalcError::invalid_input(
                    "bars",
                    format!("{} x {}", self.along_b, self.along_h),
                    "Bar count overflows",
                )
            })
    }
}

/// Rectangular tied concrete column section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSection {
    /// Label, usually "level / grid"
    pub label: String,
    /// Width b (in), along x
    pub b_in: f64,
    /// Depth h (in), along y
    pub h_in: f64,
    pub concrete: ConcreteMaterial,
    pub rebar: RebarMaterial,
    pub bars: BarsPerFace,
    /// Longitudinal bar size
    pub bar: BarProperties,
    pub layout: BarLayout,
    pub tie_type: TieType,
}

impl ColumnSection {
    /// Validate geometry and bar arrangement.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.b_in.is_finite() || self.b_in <= 0.0 {
            return Err(CalcError::invalid_input(
                "b_in",
                self.b_in.to_string(),
                "Width must be positive",
            ));
        }
        if !self.h_in.is_finite() || self.h_in <= 0.0 {
            return Err(CalcError::invalid_input(
                "h_in",
                self.h_in.to_string(),
                "Depth must be positive",
            ));
        }
        if self.bars.along_b < 2 || self.bars.along_h < 2 {
            return Err(CalcError::invalid_input(
                "bars",
                format!("{} x {}", self.bars.along_b, self.bars.along_h),
                "A rectangular tie needs at least 2 bars per face",
            ));
        }
        let total = self.bars.total()?;
        if self.steel_area() >= self.gross_area() {
            return Err(CalcError::invalid_input(
                "bars",
                total.to_string(),
                "Steel area exceeds the gross section",
            ));
        }
        Ok(())
    }

    /// Gross area Ag (in²)
    pub fn gross_area(&self) -> f64 {
        self.b_in * self.h_in
    }

    /// Longitudinal steel area Ast (in²)
    pub fn steel_area(&self) -> f64 {
        let interior_h = self.bars.along_h.saturating_sub(2);
        2.0 * (f64::from(self.bars.along_b) + f64::from(interior_h)) * self.bar.area_in2
    }

    /// Reinforcement ratio Ast / Ag
    pub fn reinforcement_ratio(&self) -> f64 {
        self.steel_area() / self.gross_area()
    }

    /// Section dimension along which the neutral-axis depth is measured
    pub fn depth_along(&self, axis: BendingAxis) -> f64 {
        match axis {
            BendingAxis::X => self.h_in,
            BendingAxis::Y => self.b_in,
        }
    }

    /// Bar centroids, ordered as in [`generate_bar_coordinates`]
    pub fn bar_coordinates(&self) -> CalcResult<Vec<RebarCoordinate>> {
        generate_bar_coordinates(
            self.b_in,
            self.h_in,
            self.bars.along_b,
            self.bars.along_h,
            &self.layout,
        )
    }

    /// P_n,max (kips) per ACI 318-14 22.4.2
    pub fn nominal_axial_capacity(&self) -> CalcResult<f64> {
        let pn = nominal_axial_capacity(
            self.b_in,
            self.h_in,
            self.concrete.compressive_strength,
            self.bars.total()?,
            self.bar.area_in2,
            self.rebar.yield_strength(),
            self.tie_type,
        );
        log::debug!("{}: P_n,max = {:.1} kips ({})", self.label, pn, aci_ref::AXIAL_STRENGTH);
        Ok(pn)
    }

    /// Detailing checks against the configured maximum spacing and minimum
    /// bar size, plus any warnings raised while building the materials.
    pub fn detailing_warnings(
        &self,
        settings: &DesignSettings,
        table: &RebarTable,
    ) -> CalcResult<Vec<DesignWarning>> {
        let mut warnings = self.concrete.warnings.clone();

        let faces = [("b", self.b_in, self.bars.along_b), ("h", self.h_in, self.bars.along_h)];
        for (face, dim, n) in faces {
            let spacing = spacing_per_side(dim, n, &self.layout)?;
            if spacing > settings.rebar.max_bar_spacing_in {
                warnings.push(DesignWarning::BarSpacingExceedsMaximum {
                    face: face.to_string(),
                    spacing_in: spacing,
                    max_spacing_in: settings.rebar.max_bar_spacing_in,
                });
            }
        }

        let minimum = table.lookup(&settings.rebar.min_longitudinal_bar)?;
        if self.bar.diameter_in < minimum.diameter_in {
            warnings.push(DesignWarning::BarBelowMinimumSize {
                designator: self.bar.designator.clone(),
                minimum: minimum.designator.clone(),
            });
        }

        for w in &warnings {
            warn!("{}: {}", self.label, w);
        }
        Ok(warnings)
    }

    /// Assemble the section for a schedule record.
    ///
    /// The bar count from the record's callout must match the perimeter
    /// arrangement in `bars`.
    pub fn from_record(
        record: &ColumnDesignRecord,
        bars: BarsPerFace,
        table: &RebarTable,
        settings: &DesignSettings,
    ) -> CalcResult<Self> {
        let (b_in, h_in) = record.dimensions()?;
        let callout = record.rebar_callout()?;

        let placed = bars.total()?;
        if callout.count != placed {
            return Err(CalcError::invalid_input(
                "bars",
                format!("{} x {}", bars.along_b, bars.along_h),
                format!(
                    "Arrangement places {} bars but the schedule calls for {}",
                    placed, callout
                ),
            ));
        }

        let bar = table.lookup(&callout.designator)?.clone();
        let section = ColumnSection {
            label: format!("{} / {}", record.level, record.grid_location),
            b_in,
            h_in,
            concrete: concrete_from_settings(record.fpc_ksi()?, settings)?,
            rebar: rebar_from_settings(settings)?,
            bars,
            layout: BarLayout::from_settings(settings, table, &bar.designator)?,
            bar,
            tie_type: TieType::Other,
        };
        section.validate()?;
        Ok(section)
    }
}
