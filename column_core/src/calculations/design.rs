//! # Column Design Evaluation
//!
//! Runs one schedule record through the whole chain: materials, section,
//! axial capacity, interaction curves about both axes, and the demand check.
//!
//! ## Example
//!
//! ```rust
//! use column_core::calculations::design::evaluate_record;
//! use column_core::calculations::interaction::{RawSectionResult, RecordedAnalysis};
//! use column_core::calculations::section::BarsPerFace;
//! use column_core::materials::RebarTable;
//! use column_core::schedule::ColumnDesignRecord;
//! use column_core::settings::DesignSettings;
//!
//! let record = ColumnDesignRecord {
//!     level: "Roof".into(),
//!     grid_location: "B-2".into(),
//!     size: "16x16".into(),
//!     rebar: "8-#8".into(),
//!     fpc: "5".into(),
//!     lux: "12".into(),
//!     luy: "12".into(),
//!     kx: "1.0".into(),
//!     ky: "1.0".into(),
//!     pu: "300".into(),
//!     mu_x_top: "80".into(),
//!     mu_y_top: "10".into(),
//!     mu_x_bot: "-60".into(),
//!     mu_y_bot: "-5".into(),
//! };
//!
//! let sweep = vec![
//!     RawSectionResult { n: 1200.0, m: 0.0, d_n: 40.0, k_u: 2.0 },
//!     RawSectionResult { n: 400.0, m: 2400.0, d_n: 8.0, k_u: 0.6 },
//!     RawSectionResult { n: -300.0, m: 0.0, d_n: 0.0, k_u: 0.0 },
//! ];
//! let analysis = RecordedAnalysis { x: sweep.clone(), y: sweep };
//!
//! let report = evaluate_record(
//!     &record,
//!     BarsPerFace { along_b: 3, along_h: 3 },
//!     &analysis,
//!     RebarTable::standard(),
//!     &DesignSettings::default(),
//! )
//! .unwrap();
//! assert_eq!(report.curves.len(), 2);
//! assert_eq!(report.bar_coordinates.len(), 8);
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::column::RebarCoordinate;
use super::interaction::{process_interaction, DemandCheck, DesignCurve, SectionAnalysis};
use super::section::{BarsPerFace, BendingAxis, ColumnSection};
use crate::errors::{CalcResult, DesignWarning};
use crate::materials::RebarTable;
use crate::schedule::{ColumnDesignRecord, DesignDemand};
use crate::settings::DesignSettings;
use crate::units::Kips;

/// Full evaluation of one column design record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDesignReport {
    pub level: String,
    pub grid_location: String,
    pub section: ColumnSection,
    pub bar_coordinates: Vec<RebarCoordinate>,
    /// P_n,max
    pub pn_max: Kips,
    /// Compression-controlled phi * P_n,max
    pub phi_pn_max: Kips,
    pub demand: DesignDemand,
    /// Curves about x then y
    pub curves: Vec<DesignCurve>,
    pub checks: Vec<DemandCheck>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DesignWarning>,
}

impl ColumnDesignReport {
    /// True when every axis check passes
    pub fn is_adequate(&self) -> bool {
        !self.checks.is_empty() && self.checks.iter().all(|c| c.adequate)
    }

    pub fn curve(&self, axis: BendingAxis) -> Option<&DesignCurve> {
        self.curves.iter().find(|c| c.axis == axis)
    }
}

/// Evaluate one record with the given bar arrangement.
pub fn evaluate_record<A: SectionAnalysis + ?Sized>(
    record: &ColumnDesignRecord,
    bars: BarsPerFace,
    analysis: &A,
    table: &RebarTable,
    settings: &DesignSettings,
) -> CalcResult<ColumnDesignReport> {
    let section = ColumnSection::from_record(record, bars, table, settings)?;
    let warnings = section.detailing_warnings(settings, table)?;
    let bar_coordinates = section.bar_coordinates()?;

    let pn_max = Kips(section.nominal_axial_capacity()?);
    let phi_pn_max = pn_max * settings.phi.compression_controlled;
    let demand = record.demand()?;

    let mut curves = Vec::with_capacity(2);
    let mut checks = Vec::with_capacity(2);
    for axis in [BendingAxis::X, BendingAxis::Y] {
        let raw = analysis.interaction_results(&section, axis)?;
        let points = process_interaction(
            &raw,
            section.depth_along(axis),
            section.rebar.yield_strength(),
            section.rebar.elastic_modulus(),
            section.concrete.ultimate_strain,
            settings,
        )?;
        let curve = DesignCurve::new(axis, points, phi_pn_max);
        let check = curve.check(&demand);
        if !check.adequate {
            warn!(
                "{}: demand Pu = {:.1} kips, Mu{} = {:.1} kip-ft is outside the design curve",
                section.label, demand.pu.0, axis, check.mu.0
            );
        }
        checks.push(check);
        curves.push(curve);
    }

    info!(
        "{}: phi*Pn,max = {:.1} kips, {} bars",
        section.label,
        phi_pn_max.0,
        bar_coordinates.len()
    );

    Ok(ColumnDesignReport {
        level: record.level.clone(),
        grid_location: record.grid_location.clone(),
        section,
        bar_coordinates,
        pn_max,
        phi_pn_max,
        demand,
        curves,
        checks,
        warnings,
    })
}

/// Evaluate every record independently.
///
/// `arrangement` supplies the bars per face for each record. One record
/// failing does not stop the others; results keep record order.
pub fn evaluate_schedule<A, F>(
    records: &[ColumnDesignRecord],
    arrangement: F,
    analysis: &A,
    table: &RebarTable,
    settings: &DesignSettings,
) -> Vec<CalcResult<ColumnDesignReport>>
where
    A: SectionAnalysis + ?Sized,
    F: Fn(&ColumnDesignRecord) -> CalcResult<BarsPerFace>,
{
    records
        .iter()
        .map(|record| {
            let bars = arrangement(record)?;
            evaluate_record(record, bars, analysis, table, settings)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::interaction::{RawSectionResult, RecordedAnalysis};
    use crate::schedule::tests::sample_record;
    use approx::assert_relative_eq;

    fn analysis() -> RecordedAnalysis {
        let x = vec![
            RawSectionResult { n: 3000.0, m: 0.0, d_n: 60.0, k_u: 3.0 },
            RawSectionResult { n: 1500.0, m: 6000.0, d_n: 14.0, k_u: 0.7 },
            RawSectionResult { n: 600.0, m: 7200.0, d_n: 8.0, k_u: 0.4 },
            RawSectionResult { n: -570.0, m: 0.0, d_n: 0.0, k_u: 0.0 },
        ];
        let y = x
            .iter()
            .map(|r| RawSectionResult { m: -r.m * 0.6, ..*r })
            .collect();
        RecordedAnalysis { x, y }
    }

    #[test]
    fn test_evaluate_sample_record() {
        let report = evaluate_record(
            &sample_record(),
            BarsPerFace { along_b: 4, along_h: 4 },
            &analysis(),
            RebarTable::standard(),
            &DesignSettings::default(),
        )
        .unwrap();

        assert_eq!(report.level, "1st Floor");
        assert_eq!(report.bar_coordinates.len(), 12);
        assert_relative_eq!(report.phi_pn_max.0, 0.65 * report.pn_max.0, max_relative = 1e-12);
        assert_eq!(report.demand.pu, Kips(900.0));

        let x = report.curve(BendingAxis::X).unwrap();
        // d_n clamped to h = 24 for bending about x
        assert_eq!(x.points[0].d_n, 24.0);
        let y = report.curve(BendingAxis::Y).unwrap();
        // and to b = 14 about y
        assert_eq!(y.points[0].d_n, 14.0);

        // h-face spacing exceeds 6 in
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.checks.len(), 2);
    }

    #[test]
    fn test_evaluate_schedule_is_independent() {
        let good = sample_record();
        let mut bad = sample_record();
        bad.grid_location = "B-1".into();
        bad.rebar = "12-#12".into();

        let results = evaluate_schedule(
            &[good, bad],
            |_| Ok(BarsPerFace { along_b: 4, along_h: 4 }),
            &analysis(),
            RebarTable::standard(),
            &DesignSettings::default(),
        );
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().error_code(), "REBAR_NOT_FOUND");
    }

    #[test]
    fn test_missing_axis_fails() {
        let mut dump = analysis();
        dump.y.clear();
        let err = evaluate_record(
            &sample_record(),
            BarsPerFace { along_b: 4, along_h: 4 },
            &dump,
            RebarTable::standard(),
            &DesignSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }
}
