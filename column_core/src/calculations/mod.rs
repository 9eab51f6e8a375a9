//! # Column Calculations
//!
//! Calculations run bottom-up for one column:
//!
//! - [`column`] - P_n,max, phi, bar spacing, and bar coordinates
//! - [`section`] - The assembled column section for a schedule record
//! - [`interaction`] - Raw section-analysis output to phi-scaled design curves
//! - [`design`] - Record and schedule evaluation against factored demand
//!
//! The functions are pure; the external section analysis is reached only
//! through the [`SectionAnalysis`] trait.

pub mod column;
pub mod design;
pub mod interaction;
pub mod section;

// Re-export commonly used types
pub use column::{BarLayout, RebarCoordinate, TieType};
pub use design::{evaluate_record, evaluate_schedule, ColumnDesignReport};
pub use interaction::{
    DesignCurve, InteractionPoint, RawSectionResult, RecordedAnalysis, SectionAnalysis,
};
pub use section::{BarsPerFace, BendingAxis, ColumnSection};
