//! # column_core - Reinforced Concrete Column Capacity
//!
//! `column_core` checks rectangular tied concrete columns against ACI 318-14.
//! It reads the column design report of an analysis program into a schedule,
//! builds the materials and bar layout for a column, and turns the output of a
//! cross-section analysis into phi-scaled interaction curves that the factored
//! demand is compared against.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: Inputs, results, and settings implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, with non-fatal design warnings
//!   returned alongside results
//! - **Injected Data**: Bar sizes and code defaults are passed in, never global
//!
//! ## Quick Start
//!
//! ```rust
//! use column_core::calculations::column::{nominal_axial_capacity, phi_factor, TieType};
//! use column_core::materials::aci318::build_concrete;
//!
//! let concrete = build_concrete(6.0, 0.15, 0.003).unwrap();
//! assert_eq!(concrete.beta1(), 0.75);
//!
//! let pn = nominal_axial_capacity(14.0, 24.0, 5.0, 8, 0.79, 60.0, TieType::Other);
//! assert!((pn - 1424.272).abs() < 1e-3);
//!
//! let phi = phi_factor(&[0.005], 60.0, 29000.0, TieType::Other).unwrap();
//! assert_eq!(phi, vec![0.9]);
//! ```
//!
//! ## Modules
//!
//! - [`schedule`] - Design report extraction and the schedule table
//! - [`materials`] - Concrete and rebar models, bar size table
//! - [`calculations`] - Axial capacity, phi, bar layout, interaction curves
//! - [`settings`] - Code defaults and detailing limits
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error and warning types

pub mod calculations;
pub mod errors;
pub mod materials;
pub mod schedule;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult, DesignWarning};
pub use schedule::{extract_schedule, ColumnDesignRecord, ScheduleTable};
pub use settings::{load_settings, save_settings, DesignSettings};
