//! # Unit Types
//!
//! Type-safe wrappers for the units that cross module boundaries. Internally
//! the engine works in kips and inches (ksi, kip-in); the schedule and the
//! reported design curves use kip-ft for moments.
//!
//! ## Example
//!
//! ```rust
//! use column_core::units::{KipFt, KipIn};
//!
//! let m = KipIn(1200.0);
//! let m_ft: KipFt = m.into();
//! assert_eq!(m_ft.0, 100.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// Unbraced length in feet, as scheduled
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

// ============================================================================
// Force and Stress Units
// ============================================================================

/// Force in kips
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kips(pub f64);

/// Stress in kips per square inch (ksi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksi(pub f64);

/// Stress in pounds per square inch (psi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psi(pub f64);

impl From<Psi> for Ksi {
    fn from(psi: Psi) -> Self {
        Ksi(psi.0 / 1000.0)
    }
}

impl From<Ksi> for Psi {
    fn from(ksi: Ksi) -> Self {
        Psi(ksi.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kip-feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipFt(pub f64);

/// Moment in kip-inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipIn(pub f64);

impl From<KipFt> for KipIn {
    fn from(kipft: KipFt) -> Self {
        KipIn(kipft.0 * 12.0)
    }
}

impl From<KipIn> for KipFt {
    fn from(kipin: KipIn) -> Self {
        KipFt(kipin.0 / 12.0)
    }
}

// ============================================================================
// Unit Weight
// ============================================================================

/// Unit weight in kips per cubic foot (kcf)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kcf(pub f64);

/// Unit weight in kips per cubic inch
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipPerIn3(pub f64);

impl From<Kcf> for KipPerIn3 {
    fn from(kcf: Kcf) -> Self {
        KipPerIn3(kcf.0 / 1728.0)
    }
}

// ============================================================================
// Strength arithmetic
// ============================================================================

/// Strength reduction (`phi * Pn`) and demand/capacity ratios (`Mu / phi*Mn`)
macro_rules! impl_strength_ops {
    ($type:ty) => {
        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div for $type {
            type Output = f64;
            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }
    };
}

impl_strength_ops!(Kips);
impl_strength_ops!(KipFt);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_conversion() {
        let kft: KipFt = KipIn(600.0).into();
        assert_eq!(kft.0, 50.0);
        let kin: KipIn = KipFt(2.5).into();
        assert_eq!(kin.0, 30.0);
    }

    #[test]
    fn test_unit_weight_conversion() {
        let w: KipPerIn3 = Kcf(0.15).into();
        assert!((w.0 - 0.15 / 1728.0).abs() < 1e-15);
    }

    #[test]
    fn test_strength_ops() {
        assert_eq!(Kips(10.0) * 0.5, Kips(5.0));
        assert_eq!(KipFt(-40.0) * -1.0, KipFt(40.0));
        assert_eq!(KipFt(75.0) / KipFt(100.0), 0.75);
        assert_eq!(Kips(520.0) / Kips(1040.0), 0.5);
    }

    #[test]
    fn test_serialization() {
        let m = KipFt(125.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "125.5");
    }
}
