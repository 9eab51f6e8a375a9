//! Reinforcing Bar Sizes
//!
//! Bar size lookup (designator → nominal diameter and area). The table is
//! immutable and injected into the geometry and schedule functions, so tests
//! and other jurisdictions can supply their own sizes.
//!
//! ## Data Source
//!
//! [`RebarTable::standard`] holds the ASTM A615 inch-pound sizes #3 through
//! #18. Other tables can be loaded from CSV with the header
//! `designator,diameter_in,area_in2`.
//!
//! ## Example
//!
//! ```rust
//! use column_core::materials::rebar::{RebarCallout, RebarTable};
//!
//! let table = RebarTable::standard();
//! let n8 = table.lookup("#8").unwrap();
//! assert_eq!(n8.area_in2, 0.79);
//!
//! let callout: RebarCallout = "12-#8".parse().unwrap();
//! assert_eq!(callout.count, 12);
//! assert_eq!(callout.designator, "#8");
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Nominal properties of one bar size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarProperties {
    /// Size designator (e.g., "#8")
    pub designator: String,
    /// Nominal diameter (in)
    pub diameter_in: f64,
    /// Nominal area (in²)
    pub area_in2: f64,
}

/// Immutable bar size table keyed by designator.
#[derive(Debug, Clone, Default)]
pub struct RebarTable {
    bars: HashMap<String, BarProperties>,
    /// Designators in insertion order, for listing
    order: Vec<String>,
}

static STANDARD: Lazy<RebarTable> = Lazy::new(|| {
    // ASTM A615 inch-pound sizes: (designator, diameter in, area in²)
    let sizes = [
        ("#3", 0.375, 0.11),
        ("#4", 0.500, 0.20),
        ("#5", 0.625, 0.31),
        ("#6", 0.750, 0.44),
        ("#7", 0.875, 0.60),
        ("#8", 1.000, 0.79),
        ("#9", 1.128, 1.00),
        ("#10", 1.270, 1.27),
        ("#11", 1.410, 1.56),
        ("#14", 1.693, 2.25),
        ("#18", 2.257, 4.00),
    ];
    RebarTable::from_bars(sizes.iter().map(|&(d, dia, area)| BarProperties {
        designator: d.to_string(),
        diameter_in: dia,
        area_in2: area,
    }))
});

impl RebarTable {
    /// The standard ASTM A615 table (#3 through #18)
    pub fn standard() -> &'static RebarTable {
        &STANDARD
    }

    /// Build a table from bar properties; later duplicates replace earlier ones
    pub fn from_bars(bars: impl IntoIterator<Item = BarProperties>) -> Self {
        let mut table = RebarTable::default();
        for bar in bars {
            let key = normalize_designator(&bar.designator);
            if !table.bars.contains_key(&key) {
                table.order.push(key.clone());
            }
            table.bars.insert(
                key.clone(),
                BarProperties {
                    designator: key,
                    ..bar
                },
            );
        }
        table
    }

    /// Load a table from CSV with header `designator,diameter_in,area_in2`
    pub fn load_from_csv(path: &Path) -> CalcResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            CalcError::file_error("open", path.display().to_string(), e.to_string())
        })?;
        Self::from_csv_reader(file)
    }

    /// Read a table from any CSV source
    pub fn from_csv_reader<R: Read>(reader: R) -> CalcResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut bars = Vec::new();
        for (idx, record) in csv_reader.deserialize::<BarProperties>().enumerate() {
            let bar = record.map_err(|e| CalcError::SerializationError {
                reason: format!("Invalid rebar table row {}: {}", idx + 1, e),
            })?;
            if bar.diameter_in <= 0.0 || bar.area_in2 <= 0.0 {
                return Err(CalcError::invalid_input(
                    bar.designator.clone(),
                    format!("d = {}, A = {}", bar.diameter_in, bar.area_in2),
                    "Bar diameter and area must be positive",
                ));
            }
            bars.push(bar);
        }
        Ok(Self::from_bars(bars))
    }

    /// Look up a bar by designator ("#8" or "8")
    pub fn lookup(&self, designator: &str) -> CalcResult<&BarProperties> {
        self.bars
            .get(&normalize_designator(designator))
            .ok_or_else(|| CalcError::rebar_not_found(designator.trim()))
    }

    /// Iterate bars in table order
    pub fn iter(&self) -> impl Iterator<Item = &BarProperties> {
        self.order.iter().filter_map(|k| self.bars.get(k))
    }

    /// Number of bar sizes in the table
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn normalize_designator(designator: &str) -> String {
    let trimmed = designator.trim();
    if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{}", trimmed)
    }
}

/// Longitudinal reinforcement callout "N-#S" (e.g., "12-#8")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebarCallout {
    /// Total number of longitudinal bars
    pub count: u32,
    /// Bar size designator, including the '#'
    pub designator: String,
}

impl FromStr for RebarCallout {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CalcError::invalid_input("rebar", s, reason);

        let (count, size) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("Expected a callout of the form 'N-#S'"))?;

        let count: u32 = count
            .trim()
            .parse()
            .map_err(|_| invalid("Bar count is not a whole number"))?;
        if count == 0 {
            return Err(invalid("Bar count must be at least 1"));
        }

        let size = size.trim();
        if !size.starts_with('#') || size.len() < 2 {
            return Err(invalid("Bar size must be a designator such as '#8'"));
        }

        Ok(RebarCallout {
            count,
            designator: size.to_string(),
        })
    }
}

impl std::fmt::Display for RebarCallout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.count, self.designator)
    }
}
