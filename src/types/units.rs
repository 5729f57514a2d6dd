//! Semantic unit types: ratio-in-[0,1] vs percentage-in-[0,100].
//!
//! Historical reports in this domain document a 100×-scale defect caused by
//! treating a percentage column as a ratio. These wrappers make the
//! conversion explicit at the API boundary so the conflation is a type
//! error, not a runtime surprise.

use serde::{Deserialize, Serialize};

/// A fraction in `[0.0, 1.0]`.
///
/// Construction clamps silently only through [`Ratio::clamped`]; use
/// [`Ratio::new`] when an out-of-range value indicates a data defect the
/// caller must handle. Deserialization goes through [`Ratio::new`], so a
/// config or snapshot value of `7.3` is a parse error, not a silent
/// out-of-range ratio.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Ratio(f64);

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value)
            .ok_or_else(|| serde::de::Error::custom(format!("ratio {value} outside [0, 1]")))
    }
}

impl Ratio {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Checked constructor: `None` if outside `[0, 1]` or non-finite.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Clamping constructor for values known to be conceptually bounded
    /// (e.g. a coverage ratio after the oversupply diagnostic is recorded).
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    /// Explicit conversion to the percentage scale.
    pub fn as_percent(self) -> Percent {
        Percent(self.0 * 100.0)
    }
}

/// A percentage in `[0.0, 100.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Percent(f64);

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value)
            .ok_or_else(|| serde::de::Error::custom(format!("percent {value} outside [0, 100]")))
    }
}

impl Percent {
    /// Checked constructor: `None` if outside `[0, 100]` or non-finite.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    /// Explicit conversion to the ratio scale.
    pub fn as_ratio(self) -> Ratio {
        Ratio(self.0 / 100.0)
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

// ============================================================================
// Labeled metric values
// ============================================================================

/// Unit label attached to every reported metric so downstream renderers
/// never infer units from context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    /// Percentage points, e.g. a first-year ROI of `42.0` is 42%.
    Percent,
    /// Dimensionless ratio, e.g. a benefit-cost ratio of `3.2`.
    Ratio,
    /// Monetary amount in the snapshot's currency.
    Currency,
}

/// Hard clamp range plus the narrower "typical" band used for warning flags.
///
/// A value outside the hard range is clamped; a value outside the typical
/// band is reported as-is but flagged. The two are deliberately distinct:
/// clamping guards arithmetic, the typical band guards interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub hard_min: f64,
    pub hard_max: f64,
    pub typical_min: f64,
    pub typical_max: f64,
}

impl MetricRange {
    /// Clamp `raw` to the hard range and record whether it was clamped or
    /// fell outside the typical band.
    ///
    /// The typical band is judged on the raw value, so a clamped metric is
    /// always flagged even when the typical bound coincides with the hard
    /// bound.
    pub fn apply(&self, raw: f64, unit: MetricUnit) -> MetricValue {
        let value = raw.clamp(self.hard_min, self.hard_max);
        MetricValue {
            value,
            unit,
            clamped: value != raw,
            outside_typical: raw < self.typical_min || raw > self.typical_max,
        }
    }
}

/// A reported metric with its unit label and quality flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub value: f64,
    pub unit: MetricUnit,
    /// The raw computation exceeded the hard range and was clamped.
    pub clamped: bool,
    /// The reported value sits outside the configured typical band.
    /// Returned flagged, never suppressed.
    pub outside_typical: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_rejects_out_of_range() {
        assert!(Ratio::new(1.2).is_none());
        assert!(Ratio::new(-0.1).is_none());
        assert!(Ratio::new(f64::NAN).is_none());
        assert_eq!(Ratio::new(0.5).map(Ratio::get), Some(0.5));
    }

    #[test]
    fn ratio_percent_round_trip_is_explicit() {
        let r = Ratio::clamped(0.1123);
        assert!((r.as_percent().get() - 11.23).abs() < 1e-9);
        assert!((r.as_percent().as_ratio().get() - 0.1123).abs() < 1e-12);
    }

    #[test]
    fn metric_range_clamps_and_flags() {
        let range = MetricRange {
            hard_min: 0.0,
            hard_max: 40.0,
            typical_min: 1.0,
            typical_max: 15.0,
        };
        let v = range.apply(55.0, MetricUnit::Ratio);
        assert_eq!(v.value, 40.0);
        assert!(v.clamped);
        assert!(v.outside_typical);

        let v = range.apply(20.0, MetricUnit::Ratio);
        assert_eq!(v.value, 20.0);
        assert!(!v.clamped);
        assert!(v.outside_typical, "above typical band but inside hard range");

        let v = range.apply(5.0, MetricUnit::Ratio);
        assert!(!v.clamped);
        assert!(!v.outside_typical);
    }

    #[test]
    fn clamped_value_stays_flagged_when_typical_meets_hard_bound() {
        let range = MetricRange {
            hard_min: 0.0,
            hard_max: 40.0,
            typical_min: 1.0,
            typical_max: 40.0,
        };
        let v = range.apply(55.0, MetricUnit::Ratio);
        assert_eq!(v.value, 40.0);
        assert!(v.clamped);
        assert!(v.outside_typical, "flag is judged on the raw value");
    }

    #[test]
    fn deserialization_rejects_out_of_range_units() {
        assert!(serde_json::from_str::<Ratio>("7.3").is_err());
        assert!(serde_json::from_str::<Ratio>("-0.1").is_err());
        assert!((serde_json::from_str::<Ratio>("0.73").unwrap().get() - 0.73).abs() < 1e-12);

        assert!(serde_json::from_str::<Percent>("136.63").is_err());
        assert!(
            (serde_json::from_str::<Percent>("36.63").unwrap().get() - 36.63).abs() < 1e-12
        );
    }
}
