use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{RowDeviation, Severity};
use crate::data::Metric;
use crate::error::{Result, SimCheckError};

/// Percent deviation bounds for a single metric.
///
/// Deviations strictly above `min` are flagged; deviations strictly
/// above `max` are unacceptable.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Threshold {
    pub max: f64,
    pub min: f64,
}

impl Threshold {
    pub const fn new(max: f64, min: f64) -> Self {
        Self { max, min }
    }

    pub fn severity_of(&self, deviation: f64) -> Severity {
        if deviation > self.max {
            Severity::Fail
        } else if deviation > self.min {
            Severity::Warn
        } else {
            Severity::Ok
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdsRaw {
    frequency: Threshold,
    power: Threshold,
    error: Threshold,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Thresholds {
    frequency: Threshold,
    power: Threshold,
    error: Threshold,
}

impl Default for Thresholds {
    /// Note that the power band is degenerate (`max == min`): any power
    /// deviation above 1000% fails outright and never warns.
    fn default() -> Self {
        Self {
            frequency: Threshold::new(1.0, 0.5),
            power: Threshold::new(1000.0, 1000.0),
            error: Threshold::new(100.0, 50.0),
        }
    }
}

impl Thresholds {
    pub fn new(frequency: Threshold, power: Threshold, error: Threshold) -> Result<Self> {
        Self::from_raw(ThresholdsRaw {
            frequency,
            power,
            error,
        })
    }

    fn from_raw(raw: ThresholdsRaw) -> Result<Self> {
        let thresholds = Self {
            frequency: raw.frequency,
            power: raw.power,
            error: raw.error,
        };
        for metric in Metric::ALL {
            let Threshold { max, min } = thresholds.get(metric);
            if !max.is_finite() || !min.is_finite() || min < 0.0 {
                return Err(SimCheckError::Config(format!(
                    "{metric} bounds must be finite and non-negative (max = {max}, min = {min})"
                )));
            }
            if min > max {
                return Err(SimCheckError::Config(format!(
                    "{metric} min ({min}) is larger than max ({max})"
                )));
            }
        }
        Ok(thresholds)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| SimCheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_toml(&txt)
    }

    pub fn parse_toml(s: &str) -> Result<Self> {
        let raw: ThresholdsRaw = toml::from_str(s)?;
        Self::from_raw(raw)
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> Threshold {
        match metric {
            Metric::Frequency => self.frequency,
            Metric::Power => self.power,
            Metric::Error => self.error,
        }
    }

    /// Severity of a single row: the worst severity over all metrics.
    pub fn severity_of(&self, row: &RowDeviation) -> Severity {
        Metric::ALL
            .into_iter()
            .map(|metric| self.get(metric).severity_of(row.get(metric)))
            .max()
            .unwrap_or(Severity::Ok)
    }
}
