//! Classification of simulation results against stored templates.
//!
//! A result file is compared against its template row by row. Each row
//! yields a percent deviation per [`Metric`], which is checked against
//! the configured [`Thresholds`]. The first row exceeding a `max` bound
//! ends the comparison with [`Severity::Fail`].

use std::fmt::{Display, Formatter};
use std::path::Path;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::data::{Metric, Record, SimDataReader};
use crate::error::Result;
use crate::version::{VersionCheck, VersionStatus};

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Warn,
    Fail,
}

impl Severity {
    /// Alert color conventionally used for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok => "green",
            Severity::Warn => "amber",
            Severity::Fail => "red",
        }
    }

    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Percent deviation of `result` from `template`.
///
/// Falls back to the absolute difference (scaled by 100) when the
/// template value is exactly zero.
pub fn deviation(template: f64, result: f64) -> f64 {
    let diff = (template - result).abs();
    if template != 0.0 {
        diff / template.abs() * 100.0
    } else {
        diff * 100.0
    }
}

/// Per-metric deviations of one pair of rows.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RowDeviation {
    /// Line number of the row in the template file.
    pub line: usize,
    pub frequency: f64,
    pub power: f64,
    pub error: f64,
}

impl RowDeviation {
    pub fn between(template: &Record, result: &Record) -> Self {
        let dev = |metric| deviation(template.value(metric), result.value(metric));
        Self {
            line: template.line(),
            frequency: dev(Metric::Frequency),
            power: dev(Metric::Power),
            error: dev(Metric::Error),
        }
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Frequency => self.frequency,
            Metric::Power => self.power,
            Metric::Error => self.error,
        }
    }
}

/// Outcome of a numeric comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub severity: Severity,
    pub rows_compared: usize,
    /// First row that raised the comparison to its final severity.
    pub deciding_row: Option<RowDeviation>,
}

/// Compares paired rows until one of them fails or the rows run out.
///
/// Rows are pulled lazily; nothing after a failing row is consumed.
pub fn compare_rows<I>(rows: I, thresholds: &Thresholds) -> Result<Comparison>
where
    I: IntoIterator<Item = Result<(Record, Record)>>,
{
    let mut comparison = Comparison::default();

    for row in rows {
        let (template, result) = row?;
        comparison.rows_compared += 1;

        let dev = RowDeviation::between(&template, &result);
        let severity = thresholds.severity_of(&dev);
        trace!(
            "line {}: frequency {:.4}%, power {:.4}%, error {:.4}% -> {}",
            dev.line,
            dev.frequency,
            dev.power,
            dev.error,
            severity
        );

        if severity > comparison.severity {
            comparison.severity = severity;
            comparison.deciding_row = Some(dev);
        }
        if severity == Severity::Fail {
            debug!("line {} exceeds maximum deviation; stopping", dev.line);
            break;
        }
    }

    Ok(comparison)
}

/// Compares two in-memory record sets, truncating to the shorter one.
pub fn compare_records(
    template: &[Record],
    result: &[Record],
    thresholds: &Thresholds,
) -> Result<Comparison> {
    compare_rows(
        template
            .iter()
            .zip(result.iter())
            .map(|(t, r)| Ok((t.clone(), r.clone()))),
        thresholds,
    )
}

/// Compares a result file against its template file.
///
/// Rows past the end of the shorter file are ignored without being parsed.
pub fn compare_files(
    template_path: impl AsRef<Path>,
    result_path: impl AsRef<Path>,
    thresholds: &Thresholds,
) -> Result<Comparison> {
    let template_path = template_path.as_ref();
    let result_path = result_path.as_ref();

    let template = SimDataReader::open(template_path)?;
    let result = SimDataReader::open(result_path)?;

    let comparison = compare_rows(
        template.zip(result).map(|(t, r)| -> Result<(Record, Record)> {
            let (t, r) = (t?, r?);
            Ok((t.parse(template_path)?, r.parse(result_path)?))
        }),
        thresholds,
    )?;
    debug!(
        "compared {} rows of {:?} against {:?}: {}",
        comparison.rows_compared, result_path, template_path, comparison.severity
    );

    Ok(comparison)
}

/// An advisory attached to a classification. Notices never change the
/// severity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    VersionMismatch,
    VersionUnavailable,
    ResultsDiffer { version_matches: bool },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::VersionMismatch => write!(f, "simulator version does not match"),
            Notice::VersionUnavailable => {
                write!(f, "simulator version could not be determined")
            }
            Notice::ResultsDiffer {
                version_matches: true,
            } => write!(
                f,
                "simulation results do not match, but simulator version matches"
            ),
            Notice::ResultsDiffer {
                version_matches: false,
            } => write!(f, "simulation results do not match"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub severity: Severity,
    pub version: VersionStatus,
    pub notices: Vec<Notice>,
    pub rows_compared: usize,
    pub deciding_row: Option<RowDeviation>,
}

impl Classification {
    pub fn new(comparison: Comparison, version: VersionStatus) -> Self {
        let mut notices = Vec::new();
        match version {
            VersionStatus::Match => {}
            VersionStatus::Mismatch => notices.push(Notice::VersionMismatch),
            VersionStatus::Unknown => notices.push(Notice::VersionUnavailable),
        }
        if comparison.severity == Severity::Warn {
            notices.push(Notice::ResultsDiffer {
                version_matches: version == VersionStatus::Match,
            });
        }

        Self {
            severity: comparison.severity,
            version,
            notices,
            rows_compared: comparison.rows_compared,
            deciding_row: comparison.deciding_row,
        }
    }
}

/// Classifies how closely a generated simulation result tracks its stored
/// template, attaching advisories for simulator version problems.
pub fn classify_sim_error(
    template_path: impl AsRef<Path>,
    result_path: impl AsRef<Path>,
    thresholds: &Thresholds,
    version: &dyn VersionCheck,
) -> Result<Classification> {
    let status = version.check();
    debug!("simulator version check: {status:?}");
    let comparison = compare_files(template_path, result_path, thresholds)?;
    Ok(Classification::new(comparison, status))
}
