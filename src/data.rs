use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimCheckError};

/// Minimum number of columns in a data row: a leading index column
/// followed by one column per [`Metric`].
pub const MIN_COLUMNS: usize = 4;

/// A quantity tracked by the simulation result files.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Frequency,
    Power,
    Error,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Frequency, Metric::Power, Metric::Error];

    /// Column holding this metric in a data row.
    #[inline]
    pub fn column(&self) -> usize {
        match self {
            Metric::Frequency => 1,
            Metric::Power => 2,
            Metric::Error => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Frequency => "frequency",
            Metric::Power => "power",
            Metric::Error => "error",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One parsed data row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    line: usize,
    values: Vec<f64>,
}

impl Record {
    /// Builds a row from already parsed values. Rows with fewer than
    /// [`MIN_COLUMNS`] values are rejected.
    pub fn new(line: usize, values: Vec<f64>) -> Result<Self> {
        Self::with_source(Path::new(""), line, values)
    }

    fn with_source(path: &Path, line: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() < MIN_COLUMNS {
            return Err(SimCheckError::TooFewColumns {
                path: path.to_path_buf(),
                line,
                expected: MIN_COLUMNS,
                found: values.len(),
            });
        }
        Ok(Self { line, values })
    }

    /// 1-based line number of this row in its source file.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn value(&self, metric: Metric) -> f64 {
        self.values[metric.column()]
    }
}

/// An unparsed data row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    /// Parses this row. `path` is only used for error reporting.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Record> {
        parse_record(path.as_ref(), self.number, &self.text)
    }
}

/// Streams the data rows of a simulation result file.
///
/// The header line is consumed on construction. Rows are handed out
/// unparsed so that callers only pay for (and only fail on) the rows
/// they actually look at.
pub struct SimDataReader<R> {
    path: PathBuf,
    lines: Lines<R>,
    line: usize,
}

impl SimDataReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SimCheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(path, BufReader::new(file))
    }
}

impl<R: BufRead> SimDataReader<R> {
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Result<Self> {
        let mut reader = Self {
            path: path.into(),
            lines: reader.lines(),
            line: 0,
        };
        match reader.next() {
            Some(header) => {
                header?;
            }
            None => {
                return Err(SimCheckError::MissingHeader { path: reader.path });
            }
        }
        Ok(reader)
    }
}

impl<R: BufRead> Iterator for SimDataReader<R> {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        self.line += 1;
        Some(
            text.map(|text| Line {
                number: self.line,
                text,
            })
            .map_err(|source| SimCheckError::Io {
                path: self.path.clone(),
                source,
            }),
        )
    }
}

fn parse_record(path: &Path, line: usize, text: &str) -> Result<Record> {
    let values = text
        .split_whitespace()
        .enumerate()
        .map(|(column, field)| {
            field
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| SimCheckError::InvalidValue {
                    path: path.to_path_buf(),
                    line,
                    column,
                    value: field.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Record::with_source(path, line, values)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    fn reader(contents: &str) -> Result<SimDataReader<Cursor<&str>>> {
        SimDataReader::new("mem.txt", Cursor::new(contents))
    }

    #[test]
    fn test_header_is_skipped() -> Result<()> {
        let lines = reader("time freq power error\n0 1 2 3\n1 4 5 6\n")?
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 2);
        assert_eq!(lines[1].text, "1 4 5 6");

        let record = lines[1].parse("mem.txt")?;
        assert_eq!(record.line(), 3);
        assert_eq!(record.value(Metric::Frequency), 4.0);
        assert_eq!(record.value(Metric::Power), 5.0);
        assert_eq!(record.value(Metric::Error), 6.0);
        Ok(())
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let err = reader("").err().unwrap();
        assert!(matches!(err, SimCheckError::MissingHeader { .. }));
    }

    #[test]
    fn test_header_only() -> Result<()> {
        assert_eq!(reader("header\n")?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_extra_columns_and_whitespace() -> Result<()> {
        let line = Line {
            number: 7,
            text: "  0\t1.5e6   2.0e-3 0.1 99 100 ".to_string(),
        };
        let record = line.parse("mem.txt")?;
        assert_eq!(record.value(Metric::Error), 0.1);
        assert_eq!(record.value(Metric::Frequency), 1.5e6);
        assert_eq!(record.value(Metric::Power), 2.0e-3);
        Ok(())
    }

    #[test]
    fn test_too_few_columns() {
        let line = Line {
            number: 4,
            text: "0 1 2".to_string(),
        };
        match line.parse("mem.txt") {
            Err(SimCheckError::TooFewColumns {
                line, found, ..
            }) => {
                assert_eq!(line, 4);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_blank_line_is_malformed() {
        let line = Line {
            number: 2,
            text: String::new(),
        };
        assert!(matches!(
            line.parse("mem.txt"),
            Err(SimCheckError::TooFewColumns { found: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_values() {
        for (text, bad) in [("0 1 abc 3", "abc"), ("0 nan 2 3", "nan"), ("0 1 2 inf", "inf")] {
            let line = Line {
                number: 2,
                text: text.to_string(),
            };
            match line.parse("mem.txt") {
                Err(SimCheckError::InvalidValue { value, .. }) => assert_eq!(value, bad),
                other => panic!("unexpected result for {text:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_read_rows_from_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "idx freq power error")?;
        writeln!(file, "0 100.0 2000.0 10.0")?;
        writeln!(file, "1 101.0 2001.0 11.0")?;
        file.flush()?;

        let records = SimDataReader::open(file.path())?
            .map(|line| line?.parse(file.path()))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line(), 3);
        assert_eq!(records[1].value(Metric::Error), 11.0);
        Ok(())
    }

    #[test]
    fn test_record_new_rejects_short_rows() -> Result<()> {
        match Record::new(2, vec![0.0, 1.0, 2.0]) {
            Err(SimCheckError::TooFewColumns {
                line,
                expected,
                found,
                ..
            }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, MIN_COLUMNS);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let record = Record::new(5, vec![0.0, 1.0, 2.0, 3.0])?;
        assert_eq!(record.value(Metric::Power), 2.0);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = SimDataReader::open("/nonexistent/simcheck/data.txt")
            .err()
            .unwrap();
        assert!(matches!(err, SimCheckError::Io { .. }));

        // The OS error is reported once, through `source()`.
        let msg = err.to_string();
        assert_eq!(msg, "io error reading \"/nonexistent/simcheck/data.txt\"");
        let source = std::error::Error::source(&err).unwrap();
        assert!(!msg.contains(&source.to_string()));
    }
}
