//! Classifies freshly generated circuit simulation results against stored
//! reference ("template") results.

pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod version;

pub use classify::{
    classify_sim_error, compare_files, Classification, Comparison, Notice, Severity,
};
pub use config::{Threshold, Thresholds};
pub use error::{Result, SimCheckError};
pub use version::{ExpectedVersion, VersionCheck, VersionStatus};
