pub mod thresholds;

pub use thresholds::{Threshold, Thresholds};
