//! Analysis settings

use crate::context::ADVP_MARKER;
use crate::stats::DEFAULT_THRESHOLD;

/// Settings for a corpus pass
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Substring identifying the labels whose contexts are collected
    pub marker: String,
    /// Minimum relative frequency for a context label to be reported (inclusive)
    pub threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            marker: ADVP_MARKER.to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}
