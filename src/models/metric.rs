// Metric values, dimensions and cached chart files

use std::fmt;
use std::path::PathBuf;

/// A 24h average rounded to two decimals, or the "NA" sentinel when no datapoints came back
/// or the query failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricSample {
    Value(f64),
    NotAvailable,
}

impl MetricSample {
    /// Mean of per-bucket averages; an empty slice is NA, never zero.
    pub fn from_datapoints(points: &[f64]) -> Self {
        if points.is_empty() {
            return MetricSample::NotAvailable;
        }
        let mean = points.iter().sum::<f64>() / points.len() as f64;
        MetricSample::Value(round2(mean))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MetricSample::Value(v) => Some(*v),
            MetricSample::NotAvailable => None,
        }
    }

    /// Converts a free-space percentage into used-space. NA stays NA.
    pub fn used_from_free(self) -> Self {
        match self {
            MetricSample::Value(free) => MetricSample::Value(round2(100.0 - free)),
            MetricSample::NotAvailable => MetricSample::NotAvailable,
        }
    }
}

impl fmt::Display for MetricSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricSample::Value(v) => write!(f, "{:.2}", v),
            MetricSample::NotAvailable => f.write_str(super::NOT_AVAILABLE),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One CloudWatch dimension (e.g. InstanceId = i-0abc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A chart PNG written to the image cache; removed by cleanup at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub path: PathBuf,
}
