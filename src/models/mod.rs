// Domain models: inventory records and metric values

mod metric;
mod resource;

pub use metric::{ChartArtifact, Dimension, MetricSample, round2};
pub use resource::{ComputeResource, DatabaseResource, NOT_AVAILABLE, Platform};
