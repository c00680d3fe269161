// Metric-tier failures. They stay inside the metric client and collapse to NA / no chart there.

#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("cloudwatch request failed: {0}")]
    Service(String),

    #[error("invalid chart request: {0}")]
    InvalidRequest(String),

    #[error("cloudwatch returned an empty chart image")]
    EmptyImage,

    #[error("chart cache write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("widget serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
