// CloudWatch access: 24h averages, rendered chart images and metric dimension discovery.
// Every public operation is best-effort: failures are logged at debug and become NA / None.

pub mod aws;
pub mod chart;

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::error::MetricError;
use crate::models::{ChartArtifact, Dimension, MetricSample};
use crate::selector;
use crate::window::TimeWindow;

pub use chart::{ChartRequest, ChartSettings, MetricSpec, Statistic};

/// One GetMetricStatistics call for the Average statistic.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsQuery<'a> {
    pub namespace: &'a str,
    pub metric_name: &'a str,
    pub dimensions: &'a [Dimension],
    pub start_epoch_secs: i64,
    pub end_epoch_secs: i64,
    pub period_secs: u32,
}

/// The read-only CloudWatch calls the report needs. Implemented by [`aws::CloudWatchRepo`].
#[async_trait]
pub trait MetricsApi: Send + Sync {
    /// Per-period averages; empty when there are no datapoints.
    async fn statistics(&self, query: &StatisticsQuery<'_>) -> Result<Vec<f64>, MetricError>;

    /// PNG bytes for a serialized metric widget.
    async fn widget_image(&self, widget_json: &str) -> Result<Vec<u8>, MetricError>;

    /// Dimension sets of the metrics named `namespace`/`metric_name` that carry `filter`.
    async fn list_metric_dimensions(
        &self,
        namespace: &str,
        metric_name: &str,
        filter: &Dimension,
    ) -> Result<Vec<Vec<Dimension>>, MetricError>;
}

/// Binds a [`MetricsApi`] to the run's window and chart settings.
pub struct MetricClient<'a, A> {
    api: &'a A,
    window: &'a TimeWindow,
    settings: ChartSettings,
}

impl<'a, A: MetricsApi> MetricClient<'a, A> {
    pub fn new(api: &'a A, window: &'a TimeWindow, settings: ChartSettings) -> Self {
        Self {
            api,
            window,
            settings,
        }
    }

    pub fn window(&self) -> &TimeWindow {
        self.window
    }

    /// Mean of the per-period averages over the window, rounded to 2 decimals, or NA.
    pub async fn average(
        &self,
        namespace: &str,
        metric_name: &str,
        dimensions: &[Dimension],
    ) -> MetricSample {
        match self.try_average(namespace, metric_name, dimensions).await {
            Ok(sample) => sample,
            Err(e) => {
                debug!(namespace, metric_name, error = %e, "average unavailable");
                MetricSample::NotAvailable
            }
        }
    }

    pub async fn try_average(
        &self,
        namespace: &str,
        metric_name: &str,
        dimensions: &[Dimension],
    ) -> Result<MetricSample, MetricError> {
        let query = StatisticsQuery {
            namespace,
            metric_name,
            dimensions,
            start_epoch_secs: self.window.start_epoch_secs(),
            end_epoch_secs: self.window.end_epoch_secs(),
            period_secs: self.settings.period_secs,
        };
        let points = self.api.statistics(&query).await?;
        Ok(MetricSample::from_datapoints(&points))
    }

    /// Average line chart request for `metrics` over this client's window.
    pub fn chart_request(&self, metrics: Vec<MetricSpec>) -> ChartRequest {
        ChartRequest::line(metrics, self.window, &self.settings)
    }

    pub async fn chart_image(&self, request: &ChartRequest) -> Option<Vec<u8>> {
        match self.try_chart_image(request).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(error = %e, "chart image unavailable");
                None
            }
        }
    }

    pub async fn try_chart_image(&self, request: &ChartRequest) -> Result<Vec<u8>, MetricError> {
        let widget = request.to_widget_json()?;
        let bytes = self.api.widget_image(&widget).await?;
        if bytes.is_empty() {
            return Err(MetricError::EmptyImage);
        }
        Ok(bytes)
    }

    /// Fetches the chart and writes it to `path`. Any failure, including the write, yields None.
    pub async fn save_chart(&self, request: &ChartRequest, path: &Path) -> Option<ChartArtifact> {
        match self.try_save_chart(request, path).await {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "chart not saved");
                None
            }
        }
    }

    async fn try_save_chart(
        &self,
        request: &ChartRequest,
        path: &Path,
    ) -> Result<ChartArtifact, MetricError> {
        let bytes = self.try_chart_image(request).await?;
        tokio::fs::write(path, &bytes).await?;
        Ok(ChartArtifact {
            path: path.to_path_buf(),
        })
    }

    /// Dimensions of the first agent disk metric reported by `resource_id`; None until the
    /// instance has reported one.
    pub async fn dimension_lookup(&self, resource_id: &str) -> Option<Vec<Dimension>> {
        let filter = Dimension::new(selector::INSTANCE_ID, resource_id);
        match self
            .api
            .list_metric_dimensions(
                selector::CWAGENT_NAMESPACE,
                selector::LINUX_DISK_METRIC,
                &filter,
            )
            .await
        {
            Ok(sets) => sets.into_iter().next().filter(|dims| !dims.is_empty()),
            Err(e) => {
                debug!(resource_id, error = %e, "disk dimension lookup failed");
                None
            }
        }
    }
}
