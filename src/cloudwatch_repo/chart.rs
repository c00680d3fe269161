// Typed CloudWatch metric-widget request, validated before it is serialized and sent.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::config::AppConfig;
use crate::error::MetricError;
use crate::models::Dimension;
use crate::window::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Statistic {
    Average,
}

/// One plotted metric. Serializes the way the widget API expects:
/// `[namespace, metric, dim1_name, dim1_value, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
}

impl MetricSpec {
    pub fn new(
        namespace: impl Into<String>,
        metric_name: impl Into<String>,
        dimensions: Vec<Dimension>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            dimensions,
        }
    }
}

impl Serialize for MetricSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2 + self.dimensions.len() * 2))?;
        seq.serialize_element(&self.namespace)?;
        seq.serialize_element(&self.metric_name)?;
        for d in &self.dimensions {
            seq.serialize_element(&d.name)?;
            seq.serialize_element(&d.value)?;
        }
        seq.end()
    }
}

/// Region, period and canvas shared by every chart of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSettings {
    pub region: String,
    pub period_secs: u32,
    pub width: u32,
    pub height: u32,
}

impl ChartSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            region: config.aws.region.clone(),
            period_secs: config.window.period_secs,
            width: config.report.chart_width,
            height: config.report.chart_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub metrics: Vec<MetricSpec>,
    pub statistic: Statistic,
    pub period_secs: u32,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub region: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize)]
struct MetricWidget<'a> {
    metrics: &'a [MetricSpec],
    region: &'a str,
    stat: Statistic,
    period: u32,
    start: String,
    end: String,
    width: u32,
    height: u32,
}

impl ChartRequest {
    /// Average line chart of `metrics` over the window.
    pub fn line(metrics: Vec<MetricSpec>, window: &TimeWindow, settings: &ChartSettings) -> Self {
        Self {
            metrics,
            statistic: Statistic::Average,
            period_secs: settings.period_secs,
            start: window.start,
            end: window.end,
            region: settings.region.clone(),
            width: settings.width,
            height: settings.height,
        }
    }

    pub fn validate(&self) -> Result<(), MetricError> {
        if self.metrics.is_empty() {
            return Err(MetricError::InvalidRequest("no metrics to plot".into()));
        }
        if let Some(m) = self
            .metrics
            .iter()
            .find(|m| m.namespace.is_empty() || m.metric_name.is_empty())
        {
            return Err(MetricError::InvalidRequest(format!(
                "metric needs a namespace and a name, got {:?}/{:?}",
                m.namespace, m.metric_name
            )));
        }
        if self.period_secs == 0 {
            return Err(MetricError::InvalidRequest("period must be > 0".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(MetricError::InvalidRequest(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.start >= self.end {
            return Err(MetricError::InvalidRequest(format!(
                "start {} is not before end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Validates, then renders the `MetricWidget` JSON document.
    pub fn to_widget_json(&self) -> Result<String, MetricError> {
        self.validate()?;
        let widget = MetricWidget {
            metrics: &self.metrics,
            region: &self.region,
            stat: self.statistic,
            period: self.period_secs,
            start: self.start.to_rfc3339(),
            end: self.end.to_rfc3339(),
            width: self.width,
            height: self.height,
        };
        Ok(serde_json::to_string(&widget)?)
    }
}
