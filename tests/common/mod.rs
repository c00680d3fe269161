// Shared test helpers: in-memory CloudWatch / inventory fakes and a fixed report window

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::TimeZone;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use utilization_report::cloudwatch_repo::{ChartSettings, MetricsApi, StatisticsQuery};
use utilization_report::error::MetricError;
use utilization_report::inventory_repo::{DatabasePage, InventoryApi};
use utilization_report::models::*;
use utilization_report::report::{DocumentWriter, ReportDocument};
use utilization_report::window::TimeWindow;

/// Not a decodable PNG; only the bytes' presence matters to the metric client.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nchart";

/// 24h window ending 16-10-2026 09:30 IST.
pub fn fixed_window() -> TimeWindow {
    let end = chrono_tz::Asia::Kolkata
        .with_ymd_and_hms(2026, 10, 16, 9, 30, 0)
        .unwrap();
    TimeWindow::ending_at(end, 24)
}

pub fn chart_settings() -> ChartSettings {
    ChartSettings {
        region: "ap-south-1".into(),
        period_secs: 300,
        width: 1200,
        height: 350,
    }
}

pub fn running_linux(id: &str) -> ComputeResource {
    ComputeResource::new(
        id,
        Some("web-1"),
        "running",
        Platform::Linux,
        Some("3.3.3.3"),
        Some("10.0.0.5"),
    )
}

pub fn running_windows(id: &str) -> ComputeResource {
    ComputeResource::new(
        id,
        Some("ad-1"),
        "running",
        Platform::Windows,
        None,
        Some("10.0.0.9"),
    )
}

pub fn stopped_compute(id: &str) -> ComputeResource {
    ComputeResource::new(id, Some("batch"), "stopped", Platform::Linux, None, None)
}

pub fn linux_disk_dimensions(id: &str) -> Vec<Dimension> {
    vec![
        Dimension::new("InstanceId", id),
        Dimension::new("device", "nvme0n1p1"),
        Dimension::new("fstype", "xfs"),
        Dimension::new("path", "/"),
    ]
}

/// CloudWatch stand-in. Datapoints are keyed by metric name; every call is recorded.
#[derive(Default)]
pub struct FakeMetrics {
    pub datapoints: HashMap<String, Vec<f64>>,
    pub failing_metrics: HashSet<String>,
    pub disk_dimensions: Vec<Vec<Dimension>>,
    pub fail_dimension_lookup: bool,
    pub fail_images: bool,
    pub empty_images: bool,
    pub queries: Mutex<Vec<(String, u32, i64, i64)>>,
    pub widgets: Mutex<Vec<String>>,
}

impl FakeMetrics {
    pub fn with_points(mut self, metric_name: &str, points: &[f64]) -> Self {
        self.datapoints
            .insert(metric_name.to_string(), points.to_vec());
        self
    }

    pub fn failing(mut self, metric_name: &str) -> Self {
        self.failing_metrics.insert(metric_name.to_string());
        self
    }

    pub fn with_disk_dimensions(mut self, dims: Vec<Dimension>) -> Self {
        self.disk_dimensions.push(dims);
        self
    }

    pub fn failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    pub fn widget_requests(&self) -> Vec<String> {
        self.widgets.lock().unwrap().clone()
    }

    pub fn queried_metrics(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(name, ..)| name.clone())
            .collect()
    }
}

#[async_trait]
impl MetricsApi for FakeMetrics {
    async fn statistics(&self, query: &StatisticsQuery<'_>) -> Result<Vec<f64>, MetricError> {
        self.queries.lock().unwrap().push((
            query.metric_name.to_string(),
            query.period_secs,
            query.start_epoch_secs,
            query.end_epoch_secs,
        ));
        if self.failing_metrics.contains(query.metric_name) {
            return Err(MetricError::Service("Throttling: rate exceeded".into()));
        }
        Ok(self
            .datapoints
            .get(query.metric_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn widget_image(&self, widget_json: &str) -> Result<Vec<u8>, MetricError> {
        self.widgets.lock().unwrap().push(widget_json.to_string());
        if self.fail_images {
            return Err(MetricError::Service("widget rendering failed".into()));
        }
        if self.empty_images {
            return Ok(Vec::new());
        }
        Ok(FAKE_PNG.to_vec())
    }

    async fn list_metric_dimensions(
        &self,
        _namespace: &str,
        _metric_name: &str,
        filter: &Dimension,
    ) -> Result<Vec<Vec<Dimension>>, MetricError> {
        if self.fail_dimension_lookup {
            return Err(MetricError::Service("AccessDenied".into()));
        }
        Ok(self
            .disk_dimensions
            .iter()
            .filter(|dims| dims.contains(filter))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeInventory {
    pub compute: Vec<ComputeResource>,
    pub databases: Vec<DatabaseResource>,
    pub truncated: bool,
    pub fail: bool,
}

#[async_trait]
impl InventoryApi for FakeInventory {
    async fn compute_resources(&self) -> anyhow::Result<Vec<ComputeResource>> {
        if self.fail {
            anyhow::bail!("UnauthorizedOperation: ec2:DescribeInstances");
        }
        Ok(self.compute.clone())
    }

    async fn database_resources(&self) -> anyhow::Result<DatabasePage> {
        Ok(DatabasePage {
            databases: self.databases.clone(),
            truncated: self.truncated,
        })
    }
}

/// Writes a placeholder file and keeps the saved document for inspection.
#[derive(Default)]
pub struct RecordingWriter {
    pub saved: Mutex<Vec<(PathBuf, ReportDocument)>>,
    pub fail: bool,
}

impl RecordingWriter {
    pub fn saved_documents(&self) -> Vec<(PathBuf, ReportDocument)> {
        self.saved.lock().unwrap().clone()
    }
}

impl DocumentWriter for RecordingWriter {
    fn save(&self, document: &ReportDocument, path: &Path) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("disk full");
        }
        // Charts must still be on disk while the document is written.
        for chart in document.chart_paths() {
            anyhow::ensure!(chart.exists(), "chart {} missing", chart.display());
        }
        std::fs::write(path, b"%PDF-1.4\n")?;
        self.saved
            .lock()
            .unwrap()
            .push((path.to_path_buf(), document.clone()));
        Ok(())
    }
}

/// Texts of every paragraph in the document, in order.
pub fn paragraph_texts(doc: &ReportDocument) -> Vec<String> {
    doc.blocks()
        .iter()
        .filter_map(|b| match b {
            utilization_report::report::Block::Paragraph(p) => Some(p.text.clone()),
            _ => None,
        })
        .collect()
}
