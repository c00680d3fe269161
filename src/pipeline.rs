// One report run: directories -> inventory -> layout (with inline metric fetches) -> save -> cleanup.

use anyhow::Context;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::cleanup;
use crate::cloudwatch_repo::{ChartSettings, MetricClient, MetricsApi};
use crate::config::AppConfig;
use crate::inventory_repo::{self, Inventory, InventoryApi};
use crate::report::{DocumentWriter, ReportDocument, ReportRenderer};
use crate::window::{ReportPaths, TimeWindow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub document: PathBuf,
    pub compute_count: usize,
    pub database_count: usize,
    pub charts_removed: usize,
}

#[instrument(skip_all, fields(label = %window.label))]
pub async fn run<I, M, W>(
    config: &AppConfig,
    window: &TimeWindow,
    inventory_api: &I,
    metrics_api: &M,
    writer: &W,
) -> anyhow::Result<RunSummary>
where
    I: InventoryApi,
    M: MetricsApi,
    W: DocumentWriter,
{
    let paths = ReportPaths::new(&config.report.output_dir, window);
    prepare_directories(config, &paths)?;

    let inventory = inventory_repo::fetch_inventory(inventory_api).await?;
    let document = build_report(config, window, &inventory, metrics_api).await;

    writer
        .save(&document, &paths.document)
        .with_context(|| format!("saving report to {}", paths.document.display()))?;

    let charts_removed = cleanup::clear_image_cache(&config.report.image_dir).with_context(|| {
        format!(
            "clearing image cache {}",
            config.report.image_dir.display()
        )
    })?;
    info!(charts_removed, "image cache cleared");

    Ok(RunSummary {
        document: paths.document,
        compute_count: inventory.compute.len(),
        database_count: inventory.databases.len(),
        charts_removed,
    })
}

/// Lays out the whole report; chart PNGs land in `report.image_dir`, which must exist.
pub async fn build_report<M: MetricsApi>(
    config: &AppConfig,
    window: &TimeWindow,
    inventory: &Inventory,
    metrics_api: &M,
) -> ReportDocument {
    let client = MetricClient::new(metrics_api, window, ChartSettings::from_config(config));
    ReportRenderer::new(client, &config.report.image_dir)
        .render(inventory)
        .await
}

fn prepare_directories(config: &AppConfig, paths: &ReportPaths) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.report.image_dir).with_context(|| {
        format!("creating {}", config.report.image_dir.display())
    })?;
    for dir in paths.directories() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    // TODO: nothing fills the spreadsheet yet; decide whether it should carry the averages table.
    debug!(path = %paths.spreadsheet.display(), "spreadsheet path reserved, not written");
    Ok(())
}
