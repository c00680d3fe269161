// End-to-end run tests: directories, report save, image cache cleanup

mod common;

use common::{FakeInventory, FakeMetrics, RecordingWriter};
use std::path::Path;
use utilization_report::cleanup::clear_image_cache;
use utilization_report::config::AppConfig;
use utilization_report::models::DatabaseResource;
use utilization_report::pipeline;

fn config_in(root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.report.output_dir = root.join("reports");
    config.report.image_dir = root.join("images");
    config
}

fn inventory() -> FakeInventory {
    FakeInventory {
        compute: vec![
            common::running_linux("i-1"),
            common::stopped_compute("i-9"),
        ],
        databases: vec![
            DatabaseResource::new("orders-db", "available"),
            DatabaseResource::new("audit-db", "stopped"),
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_run_saves_dated_report_and_clears_cache() {
    let root = tempfile::TempDir::new().unwrap();
    let config = config_in(root.path());
    let window = common::fixed_window();
    let metrics = FakeMetrics::default()
        .with_points("CPUUtilization", &[20.0])
        .with_disk_dimensions(common::linux_disk_dimensions("i-1"));
    let writer = RecordingWriter::default();

    let summary = pipeline::run(&config, &window, &inventory(), &metrics, &writer)
        .await
        .expect("run succeeds");

    let expected = root
        .path()
        .join("reports/pdf/Daily_Utilization_16-10-2026.pdf");
    assert_eq!(summary.document, expected);
    assert!(expected.is_file());
    assert_eq!(summary.compute_count, 2);
    assert_eq!(summary.database_count, 2);
    // linux: cpu, mem, disk; orders-db: 5
    assert_eq!(summary.charts_removed, 8);

    let saved = writer.saved_documents();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, expected);
    assert_eq!(saved[0].1.chart_paths().count(), 8);

    assert_eq!(
        std::fs::read_dir(&config.report.image_dir).unwrap().count(),
        0
    );
    assert!(root.path().join("reports/excel").is_dir());
    assert!(
        !root
            .path()
            .join("reports/excel/Daily_Utilization_16-10-2026.xlsx")
            .exists()
    );
}

#[tokio::test]
async fn test_run_with_only_stopped_resources_has_no_charts() {
    let root = tempfile::TempDir::new().unwrap();
    let config = config_in(root.path());
    let window = common::fixed_window();
    let inv = FakeInventory {
        compute: vec![common::stopped_compute("i-9")],
        databases: vec![DatabaseResource::new("audit-db", "stopped")],
        ..Default::default()
    };
    let metrics = FakeMetrics::default();
    let writer = RecordingWriter::default();

    let summary = pipeline::run(&config, &window, &inv, &metrics, &writer)
        .await
        .unwrap();
    assert_eq!(summary.charts_removed, 0);
    assert!(metrics.widget_requests().is_empty());
    assert_eq!(writer.saved_documents()[0].1.bordered_boxes().count(), 2);
}

#[tokio::test]
async fn test_inventory_failure_aborts_before_saving() {
    let root = tempfile::TempDir::new().unwrap();
    let config = config_in(root.path());
    let window = common::fixed_window();
    let inv = FakeInventory {
        fail: true,
        ..Default::default()
    };
    let metrics = FakeMetrics::default();
    let writer = RecordingWriter::default();

    let result = pipeline::run(&config, &window, &inv, &metrics, &writer).await;
    assert!(result.is_err());
    assert!(writer.saved_documents().is_empty());
    assert!(metrics.queried_metrics().is_empty());
}

#[tokio::test]
async fn test_save_failure_is_fatal() {
    let root = tempfile::TempDir::new().unwrap();
    let config = config_in(root.path());
    let window = common::fixed_window();
    let metrics = FakeMetrics::default();
    let writer = RecordingWriter {
        fail: true,
        ..Default::default()
    };

    let err = pipeline::run(&config, &window, &inventory(), &metrics, &writer)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("disk full"));
}

#[test]
fn test_clear_image_cache_missing_dir_is_noop() {
    let root = tempfile::TempDir::new().unwrap();
    assert_eq!(clear_image_cache(&root.path().join("nope")).unwrap(), 0);
}

#[test]
fn test_clear_image_cache_leaves_directory_empty() {
    let root = tempfile::TempDir::new().unwrap();
    std::fs::write(root.path().join("i-1_cpu.png"), b"x").unwrap();
    std::fs::write(root.path().join("i-1_mem.png"), b"x").unwrap();
    std::fs::create_dir_all(root.path().join("stale/nested")).unwrap();
    std::fs::write(root.path().join("stale/nested/old.png"), b"x").unwrap();

    assert_eq!(clear_image_cache(root.path()).unwrap(), 3);
    assert!(root.path().is_dir());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn test_clear_image_cache_on_empty_dir_removes_nothing() {
    let root = tempfile::TempDir::new().unwrap();
    assert_eq!(clear_image_cache(root.path()).unwrap(), 0);
}
