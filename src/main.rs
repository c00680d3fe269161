use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use utilization_report::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = %version::banner(),
        region = %app_config.aws.region,
        "starting report run"
    );

    let writer = report::PdfWriter::new(&app_config.report)?;
    let window = window::TimeWindow::from_config(&app_config);

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(app_config.aws.region.clone()))
        .load()
        .await;
    let inventory_repo = inventory_repo::aws::AwsInventoryRepo::new(&sdk_config);
    let cloudwatch_repo = cloudwatch_repo::aws::CloudWatchRepo::new(&sdk_config);

    let summary = pipeline::run(
        &app_config,
        &window,
        &inventory_repo,
        &cloudwatch_repo,
        &writer,
    )
    .await?;

    println!(
        "Daily utilization report generated: {} ({} EC2, {} RDS)",
        summary.document.display(),
        summary.compute_count,
        summary.database_count
    );
    Ok(())
}
