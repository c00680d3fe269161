// Walks the inventory and lays out one section per resource, fetching averages and charts inline.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use super::layout::{BoxContent, Paragraph, ReportDocument};
use crate::cloudwatch_repo::{MetricClient, MetricSpec, MetricsApi};
use crate::inventory_repo::Inventory;
use crate::models::{ComputeResource, DatabaseResource, MetricSample};
use crate::selector::{self, Unit};

pub const COMPUTE_TITLE: &str = "AWS Daily Utilization Report";
pub const DATABASE_TITLE: &str = "AWS RDS Utilization Report";
pub const STOPPED: &str = "STOPPED";
pub const NO_DATA: &str = "NO DATA";

pub const CPU_TITLE: &str = "1) CPU UTILIZATION";
pub const MEMORY_TITLE: &str = "2) MEMORY UTILIZATION";
pub const DISK_TITLE: &str = "3) DISK UTILIZATION";

const NAME_FONT_SIZE: u8 = 15;

pub struct ReportRenderer<'a, A> {
    client: MetricClient<'a, A>,
    image_dir: &'a Path,
}

impl<'a, A: MetricsApi> ReportRenderer<'a, A> {
    pub fn new(client: MetricClient<'a, A>, image_dir: &'a Path) -> Self {
        Self { client, image_dir }
    }

    /// Title page, compute sections, second title page, database sections; in inventory order.
    #[instrument(skip_all, fields(label = %self.client.window().label))]
    pub async fn render(&self, inventory: &Inventory) -> ReportDocument {
        let label = self.client.window().label.clone();
        let mut doc = ReportDocument::new(COMPUTE_TITLE);

        title_page(&mut doc, COMPUTE_TITLE, &label);
        for resource in &inventory.compute {
            self.compute_section(&mut doc, resource).await;
        }

        title_page(&mut doc, DATABASE_TITLE, &label);
        for db in &inventory.databases {
            self.database_section(&mut doc, db).await;
        }

        info!(
            charts = doc.chart_paths().count(),
            boxes = doc.bordered_boxes().count(),
            "report laid out"
        );
        doc
    }

    pub async fn compute_section(&self, doc: &mut ReportDocument, resource: &ComputeResource) {
        doc.paragraph(
            Paragraph::new(&resource.display_name)
                .bold()
                .sized(NAME_FONT_SIZE)
                .centered(),
        );
        doc.paragraph(Paragraph::new(&resource.id).centered());
        doc.paragraph(
            Paragraph::new(format!(
                "Private IP: {} | Public IP: {}",
                resource.private_address, resource.public_address
            ))
            .centered(),
        );

        if !resource.is_running() {
            stopped(doc);
            return;
        }

        let cpu = selector::cpu_metric(resource);
        let cpu_avg = self.average_of(&cpu).await;
        self.metric_block(doc, CPU_TITLE, Unit::Percent.format(cpu_avg), cpu, &resource.id, "cpu")
            .await;

        let memory = selector::memory_metric(resource);
        let memory_avg = self.average_of(&memory).await;
        self.metric_block(
            doc,
            MEMORY_TITLE,
            Unit::Percent.format(memory_avg),
            memory,
            &resource.id,
            "mem",
        )
        .await;

        let discovered = if selector::needs_disk_dimension_lookup(resource.platform) {
            self.client.dimension_lookup(&resource.id).await
        } else {
            None
        };
        match selector::disk_metric(resource, discovered) {
            Some(disk) => {
                let used = disk.used_percent(self.average_of(&disk.spec).await);
                self.metric_block(
                    doc,
                    DISK_TITLE,
                    Unit::Percent.format(used),
                    disk.spec,
                    &resource.id,
                    "disk",
                )
                .await;
            }
            None => debug!(
                resource_id = %resource.id,
                "no disk metric reported yet; disk section omitted"
            ),
        }

        doc.page_break();
    }

    pub async fn database_section(&self, doc: &mut ReportDocument, db: &DatabaseResource) {
        doc.paragraph(Paragraph::new(&db.id).bold().centered());
        if let Some(details) = database_details(db) {
            doc.paragraph(Paragraph::new(details).centered());
        }

        if !db.is_available() {
            stopped(doc);
            return;
        }

        for metric in selector::database_metrics(&db.id) {
            let avg = self.average_of(&metric.spec).await;
            let suffix = metric.spec.metric_name.clone();
            self.metric_block(
                doc,
                metric.title,
                metric.unit.format(avg),
                metric.spec,
                &db.id,
                &suffix,
            )
            .await;
        }

        doc.page_break();
    }

    async fn average_of(&self, spec: &MetricSpec) -> MetricSample {
        self.client
            .average(&spec.namespace, &spec.metric_name, &spec.dimensions)
            .await
    }

    /// Bold title, average line, then the chart box ("NO DATA" when the chart is unavailable).
    async fn metric_block(
        &self,
        doc: &mut ReportDocument,
        title: &str,
        average: String,
        spec: MetricSpec,
        resource_id: &str,
        suffix: &str,
    ) {
        doc.paragraph(Paragraph::new(title).bold());
        doc.paragraph(Paragraph::new(format!("24h average: {}", average)));

        let path = self.chart_path(resource_id, suffix);
        let request = self.client.chart_request(vec![spec]);
        let content = match self.client.save_chart(&request, &path).await {
            Some(artifact) => BoxContent::Image(artifact.path),
            None => BoxContent::Text(NO_DATA.into()),
        };
        doc.bordered_box(content);
    }

    fn chart_path(&self, resource_id: &str, suffix: &str) -> PathBuf {
        self.image_dir.join(format!("{}_{}.png", resource_id, suffix))
    }
}

fn title_page(doc: &mut ReportDocument, title: &str, label: &str) {
    doc.heading(title);
    doc.paragraph(Paragraph::new(format!("Date : {}", label)).centered());
    doc.page_break();
}

fn stopped(doc: &mut ReportDocument) {
    doc.bordered_box(BoxContent::Text(STOPPED.into()));
    doc.page_break();
}

fn database_details(db: &DatabaseResource) -> Option<String> {
    let parts: Vec<&str> = [&db.engine, &db.instance_class, &db.endpoint]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}
