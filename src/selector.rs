// Which metric answers "CPU / memory / disk" for a given resource.
// The CloudWatch agent publishes different metric names on Windows and Linux; RDS metrics are fixed.

use crate::cloudwatch_repo::MetricSpec;
use crate::models::{ComputeResource, Dimension, MetricSample, Platform, round2};

pub const EC2_NAMESPACE: &str = "AWS/EC2";
pub const RDS_NAMESPACE: &str = "AWS/RDS";
pub const CWAGENT_NAMESPACE: &str = "CWAgent";

pub const INSTANCE_ID: &str = "InstanceId";
pub const DB_INSTANCE_ID: &str = "DBInstanceIdentifier";

pub const CPU_METRIC: &str = "CPUUtilization";
pub const WINDOWS_MEMORY_METRIC: &str = "Memory % Committed Bytes In Use";
pub const LINUX_MEMORY_METRIC: &str = "mem_used_percent";
pub const WINDOWS_DISK_FREE_METRIC: &str = "LogicalDisk % Free Space";
pub const LINUX_DISK_METRIC: &str = "disk_used_percent";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// How an average is printed next to its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Bytes,
    Count,
    PerSecond,
}

impl Unit {
    pub fn format(&self, sample: MetricSample) -> String {
        let Some(value) = sample.value() else {
            return sample.to_string();
        };
        match self {
            Unit::Percent => format!("{:.2} %", value),
            Unit::Bytes => format!("{:.2} MiB", round2(value / BYTES_PER_MIB)),
            Unit::Count => format!("{:.2}", value),
            Unit::PerSecond => format!("{:.2} /s", value),
        }
    }
}

fn instance_dimension(instance_id: &str) -> Vec<Dimension> {
    vec![Dimension::new(INSTANCE_ID, instance_id)]
}

pub fn cpu_metric(resource: &ComputeResource) -> MetricSpec {
    MetricSpec::new(EC2_NAMESPACE, CPU_METRIC, instance_dimension(&resource.id))
}

pub fn memory_metric(resource: &ComputeResource) -> MetricSpec {
    let name = match resource.platform {
        Platform::Windows => WINDOWS_MEMORY_METRIC,
        Platform::Linux => LINUX_MEMORY_METRIC,
    };
    MetricSpec::new(CWAGENT_NAMESPACE, name, instance_dimension(&resource.id))
}

/// Linux disk metrics are keyed by device/path/fstype, which are only known once the agent has
/// reported; those resources need a dimension lookup first.
pub fn needs_disk_dimension_lookup(platform: Platform) -> bool {
    platform == Platform::Linux
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskMetric {
    pub spec: MetricSpec,
    /// The metric reports free space; used = 100 - free.
    pub inverted: bool,
}

impl DiskMetric {
    pub fn used_percent(&self, sample: MetricSample) -> MetricSample {
        if self.inverted {
            sample.used_from_free()
        } else {
            sample
        }
    }
}

/// None when a Linux resource has no discovered disk dimensions: the disk metric is omitted.
pub fn disk_metric(
    resource: &ComputeResource,
    discovered: Option<Vec<Dimension>>,
) -> Option<DiskMetric> {
    match resource.platform {
        Platform::Windows => Some(DiskMetric {
            spec: MetricSpec::new(
                CWAGENT_NAMESPACE,
                WINDOWS_DISK_FREE_METRIC,
                instance_dimension(&resource.id),
            ),
            inverted: true,
        }),
        Platform::Linux => discovered
            .filter(|dims| !dims.is_empty())
            .map(|dims| DiskMetric {
                spec: MetricSpec::new(CWAGENT_NAMESPACE, LINUX_DISK_METRIC, dims),
                inverted: false,
            }),
    }
}

/// One RDS chart: section title, metric and how its average is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetric {
    pub title: &'static str,
    pub spec: MetricSpec,
    pub unit: Unit,
}

const DATABASE_METRICS: [(&str, &str, Unit); 5] = [
    ("CPU UTILIZATION", "CPUUtilization", Unit::Percent),
    ("FREEABLE MEMORY", "FreeableMemory", Unit::Bytes),
    ("DB CONNECTIONS", "DatabaseConnections", Unit::Count),
    ("READ IOPS", "ReadIOPS", Unit::PerSecond),
    ("WRITE IOPS", "WriteIOPS", Unit::PerSecond),
];

pub fn database_metrics(db_id: &str) -> Vec<DatabaseMetric> {
    DATABASE_METRICS
        .iter()
        .map(|&(title, name, unit)| DatabaseMetric {
            title,
            spec: MetricSpec::new(
                RDS_NAMESPACE,
                name,
                vec![Dimension::new(DB_INSTANCE_ID, db_id)],
            ),
            unit,
        })
        .collect()
}
