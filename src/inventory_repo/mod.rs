// EC2 + RDS inventory. Enumeration errors are fatal for the run and propagate to main.

pub mod aws;

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::models::{ComputeResource, DatabaseResource};

/// Result of the single DescribeDBInstances call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabasePage {
    pub databases: Vec<DatabaseResource>,
    /// The service returned a continuation marker that is not followed.
    pub truncated: bool,
}

#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Every instance of every page, in enumeration order.
    async fn compute_resources(&self) -> anyhow::Result<Vec<ComputeResource>>;

    /// First page of database instances only.
    async fn database_resources(&self) -> anyhow::Result<DatabasePage>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub compute: Vec<ComputeResource>,
    pub databases: Vec<DatabaseResource>,
}

#[instrument(skip_all)]
pub async fn fetch_inventory<A: InventoryApi>(api: &A) -> anyhow::Result<Inventory> {
    let compute = list_compute_resources(api).await?;
    let databases = list_database_resources(api).await?;
    info!(
        compute = compute.len(),
        databases = databases.len(),
        "inventory fetched"
    );
    Ok(Inventory { compute, databases })
}

pub async fn list_compute_resources<A: InventoryApi>(
    api: &A,
) -> anyhow::Result<Vec<ComputeResource>> {
    Ok(dedupe_by_id(api.compute_resources().await?))
}

pub async fn list_database_resources<A: InventoryApi>(
    api: &A,
) -> anyhow::Result<Vec<DatabaseResource>> {
    let page = api.database_resources().await?;
    if page.truncated {
        warn!(
            listed = page.databases.len(),
            "more database instances exist than one page; only the first page is reported"
        );
    }
    Ok(page.databases)
}

/// Keeps enumeration order; a repeated id replaces the earlier record in place.
pub fn dedupe_by_id(resources: Vec<ComputeResource>) -> Vec<ComputeResource> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(resources.len());
    let mut out: Vec<ComputeResource> = Vec::with_capacity(resources.len());
    for r in resources {
        match index.get(&r.id) {
            Some(&i) => out[i] = r,
            None => {
                index.insert(r.id.clone(), out.len());
                out.push(r);
            }
        }
    }
    out
}
