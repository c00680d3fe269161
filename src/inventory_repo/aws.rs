// InventoryApi over the AWS SDK EC2 and RDS clients

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_ec2::types::Instance;
use aws_sdk_rds::types::DbInstance;

use super::{DatabasePage, InventoryApi};
use crate::models::{ComputeResource, DatabaseResource, Platform};

const NAME_TAG: &str = "Name";

pub struct AwsInventoryRepo {
    ec2: aws_sdk_ec2::Client,
    rds: aws_sdk_rds::Client,
}

impl AwsInventoryRepo {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            ec2: aws_sdk_ec2::Client::new(sdk_config),
            rds: aws_sdk_rds::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl InventoryApi for AwsInventoryRepo {
    async fn compute_resources(&self) -> anyhow::Result<Vec<ComputeResource>> {
        let mut out = Vec::new();
        let mut pages = self.ec2.describe_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.context("describing EC2 instances")?;
            for reservation in page.reservations() {
                out.extend(reservation.instances().iter().filter_map(compute_from_instance));
            }
        }
        Ok(out)
    }

    async fn database_resources(&self) -> anyhow::Result<DatabasePage> {
        let output = self
            .rds
            .describe_db_instances()
            .send()
            .await
            .context("describing RDS instances")?;
        Ok(DatabasePage {
            databases: output
                .db_instances()
                .iter()
                .filter_map(database_from_instance)
                .collect(),
            truncated: output.marker().is_some_and(|m| !m.is_empty()),
        })
    }
}

/// Normalizes one EC2 instance. Instances without an id are skipped.
pub(crate) fn compute_from_instance(instance: &Instance) -> Option<ComputeResource> {
    let id = instance.instance_id()?;
    let name = instance
        .tags()
        .iter()
        .find(|t| t.key() == Some(NAME_TAG))
        .and_then(|t| t.value());
    let state = instance
        .state()
        .and_then(|s| s.name())
        .map(|n| n.as_str())
        .unwrap_or_default();
    let platform = Platform::classify(instance.platform().map(|p| p.as_str()));
    Some(ComputeResource::new(
        id,
        name,
        state,
        platform,
        instance.public_ip_address(),
        instance.private_ip_address(),
    ))
}

pub(crate) fn database_from_instance(db: &DbInstance) -> Option<DatabaseResource> {
    let id = db.db_instance_identifier()?;
    let mut resource = DatabaseResource::new(id, db.db_instance_status().unwrap_or_default());
    resource.engine = db.engine().map(str::to_string);
    resource.instance_class = db.db_instance_class().map(str::to_string);
    resource.endpoint = db
        .endpoint()
        .and_then(|e| e.address())
        .map(str::to_string);
    Some(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{InstanceState, InstanceStateName, PlatformValues, Tag};
    use aws_sdk_rds::types::Endpoint;

    fn instance(id: &str) -> aws_sdk_ec2::types::builders::InstanceBuilder {
        Instance::builder().instance_id(id)
    }

    #[test]
    fn compute_from_instance_reads_name_tag_and_addresses() {
        let i = instance("i-0abc")
            .tags(Tag::builder().key("env").value("prod").build())
            .tags(Tag::builder().key("Name").value("web-1").build())
            .state(
                InstanceState::builder()
                    .name(InstanceStateName::Running)
                    .build(),
            )
            .public_ip_address("13.0.0.1")
            .private_ip_address("10.0.0.1")
            .build();
        let r = compute_from_instance(&i).unwrap();
        assert_eq!(r.id, "i-0abc");
        assert_eq!(r.display_name, "web-1");
        assert_eq!(r.lifecycle_state, "RUNNING");
        assert!(r.is_running());
        assert_eq!(r.platform, Platform::Linux);
        assert_eq!(r.public_address, "13.0.0.1");
        assert_eq!(r.private_address, "10.0.0.1");
    }

    #[test]
    fn compute_from_instance_defaults_missing_fields_to_na() {
        let i = instance("i-0def")
            .state(
                InstanceState::builder()
                    .name(InstanceStateName::Stopped)
                    .build(),
            )
            .platform(PlatformValues::Windows)
            .build();
        let r = compute_from_instance(&i).unwrap();
        assert_eq!(r.display_name, "NA");
        assert_eq!(r.lifecycle_state, "STOPPED");
        assert!(!r.is_running());
        assert_eq!(r.platform, Platform::Windows);
        assert_eq!(r.public_address, "NA");
        assert_eq!(r.private_address, "NA");
    }

    #[test]
    fn compute_from_instance_without_id_is_skipped() {
        assert!(compute_from_instance(&Instance::builder().build()).is_none());
    }

    #[test]
    fn database_from_instance_passes_through_service_fields() {
        let db = DbInstance::builder()
            .db_instance_identifier("orders-db")
            .db_instance_status("available")
            .engine("postgres")
            .db_instance_class("db.t3.medium")
            .endpoint(Endpoint::builder().address("orders.abc.rds.amazonaws.com").build())
            .build();
        let r = database_from_instance(&db).unwrap();
        assert_eq!(r.id, "orders-db");
        assert_eq!(r.status, "AVAILABLE");
        assert!(r.is_available());
        assert_eq!(r.engine.as_deref(), Some("postgres"));
        assert_eq!(r.instance_class.as_deref(), Some("db.t3.medium"));
        assert_eq!(r.endpoint.as_deref(), Some("orders.abc.rds.amazonaws.com"));
    }
}
