use super::session::AwsSession;
use crate::sources::ComputeApi;
use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

#[async_trait]
impl ComputeApi for AwsSession {
    async fn instance_ids(&self) -> Result<Vec<String>> {
        let mut pages = self.ec2.describe_instances().into_paginator().send();
        let mut instance_ids = Vec::new();

        while let Some(page) = pages.next().await {
            for reservation in page?.reservations.unwrap_or_default() {
                for instance in reservation.instances.unwrap_or_default() {
                    match instance.instance_id {
                        Some(instance_id) => instance_ids.push(instance_id),
                        None => warn!(
                            "Skipping instance without an id in reservation {:?}",
                            reservation.reservation_id
                        ),
                    }
                }
            }
        }

        Ok(instance_ids)
    }
}
