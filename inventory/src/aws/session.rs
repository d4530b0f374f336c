use super::profiles::session_profile_files;
use crate::enumerate::Unit;
use crate::sources::{RegionSource, SessionFactory};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_types::region::Region;
use std::path::{Path, PathBuf};
use tracing::debug;

async fn load_shared_config(credentials_file: &Path, profile: &str, region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .profile_files(session_profile_files(credentials_file))
        .profile_name(profile)
        .region(Region::new(region.to_owned()))
        .load()
        .await
}

/// EC2 and EKS clients sharing one profile and region.
pub struct AwsSession {
    pub(super) ec2: aws_sdk_ec2::Client,
    pub(super) eks: aws_sdk_eks::Client,
}

impl AwsSession {
    pub fn new(shared_config: &SdkConfig) -> Self {
        Self {
            ec2: aws_sdk_ec2::Client::new(shared_config),
            eks: aws_sdk_eks::Client::new(shared_config),
        }
    }
}

pub struct AwsSessions {
    credentials_file: PathBuf,
}

impl AwsSessions {
    pub fn new(credentials_file: impl Into<PathBuf>) -> Self {
        Self {
            credentials_file: credentials_file.into(),
        }
    }
}

#[async_trait]
impl SessionFactory for AwsSessions {
    type Session = AwsSession;

    #[tracing::instrument(skip_all, fields(account = %unit.account, region = %unit.region))]
    async fn session(&self, unit: &Unit) -> AwsSession {
        debug!("loading shared config");
        let shared_config =
            load_shared_config(&self.credentials_file, &unit.account, &unit.region).await;
        AwsSession::new(&shared_config)
    }
}

/// Lists EC2 regions through one account, including the ones that
/// are not enabled for it.
pub struct AwsRegions {
    credentials_file: PathBuf,
    account: String,
    bootstrap_region: String,
}

impl AwsRegions {
    pub fn new(
        credentials_file: impl Into<PathBuf>,
        account: impl Into<String>,
        bootstrap_region: impl Into<String>,
    ) -> Self {
        Self {
            credentials_file: credentials_file.into(),
            account: account.into(),
            bootstrap_region: bootstrap_region.into(),
        }
    }
}

#[async_trait]
impl RegionSource for AwsRegions {
    #[tracing::instrument(skip(self), fields(account = %self.account))]
    async fn regions(&self) -> Result<Vec<String>> {
        debug!("discovering regions...");
        let shared_config =
            load_shared_config(&self.credentials_file, &self.account, &self.bootstrap_region)
                .await;
        let ec2 = aws_sdk_ec2::Client::new(&shared_config);

        Ok(ec2
            .describe_regions()
            .all_regions(true)
            .send()
            .await?
            .regions
            .ok_or_else(|| anyhow!("Got an empty region list"))?
            .into_iter()
            .filter_map(|ec2_region| ec2_region.region_name)
            .collect())
    }
}
