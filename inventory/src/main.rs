mod config;
mod logging;

use crate::config::Config;
use anyhow::Result;
use aws_inventory::aws::{credentials_path, load_profile_names, AwsRegions, AwsSessions};
use aws_inventory::enumerate::{self, eligible_accounts};
use aws_inventory::inventory::{collect_accounts, collect_cluster_pods};
use aws_inventory::k8s::KubeContexts;
use aws_inventory::Report;
use clap::Parser;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config)?;

    let output_path = config.output_path();
    let mut report = Report::create(&output_path)?;

    let credentials_file = credentials_path(config.credentials_file());
    let accounts = eligible_accounts(load_profile_names(&credentials_file).await?);
    info!(
        "Found {} accounts in {}",
        accounts.len(),
        credentials_file.display()
    );

    let (plan, faults) = enumerate::plan(accounts, config.regions(), |account| {
        AwsRegions::new(&credentials_file, account, config.bootstrap_region())
    })
    .await;
    for _ in &faults {
        report.note_fault();
    }

    let sessions = AwsSessions::new(&credentials_file);
    collect_accounts(&plan, &sessions, &mut report).await?;

    if config.skip_pods() {
        info!("Skipping Kubernetes pods");
    } else {
        collect_cluster_pods(&KubeContexts::new(config.kubeconfig()), &mut report).await?;
    }

    let (totals, _) = report.finish()?;

    info!("Total Instances: {}", totals.instances);
    info!("Total nodes: {}", totals.nodes);
    info!("Total pods: {}", totals.pods);
    if totals.faults > 0 {
        warn!("Faults: {} (see errors above)", totals.faults);
    }
    info!("Output file: {}", output_path.display());
    info!("Log file: {}", config.log_file().display());

    Ok(())
}
