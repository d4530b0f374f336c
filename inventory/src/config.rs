use chrono::{DateTime, Local};
use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Enumerate all EC2 instances, EKS nodes and Kubernetes pods in all
/// accounts of an AWS credentials file and write them to a CSV file.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// The credentials file to use
    #[clap(
        short = 'f',
        long = "file",
        env = "AWS_SHARED_CREDENTIALS_FILE",
        default_value = "~/.aws/credentials"
    )]
    credentials_file: String,

    /// The output file to write to [default: aws_inventory_<YYYYmmddHHMM>.csv]
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print verbose output
    #[clap(short, long)]
    verbose: bool,

    /// Log file, appended to on every run
    #[clap(long, default_value = "aws_inventory.log")]
    log_file: PathBuf,

    /// Kubeconfig to read contexts from, instead of $KUBECONFIG or ~/.kube/config
    #[clap(long)]
    kubeconfig: Option<PathBuf>,

    /// Only visit these regions instead of discovering them
    #[clap(long = "region")]
    regions: Vec<String>,

    /// Region used for discovering the other regions
    #[clap(long, default_value = "us-east-1")]
    bootstrap_region: String,

    /// Don't enumerate Kubernetes pods
    #[clap(long)]
    skip_pods: bool,
}

pub fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("aws_inventory_{}.csv", now.format("%Y%m%d%H%M")))
}

impl Config {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            true => LevelFilter::DEBUG,
            false => LevelFilter::INFO,
        }
    }

    pub fn credentials_file(&self) -> &str {
        &self.credentials_file
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(Local::now()))
    }

    pub fn log_file(&self) -> &PathBuf {
        &self.log_file
    }

    pub fn kubeconfig(&self) -> Option<PathBuf> {
        self.kubeconfig.clone()
    }

    /// Regions given on the command line, if any.
    pub fn regions(&self) -> Option<&[String]> {
        match self.regions.is_empty() {
            true => None,
            false => Some(&self.regions),
        }
    }

    pub fn bootstrap_region(&self) -> &str {
        &self.bootstrap_region
    }

    pub fn skip_pods(&self) -> bool {
        self.skip_pods
    }
}
