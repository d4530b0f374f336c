use crate::error::CollectError;
use crate::sources::RegionSource;
use itertools::iproduct;
use std::fmt;
use tracing::{debug, error, warn};

pub const EXCLUDED_PROFILE: &str = "default";
pub const EXCLUDED_PROFILE_MARKER: &str = "netsec";

/// Regions that are either opt-in or not used at all.
pub const UNUSED_REGIONS: [&str; 12] = [
    "af-south-1",
    "ap-east-1",
    "ap-south-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-west-1",
    "eu-central-2",
    "eu-south-1",
    "eu-south-2",
    "il-central-1",
    "me-central-1",
    "me-south-1",
];

/// One (account, region) pair to collect from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Unit {
    pub account: String,
    pub region: String,
}

impl Unit {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.region)
    }
}

pub fn is_eligible_account(profile: &str) -> bool {
    profile != EXCLUDED_PROFILE && !profile.contains(EXCLUDED_PROFILE_MARKER)
}

pub fn is_used_region(region: &str) -> bool {
    !UNUSED_REGIONS.contains(&region)
}

pub fn eligible_accounts<I, S>(profiles: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    profiles
        .into_iter()
        .map(Into::into)
        .filter(|profile| {
            let eligible = is_eligible_account(profile);
            if !eligible {
                debug!("Skipping profile {}", profile);
            }
            eligible
        })
        .collect()
}

pub fn eligible_regions<I, S>(regions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    regions
        .into_iter()
        .map(Into::into)
        .filter(|region| is_used_region(region))
        .collect()
}

pub async fn discover_regions<R>(account: &str, source: &R) -> Result<Vec<String>, CollectError>
where
    R: RegionSource + ?Sized,
{
    let regions = source
        .regions()
        .await
        .map_err(|source| CollectError::Regions {
            account: account.to_owned(),
            source,
        })?;
    Ok(eligible_regions(regions))
}

/// Builds the plan for the eligible accounts.
///
/// Explicit regions skip discovery but still go through the deny-list.
/// Otherwise regions are discovered through each account in turn until
/// one of them succeeds; the faults of the failed attempts are returned.
pub async fn plan<F, R>(
    accounts: Vec<String>,
    explicit_regions: Option<&[String]>,
    region_source: F,
) -> (Plan, Vec<CollectError>)
where
    F: Fn(&str) -> R,
    R: RegionSource,
{
    let mut faults = Vec::new();
    let regions = match explicit_regions {
        Some(regions) => eligible_regions(regions.iter().cloned()),
        None => {
            let mut regions = Vec::new();
            for account in &accounts {
                match discover_regions(account, &region_source(account)).await {
                    Ok(discovered) => {
                        debug!("Discovered {} regions through {}", discovered.len(), account);
                        regions = discovered;
                        break;
                    }
                    Err(fault) => {
                        error!("{}", fault);
                        faults.push(fault);
                    }
                }
            }
            regions
        }
    };

    if regions.is_empty() && !accounts.is_empty() {
        warn!("No regions to visit, skipping EC2 and EKS");
    }

    (Plan { accounts, regions }, faults)
}

/// Accounts and regions to visit.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub accounts: Vec<String>,
    pub regions: Vec<String>,
}

impl Plan {
    /// Every account crossed with every region, account-major.
    pub fn units(&self) -> Vec<Unit> {
        iproduct!(&self.accounts, &self.regions)
            .map(|(account, region)| Unit::new(account, region))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct StaticRegions(Result<Vec<&'static str>, &'static str>);

    #[async_trait]
    impl RegionSource for StaticRegions {
        async fn regions(&self) -> Result<Vec<String>> {
            match &self.0 {
                Ok(regions) => Ok(regions.iter().map(|r| r.to_string()).collect()),
                Err(msg) => Err(anyhow!(*msg)),
            }
        }
    }

    #[test]
    fn skips_default_and_netsec_profiles() {
        assert_eq!(
            eligible_accounts(["default", "prod", "netsec-test", "dev", "prod-netsec"]),
            vec!["prod", "dev"]
        );
    }

    #[test]
    fn default_is_matched_exactly() {
        assert_eq!(
            eligible_accounts(["default-dev", "defaults"]),
            vec!["default-dev", "defaults"]
        );
    }

    #[test]
    fn no_profiles_no_accounts() {
        assert!(eligible_accounts(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn drops_exactly_the_unused_regions() {
        let mut all: Vec<&str> = vec!["us-east-1", "eu-west-1", "ap-northeast-1"];
        all.extend(UNUSED_REGIONS);
        all.push("us-west-2");

        assert_eq!(
            eligible_regions(all),
            vec!["us-east-1", "eu-west-1", "ap-northeast-1", "us-west-2"]
        );
    }

    #[test]
    fn unused_regions_never_survive() {
        for region in UNUSED_REGIONS {
            assert!(eligible_regions([region]).is_empty(), "{region}");
        }
    }

    #[test]
    fn one_surviving_profile_two_regions() {
        let plan = Plan {
            accounts: eligible_accounts(["default", "prod", "netsec-test"]),
            regions: eligible_regions(["us-east-1", "eu-west-1"]),
        };

        assert_eq!(
            plan.units(),
            vec![
                Unit::new("prod", "us-east-1"),
                Unit::new("prod", "eu-west-1"),
            ]
        );
    }

    #[test]
    fn units_are_account_major() {
        let plan = Plan {
            accounts: vec!["a".to_owned(), "b".to_owned()],
            regions: vec!["r1".to_owned(), "r2".to_owned()],
        };
        let units: Vec<String> = plan.units().iter().map(ToString::to_string).collect();
        assert_eq!(units, vec!["a/r1", "a/r2", "b/r1", "b/r2"]);
    }

    #[tokio::test]
    async fn discovered_regions_are_filtered() {
        let source = StaticRegions(Ok(vec!["us-east-1", "me-south-1", "eu-north-1"]));
        assert_eq!(
            discover_regions("prod", &source).await.unwrap(),
            vec!["us-east-1", "eu-north-1"]
        );
    }

    #[tokio::test]
    async fn region_fault_is_reported() {
        let source = StaticRegions(Err("UnauthorizedOperation"));
        let err = discover_regions("prod", &source).await.unwrap_err();
        assert!(matches!(err, CollectError::Regions { .. }));
        assert_eq!(
            err.to_string(),
            "Error enumerating regions through prod: UnauthorizedOperation"
        );
    }

    fn accounts(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn unreachable_source(_: &str) -> StaticRegions {
        panic!("regions should not be discovered")
    }

    #[tokio::test]
    async fn explicit_regions_go_through_deny_list() {
        let explicit = accounts(&["us-east-1", "af-south-1", "eu-west-1"]);

        let (plan, faults) =
            plan(accounts(&["prod"]), Some(&explicit), unreachable_source).await;

        assert_eq!(plan.regions, vec!["us-east-1", "eu-west-1"]);
        assert!(faults.is_empty());
    }

    #[tokio::test]
    async fn falls_back_to_the_next_account() {
        let (plan, faults) = plan(accounts(&["broken", "prod"]), None, |account| {
            if account == "broken" {
                StaticRegions(Err("AuthFailure"))
            } else {
                StaticRegions(Ok(vec!["us-east-1", "ap-east-1", "eu-west-1"]))
            }
        })
        .await;

        assert_eq!(plan.accounts, vec!["broken", "prod"]);
        assert_eq!(plan.regions, vec!["us-east-1", "eu-west-1"]);
        assert_eq!(faults.len(), 1);
        assert_eq!(
            faults[0].to_string(),
            "Error enumerating regions through broken: AuthFailure"
        );
    }

    #[tokio::test]
    async fn stops_at_the_first_account_that_answers() {
        let (plan, faults) = plan(accounts(&["prod", "dev"]), None, |account| {
            assert_eq!(account, "prod");
            StaticRegions(Ok(vec!["us-west-2"]))
        })
        .await;

        assert_eq!(plan.regions, vec!["us-west-2"]);
        assert!(faults.is_empty());
    }

    #[tokio::test]
    async fn no_region_when_every_account_fails() {
        let (plan, faults) = plan(accounts(&["a", "b"]), None, |_| {
            StaticRegions(Err("ExpiredToken"))
        })
        .await;

        assert!(plan.regions.is_empty());
        assert!(plan.units().is_empty());
        assert_eq!(faults.len(), 2);
    }

    #[tokio::test]
    async fn no_accounts_no_discovery() {
        let (plan, faults) = plan(Vec::new(), None, unreachable_source).await;

        assert!(plan.accounts.is_empty());
        assert!(plan.regions.is_empty());
        assert!(faults.is_empty());
    }
}
