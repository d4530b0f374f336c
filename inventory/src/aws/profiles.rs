use anyhow::{Context, Result};
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_types::os_shim_internal::{Env, Fs};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Replaces a leading `~` with the home directory.
///
/// aws-config only does this for its own default paths, not for files
/// handed to it explicitly.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}

pub fn credentials_path(credentials_file: &str) -> PathBuf {
    expand_home(credentials_file, dirs::home_dir().as_deref())
}

/// Only the given credentials file, used for listing profiles.
fn credentials_file_only(credentials_file: &Path) -> EnvConfigFiles {
    EnvConfigFiles::builder()
        .with_file(EnvConfigFileKind::Credentials, credentials_file)
        .build()
}

/// The given credentials file plus the default config file, so that
/// per-profile settings like `role_arn` still apply to sessions.
pub(super) fn session_profile_files(credentials_file: &Path) -> EnvConfigFiles {
    EnvConfigFiles::builder()
        .include_default_config_file(true)
        .with_file(EnvConfigFileKind::Credentials, credentials_file)
        .build()
}

/// Names of all profiles in the credentials file, sorted.
///
/// A missing file yields no profiles; a malformed one is an error.
pub async fn load_profile_names(credentials_file: &Path) -> Result<Vec<String>> {
    if !credentials_file.exists() {
        warn!(
            "Credentials file {} does not exist, no accounts to visit",
            credentials_file.display()
        );
        return Ok(Vec::new());
    }

    let profile_set = aws_config::profile::load(
        &Fs::real(),
        &Env::real(),
        &credentials_file_only(credentials_file),
        None,
    )
    .await
    .with_context(|| {
        format!(
            "Failed loading credentials file {}",
            credentials_file.display()
        )
    })?;

    let mut names: Vec<String> = profile_set.profiles().map(ToOwned::to_owned).collect();
    names.sort();
    Ok(names)
}
