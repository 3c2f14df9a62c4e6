//! Latest-version lookup for a single pinned package

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::parser::types::PackageSpec;
use crate::version::compare::{Drift, compare, max_version};
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

/// Latest published version of a package, as far as the registry could tell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestVersion {
    /// Highest published version
    Found(String),
    /// The registry does not know the package (removed or renamed)
    NotFound,
    /// The lookup failed; carries the cause
    Failed(String),
}

impl fmt::Display for LatestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatestVersion::Found(version) => f.write_str(version),
            LatestVersion::NotFound => f.write_str("not found"),
            LatestVersion::Failed(cause) => write!(f, "failed: {}", cause),
        }
    }
}

/// Outcome of looking up one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub spec: PackageSpec,
    pub latest: LatestVersion,
}

impl LookupResult {
    /// Drift between the pinned version and the latest one
    ///
    /// `Unknown` when the latest version is not known.
    pub fn drift(&self) -> Drift {
        match &self.latest {
            LatestVersion::Found(latest) => compare(&self.spec.pinned_version, latest),
            LatestVersion::NotFound | LatestVersion::Failed(_) => Drift::unknown(),
        }
    }
}

/// Look up the latest version of `spec` with a deadline
///
/// Never fails: a missing package becomes [`LatestVersion::NotFound`] and
/// every other error becomes [`LatestVersion::Failed`].
pub async fn lookup(
    registry: &dyn Registry,
    spec: PackageSpec,
    timeout: Duration,
) -> LookupResult {
    let fetched = tokio::time::timeout(timeout, registry.fetch_all_versions(&spec.name))
        .await
        .unwrap_or(Err(RegistryError::Timeout(timeout)));

    let latest = match fetched {
        Ok(pkg_versions) => {
            let latest = max_version(&pkg_versions.versions);
            debug!(
                "Latest version of {} is {} ({} releases)",
                spec.name,
                latest,
                pkg_versions.versions.len()
            );
            LatestVersion::Found(latest)
        }
        Err(RegistryError::NotFound(_)) => {
            debug!("Package not found in registry: {}", spec.name);
            LatestVersion::NotFound
        }
        Err(e) => {
            debug!("Failed to fetch versions for {}: {}", spec.name, e);
            LatestVersion::Failed(e.to_string())
        }
    };

    LookupResult { spec, latest }
}
