//! Registry trait for fetching package versions from a remote index

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::PackageVersions;

/// Trait for fetching package versions from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches all published versions for a package
    ///
    /// Issues exactly one outbound request; no retries and no caching.
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "requests")
    ///
    /// # Returns
    /// * `Ok(PackageVersions)` - Every published version, unordered
    /// * `Err(RegistryError::NotFound)` - The registry has no such package
    /// * `Err(RegistryError)` - Any other failure
    async fn fetch_all_versions(
        &self,
        package_name: &str,
    ) -> Result<PackageVersions, RegistryError>;
}
