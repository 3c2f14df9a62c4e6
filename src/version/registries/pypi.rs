//! PyPI registry client for fetching Python package versions

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::PackageVersions;

/// Public PyPI JSON API; package URLs are `<base><name>/json`
pub const DEFAULT_PYPI_URL: &str = "https://pypi.org/pypi/";

/// PyPI registry client
pub struct PypiRegistry {
    client: Client,
    base_url: String,
}

impl Default for PypiRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PYPI_URL.to_string())
    }
}

impl PypiRegistry {
    /// `base_url` is used verbatim, so it normally ends with `/`
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn package_url(&self, package_name: &str) -> String {
        format!("{}{}/json", self.base_url, package_name)
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    /// Keys are version strings; the per-release file lists are not needed
    releases: HashMap<String, IgnoredAny>,
}

#[async_trait]
impl Registry for PypiRegistry {
    async fn fetch_all_versions(
        &self,
        package_name: &str,
    ) -> Result<PackageVersions, RegistryError> {
        let url = self.package_url(package_name);
        debug!("Fetching PyPI package: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !response.status().is_success() {
            return Err(RegistryError::InvalidResponse(format!(
                "PyPI API returned status {}",
                response.status()
            )));
        }

        let pypi_response: PypiResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        let versions: Vec<String> = pypi_response.releases.into_keys().collect();

        debug!(
            "Found {} versions for package {}",
            versions.len(),
            package_name
        );

        Ok(PackageVersions::new(versions))
    }
}
