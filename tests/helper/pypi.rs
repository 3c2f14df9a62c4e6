//! PyPI mock server utilities

use mockito::{Mock, ServerGuard};
use serde_json::{Map, Value, json};

use pin_drift::check::{self, ConsoleReporter, ReportFilter, ResolveOptions, ResolveSummary};
use pin_drift::parser::{Parser, RequirementsTxtParser};
use pin_drift::version::registries::PypiRegistry;

/// Base URL of the mock registry, in the same shape as the public one
pub fn pypi_base_url(server: &ServerGuard) -> String {
    format!("{}/pypi/", server.url())
}

/// Serve a package whose releases are `versions`
pub async fn mock_package(server: &mut ServerGuard, name: &str, versions: &[&str]) -> Mock {
    let releases: Map<String, Value> = versions
        .iter()
        .map(|v| (v.to_string(), json!([])))
        .collect();
    let body = json!({
        "info": { "name": name },
        "releases": releases,
    });

    server
        .mock("GET", format!("/pypi/{}/json", name).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Answer 404 for `name`
pub async fn mock_missing_package(server: &mut ServerGuard, name: &str) -> Mock {
    server
        .mock("GET", format!("/pypi/{}/json", name).as_str())
        .with_status(404)
        .create_async()
        .await
}

/// Run a full check of `manifest` against `base_url` and capture the output
pub async fn render(
    base_url: String,
    manifest: &str,
    filter: ReportFilter,
    options: &ResolveOptions,
) -> (String, String, ResolveSummary) {
    let specs = RequirementsTxtParser::new().parse(manifest).unwrap();
    let registry = PypiRegistry::new(base_url);
    let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new(), filter);

    let summary = check::run(&registry, specs, options, &mut reporter).await;

    let (out, err) = reporter.into_inner();
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
        summary,
    )
}
