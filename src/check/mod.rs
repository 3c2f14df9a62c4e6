//! Drift check for a whole manifest
//!
//! # Modules
//!
//! - [`coordinator`]: Fans out one lookup per package and collects the results
//! - [`reporter`]: Filters and renders resolved items

pub mod coordinator;
pub mod reporter;

pub use coordinator::{ResolveOptions, ResolveSummary, ResolvedItem, ResultOrder, resolve};
pub use reporter::{ConsoleReporter, ReportFilter, Reporter};

use crate::parser::types::PackageSpec;
use crate::version::registry::Registry;

/// Resolve every spec, streaming each item to `reporter`, then report the summary
pub async fn run<R: Reporter>(
    registry: &dyn Registry,
    specs: Vec<PackageSpec>,
    options: &ResolveOptions,
    reporter: &mut R,
) -> ResolveSummary {
    let summary = resolve(registry, specs, options, |item| reporter.on_result(&item)).await;
    reporter.finish(&summary);
    summary
}
