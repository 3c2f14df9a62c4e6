//! Concurrent resolution of every pinned package in a manifest

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{DEFAULT_MAX_CONCURRENT, FETCH_TIMEOUT_MS};
use crate::parser::types::PackageSpec;
use crate::version::compare::Drift;
use crate::version::lookup::{LatestVersion, LookupResult, lookup};
use crate::version::registry::Registry;

/// Order in which resolved items are handed to the callback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrder {
    /// As soon as each lookup completes
    #[default]
    Arrival,
    /// In manifest order; early arrivals wait for the packages listed before them
    Manifest,
}

impl FromStr for ResultOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arrival" => Ok(ResultOrder::Arrival),
            "manifest" => Ok(ResultOrder::Manifest),
            _ => Err(format!(
                "Invalid order: {}. Please specify 'arrival' or 'manifest'",
                s
            )),
        }
    }
}

/// Tuning for a resolution run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum lookups in flight at once; `0` means one slot per package
    pub max_concurrent: usize,
    /// Deadline for each individual lookup
    pub timeout: Duration,
    pub order: ResultOrder,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: Duration::from_millis(FETCH_TIMEOUT_MS),
            order: ResultOrder::default(),
        }
    }
}

/// A classified lookup, as delivered to the reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub spec: PackageSpec,
    pub latest: LatestVersion,
    pub drift: Drift,
    /// Items delivered so far, this one included
    pub completed: usize,
    pub total: usize,
}

impl ResolvedItem {
    fn new(result: LookupResult, completed: usize, total: usize) -> Self {
        let drift = result.drift();
        Self {
            spec: result.spec,
            latest: result.latest,
            drift,
            completed,
            total,
        }
    }

    /// Fraction of the manifest resolved once this item is delivered
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Counts over a finished resolution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub total: usize,
    /// Major, Minor or Patch drift
    pub outdated: usize,
    /// Resolved without reportable drift
    pub up_to_date: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl ResolveSummary {
    fn record(&mut self, item: &ResolvedItem) {
        match item.latest {
            LatestVersion::Found(_) if item.drift.is_outdated() => self.outdated += 1,
            LatestVersion::Found(_) => self.up_to_date += 1,
            LatestVersion::NotFound => self.not_found += 1,
            LatestVersion::Failed(_) => self.failed += 1,
        }
    }
}

/// Resolve the latest version of every spec and report each one
///
/// Runs one lookup per spec, at most `options.max_concurrent` at a time, and
/// calls `on_result` exactly once per spec before returning. A failing lookup
/// is delivered as [`LatestVersion::Failed`] and does not stop the others.
/// Dropping the returned future cancels every lookup still in flight.
pub async fn resolve<F>(
    registry: &dyn Registry,
    specs: Vec<PackageSpec>,
    options: &ResolveOptions,
    mut on_result: F,
) -> ResolveSummary
where
    F: FnMut(ResolvedItem),
{
    let total = specs.len();
    let mut summary = ResolveSummary {
        total,
        ..Default::default()
    };

    if total == 0 {
        debug!("No packages to resolve");
        return summary;
    }

    let limit = match options.max_concurrent {
        0 => total,
        n => n.min(total),
    };
    info!("Resolving {} packages ({} concurrent lookups)", total, limit);

    let timeout = options.timeout;
    let mut lookups = stream::iter(specs.into_iter().enumerate())
        .map(|(index, spec)| async move { (index, lookup(registry, spec, timeout).await) })
        .buffer_unordered(limit);

    let mut completed = 0;
    let mut deliver = |result: LookupResult| {
        completed += 1;
        let item = ResolvedItem::new(result, completed, total);
        summary.record(&item);
        on_result(item);
    };

    // Out-of-order arrivals waiting for their turn in manifest order
    let mut waiting: BTreeMap<usize, LookupResult> = BTreeMap::new();
    let mut next_index = 0;

    while let Some((index, result)) = lookups.next().await {
        match options.order {
            ResultOrder::Arrival => deliver(result),
            ResultOrder::Manifest => {
                waiting.insert(index, result);
                while let Some(ready) = waiting.remove(&next_index) {
                    next_index += 1;
                    deliver(ready);
                }
            }
        }
    }

    info!(
        "Resolved {} packages: {} outdated, {} not found, {} failed",
        summary.total, summary.outdated, summary.not_found, summary.failed
    );

    summary
}
