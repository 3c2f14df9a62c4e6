//! Rendering of resolved items

use std::io::Write;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::check::coordinator::{ResolveSummary, ResolvedItem};
use crate::version::compare::{Drift, DriftKind};
use crate::version::lookup::LatestVersion;

/// Receives every resolved item, then the final summary
pub trait Reporter {
    fn on_result(&mut self, item: &ResolvedItem);

    fn finish(&mut self, summary: &ResolveSummary);
}

/// Decides which drifts are worth printing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Only report drift in the major component
    pub major_only: bool,
}

impl ReportFilter {
    pub fn should_report(&self, drift: &Drift) -> bool {
        if self.major_only {
            drift.kind == DriftKind::Major
        } else {
            drift.is_outdated()
        }
    }
}

/// Terminal reporter
///
/// Outdated packages go to `out`, one line each. Missing packages, failed
/// lookups, the progress bar and the final summary go to `err`, so `out`
/// stays usable in pipelines.
pub struct ConsoleReporter<W: Write, E: Write> {
    out: W,
    err: E,
    filter: ReportFilter,
    color: bool,
    progress: ProgressBar,
    reported: usize,
}

impl<W: Write, E: Write> ConsoleReporter<W, E> {
    pub fn new(out: W, err: E, filter: ReportFilter) -> Self {
        Self {
            out,
            err,
            filter,
            color: false,
            progress: ProgressBar::hidden(),
            reported: 0,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Show a progress bar on stderr while lookups are running
    pub fn with_progress(mut self, enabled: bool) -> Self {
        if enabled {
            let progress = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} - {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            self.progress = progress;
        }
        self
    }

    /// Number of outdated packages printed so far
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Clear the progress bar when the run stops before `finish`
    pub fn cancel(&mut self) {
        self.progress.finish_and_clear();
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn tag(&self, kind: DriftKind) -> String {
        let tag = format!("({})", kind.as_str());
        if !self.color {
            return tag;
        }
        match kind {
            DriftKind::Major => tag.red().to_string(),
            DriftKind::Minor => tag.yellow().to_string(),
            DriftKind::Patch => tag.cyan().to_string(),
            DriftKind::None | DriftKind::Unknown => tag,
        }
    }

    fn print_drift(&mut self, item: &ResolvedItem, latest: &str) {
        let line = format!(
            "{} {}: {} -> {}",
            self.tag(item.drift.kind),
            item.spec.name,
            item.spec.pinned_version,
            latest
        );
        let out = &mut self.out;
        self.progress.suspend(|| {
            let _ = writeln!(out, "{}", line)
                .inspect_err(|e| debug!("Failed to write report line: {}", e));
        });
    }

    fn print_notice(&mut self, message: String) {
        let message = if self.color {
            message.dimmed().to_string()
        } else {
            message
        };
        let err = &mut self.err;
        self.progress.suspend(|| {
            let _ = writeln!(err, "{}", message)
                .inspect_err(|e| debug!("Failed to write notice: {}", e));
        });
    }
}

impl<W: Write, E: Write> Reporter for ConsoleReporter<W, E> {
    fn on_result(&mut self, item: &ResolvedItem) {
        self.progress.set_length(item.total as u64);
        self.progress.set_position(item.completed as u64);
        self.progress.set_message(item.spec.name.clone());

        match &item.latest {
            LatestVersion::Found(latest) => {
                if self.filter.should_report(&item.drift) {
                    self.reported += 1;
                    self.print_drift(item, latest);
                }
            }
            LatestVersion::NotFound => self.print_notice(format!(
                "{}: not found in registry (removed or renamed?)",
                item.spec.name
            )),
            LatestVersion::Failed(cause) => {
                self.print_notice(format!("{}: lookup failed: {}", item.spec.name, cause))
            }
        }
    }

    fn finish(&mut self, summary: &ResolveSummary) {
        self.progress.finish_and_clear();

        let mut line = format!(
            "{} of {} packages outdated",
            summary.outdated, summary.total
        );
        if summary.not_found > 0 {
            line.push_str(&format!(", {} not found", summary.not_found));
        }
        if summary.failed > 0 {
            line.push_str(&format!(", {} failed", summary.failed));
        }

        let _ = writeln!(self.err, "{}", line)
            .inspect_err(|e| debug!("Failed to write summary: {}", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::PackageSpec;
    use crate::version::compare::compare;
    use rstest::rstest;

    fn found(name: &str, pinned: &str, latest: &str) -> ResolvedItem {
        ResolvedItem {
            spec: PackageSpec::new(name, pinned),
            latest: LatestVersion::Found(latest.to_string()),
            drift: compare(pinned, latest),
            completed: 1,
            total: 1,
        }
    }

    fn unresolved(name: &str, latest: LatestVersion) -> ResolvedItem {
        ResolvedItem {
            spec: PackageSpec::new(name, "1.0.0"),
            latest,
            drift: Drift::unknown(),
            completed: 1,
            total: 1,
        }
    }

    fn render(filter: ReportFilter, items: &[ResolvedItem]) -> (String, String, usize) {
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new(), filter);
        for item in items {
            reporter.on_result(item);
        }
        let reported = reporter.reported();
        let (out, err) = reporter.into_inner();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            reported,
        )
    }

    #[rstest]
    #[case(DriftKind::Major, false, true)]
    #[case(DriftKind::Minor, false, true)]
    #[case(DriftKind::Patch, false, true)]
    #[case(DriftKind::None, false, false)]
    #[case(DriftKind::Unknown, false, false)]
    #[case(DriftKind::Major, true, true)]
    #[case(DriftKind::Minor, true, false)]
    #[case(DriftKind::Patch, true, false)]
    fn should_report_respects_major_only(
        #[case] kind: DriftKind,
        #[case] major_only: bool,
        #[case] expected: bool,
    ) {
        let filter = ReportFilter { major_only };
        let drift = Drift {
            kind,
            differing_index: None,
        };
        assert_eq!(filter.should_report(&drift), expected);
    }

    #[test]
    fn on_result_prints_outdated_packages() {
        let items = [
            found("django", "4.2.7", "5.0.1"),
            found("requests", "2.28.0", "2.31.0"),
            found("urllib3", "2.1.0", "2.1.1"),
            found("numpy", "1.26.2", "1.26.2"),
        ];

        let (out, err, reported) = render(ReportFilter::default(), &items);

        assert_eq!(
            out,
            "(Major) django: 4.2.7 -> 5.0.1\n\
             (Minor) requests: 2.28.0 -> 2.31.0\n\
             (Patch) urllib3: 2.1.0 -> 2.1.1\n"
        );
        assert!(err.is_empty());
        assert_eq!(reported, 3);
    }

    #[test]
    fn on_result_in_major_only_mode_skips_minor_drift() {
        let items = [
            found("django", "4.2.7", "5.0.1"),
            found("requests", "2.28.0", "2.31.0"),
        ];

        let (out, _, reported) = render(ReportFilter { major_only: true }, &items);

        assert_eq!(out, "(Major) django: 4.2.7 -> 5.0.1\n");
        assert_eq!(reported, 1);
    }

    #[test]
    fn on_result_sends_missing_and_failed_packages_to_err() {
        let items = [
            unresolved("foo", LatestVersion::NotFound),
            unresolved("bar", LatestVersion::Failed("Timed out after 30s".to_string())),
        ];

        let (out, err, reported) = render(ReportFilter::default(), &items);

        assert!(out.is_empty());
        assert_eq!(
            err,
            "foo: not found in registry (removed or renamed?)\n\
             bar: lookup failed: Timed out after 30s\n"
        );
        assert_eq!(reported, 0);
    }

    #[test]
    fn on_result_with_color_wraps_tag_in_ansi_codes() {
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new(), ReportFilter::default())
            .with_color(true);
        reporter.on_result(&found("django", "4.2.7", "5.0.1"));

        let (out, _) = reporter.into_inner();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("\u{1b}["));
        assert!(out.contains("(Major)"));
        assert!(out.ends_with("django: 4.2.7 -> 5.0.1\n"));
    }

    #[test]
    fn cancel_clears_running_progress_bar() {
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new(), ReportFilter::default())
            .with_progress(true);
        let mut item = found("django", "4.2.7", "5.0.1");
        item.total = 3;
        reporter.on_result(&item);
        assert!(!reporter.progress.is_finished());

        reporter.cancel();

        assert!(reporter.progress.is_finished());
        let (out, err) = reporter.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "(Major) django: 4.2.7 -> 5.0.1\n");
        assert!(err.is_empty());
    }

    #[rstest]
    #[case(ResolveSummary { total: 5, outdated: 2, up_to_date: 3, not_found: 0, failed: 0 }, "2 of 5 packages outdated\n")]
    #[case(ResolveSummary { total: 5, outdated: 1, up_to_date: 1, not_found: 2, failed: 1 }, "1 of 5 packages outdated, 2 not found, 1 failed\n")]
    fn finish_prints_summary(#[case] summary: ResolveSummary, #[case] expected: &str) {
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new(), ReportFilter::default());
        reporter.finish(&summary);

        let (out, err) = reporter.into_inner();

        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), expected);
    }
}
