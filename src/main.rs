use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use tracing::warn;

use pin_drift::check::{self, ConsoleReporter, ReportFilter, ResolveSummary, ResultOrder};
use pin_drift::config::{CheckConfig, DEFAULT_MANIFEST_PATH, log_path};
use pin_drift::logging::init_logging;
use pin_drift::parser::{Parser, RequirementsTxtParser};
use pin_drift::version::registries::PypiRegistry;

/// Exit status when `--exit-code` is set and outdated packages were reported
const OUTDATED: u8 = 1;

/// Exit status when at least one lookup failed
const LOOKUP_FAILED: u8 = 2;

/// Exit status when interrupted with Ctrl-C
const INTERRUPTED: u8 = 130;

#[derive(clap::Parser)]
#[command(name = "pin-drift")]
#[command(version, about = "Report how far pinned requirements lag behind their latest release")]
struct Cli {
    /// Requirements file path
    #[arg(short, long, default_value = DEFAULT_MANIFEST_PATH)]
    file: PathBuf,

    /// Print major changes only
    #[arg(long)]
    major: bool,

    /// Registry base URL; packages are fetched from <URL><name>/json
    #[arg(long, value_name = "URL")]
    pypi: Option<String>,

    /// Maximum lookups in flight at once (0 = no limit)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Deadline for each lookup in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Output order: arrival or manifest
    #[arg(long)]
    order: Option<ResultOrder>,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a file (defaults to the data directory)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with status 1 when outdated packages are reported (failed lookups always exit 2)
    #[arg(long)]
    exit_code: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Configuration file values with command-line flags applied on top
    fn load_config(&self) -> anyhow::Result<CheckConfig> {
        let mut config = match &self.config {
            Some(path) => CheckConfig::load(path)?,
            None => CheckConfig::default(),
        };

        if let Some(url) = &self.pypi {
            config.registry.url = url.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.registry.max_concurrent = concurrency;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.registry.timeout_ms = timeout_ms;
        }
        if let Some(order) = self.order {
            config.report.order = order;
        }
        if self.major {
            config.report.major_only = true;
        }
        if let Some(log_file) = &self.log_file {
            config.log.file = Some(log_file.clone().unwrap_or_else(log_path));
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    let _guard = init_logging(&config.log, cli.verbose).context("Failed to open log file")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(&cli, config))
}

async fn run(cli: &Cli, config: CheckConfig) -> anyhow::Result<ExitCode> {
    let content = tokio::fs::read_to_string(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let specs = RequirementsTxtParser::new()
        .parse(&content)
        .with_context(|| format!("Failed to parse {}", cli.file.display()))?;

    let registry = PypiRegistry::new(config.registry.url.clone());
    let options = config.resolve_options();
    let filter = ReportFilter {
        major_only: config.report.major_only,
    };
    let color = !cli.no_color && io::stdout().is_terminal();
    let mut reporter = ConsoleReporter::new(io::stdout(), io::stderr(), filter)
        .with_color(color)
        .with_progress(io::stderr().is_terminal());

    let summary = tokio::select! {
        summary = check::run(&registry, specs, &options, &mut reporter) => Some(summary),
        _ = tokio::signal::ctrl_c() => None,
    };

    let Some(summary) = summary else {
        warn!("Interrupted; cancelling outstanding lookups");
        reporter.cancel();
        return Ok(ExitCode::from(INTERRUPTED));
    };

    Ok(ExitCode::from(exit_status(
        &summary,
        reporter.reported(),
        cli.exit_code,
    )))
}

fn exit_status(summary: &ResolveSummary, reported: usize, exit_code: bool) -> u8 {
    if summary.failed > 0 {
        LOOKUP_FAILED
    } else if exit_code && reported > 0 {
        OUTDATED
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_config(temp_dir: &TempDir) -> PathBuf {
        let path = temp_dir.path().join("pin-drift.json");
        let config = json!({
            "registry": {
                "url": "https://mirror.example.com/pypi/",
                "timeoutMs": 5000,
                "maxConcurrent": 4
            },
            "report": {
                "majorOnly": false,
                "order": "arrival"
            },
            "log": {
                "file": "/var/log/from-config.log"
            }
        });
        std::fs::write(&path, config.to_string()).unwrap();
        path
    }

    fn load(args: &[&str]) -> CheckConfig {
        let cli = Cli::try_parse_from(std::iter::once("pin-drift").chain(args.iter().copied()))
            .unwrap();
        cli.load_config().unwrap()
    }

    #[test]
    fn load_config_without_file_or_flags_uses_defaults() {
        assert_eq!(load(&[]), CheckConfig::default());
    }

    #[test]
    fn load_config_keeps_file_values_without_flags() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir);

        let config = load(&["--config", path.to_str().unwrap()]);

        assert_eq!(config.registry.url, "https://mirror.example.com/pypi/");
        assert_eq!(config.registry.timeout_ms, 5000);
        assert_eq!(config.registry.max_concurrent, 4);
        assert!(!config.report.major_only);
        assert_eq!(config.report.order, ResultOrder::Arrival);
        assert_eq!(
            config.log.file,
            Some(PathBuf::from("/var/log/from-config.log"))
        );
    }

    #[test]
    fn load_config_flags_override_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir);

        let config = load(&[
            "--config",
            path.to_str().unwrap(),
            "--pypi",
            "http://127.0.0.1:8080/pypi/",
            "--concurrency",
            "0",
            "--timeout-ms",
            "250",
            "--order",
            "manifest",
            "--major",
            "--log-file",
            "/tmp/from-flag.log",
        ]);

        assert_eq!(config.registry.url, "http://127.0.0.1:8080/pypi/");
        assert_eq!(config.registry.max_concurrent, 0);
        assert_eq!(config.registry.timeout_ms, 250);
        assert!(config.report.major_only);
        assert_eq!(config.report.order, ResultOrder::Manifest);
        assert_eq!(config.log.file, Some(PathBuf::from("/tmp/from-flag.log")));

        let options = config.resolve_options();
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.max_concurrent, 0);
    }

    #[test]
    fn load_config_log_file_without_value_uses_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir);

        let config = load(&["--config", path.to_str().unwrap(), "--log-file"]);

        assert_eq!(config.log.file, Some(log_path()));
    }

    #[test]
    fn load_config_reports_missing_config_file() {
        let cli = Cli::try_parse_from(["pin-drift", "--config", "/nonexistent/pin-drift.json"])
            .unwrap();

        assert!(cli.load_config().is_err());
    }

    #[test]
    fn cli_rejects_unknown_order() {
        assert!(Cli::try_parse_from(["pin-drift", "--order", "alphabetical"]).is_err());
    }

    fn summary(outdated: usize, failed: usize) -> ResolveSummary {
        ResolveSummary {
            total: outdated + failed + 1,
            outdated,
            up_to_date: 1,
            not_found: 0,
            failed,
        }
    }

    #[rstest]
    #[case(summary(0, 0), 0, false, 0)]
    #[case(summary(2, 0), 2, false, 0)]
    #[case(summary(2, 0), 2, true, OUTDATED)]
    #[case(summary(2, 0), 0, true, 0)]
    #[case(summary(0, 2), 0, false, LOOKUP_FAILED)]
    #[case(summary(1, 1), 1, true, LOOKUP_FAILED)]
    fn exit_status_reflects_drift_and_failures(
        #[case] summary: ResolveSummary,
        #[case] reported: usize,
        #[case] exit_code: bool,
        #[case] expected: u8,
    ) {
        assert_eq!(exit_status(&summary, reported, exit_code), expected);
    }

    #[test]
    fn exit_code_flag_is_parsed() {
        let cli = Cli::try_parse_from(["pin-drift", "--exit-code"]).unwrap();
        assert!(cli.exit_code);
    }
}
