//! Argument parsing and command dispatch for the `cukedex` binary.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cukedex::reporting::{Report, View, sorted_by_name};
use cukedex::{LogLevel, RunConfig, collect_feature_files, parse_files, supported_locales};
use eyre::{Context, Result};

use crate::logging::init_logging;
use crate::options::{ResolvedOptions, load_file};
use crate::output::write_reports;

const CONFIG_FAILURE: u8 = 2;

/// Tag-filtered index of Gherkin feature files.
#[derive(Debug, Default, Parser)]
#[command(author, version, about)]
pub(crate) struct Cli {
    /// Feature directory, glob pattern or single file.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<String>,
    /// YAML option file; command line flags take precedence over it.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Report file; the format follows the extension (`.txt`, `.json` or
    /// `.xml`). May be repeated. Without it a text report goes to stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Vec<PathBuf>,
    /// Directory that relative report paths are resolved against.
    #[arg(long, value_name = "DIR")]
    pub output_home: Option<PathBuf>,
    /// Report layout: `feature` or `tag`.
    #[arg(long)]
    pub view: Option<View>,
    /// List features, scenarios and outlines by name instead of source order.
    #[arg(long)]
    pub sort: bool,
    /// Cucumber-style tag expression: `~@a,~@b` excludes, `@a,@b` requires
    /// one of, `@a` requires. May be repeated.
    #[arg(short, long, value_name = "EXPR")]
    pub tags: Vec<String>,
    /// Require at least one of these tags.
    #[arg(long, value_name = "TAG", value_delimiter = ',')]
    pub any: Vec<String>,
    /// Require every one of these tags.
    #[arg(long, value_name = "TAG", value_delimiter = ',')]
    pub all: Vec<String>,
    /// Reject constructs carrying any of these tags.
    #[arg(long, value_name = "TAG", value_delimiter = ',')]
    pub none: Vec<String>,
    /// Fail on the first file that cannot be parsed.
    #[arg(long)]
    pub strict: bool,
    /// Worker threads; `0` uses the available parallelism.
    #[arg(short, long)]
    pub jobs: Option<usize>,
    /// Directory marker that report paths are made relative to.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,
    /// Log verbosity on stderr.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
    /// Print the resolved options and exit without parsing anything.
    #[arg(long)]
    pub dry_run: bool,
    /// List the supported `# language:` codes and exit.
    #[arg(long)]
    pub list_locales: bool,
}

impl Cli {
    /// Whether any tag filtering flag was given.
    pub(crate) fn has_filter(&self) -> bool {
        !(self.tags.is_empty()
            && self.any.is_empty()
            && self.all.is_empty()
            && self.none.is_empty())
    }
}

pub(crate) fn run() -> ExitCode {
    let cli = Cli::parse();
    if cli.list_locales {
        return exit_with(list_locales(), ExitCode::FAILURE);
    }
    let options = match resolve(&cli) {
        Ok(options) => options,
        Err(err) => {
            report_error(&err);
            return ExitCode::from(CONFIG_FAILURE);
        }
    };
    init_logging(options.run.log_level);
    if options.dry_run {
        return exit_with(dump_options(&options), ExitCode::FAILURE);
    }
    exit_with(execute(&options), ExitCode::FAILURE)
}

fn exit_with(result: Result<()>, failure: ExitCode) -> ExitCode {
    result.map_or_else(
        |err| {
            report_error(&err);
            failure
        },
        |()| ExitCode::SUCCESS,
    )
}

fn report_error(err: &eyre::Report) {
    let _ = writeln!(io::stderr().lock(), "error: {err:?}");
}

fn resolve(cli: &Cli) -> Result<ResolvedOptions> {
    let env = RunConfig::from_env().wrap_err("invalid CUKEDEX_* environment variable")?;
    let file = cli
        .config
        .as_deref()
        .map(load_file)
        .transpose()?
        .unwrap_or_default();
    ResolvedOptions::resolve(cli, file, env)
}

fn execute(options: &ResolvedOptions) -> Result<()> {
    let files = collect_feature_files(&options.input)
        .wrap_err_with(|| format!("failed to collect feature files from {}", options.input))?;
    if files.is_empty() {
        tracing::warn!(input = %options.input, "no feature files found");
    }
    let batch = options.run.batch_options(Some(&options.derived_root()));
    let parsed = parse_files(&files, &options.filter, &batch).wrap_err("run aborted")?;
    let features = if options.sort {
        sorted_by_name(&parsed.features)
    } else {
        parsed.features
    };
    write_reports(
        &options.outputs,
        options.view,
        Report {
            features: &features,
            failures: &parsed.failures,
        },
    )
}

fn dump_options(options: &ResolvedOptions) -> Result<()> {
    let mut stdout = io::stdout();
    options.dump(&mut stdout)?;
    stdout.flush().wrap_err("failed to flush options to stdout")
}

fn list_locales() -> Result<()> {
    let mut stdout = io::stdout();
    for locale in supported_locales() {
        writeln!(stdout, "{}\t{}", locale.code(), locale.name())
            .wrap_err("failed to write locale list")?;
    }
    stdout.flush().wrap_err("failed to flush locale list to stdout")
}
