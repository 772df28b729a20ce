//! Option files and precedence between option sources.
//!
//! Each setting is taken from the first source that provides it: command
//! line flags, then the YAML file named by `--config`, then `CUKEDEX_*`
//! environment variables, then built-in defaults. Tag filters are replaced
//! as a whole: any filtering flag on the command line discards the file's
//! filter.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use cukedex::reporting::View;
use cukedex::{
    DEFAULT_ROOT, LogLevel, OneOrMany, RunConfig, TagFilter, TagFilterConfig, TagSet,
    root_marker,
};
use eyre::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::output::{OutputTarget, resolve_targets};

/// Options read from a YAML file.
///
/// ```yaml
/// input: features
/// tags: ["~@wip", "@fast,@smoke"]
/// filter:
///   none: "@manual"
/// output: [reports/index.json, reports/index.txt]
/// output_home: target
/// view: tag
/// sort: true
/// strict: true
/// jobs: 4
/// log_level: info
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileOptions {
    pub input: Option<String>,
    #[serde(default)]
    pub tags: Option<OneOrMany>,
    #[serde(default)]
    pub filter: Option<TagFilterConfig>,
    #[serde(default)]
    pub output: Option<OneOrMany>,
    pub output_home: Option<PathBuf>,
    pub view: Option<View>,
    pub sort: Option<bool>,
    pub strict: Option<bool>,
    pub jobs: Option<usize>,
    pub root: Option<String>,
    pub log_level: Option<LogLevel>,
}

/// Read an option file; an empty file yields the defaults.
pub(crate) fn load_file(path: &Path) -> Result<FileOptions> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read option file {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(FileOptions::default());
    }
    serde_yaml::from_str(&text)
        .wrap_err_with(|| format!("invalid option file {}", path.display()))
}

/// Settings for one run after every source has been applied.
#[derive(Debug)]
pub(crate) struct ResolvedOptions {
    pub input: String,
    pub filter: TagFilter,
    pub outputs: Vec<OutputTarget>,
    pub view: View,
    pub sort: bool,
    pub run: RunConfig,
    pub dry_run: bool,
}

impl ResolvedOptions {
    pub(crate) fn resolve(cli: &Cli, file: FileOptions, env: RunConfig) -> Result<Self> {
        let filter = if cli.has_filter() {
            TagFilter::from_expressions(&cli.tags)
                .wrap_err("invalid --tags expression")?
                .with_any(&cli.any)
                .with_all(&cli.all)
                .with_none(&cli.none)
        } else {
            let expressions = file.tags.map(OneOrMany::into_vec).unwrap_or_default();
            TagFilter::from_expressions(expressions)
                .wrap_err("invalid `tags` entry in option file")?
                .merged(&TagFilter::from(file.filter.unwrap_or_default()))
        };
        let run = env
            .apply_overrides(file.log_level, file.strict, file.jobs, file.root)
            .apply_overrides(
                cli.log_level,
                cli.strict.then_some(true),
                cli.jobs,
                cli.root.clone(),
            );
        let outputs: Vec<PathBuf> = if cli.output.is_empty() {
            file.output
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .map(PathBuf::from)
                .collect()
        } else {
            cli.output.clone()
        };
        let output_home = cli.output_home.clone().or(file.output_home);
        Ok(Self {
            input: cli
                .input
                .clone()
                .or(file.input)
                .unwrap_or_else(|| DEFAULT_ROOT.to_string()),
            filter,
            outputs: resolve_targets(&outputs, output_home.as_deref())?,
            view: cli.view.or(file.view).unwrap_or_default(),
            sort: cli.sort.then_some(true).or(file.sort).unwrap_or(false),
            run,
            dry_run: cli.dry_run,
        })
    }

    /// Root marker implied by the input when none was configured.
    pub(crate) fn derived_root(&self) -> String {
        root_marker(&self.input)
    }

    /// Write the resolved settings, one `key => value` line each.
    pub(crate) fn dump(&self, writer: &mut dyn Write) -> Result<()> {
        let root = self.run.batch_options(Some(&self.derived_root())).root;
        let outputs = if self.outputs.is_empty() {
            "stdout (text)".to_string()
        } else {
            self.outputs
                .iter()
                .map(|target| format!("{} ({})", target.path.display(), target.format.label()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let lines = [
            ("input", self.input.clone()),
            ("root", root),
            ("view", self.view.to_string()),
            ("sort", self.sort.to_string()),
            ("strict", self.run.strict.to_string()),
            ("jobs", self.run.jobs.to_string()),
            ("log_level", self.run.log_level.as_filter_str().to_string()),
            ("filter.any", joined(self.filter.any())),
            ("filter.all", joined(self.filter.all())),
            ("filter.none", joined(self.filter.none())),
            ("output", outputs),
        ];
        for (key, value) in lines {
            writeln!(writer, "{key:<11} => {value}")
                .wrap_err_with(|| format!("failed to write option {key}"))?;
        }
        Ok(())
    }
}

fn joined(tags: &TagSet) -> String {
    tags.iter().collect::<Vec<_>>().join(" ")
}
