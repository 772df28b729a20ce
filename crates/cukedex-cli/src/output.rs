//! Report destinations.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use cukedex::reporting::{OutputFormat, Report, View, write_report};
use eyre::{Context, Result, eyre};

/// A report file and the format inferred from its extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct OutputTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

/// Join each path onto `home` and infer its format.
///
/// Absolute paths ignore `home`.
pub(crate) fn resolve_targets(
    paths: &[PathBuf],
    home: Option<&Path>,
) -> Result<Vec<OutputTarget>> {
    paths
        .iter()
        .map(|path| {
            let path = home.map_or_else(|| path.clone(), |home| home.join(path));
            let format = OutputFormat::from_extension(&path).ok_or_else(|| {
                eyre!(
                    "cannot infer report format for {}; use a .txt, .json or .xml extension",
                    path.display()
                )
            })?;
            Ok(OutputTarget { path, format })
        })
        .collect()
}

/// Write the report to every target, or as text to stdout when there are
/// none. Missing parent directories are created.
pub(crate) fn write_reports(
    targets: &[OutputTarget],
    view: View,
    report: Report<'_>,
) -> Result<()> {
    if targets.is_empty() {
        let mut stdout = io::stdout().lock();
        return write_report(&mut stdout, OutputFormat::Text, view, report)
            .wrap_err("failed to write report to stdout");
    }
    for target in targets {
        if let Some(parent) = target.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create directory {}", parent.display()))?;
        }
        let file = File::create(&target.path)
            .wrap_err_with(|| format!("failed to create report {}", target.path.display()))?;
        write_report(&mut BufWriter::new(file), target.format, view, report)
            .wrap_err_with(|| format!("failed to write report {}", target.path.display()))?;
        tracing::info!(
            path = %target.path.display(),
            format = target.format.label(),
            "report written"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cukedex::{TagFilter, parse_feature_source};
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(None, "out/index.json", "out/index.json", OutputFormat::Json)]
    #[case(Some("target"), "index.txt", "target/index.txt", OutputFormat::Text)]
    #[case(Some("target"), "/tmp/index.xml", "/tmp/index.xml", OutputFormat::Xml)]
    fn resolves_against_home(
        #[case] home: Option<&str>,
        #[case] path: &str,
        #[case] expected: &str,
        #[case] format: OutputFormat,
    ) {
        let targets = resolve_targets(&[PathBuf::from(path)], home.map(Path::new))
            .unwrap_or_else(|err| panic!("targets should resolve: {err:?}"));
        assert_eq!(
            targets,
            [OutputTarget {
                path: PathBuf::from(expected),
                format,
            }]
        );
    }

    #[test]
    fn rejects_unknown_extensions() {
        let Err(err) = resolve_targets(&[PathBuf::from("index.html")], None) else {
            panic!("html output should be rejected");
        };
        assert!(err.to_string().contains("index.html"));
    }

    #[test]
    fn writes_each_target_creating_directories() {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
        let targets = resolve_targets(
            &[PathBuf::from("nested/deep/index.txt"), PathBuf::from("index.xml")],
            Some(dir.path()),
        )
        .unwrap_or_else(|err| panic!("targets should resolve: {err:?}"));
        let feature =
            parse_feature_source("Feature: f\n  Scenario: s\n", None, &TagFilter::unfiltered())
                .unwrap_or_else(|err| panic!("feature should parse: {err}"));
        let report = Report {
            features: std::slice::from_ref(&feature),
            failures: &[],
        };
        write_reports(&targets, View::Feature, report)
            .unwrap_or_else(|err| panic!("reports should be written: {err:?}"));

        let text = fs::read_to_string(dir.path().join("nested/deep/index.txt"))
            .unwrap_or_else(|err| panic!("text report: {err}"));
        assert_eq!(text, "Feature: f\n  Scenario: s\n");
        let xml = fs::read_to_string(dir.path().join("index.xml"))
            .unwrap_or_else(|err| panic!("xml report: {err}"));
        assert!(xml.contains("<scenario name=\"Scenario: s\" />"));
    }
}
