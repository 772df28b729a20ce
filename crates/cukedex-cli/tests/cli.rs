//! End-to-end tests for the `cukedex` binary.

use std::fs;
use std::path::Path;
use std::str;

use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const CART: &str = "@shop
Feature: cart
  Scenario: add item
  @wip
  Scenario: remove item
  Scenario Outline: bulk add
    Examples: sizes
      | size |
      | 2    |
      | 10   |
";

const BROKEN: &str = "Feature: first
  Scenario: one
Feature: second
";

#[fixture]
fn project() -> TempDir {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let features = dir.path().join("features/shop");
    fs::create_dir_all(&features).unwrap_or_else(|err| panic!("create features: {err}"));
    fs::write(features.join("cart.feature"), CART)
        .unwrap_or_else(|err| panic!("write feature: {err}"));
    dir
}

fn add_broken(dir: &Path) {
    fs::write(dir.join("features/broken.feature"), BROKEN)
        .unwrap_or_else(|err| panic!("write feature: {err}"));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
fn cukedex(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cukedex").expect("binary exists");
    cmd.current_dir(dir)
        .env_remove("CUKEDEX_LOG_LEVEL")
        .env_remove("CUKEDEX_MODE")
        .env_remove("CUKEDEX_JOBS")
        .env_remove("CUKEDEX_ROOT");
    cmd
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
fn stdout_of(output: &std::process::Output) -> &str {
    str::from_utf8(&output.stdout).expect("utf8 stdout")
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn writes_text_report_to_stdout(project: TempDir) {
    let output = cukedex(project.path()).output().expect("runs");
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "\
Feature: cart [@shop]
  Scenario: add item
  Scenario: remove item [@wip]
  Scenario Outline: bulk add
    Examples: sizes
      | size |
      | 2    |
      | 10   |
"
    );
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
#[case(&["--none", "@wip"])]
#[case(&["--tags", "~@wip"])]
fn excludes_tagged_scenarios(project: TempDir, #[case] args: &[&str]) {
    let output = cukedex(project.path()).args(args).output().expect("runs");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Scenario: add item"));
    assert!(!stdout.contains("remove item"));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn writes_json_report_under_output_home(project: TempDir) {
    let output = cukedex(project.path())
        .args(["--output", "reports/index.json", "--output-home", "target"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());
    let json = fs::read_to_string(project.path().join("target/reports/index.json"))
        .expect("json report written");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(
        value.pointer("/features/0/file_path"),
        Some(&"features/shop/cart.feature".into())
    );
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn reads_options_from_config_file(project: TempDir) {
    fs::write(
        project.path().join("cukedex.yml"),
        "view: tag\nfilter:\n  any: \"@wip\"\n",
    )
    .expect("write option file");
    let output = cukedex(project.path())
        .args(["--config", "cukedex.yml"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("@shop\n"));
    assert!(stdout.contains(
        "@wip\n  Feature: cart (features/shop/cart.feature)\n    Scenario: remove item\n"
    ));
    assert!(!stdout.contains("add item"));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
#[case::flag(&["--sort"], None)]
#[case::option_file(&["--config", "cukedex.yml"], Some("sort: true\n"))]
fn sorts_reports_by_name(
    project: TempDir,
    #[case] args: &[&str],
    #[case] option_file: Option<&str>,
) {
    fs::write(
        project.path().join("features/account.feature"),
        "Feature: account\n  Scenario: sign up\n",
    )
    .expect("write feature");
    if let Some(yaml) = option_file {
        fs::write(project.path().join("cukedex.yml"), yaml).expect("write option file");
    }
    let output = cukedex(project.path()).args(args).output().expect("runs");
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "\
Feature: account
  Scenario: sign up
Feature: cart [@shop]
  Scenario Outline: bulk add
    Examples: sizes
      | size |
      | 2    |
      | 10   |
  Scenario: add item
  Scenario: remove item [@wip]
"
    );
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn lenient_run_skips_broken_files(project: TempDir) {
    add_broken(project.path());
    let output = cukedex(project.path()).output().expect("runs");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Feature: cart"));
    assert!(stdout.contains("failed: features/broken.feature:3: "));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn strict_run_fails_on_broken_file(project: TempDir) {
    add_broken(project.path());
    let output = cukedex(project.path()).arg("--strict").output().expect("runs");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).is_empty());
    let stderr = str::from_utf8(&output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("features/broken.feature"));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn strict_mode_can_come_from_environment(project: TempDir) {
    add_broken(project.path());
    let output = cukedex(project.path())
        .env("CUKEDEX_MODE", "test")
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
#[case::unknown_format(&["--output", "index.html"], None)]
#[case::bad_expression(&["--tags", "~@a,@b"], None)]
#[case::missing_config(&["--config", "absent.yml"], None)]
#[case::bad_environment(&[], Some(("CUKEDEX_JOBS", "many")))]
fn invalid_configuration_exits_with_two(
    project: TempDir,
    #[case] args: &[&str],
    #[case] env: Option<(&str, &str)>,
) {
    let mut cmd = cukedex(project.path());
    cmd.args(args);
    if let Some((key, value)) = env {
        cmd.env(key, value);
    }
    let output = cmd.output().expect("runs");
    assert_eq!(output.status.code(), Some(2));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn missing_input_fails_the_run(project: TempDir) {
    let output = cukedex(project.path())
        .args(["--input", "nowhere"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn dry_run_prints_options_without_parsing(project: TempDir) {
    add_broken(project.path());
    let output = cukedex(project.path())
        .args(["--dry-run", "--strict", "--input", "features/**/*.feature"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("input       => features/**/*.feature\n"));
    assert!(stdout.contains("root        => features\n"));
    assert!(stdout.contains("strict      => true\n"));
    assert!(!stdout.contains("Feature:"));
}

#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
#[rstest]
fn lists_locales(project: TempDir) {
    let output = cukedex(project.path())
        .arg("--list-locales")
        .output()
        .expect("runs");
    assert!(output.status.success());
    let codes: Vec<_> = stdout_of(&output)
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert!(codes.contains(&"en"));
    assert!(codes.contains(&"fr"));
}
