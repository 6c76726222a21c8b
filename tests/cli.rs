use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;
use url::Url;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("readme-flip").unwrap();
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn fixtures() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[cfg(feature = "markdown")]
#[test]
fn print_renders_template_page_as_html() {
    cmd()
        .args(["--print", "--url", "tests/fixtures/page{i}", "--index", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Page two</h1>"))
        .stdout(predicate::str::contains("<li>alpha</li>"));
}

#[test]
fn print_raw_writes_markdown_source() {
    cmd()
        .args(["--print", "--raw", "--baseurl", "tests/fixtures/page", "--index", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Page one"));
}

#[test]
fn print_reports_missing_page() {
    cmd()
        .args(["--print", "--url", "tests/fixtures/page{i}.md", "--index", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load README"))
        .stderr(predicate::str::contains("page9.md"));
}

#[test]
fn strict_mode_rejects_missing_source() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("readme-flip")
        .unwrap()
        .current_dir(dir.path())
        .args(["--print", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn print_warns_when_using_fallback() {
    let dir = tempdir().unwrap();
    // Route the fallback request to a dead proxy so nothing leaves the host.
    Command::cargo_bin("readme-flip")
        .unwrap()
        .current_dir(dir.path())
        .env("HTTPS_PROXY", "http://127.0.0.1:9")
        .env("https_proxy", "http://127.0.0.1:9")
        .env_remove("NO_PROXY")
        .env_remove("no_proxy")
        .env_remove("RUST_LOG")
        .args(["--print", "--raw"])
        .assert()
        .stderr(predicate::str::contains("using fallback"));
}

#[test]
fn config_file_origin_resolves_relative_template() {
    let dir = tempdir().unwrap();
    let origin = Url::from_directory_path(fixtures()).unwrap();
    let config = format!("[source]\nurl = \"page{{i}}.md\"\nindex = 1\norigin = \"{origin}\"\n");
    std::fs::write(dir.path().join("readme-flip.toml"), config).unwrap();

    Command::cargo_bin("readme-flip")
        .unwrap()
        .current_dir(dir.path())
        .args(["--print", "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The first page of the fixture set."));
}

#[test]
fn raw_requires_print() {
    cmd().arg("--raw").assert().failure();
}
