//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("excerpta")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn dump_cmd(dest: &TempDir) -> assert_cmd::Command {
    dump_cmd_with_article(dest, "tide.html")
}

fn dump_cmd_with_article(dest: &TempDir, article: &str) -> assert_cmd::Command {
    let mut cmd = cmd();
    cmd.args(["--data", &get_fixture_path("sync.json")])
        .args(["--dest-dir", dest.path().to_str().unwrap()])
        .args(["--article-html", &get_fixture_path(article)])
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_cli_requires_query() {
    let tmp = TempDir::new().unwrap();
    dump_cmd(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("a title or a URL is required"));
}

#[test]
fn test_cli_requires_data() {
    cmd().args(["--title", "My Article"]).assert().failure();
}

#[test]
fn test_cli_title_words_write_file() {
    let tmp = TempDir::new().unwrap();
    dump_cmd(&tmp)
        .args(["Field", "Notes", "on", "Tidal", "Pools"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    let content = std::fs::read_to_string(tmp.path().join("Field Notes on Tidal Pools.txt")).unwrap();
    assert_eq!(
        content,
        "Field Notes on Tidal Pools\nhttps://ex.com/tide\n\n\
         The pools refill twice a day\n\
         Hermit crabs trade shells in queues\n\
         Anemones close when the water leaves"
    );
}

#[test]
fn test_cli_stdout() {
    let tmp = TempDir::new().unwrap();
    dump_cmd(&tmp)
        .args(["--title", "field notes on tidal pools", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Field Notes on Tidal Pools\nhttps://ex.com/tide\n\nThe pools"));

    assert!(!tmp.path().join("Field Notes on Tidal Pools.txt").exists());
}

#[test]
fn test_cli_chronological_fallback() {
    let tmp = TempDir::new().unwrap();
    dump_cmd_with_article(&tmp, "empty_article.html")
        .args(["--title", "Field Notes on Tidal Pools", "--stdout"])
        .assert()
        .success()
        .stderr(predicate::str::contains("creation time"))
        .stdout(predicate::str::contains(
            "Anemones close when the water leaves\nHermit crabs trade shells in queues\nThe pools refill twice a day",
        ));
}

#[test]
fn test_cli_no_fallback_on_empty() {
    let tmp = TempDir::new().unwrap();
    dump_cmd_with_article(&tmp, "empty_article.html")
        .args(["--title", "Field Notes on Tidal Pools", "--no-fallback-on", "empty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("article text is empty"));
}

#[test]
fn test_cli_url_query() {
    let tmp = TempDir::new().unwrap();
    dump_cmd(&tmp)
        .args(["--url", "https://ex.com/tide"])
        .assert()
        .success();

    assert!(tmp.path().join("Field Notes on Tidal Pools.txt").exists());
}

#[test]
fn test_cli_url_beats_weak_title() {
    let tmp = TempDir::new().unwrap();
    dump_cmd(&tmp)
        .args(["--title", "something unrelated", "--url", "https://ex.com/tide", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Field Notes on Tidal Pools\n"));
}

#[test]
fn test_cli_list() {
    let tmp = TempDir::new().unwrap();
    dump_cmd(&tmp)
        .args(["--list", "-n", "2", "--title", "notes on tidal pool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[2]").and(predicate::str::contains("Field Notes on Tidal Pools")));
}

#[test]
fn test_cli_no_match_is_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("empty.json");
    std::fs::write(&data, r#"{"list": []}"#).unwrap();
    let dest = tmp.path().join("out");

    cmd()
        .args(["--data", data.to_str().unwrap()])
        .args(["--dest-dir", dest.to_str().unwrap()])
        .args(["--title", "My Article"])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("No item found").count(1));

    assert!(!dest.exists());
}

#[test]
fn test_cli_missing_export() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["--data", "nonexistent.json", "--title", "x"])
        .args(["--dest-dir", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_cli_verbose() {
    let tmp = TempDir::new().unwrap();
    dump_cmd(&tmp)
        .args(["-v", "--title", "My Article", "--stdout"])
        .assert()
        .success()
        .stderr(predicate::str::contains("highlights in reading order"));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("excerpta"));
}
