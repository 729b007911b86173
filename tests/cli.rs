use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn orbital(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("orbital").unwrap();
    cmd.current_dir(home)
        .env("ORBITAL_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("ORBITAL_LOG");
    cmd
}

#[test]
fn first_run_seeds_default_spaces() {
    let home = tempfile::tempdir().unwrap();
    orbital(home.path())
        .args(["space", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Working Space"))
        .stdout(predicate::str::contains("Research & Dev"));

    assert!(home.path().join("orbital_spaces.json").exists());
}

#[test]
fn create_list_search_and_restore() {
    let home = tempfile::tempdir().unwrap();
    let backup = home.path().join("backup.json");

    orbital(home.path())
        .args(["collection", "add", "Reading"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created collection Reading"));

    orbital(home.path())
        .args(["link", "add", "Reading", "rust-lang.org", "--title", "Rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved https://rust-lang.org"));

    orbital(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading"))
        .stdout(predicate::str::contains("(1 tabs)"))
        .stdout(predicate::str::contains("https://rust-lang.org"));

    orbital(home.path())
        .args(["search", "RUST"])
        .assert()
        .success()
        .stdout(predicate::str::contains("link"))
        .stdout(predicate::str::contains("https://rust-lang.org"));

    orbital(home.path())
        .args(["backup", "export", "--output"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 collections and 1 links"));

    orbital(home.path())
        .args(["collection", "rm", "Reading"])
        .assert()
        .success();
    orbital(home.path())
        .args(["search", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));

    orbital(home.path())
        .args(["backup", "import"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Restored 4 spaces, 1 collections and 1 links",
        ));
    orbital(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust"));
}

#[test]
fn blank_search_prompts() {
    let home = tempfile::tempdir().unwrap();
    orbital(home.path())
        .args(["search", "  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Type something to search."));
}

#[test]
fn last_space_cannot_be_deleted() {
    let home = tempfile::tempdir().unwrap();
    for space in ["Personal", "Research & Dev", "Peng Link"] {
        orbital(home.path())
            .args(["space", "rm", space])
            .assert()
            .success();
    }
    orbital(home.path())
        .args(["space", "rm", "Working Space"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one space"));
}

#[test]
fn invalid_backup_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let bad = home.path().join("bad.json");
    std::fs::write(&bad, r#"{"version":"1.0","data":{}}"#).unwrap();

    orbital(home.path())
        .args(["collection", "add", "Keep"])
        .assert()
        .success();
    orbital(home.path())
        .args(["backup", "import"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid backup format"));
    orbital(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep"));
}

#[test]
fn window_is_saved_as_collection() {
    let home = tempfile::tempdir().unwrap();
    orbital(home.path())
        .args(["tabs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Window 2"));

    orbital(home.path())
        .args(["--space", "Personal", "tabs", "save-window", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 3 tabs into"));

    orbital(home.path())
        .args(["--space", "Personal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Toby - The Best Tab Manager"));
}

#[test]
fn tabs_file_replaces_builtin_tabs() {
    let home = tempfile::tempdir().unwrap();
    let tabs = home.path().join("tabs.json");
    std::fs::write(
        &tabs,
        r#"[{"id":"t-1","windowId":4,"title":"Crates","url":"https://crates.io"}]"#,
    )
    .unwrap();

    orbital(home.path())
        .arg("--tabs")
        .arg(&tabs)
        .args(["search", "--filter", "open tabs", "crates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://crates.io"));
}

#[test]
fn collection_exports_csv() {
    let home = tempfile::tempdir().unwrap();
    orbital(home.path())
        .args(["collection", "add", "My List"])
        .assert()
        .success();
    orbital(home.path())
        .args(["link", "add", "My List", "example.com", "--title", "Say \"hi\""])
        .assert()
        .success();
    orbital(home.path())
        .args(["collection", "export", "My List"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My_List.csv"));

    let csv = std::fs::read_to_string(home.path().join("My_List.csv")).unwrap();
    assert!(csv.starts_with("\u{FEFF}Title,URL,Comment,Created At\n"));
    assert!(csv.contains(r#""Say ""hi""","https://example.com","""#));
}

#[test]
fn config_round_trip() {
    let home = tempfile::tempdir().unwrap();
    orbital(home.path())
        .args(["config", "highlight-ms", "1200"])
        .assert()
        .success();
    orbital(home.path())
        .args(["config", "highlight-ms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("highlight-ms = 1200"));
}
