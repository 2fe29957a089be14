use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn seed_january(root: &Path) {
    for day in 1..=31 {
        fs::create_dir_all(root.join(format!("2023-01-{day:02}"))).expect("mkdir day");
    }
}

fn remaining(root: &Path) -> Vec<String> {
    let mut names = fs::read_dir(root)
        .expect("read root")
        .filter_map(Result::ok)
        .filter_map(|e| e.file_name().to_str().map(str::to_owned))
        .collect::<Vec<_>>();
    names.sort();
    names
}

fn prune_cmd(tmp: &Path, root: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tab-archive");
    cmd.current_dir(tmp)
        .env("XDG_CONFIG_HOME", tmp.join("config"))
        .env("TAB_ARCHIVE_CONFIG_PATH", tmp.join("missing.toml"))
        .env("TAB_ARCHIVE_ROOT", root)
        .env("TAB_ARCHIVE_LOGS_DIR", tmp.join("logs"))
        .env("TAB_ARCHIVE_RETENTION_DAYS", "30")
        .arg("prune");
    cmd
}

#[test]
fn prune_on_the_first_deletes_only_expired_days() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("drafts");
    seed_january(&root);
    fs::create_dir_all(root.join("scratch")).expect("mkdir scratch");

    prune_cmd(tmp.path(), &root)
        .args(["--today", "2023-02-01"])
        .assert()
        .success()
        .stdout(predicates::str::contains("deleted=2023-01-01"));

    let left = remaining(&root);
    assert_eq!(left.len(), 31);
    assert!(!left.contains(&"2023-01-01".to_string()));
    assert!(left.contains(&"2023-01-02".to_string()));
    assert!(left.contains(&"scratch".to_string()));

    let audit = fs::read_to_string(tmp.path().join("logs/audit.log")).expect("audit log");
    assert!(audit.contains("\"phase\":\"retention\""));
}

#[test]
fn prune_outside_the_first_is_a_no_op() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("drafts");
    seed_january(&root);

    prune_cmd(tmp.path(), &root)
        .args(["--today", "2023-02-02"])
        .assert()
        .success()
        .stdout(predicates::str::contains("skipped"));

    assert_eq!(remaining(&root).len(), 31);
}

#[test]
fn forced_prune_runs_on_any_day() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("drafts");
    seed_january(&root);

    prune_cmd(tmp.path(), &root)
        .args(["--today", "2023-02-02", "--force"])
        .assert()
        .success();

    let left = remaining(&root);
    assert_eq!(left.len(), 29);
    assert_eq!(left.first().map(String::as_str), Some("2023-01-03"));
}

#[test]
fn prune_rejects_a_malformed_today() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("drafts");

    prune_cmd(tmp.path(), &root)
        .args(["--today", "02/01/2023"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("invalid --today"));
}
