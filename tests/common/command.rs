use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository holding `a.txt` and `b/c.txt`, nothing staged
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_bitstore_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(repository_dir.path().join("a.txt"), "a\n".to_string()));
    write_file(FileSpec::new(
        repository_dir.path().join("b").join("c.txt"),
        "c\n".to_string(),
    ));

    repository_dir
}

/// Same as [`init_repository_dir`] with both files staged
#[fixture]
pub fn staged_repository_dir(init_repository_dir: TempDir) -> TempDir {
    run_bitstore_command(
        init_repository_dir.path(),
        &["update-index", "--add", "a.txt", "b/c.txt"],
    )
    .assert()
    .success();

    init_repository_dir
}

pub fn run_bitstore_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bitstore").expect("Failed to find bitstore binary");
    cmd.current_dir(dir);
    cmd.env_remove("GIT_COMMITTER_NAME");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bitstore_commit_tree(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = run_bitstore_command(dir, &["commit-tree"]);
    cmd.args(args);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}
