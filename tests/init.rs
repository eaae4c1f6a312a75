use assert_cmd::Command;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn init_repository_successfully() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let dir_absolute_path = dir.path().canonicalize()?.display().to_string();
    let mut sut = Command::cargo_bin("bitstore")?;

    sut.arg("init").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty Git repository in .+\.bit\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    let git_dir = dir.path().join(".bit");
    for sub_dir in ["objects/info", "objects/pack", "refs/heads", "refs/tags"] {
        assert!(git_dir.join(sub_dir).is_dir(), "{sub_dir} was not created");
    }
    assert_eq!(
        std::fs::read_to_string(git_dir.join("HEAD"))?,
        "ref: refs/heads/master\n"
    );

    Ok(())
}

#[test]
fn init_in_existing_repository_reinitializes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::command::run_bitstore_command(dir.path(), &["init"])
        .assert()
        .success();

    common::command::run_bitstore_command(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Reinitialized existing Git repository in",
        ));

    Ok(())
}

#[test]
fn commands_outside_a_repository_fail_with_128() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::command::run_bitstore_command(dir.path(), &["ls-files"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("not a bit repository"));

    Ok(())
}

#[test]
fn unknown_flags_fail_with_128() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::command::run_bitstore_command(dir.path(), &["write-tree", "--bogus"])
        .assert()
        .code(128);

    Ok(())
}
