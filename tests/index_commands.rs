use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use common::command::{init_repository_dir, repository_dir, run_bitstore_command, staged_repository_dir};
use common::file::write_generated_files;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn add_files_to_index_successfully(staged_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bitstore_command(staged_repository_dir.path(), &["ls-files"])
        .assert()
        .success()
        .stdout("a.txt\nb/c.txt\n");

    let index = std::fs::read(staged_repository_dir.path().join(".bit/index"))?;
    assert_eq!(&index[..4], b"DIRC");
    assert_eq!(&index[4..8], &2u32.to_be_bytes());
    assert_eq!(&index[8..12], &2u32.to_be_bytes());
    // "a.txt": 62 + 5 -> 72, "b/c.txt": 62 + 7 -> 72
    assert_eq!(index.len(), 12 + 72 + 72);

    Ok(())
}

#[rstest]
fn index_entries_are_sorted_by_path_bytes(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let files = write_generated_files(init_repository_dir.path(), 8);
    let mut names = files
        .iter()
        .map(|file| file.path.file_name().unwrap().to_string_lossy().to_string())
        .collect::<Vec<_>>();

    let mut cmd = run_bitstore_command(init_repository_dir.path(), &["update-index", "--add"]);
    cmd.args(names.iter().rev());
    cmd.assert().success();

    names.sort();
    let expected = names.iter().map(|name| format!("{name}\n")).collect::<String>();
    run_bitstore_command(init_repository_dir.path(), &["ls-files"])
        .assert()
        .success()
        .stdout(expected);

    Ok(())
}

#[rstest]
fn adding_the_same_file_twice_keeps_one_entry(staged_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    staged_repository_dir.child("a.txt").write_str("changed\n")?;

    run_bitstore_command(staged_repository_dir.path(), &["update-index", "a.txt"])
        .assert()
        .success();

    run_bitstore_command(staged_repository_dir.path(), &["ls-files", "-m"])
        .assert()
        .success()
        .stdout("");
    run_bitstore_command(staged_repository_dir.path(), &["ls-files"])
        .assert()
        .success()
        .stdout("a.txt\nb/c.txt\n");

    Ok(())
}

#[rstest]
fn untracked_file_without_add_fails(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bitstore_command(init_repository_dir.path(), &["update-index", "a.txt"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("missing --add option"));

    assert!(!init_repository_dir.path().join(".bit/index").exists());

    Ok(())
}

#[rstest]
fn modified_and_deleted_files_are_listed(staged_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    staged_repository_dir.child("a.txt").write_str("edited\n")?;
    std::fs::remove_file(staged_repository_dir.path().join("b/c.txt"))?;

    run_bitstore_command(staged_repository_dir.path(), &["ls-files", "-m"])
        .assert()
        .success()
        .stdout("a.txt\nb/c.txt\n");

    run_bitstore_command(staged_repository_dir.path(), &["ls-files", "-d"])
        .assert()
        .success()
        .stdout("b/c.txt\n");

    Ok(())
}

#[rstest]
fn remove_unstages_deleted_files_only(staged_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::remove_file(staged_repository_dir.path().join("b/c.txt"))?;

    run_bitstore_command(
        staged_repository_dir.path(),
        &["update-index", "--remove", "a.txt", "b/c.txt"],
    )
    .assert()
    .success();

    run_bitstore_command(staged_repository_dir.path(), &["ls-files"])
        .assert()
        .success()
        .stdout("a.txt\n");

    Ok(())
}

#[rstest]
fn deleted_file_without_remove_fails(staged_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::remove_file(staged_repository_dir.path().join("a.txt"))?;

    run_bitstore_command(staged_repository_dir.path(), &["update-index", "a.txt"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("--remove not passed"));

    Ok(())
}

#[rstest]
fn paths_are_resolved_from_subdirectories(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bitstore_command(&init_repository_dir.path().join("b"), &["update-index", "--add", "c.txt", "../a.txt"])
        .assert()
        .success();

    run_bitstore_command(init_repository_dir.path(), &["ls-files"])
        .assert()
        .success()
        .stdout("a.txt\nb/c.txt\n");

    Ok(())
}

#[rstest]
fn directories_cannot_be_added(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bitstore_command(init_repository_dir.path(), &["update-index", "--add", "b"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("unable to read"));

    Ok(())
}

#[rstest]
fn corrupted_index_is_reported(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bitstore_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    std::fs::write(repository_dir.path().join(".bit/index"), b"DIRC\0\0\0\x02\0\0\0\x01short")?;

    run_bitstore_command(repository_dir.path(), &["ls-files"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("unexpected end of index file"));

    Ok(())
}

#[rstest]
fn add_and_remove_cannot_be_combined(staged_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bitstore_command(
        staged_repository_dir.path(),
        &["update-index", "--add", "--remove", "a.txt"],
    )
    .assert()
    .code(128)
    .stderr(predicate::str::contains("cannot be used with"));

    Ok(())
}
