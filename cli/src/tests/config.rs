use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use super::rsr;

#[test]
fn cli_config_search_options() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.child("rsr.toml");

    config_file
        .write_str(
            r#"
[search]
case_sensitive = false
posix = true
"#,
        )
        .unwrap();

    rsr()
        .arg("--config")
        .arg(config_file.path())
        .arg("find")
        .arg("(FOO)")
        .write_stdin("foo\n(FOO)\nbar\n")
        .assert()
        .success()
        .stdout("foo\n(FOO)\n");
}

#[test]
fn cli_config_word_chars() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.child("rsr.toml");

    config_file.write_str("[search]\nword_chars = \"-\"\n").unwrap();

    rsr()
        .arg("replace")
        .arg(r"\w+")
        .arg("X")
        .write_stdin("foo-bar baz\n")
        .assert()
        .success()
        .stdout("X-bar baz\n");

    rsr()
        .arg("-C")
        .arg(config_file.path())
        .arg("replace")
        .arg(r"\w+")
        .arg("X")
        .write_stdin("foo-bar baz\n")
        .assert()
        .success()
        .stdout("X baz\n");
}

#[test]
fn cli_config_unknown_key() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.child("rsr.toml");

    config_file.write_str("[search]\nignore_case = true\n").unwrap();

    rsr()
        .arg("--config")
        .arg(config_file.path())
        .arg("dump")
        .arg("a")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: can not load config file"));
}

#[test]
fn cli_config_missing_file() {
    rsr()
        .arg("--config")
        .arg("src/tests/testdata/missing.toml")
        .arg("dump")
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}
