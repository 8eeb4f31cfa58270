use assert_cmd::Command;
use predicates::prelude::*;

mod config;
mod replace;

fn rsr() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("rsr").unwrap();
    // Make sure that no config file is found in the home directory.
    cmd.env("HOME", "src/tests/testdata");
    cmd
}

#[test]
fn cli_find_in_file() {
    rsr()
        .arg("find")
        .arg("foo")
        .arg("src/tests/testdata/lines.txt")
        .assert()
        .success()
        .stdout(
            "src/tests/testdata/lines.txt:foo = 1
src/tests/testdata/lines.txt:bar = foo
",
        );
}

#[test]
fn cli_find_line_numbers() {
    rsr()
        .arg("find")
        .arg("-n")
        .arg(r"\<ba")
        .arg("src/tests/testdata/lines.txt")
        .assert()
        .success()
        .stdout(
            "src/tests/testdata/lines.txt:2:bar = foo
src/tests/testdata/lines.txt:3:baz = 3
",
        );
}

#[test]
fn cli_find_stdin() {
    rsr()
        .arg("find")
        .arg("-n")
        .arg("b")
        .write_stdin("abc\nxyz\r\nxbx")
        .assert()
        .success()
        .stdout("1:abc\n3:xbx\n");
}

#[test]
fn cli_find_all() {
    // Lines with multiple matches are printed only once.
    rsr()
        .arg("find")
        .arg("-a")
        .arg("-n")
        .arg("o+")
        .write_stdin("foo boo\nbar\nmoo\n")
        .assert()
        .success()
        .stdout("1:foo boo\n3:moo\n");
}

#[test]
fn cli_find_ignore_case() {
    rsr()
        .arg("find")
        .arg("FOO")
        .write_stdin("foo\nbar\n")
        .assert()
        .success()
        .stdout("");

    rsr()
        .arg("find")
        .arg("-i")
        .arg("FOO")
        .write_stdin("foo\nbar\n")
        .assert()
        .success()
        .stdout("foo\n");
}

#[test]
fn cli_find_posix() {
    rsr()
        .arg("find")
        .arg("--posix")
        .arg(r"(a)\1")
        .write_stdin("aa\nab\n(a)a\n")
        .assert()
        .success()
        .stdout("aa\n");

    rsr()
        .arg("find")
        .arg(r"(a)")
        .write_stdin("aa\nab\n(a)a\n")
        .assert()
        .success()
        .stdout("(a)a\n");
}

#[test]
fn cli_find_invalid_pattern() {
    rsr()
        .arg("find")
        .arg("[abc")
        .write_stdin("abc\n")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(
            "error: invalid pattern `[abc`: Missing ]",
        ));
}

#[test]
fn cli_find_missing_file() {
    rsr()
        .arg("find")
        .arg("foo")
        .arg("src/tests/testdata/missing.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "error: can not read `src/tests/testdata/missing.txt`",
        ));
}

#[test]
fn cli_no_command() {
    rsr().assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn cli_find_no_colors_when_redirected() {
    // Standard output is a pipe here, matches are not highlighted even
    // though colors are enabled by default.
    rsr()
        .arg("find")
        .arg("-a")
        .arg("o")
        .write_stdin("foo\n")
        .assert()
        .success()
        .stdout("foo\n")
        .stdout(predicate::str::contains("\x1b[").not());
}
