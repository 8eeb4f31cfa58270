use predicates::prelude::*;

use super::rsr;

#[test]
fn cli_replace() {
    rsr()
        .arg("replace")
        .arg(r"\(\w+\)=\(\w+\)")
        .arg(r"\2=\1")
        .write_stdin("key=value\n# none\nx=1 y=2\n")
        .assert()
        .success()
        .stdout("value=key\n# none\n1=x y=2\n");
}

#[test]
fn cli_replace_whole_match() {
    rsr()
        .arg("replace")
        .arg("--posix")
        .arg(r"(o+)")
        .arg(r"[\0]")
        .arg("src/tests/testdata/lines.txt")
        .assert()
        .success()
        .stdout("f[oo] = 1\nbar = f[oo]\nbaz = 3\n");
}

#[test]
fn cli_replace_escapes() {
    rsr()
        .arg("replace")
        .arg("-i")
        .arg(" *= *")
        .arg(r"\t")
        .write_stdin("A = 1\n")
        .assert()
        .success()
        .stdout("A\t1\n");
}

#[test]
fn cli_replace_invalid_pattern() {
    rsr()
        .arg("replace")
        .arg(r"\(a")
        .arg("b")
        .write_stdin("a\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unmatched \\("));
}
