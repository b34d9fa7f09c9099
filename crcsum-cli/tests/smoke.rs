use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn write_random(path: &std::path::Path, bytes: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<u8> = (0..bytes).map(|_| rng.gen()).collect();
    std::fs::write(path, data).unwrap();
}

fn crcsum() -> Command {
    Command::cargo_bin("crcsum").unwrap()
}

#[test]
fn scan_write_verify_happy_path() {
    let td = assert_fs::TempDir::new().unwrap();
    let data = td.child("data");
    data.create_dir_all().unwrap();
    write_random(data.child("a.bin").path(), 16 * 1024, 1);
    write_random(data.child("b.bin").path(), 16 * 1024, 2);
    data.child("sub/c.txt").write_str("123456789").unwrap();

    crcsum()
        .args(["-R", "-q", "-o", "crc.json", data.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"filename":"sub/c.txt","crc":3421780262}"#))
        .stdout(predicate::str::contains(r#""version":"1.0.0","zlib_version":"1.2.11""#));

    // relative output lands in the scanned folder
    data.child("crc.json").assert(predicate::path::exists());

    crcsum()
        .args(["-r", data.child("crc.json").path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("reading crc file"))
        .stdout(predicate::str::contains("OK : 3421780262 == 3421780262 : sub/c.txt"))
        .stdout(predicate::str::contains("XX").not());

    data.child("a.bin").write_str("changed").unwrap();
    crcsum()
        .args(["--read", data.child("crc.json").path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"XX : \d+ == \d+ : a\.bin").unwrap())
        .stdout(predicate::str::contains("OK : 3421780262 == 3421780262 : sub/c.txt"));
}

#[test]
fn pretty_output_and_flat_listing() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("one.txt").write_str("1").unwrap();
    td.child("nested/two.txt").write_str("2").unwrap();

    crcsum()
        .args(["-p", "-q", td.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("{\n    \"files\": [\n        {\n"))
        .stdout(predicate::str::contains("one.txt"))
        .stdout(predicate::str::contains("two.txt").not());
}

#[test]
fn progress_goes_to_stderr() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("x").write_str("x").unwrap();
    td.child("y").write_str("y").unwrap();

    crcsum()
        .args(["-j", "1", td.path().to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Processed [2 / 2] (100.00%)"))
        .stdout(predicate::str::contains("Processed").not());
}

#[test]
fn empty_folder_reports_nothing_to_do() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("only_dir").create_dir_all().unwrap();
    crcsum()
        .arg(td.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("No files found to process.\n"));
}

#[test]
fn declining_overwrite_keeps_existing_file() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("f.txt").write_str("data").unwrap();
    let out = td.child("crc.json");
    out.write_str("old").unwrap();

    crcsum()
        .args(["-q", "--exclude", "crc.json", "-o"])
        .arg(out.path())
        .arg(td.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Do you want to overwrite? (y/N) : "))
        .stdout(predicate::str::contains("Cancelled."))
        .stdout(predicate::str::contains(r#""filename":"f.txt""#));
    out.assert("old");

    crcsum()
        .args(["-q", "--exclude", "crc.json", "-o"])
        .arg(out.path())
        .arg(td.path())
        .write_stdin("y\n")
        .assert()
        .success();
    out.assert(predicate::str::starts_with(r#"{"files":[{"filename":"f.txt""#));
}

#[test]
fn force_skips_prompt() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("f.txt").write_str("data").unwrap();
    let out = td.child("crc.json");
    out.write_str("old").unwrap();

    crcsum()
        .args(["-q", "-f", "--exclude", "*.json", "-o", "crc.json"])
        .arg(td.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("overwrite").not());
    out.assert(predicate::str::contains("f.txt"));
}

#[test]
fn missing_path_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    crcsum()
        .arg(td.child("nope").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found."));
}

#[test]
fn malformed_manifest_fails_verify() {
    let td = assert_fs::TempDir::new().unwrap();
    let m = td.child("crc.json");
    m.write_str("{ not json").unwrap();
    crcsum()
        .args(["-r"])
        .arg(m.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest"));
}
