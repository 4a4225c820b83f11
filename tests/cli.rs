use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

const USERS: &str = "\
3100002,N0CALL,John Doe,Albany,New York,John,United States
1023001,VE3THW,Wayne Holmes,Toronto,Ontario,Wayne,Canada
3100001,K1ABC,Ann Lee,Boston,Massachusetts,Ann,United States
2340001,G0ABC,Ian Smith,Leeds,,Ian,
";

const RADIOID_CSV: &str = "\
RADIO_ID,CALLSIGN,FIRST_NAME,LAST_NAME,CITY,STATE,COUNTRY
3100002,N0CALL,John,Doe,Albany,New York,United States
1023001,VE3THW,Wayne,Holmes,Toronto,Ontario,Canada
3100001,K1ABC,Ann,Lee,Boston,Massachusetts,United States
";

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("dmrradio").unwrap();
    cmd.env_remove("DMRRADIO_DEVICE")
        .env_remove("DMRRADIO_USERS_SOURCES")
        .env_remove("RUST_LOG");
    cmd
}

fn device(image: &Path) -> String {
    format!("dummy:image={}", image.display())
}

fn write_users_file(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("users.csv");
    fs::write(&path, USERS).unwrap();
    path
}

fn write_radioid_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("radioid.csv");
    fs::write(&path, RADIOID_CSV).unwrap();
    path
}

#[test]
fn unknown_command_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["bogus", "out.bin"])
        .assert()
        .code(1)
        .stderr(contains("<subCommand> args"))
        .stderr(contains("\tnewCodeplug -model <model> -freq <freqRange> <codeplugFile>"))
        .stderr(contains("capitalization of the <subCommand> is ignored"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_command_prints_usage() {
    cmd().assert().code(1).stderr(contains("subCommands:"));
}

#[test]
fn version_ignores_case() {
    cmd()
        .arg("VERSION")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_rejects_arguments() {
    cmd().args(["version", "extra"]).assert().code(1);
}

#[test]
fn new_codeplug_then_convert() {
    let dir = tempfile::tempdir().unwrap();
    let cp = dir.path().join("cp.bin");
    let text = dir.path().join("cp.txt");
    let json = dir.path().join("cp.json");
    let back = dir.path().join("back.bin");

    cmd()
        .arg("newcodeplug")
        .args(["-model", "MD-380", "-freq", "400-480 MHz"])
        .arg(&cp)
        .assert()
        .success();

    cmd().arg("codeplugToText").arg(&cp).arg(&text).assert().success();
    let content = fs::read_to_string(&text).unwrap();
    assert!(content.contains("MD-380"));
    assert!(content.contains("400-480 MHz"));

    cmd().arg("codeplugToJSON").arg(&text).arg(&json).assert().success();
    cmd().arg("jsonToCodeplug").arg(&json).arg(&back).assert().success();
    assert_eq!(fs::read(&cp).unwrap(), fs::read(&back).unwrap());
}

#[test]
fn spreadsheet_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let cp = dir.path().join("cp.bin");
    let xlsx = dir.path().join("cp.xlsx");
    let back = dir.path().join("back.bin");

    cmd()
        .args(["newCodeplug", "--model", "MD-UV380", "--freq", "136-174 MHz & 400-480 MHz"])
        .arg(&cp)
        .assert()
        .success();
    cmd().arg("codeplugToXLSX").arg(&cp).arg(&xlsx).assert().success();
    cmd().arg("xlsxToCodeplug").arg(&xlsx).arg(&back).assert().success();
    assert_eq!(fs::read(&cp).unwrap(), fs::read(&back).unwrap());
}

#[test]
fn bad_model_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let cp = dir.path().join("cp.bin");
    cmd()
        .args(["newCodeplug", "-model", "XYZ", "-freq", "400-480 MHz"])
        .arg(&cp)
        .assert()
        .code(1)
        .stderr(contains("bad modelName"))
        .stderr(contains("\"400-480 MHz\""));
    assert!(!cp.exists());

    cmd()
        .args(["newCodeplug", "-model", "MD-380", "-freq", "900 MHz"])
        .arg(&cp)
        .assert()
        .code(1)
        .stderr(contains("bad freqRange"));
    assert!(!cp.exists());
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("textToCodeplug")
        .arg(dir.path().join("missing.txt"))
        .arg(dir.path().join("cp.bin"))
        .assert()
        .code(1)
        .stderr(contains("missing.txt"));
}

#[test]
fn text_without_known_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("cp.txt");
    fs::write(&text, "Model: XYZ-1\n[General Settings]\nRadio Name: Base\n").unwrap();
    cmd()
        .arg("textToCodeplug")
        .arg(&text)
        .arg(dir.path().join("cp.bin"))
        .assert()
        .code(1)
        .stderr(contains("unknown model in codeplug"));
}

#[test]
fn radio_commands_need_a_device() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("readSPIFlash")
        .arg(dir.path().join("flash.bin"))
        .assert()
        .code(1)
        .stderr(contains("no radio specified"));
}

#[test]
fn codeplug_round_trip_through_radio() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("radio.img");
    let cp = dir.path().join("cp.bin");
    let read = dir.path().join("read.bin");

    cmd()
        .args(["newCodeplug", "-model", "MD-380", "-freq", "136-174 MHz"])
        .arg(&cp)
        .assert()
        .success();

    cmd()
        .args(["--device", device(&image).as_str(), "writeCodeplug"])
        .arg(&cp)
        .assert()
        .success()
        .stdout(contains("Writing codeplug to radio..."));
    assert!(image.exists());

    cmd()
        .env("DMRRADIO_DEVICE", device(&image))
        .args(["readCodeplug", "-model", "MD-380", "-freq", "136-174 MHz"])
        .arg(&read)
        .assert()
        .success()
        .stdout(contains("Reading codeplug from radio."));
    assert_eq!(fs::read(&cp).unwrap(), fs::read(&read).unwrap());
}

#[test]
fn users_round_trip_through_radio() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("radio.img");
    let users = write_users_file(dir.path());
    let read = dir.path().join("read.csv");

    cmd()
        .args(["--device", device(&image).as_str(), "writeMD380Users"])
        .arg(&users)
        .assert()
        .success()
        .stdout(contains("Erasing flash memory..."));

    cmd()
        .args(["--device", device(&image).as_str(), "readMD380Users"])
        .arg(&read)
        .assert()
        .success();

    let content = fs::read_to_string(&read).unwrap();
    let ids: Vec<&str> = content
        .lines()
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(ids, vec!["1023001", "2340001", "3100001", "3100002"]);
}

#[test]
fn firmware_and_flash_dump() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("radio.img");
    let firmware = dir.path().join("fw.bin");
    let dump = dir.path().join("flash.bin");
    fs::write(&firmware, vec![0x5a; 4096]).unwrap();

    cmd()
        .args(["--device", device(&image).as_str(), "writeMD380Firmware"])
        .arg(&firmware)
        .assert()
        .success()
        .stdout(contains("Preparing to write firmware"));

    cmd()
        .args(["--device", device(&image).as_str(), "readSPIFlash"])
        .arg(&dump)
        .assert()
        .success();
    assert_eq!(
        fs::metadata(&dump).unwrap().len(),
        fs::metadata(&image).unwrap().len()
    );
}

#[test]
fn country_reports() {
    let dir = tempfile::tempdir().unwrap();
    let users = write_users_file(dir.path());
    let countries = dir.path().join("countries.txt");

    cmd()
        .arg("countryCounts")
        .arg(&users)
        .assert()
        .success()
        .stdout(contains("      2 United States"))
        .stdout(contains("      1 Canada"))
        .stdout(contains("      4 Total Users"));

    cmd()
        .arg("userCountries")
        .arg(&users)
        .arg(&countries)
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&countries).unwrap(),
        "United States\nCanada\n<none>\n"
    );
}

#[test]
fn filter_users_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let users = write_users_file(dir.path());
    let countries = dir.path().join("countries.txt");
    let out = dir.path().join("out.csv");
    fs::write(&countries, "# keep these\nCanada\n<none>\n").unwrap();

    cmd()
        .arg("filterUsers")
        .arg(&countries)
        .arg(&users)
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("2 Users"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("VE3THW"));
    assert!(content.contains("G0ABC"));
    assert!(!content.contains("N0CALL"));
}

#[test]
fn filter_users_downloads_when_input_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_radioid_export(dir.path());
    let countries = dir.path().join("countries.txt");
    let out = dir.path().join("out.csv");
    fs::write(&countries, "United States\n").unwrap();

    cmd()
        .env("DMRRADIO_USERS_SOURCES", source.display().to_string())
        .arg("filterUsers")
        .arg(&countries)
        .arg("")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("2 Users"));
}

#[test]
fn get_users_from_configured_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_radioid_export(dir.path());
    let out = dir.path().join("out.csv");

    cmd()
        .arg("--users-source")
        .arg(&source)
        .arg("getAbbreviatedUsers")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Retrieving Users file..."));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("N0CALL,John Doe,Albany,NY,John,USA"));
}

#[test]
fn wrong_argument_count_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("radio.img");
    cmd()
        .current_dir(dir.path())
        .args(["--device", device(&image).as_str(), "writeCodeplug", "a.bin", "b.bin"])
        .assert()
        .code(1)
        .stderr(contains("writeCodeplug").and(contains("Usage")));
    assert!(!image.exists());
}

#[test]
fn unreadable_users_file_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("radio.img");
    let missing = dir.path().join("missing.csv");
    let garbled = dir.path().join("garbled.csv");
    fs::write(&garbled, "not,a,number,at,all\n").unwrap();

    for (command, users) in [("writeMD380Users", &missing), ("writeUV380Users", &garbled)] {
        cmd()
            .args(["--device", device(&image).as_str(), command])
            .arg(users)
            .assert()
            .code(1);
        assert!(!image.exists(), "{} opened the radio", command);
    }
}
