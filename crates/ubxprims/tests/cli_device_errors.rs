#![cfg(feature = "cli")]

use std::process::Command;

fn ubxprims() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ubxprims"));
    cmd.env_remove("UBXPRIMS_DEVICE")
        .arg("--log-level")
        .arg("error");
    cmd
}

#[test]
fn device_commands_need_a_device() {
    let output = ubxprims().arg("version").output().expect("version should run");
    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no device given"));
}

#[test]
fn unknown_message_name_is_a_usage_error() {
    let output = ubxprims()
        .args(["--device", "/dev/null", "poll", "NAV-NOPE"])
        .output()
        .expect("poll should run");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn missing_device_is_a_transport_error() {
    let output = ubxprims()
        .args(["--device", "/dev/ubxprims-does-not-exist", "version"])
        .output()
        .expect("version should run");
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"));
}
