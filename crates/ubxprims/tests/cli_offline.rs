#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

use bytes::BytesMut;
use ubxprims_frame::{encode_frame, Identity};

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "ubxprims-{tag}-{}-{}.ubx",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

fn ubxprims() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ubxprims"));
    cmd.env_remove("UBXPRIMS_DEVICE")
        .arg("--log-level")
        .arg("error");
    cmd
}

#[test]
fn catalog_lists_known_layouts_as_json() {
    let output = ubxprims()
        .args(["--format", "json", "catalog", "--class", "cfg"])
        .output()
        .expect("catalog should run");

    assert!(output.status.success());
    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("catalog output should be json");
    let names: Vec<&str> = entries
        .as_array()
        .expect("catalog is a list")
        .iter()
        .filter_map(|e| e.get("name").and_then(|n| n.as_str()))
        .collect();
    assert!(names.contains(&"CFG-PRT"));
    assert!(names.contains(&"CFG-RATE"));
    assert!(names.iter().all(|name| name.starts_with("CFG-")));
}

#[test]
fn parse_counts_frames_and_sentences() {
    let mut capture = BytesMut::new();
    capture.extend_from_slice(b"$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n");
    encode_frame(Identity::new(0x05, 0x01), &[0x06, 0x00], &mut capture).unwrap();
    encode_frame(Identity::new(0x05, 0x01), &[0x06, 0x08], &mut capture).unwrap();
    capture.extend_from_slice(&[0xB5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x00, 0x00, 0x00]);
    encode_frame(Identity::new(0x06, 0x08), &[0xE8, 0x03, 0x01, 0x00, 0x01, 0x00], &mut capture)
        .unwrap();

    let path = unique_temp_file("parse");
    std::fs::write(&path, &capture).expect("capture should be writable");

    let output = ubxprims()
        .args(["--format", "json", "parse"])
        .arg(&path)
        .output()
        .expect("parse should run");
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary should be json");
    assert_eq!(summary["counts"]["ACK-ACK"], 2);
    assert_eq!(summary["counts"]["CFG-RATE"], 1);
    assert_eq!(summary["counts"]["$GPGGA"], 1);
    assert_eq!(summary["stats"]["checksum_failures"], 1);
}

#[test]
fn parse_missing_file_is_an_error() {
    let output = ubxprims()
        .args(["parse", "/nonexistent/capture.ubx"])
        .output()
        .expect("parse should run");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn about_reports_version() {
    let output = ubxprims()
        .args(["--format", "json", "about"])
        .output()
        .expect("about should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
