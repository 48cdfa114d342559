use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn gcodepath() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gcodepath"))
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_decode_prints_segments_as_json() {
    let program = write_temp("G28\nG1 X0 Y0 Z0\nG1 X10 Y0\nG1 X10 Y10 E1.0\n");

    let output = gcodepath()
        .arg("decode")
        .arg(program.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1]["is_travel"], false);
    assert_eq!(segments[1]["extrusion"], 1.0);
    assert_eq!(segments[1]["source_index"], 3);
}

#[test]
fn test_encode_prints_program() {
    let settings = write_temp("::START::\nG28\n::END::\nM84\n");
    let moves = write_temp(
        r#"[{"segment": {"start": {"x": 0, "y": 0, "z": 0}, "end": {"x": 10, "y": 0, "z": 0.2}},
            "feedrate": 1500, "extrusion": 0.4}]"#,
    );

    let output = gcodepath()
        .arg("encode")
        .arg(settings.path())
        .arg(moves.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["G28", "G1 X10 Y0 Z0.2 E0.4 F1500", "M84"]);
}

#[test]
fn test_encode_honors_config_file() {
    let config = write_temp("motion_code = \"G01\"\n");
    let settings = write_temp("::START::\n::END::\n");
    let moves = write_temp(
        r#"[{"segment": {"start": {"x": 0, "y": 0, "z": 0}, "end": {"x": 1, "y": 2, "z": 3}},
            "is_travel": true, "feedrate": 6000}]"#,
    );

    let output = gcodepath()
        .arg("encode")
        .arg(settings.path())
        .arg(moves.path())
        .arg("--config")
        .arg(config.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "G01 X1 Y2 Z3 E0 F6000"
    );
}

#[test]
fn test_missing_start_sentinel_fails() {
    let settings = write_temp("G28\n::END::\n");
    let moves = write_temp("[]");

    let output = gcodepath()
        .arg("encode")
        .arg(settings.path())
        .arg(moves.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_command_fails() {
    let output = gcodepath().arg("render").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}
