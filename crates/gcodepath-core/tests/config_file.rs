use gcodepath_core::{CodecConfig, ConfigError, ZeroPolicy};
use std::io::Write;

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r##"
comment_delimiter = "#"
motion_code = "G01"
zero_policy = "zero_as_absent"

[precision]
extrusion = 4
"##
    )
    .unwrap();

    let config = CodecConfig::load(file.path()).unwrap();
    assert_eq!(config.comment_delimiter, '#');
    assert_eq!(config.motion_code, "G01");
    assert_eq!(config.zero_policy, ZeroPolicy::ZeroAsAbsent);
    assert_eq!(config.precision.extrusion, 4);
    assert_eq!(config.precision.coordinate, 3);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = CodecConfig::load(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "start_sentinel = \"\"").unwrap();
    let result = CodecConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidSetting { .. })));
}
