/*!
 * Tests for configuration loading and layering
 */

use std::fs;
use std::path::PathBuf;

use wortwirbel::app_config::{Config, LogLevel};

use crate::common::create_temp_dir;

#[test]
fn test_load_fromJsonFile_shouldReadAllSections() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(
        &path,
        r#"{
            "server": {"host": "0.0.0.0", "port": 8080},
            "database": {"path": "/srv/wortwirbel/words.db"},
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.database.path, PathBuf::from("/srv/wortwirbel/words.db"));
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_load_emptyObject_shouldEqualDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(&path, "{}").unwrap();

    assert_eq!(Config::load(&path).unwrap(), Config::default());
}

#[test]
fn test_load_missingFile_shouldFailWithPath() {
    let error = Config::load("/nonexistent/wortwirbel.json").unwrap_err();
    assert!(error.to_string().contains("/nonexistent/wortwirbel.json"));
}

#[test]
fn test_load_malformedJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(&path, "{ server: ").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_applyEnv_shouldOverrideFileValues() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(&path, r#"{"server": {"host": "0.0.0.0", "port": 8080}}"#).unwrap();

    let mut config = Config::load(&path).unwrap();
    config
        .apply_env(|key| match key {
            "SERVER_PORT" => Some("9001".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9001);
}

#[test]
fn test_applyEnv_withZeroPort_shouldParseButFailValidation() {
    let config = Config::from_env_with(|key| match key {
        "SERVER_PORT" => Some("0".to_string()),
        _ => None,
    })
    .unwrap();

    assert!(config.validate().is_err());
}

#[test]
fn test_logLevel_fromStr_andFilter() {
    assert_eq!("Trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert!("verbose".parse::<LogLevel>().is_err());
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::default().to_string(), "info");
}
