use std::fs;
use std::time::Duration;
use strata_logger::{LogSettings, Logger};
use tempfile::tempdir;

#[test]
fn settings_with_a_directory_write_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let settings = LogSettings {
        level: "info".to_owned(),
        console: false,
        json: true,
        directory: Some(log_dir.clone()),
        ..LogSettings::default()
    };
    let logger = Logger::from_settings("strata-file", &settings, 0)?;
    assert!(logger.writes_files());

    tracing::info!(class = "SignedDistanceFunctionRenderer", "Schema sealed");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents.lines().next().expect("log file should not be empty");
    let record: serde_json::Value = serde_json::from_str(line)?;
    assert_eq!(record["fields"]["message"], "Schema sealed");
    assert_eq!(record["fields"]["class"], "SignedDistanceFunctionRenderer");

    Ok(())
}
