use strata_logger::{LevelFilter, LogSettings, Logger, LoggerError};

#[test]
fn second_initialization_is_rejected() {
    let _logger = Logger::from_settings("strata-first", &LogSettings::default(), 1)
        .expect("first init should succeed");

    let err = Logger::builder()
        .name("strata-second")
        .level(LevelFilter::INFO)
        .init()
        .expect_err("second init should fail");

    assert!(
        matches!(err, LoggerError::Subscriber { .. }),
        "expected subscriber error for second init"
    );
}
