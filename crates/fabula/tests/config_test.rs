//! Configuration layering and overrides.

use fabula::{FabulaConfig, RunOverrides};
use fabula_narrative::Stage;
use std::io::Write;

#[test]
fn test_defaults_match_short_pipeline() {
    let config = FabulaConfig::from_toml_str("").expect("Empty config should load");

    assert_eq!(config.backend().model(), "gemma:2b");
    assert_eq!(config.backend().base_url(), "http://localhost:11434");
    assert_eq!(*config.backend().timeout_secs(), 300);
    assert_eq!(*config.pipeline().sections(), 5);
    assert_eq!(*config.pipeline().summary_every(), 1);
    assert_eq!(*config.pipeline().gate().retry_below(), 6);
    assert_eq!(*config.pipeline().gate().edit_below(), 8);
    assert_eq!(*config.pipeline().gate().max_retries(), 2);
    assert!(*config.throttle().enabled());
}

#[test]
fn test_file_values_override_defaults() {
    let config = FabulaConfig::from_toml_str(
        r#"
        [backend]
        model = "llama3.2"
        timeout_secs = 60

        [throttle]
        enabled = false

        [pipeline]
        sections = 12
        summary_every = 3
        macro_edit = false

        [pipeline.gate]
        retry_below = 5
        edit_below = 7
        max_retries = 1

        [pipeline.stage_options.section_writer]
        max_tokens = 1200
        temperature = 0.9

        [batch]
        topics = ["A lighthouse keeper", "A glacier"]
        runs_per_topic = 2
        output_dir = "out"

        [export]
        author = "Ines"
        "#,
    )
    .expect("Config should parse");

    assert_eq!(config.backend().model(), "llama3.2");
    assert!(!*config.throttle().enabled());
    assert_eq!(*config.pipeline().sections(), 12);
    assert_eq!(*config.pipeline().summary_every(), 3);
    assert!(!*config.pipeline().macro_edit());
    assert_eq!(*config.pipeline().gate().max_retries(), 1);
    let writer = config.pipeline().stage_options().get(Stage::SectionWriter);
    assert_eq!(*writer.max_tokens(), Some(1200));
    assert_eq!(config.batch().topics().len(), 2);
    assert_eq!(config.batch().output_dir().to_str(), Some("out"));
    assert_eq!(config.export().author().as_deref(), Some("Ines"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_reads_explicit_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    writeln!(file, "[pipeline]\nsections = 3\n\n[batch]\ntopics = [\"Dunes\"]").expect("write");

    let config = FabulaConfig::load(Some(file.path())).expect("Config should load");

    assert_eq!(*config.pipeline().sections(), 3);
    assert_eq!(config.batch().topics(), &vec!["Dunes".to_string()]);
}

#[test]
fn test_load_rejects_missing_explicit_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");

    assert!(FabulaConfig::load(Some(missing.as_path())).is_err());
}

#[test]
fn test_overrides_replace_configured_values() {
    let config = FabulaConfig::from_toml_str(
        r#"
        [pipeline.gate]
        retry_below = 4
        edit_below = 6
        max_retries = 2

        [batch]
        topics = ["Configured"]
        "#,
    )
    .expect("Config should parse");

    let overrides = RunOverrides {
        topics: vec!["From CLI".to_string()],
        sections: Some(9),
        model: Some("mistral".to_string()),
        runs: Some(3),
        long_form: true,
    };
    let config = config.with_overrides(&overrides);

    assert_eq!(config.backend().model(), "mistral");
    assert_eq!(*config.pipeline().sections(), 9);
    // Long-form preset keeps the configured gate.
    assert_eq!(*config.pipeline().summary_every(), 3);
    assert_eq!(*config.pipeline().gate().retry_below(), 4);
    assert_eq!(config.batch().topics(), &vec!["From CLI".to_string()]);
    assert_eq!(*config.batch().runs_per_topic(), 3);
}

#[test]
fn test_validation_rejects_bad_settings() {
    let no_topics = FabulaConfig::from_toml_str("").expect("parse");
    assert!(no_topics.validate().is_err());

    let zero_cadence = FabulaConfig::from_toml_str(
        "[pipeline]\nsummary_every = 0\n\n[batch]\ntopics = [\"x\"]",
    )
    .expect("parse");
    assert!(zero_cadence.validate().is_err());

    let crossed = FabulaConfig::from_toml_str(
        "[pipeline.gate]\nretry_below = 9\nedit_below = 3\n\n[batch]\ntopics = [\"x\"]",
    )
    .expect("parse");
    assert!(crossed.validate().is_err());
}
