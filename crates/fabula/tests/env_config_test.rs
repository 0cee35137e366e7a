//! Environment layer of the configuration.
//!
//! Kept in its own test binary with a single test because it mutates the
//! process environment.

use fabula::FabulaConfig;
use std::io::Write;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    writeln!(
        file,
        "[backend]\nmodel = \"mistral\"\n\n[pipeline]\nsections = 9\n\n[batch]\ntopics = [\"From file\"]"
    )
    .expect("write");

    // SAFETY: no other test in this binary reads or writes the environment.
    unsafe {
        std::env::set_var("FABULA__PIPELINE__SECTIONS", "4");
        std::env::set_var("FABULA__BATCH__TOPICS", "Dunes,Glacier");
    }

    let loaded = FabulaConfig::load(Some(file.path()));

    unsafe {
        std::env::remove_var("FABULA__PIPELINE__SECTIONS");
        std::env::remove_var("FABULA__BATCH__TOPICS");
    }

    let config = loaded.expect("Config should load");
    assert_eq!(*config.pipeline().sections(), 4);
    assert_eq!(
        config.batch().topics(),
        &vec!["Dunes".to_string(), "Glacier".to_string()]
    );
    // Keys absent from the environment keep their file values.
    assert_eq!(config.backend().model(), "mistral");
}
