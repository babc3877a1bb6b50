//! File-level tests: reading, writing, and failure without output

mod common;

use bibnorm::{Config, Error, Normalizer};
use common::fixtures::{bibtex_fixture_path, load_bibtex_fixture};
use tempfile::tempdir;

#[test]
fn test_normalize_file_writes_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("ref.bib");

    let stats = Normalizer::default()
        .normalize_file(&bibtex_fixture_path("venues.bib"), &output)
        .unwrap();

    assert_eq!(stats.entries, 5);
    assert_eq!(stats.titles, 4);
    assert_eq!(stats.venues, 4);

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("@string{ral = "));
    assert!(written.ends_with("}\n"));
}

#[test]
fn test_missing_input_is_read_error() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("ref.bib");

    let err = Normalizer::default()
        .normalize_file(&dir.path().join("missing.bib.bk"), &output)
        .unwrap_err();

    assert!(matches!(err, Error::Read { .. }));
    assert!(!output.exists());
}

#[test]
fn test_malformed_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("ref.bib");
    std::fs::write(&output, "previous contents").unwrap();

    let err = Normalizer::default()
        .normalize_file(&bibtex_fixture_path("malformed.bib"), &output)
        .unwrap_err();

    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous contents");
}

#[test]
fn test_unwritable_output_is_write_error() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("no-such-dir").join("ref.bib");

    let err = Normalizer::default()
        .normalize_file(&bibtex_fixture_path("venues.bib"), &output)
        .unwrap_err();

    assert!(matches!(err, Error::Write { .. }));
}

#[test]
fn test_config_driven_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ref.bib.bk");
    let output = dir.path().join("ref.bib");
    std::fs::write(
        &input,
        "@inproceedings{a, title = {control}, booktitle = {L4DC 2022}}\n",
    )
    .unwrap();

    let config_path = dir.path().join(bibnorm::CONFIG_FILE_NAME);
    std::fs::write(
        &config_path,
        format!(
            r#"
input = {:?}
output = {:?}

[[venue_rules]]
keywords = ["L4DC"]
canonical = "In the Proceedings of Learning for Dynamics and Control Conference"
"#,
            input.display().to_string(),
            output.display().to_string()
        ),
    )
    .unwrap();

    let config = Config::load_standard(dir.path()).unwrap();
    let normalizer = Normalizer::from_config(&config).unwrap();
    normalizer.normalize_file(&config.input, &config.output).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("title = {{Control}},"));
    assert!(written.contains(
        "booktitle = {{In the Proceedings of Learning for Dynamics and Control Conference}},"
    ));
}

#[test]
fn test_fixture_is_readable() {
    assert!(load_bibtex_fixture("venues.bib").contains("@inproceedings"));
}
