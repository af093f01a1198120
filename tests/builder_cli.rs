use std::process::Command;

use jobmatch::{ArtifactBundle, MATRIX_FILE, META_FILE, VECTORIZER_FILE};
use tempfile::TempDir;

#[test]
fn builder_writes_loadable_artifacts() {
    let dir = TempDir::new().expect("tempdir");
    let model_dir = dir.path().join("model");
    let output = Command::new(env!("CARGO_BIN_EXE_model_builder"))
        .arg("--model-dir")
        .arg(&model_dir)
        .output()
        .expect("run builder");

    assert!(
        output.status.success(),
        "builder exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wrote model artifacts to"));
    assert!(stdout.contains(&model_dir.display().to_string()));

    for name in [VECTORIZER_FILE, MATRIX_FILE, META_FILE] {
        assert!(model_dir.join(name).is_file(), "missing {name}");
    }
    let bundle = ArtifactBundle::load(&model_dir).expect("load");
    assert_eq!(bundle.jobs().len(), 5);
    assert_eq!(bundle.matrix().rows(), 5);
}

#[test]
fn builder_fails_when_target_is_a_file() {
    let dir = TempDir::new().expect("tempdir");
    let blocker = dir.path().join("model");
    std::fs::write(&blocker, b"not a directory").expect("write blocker");
    let output = Command::new(env!("CARGO_BIN_EXE_model_builder"))
        .arg("--model-dir")
        .arg(&blocker)
        .output()
        .expect("run builder");
    assert!(!output.status.success());
}
