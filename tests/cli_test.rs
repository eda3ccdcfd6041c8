use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::Compression;
use flate2::write::GzEncoder;
use sha1::{Digest, Sha1};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> (bool, String, String) {
    // Use cargo run which will build if needed
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .current_dir(env::current_dir().unwrap())
        .output()
        .expect("Failed to execute command");

    let success = output.status.success();
    let stdout = String::from_utf8(output.stdout).unwrap_or_default();
    let stderr = String::from_utf8(output.stderr).unwrap_or_default();

    // Filter out cargo compilation messages from stderr
    let filtered_stderr: String = stderr
        .lines()
        .filter(|line| {
            !line.contains("Compiling")
                && !line.contains("Finished")
                && !line.contains("warning:")
                && !line.contains("note:")
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Combine stdout and filtered stderr for checking messages
    let combined_output = if stdout.is_empty() {
        filtered_stderr.clone()
    } else if filtered_stderr.is_empty() {
        stdout.clone()
    } else {
        format!("{}\n{}", stdout, filtered_stderr)
    };

    (success, combined_output, filtered_stderr)
}

fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Fabricate a minimal gzipped-tar box file carrying a metadata.json
fn make_box(dir: &Path, filename: &str, provider: &str) -> PathBuf {
    let path = dir.join(filename);
    let metadata = format!("{{\"provider\": \"{provider}\"}}");

    let file = fs::File::create(&path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut header = tar::Header::new_gnu();
    header.set_size(metadata.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "metadata.json", metadata.as_bytes())
        .unwrap();

    let encoder = builder.into_inner().unwrap();
    let mut file = encoder.finish().unwrap();
    file.flush().unwrap();
    path
}

fn sha1_hex(path: &Path) -> String {
    let mut hasher = Sha1::new();
    hasher.update(fs::read(path).unwrap());
    hex::encode(hasher.finalize())
}

fn catalog_json(catalog_path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(catalog_path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_add_creates_catalog_and_copies_box() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");
    let box_file = make_box(temp_dir.path(), "staging.box", "virtualbox");

    let (success, output, _) = run_command(&[
        "add",
        "--catalog",
        catalog.to_str().unwrap(),
        "--box",
        box_file.to_str().unwrap(),
        "--name",
        "testbox",
        "--description",
        "a box for testing",
        "--version",
        "1.0.0",
    ]);

    assert!(success, "Add command should succeed. output: {}", output);
    assert!(
        output.contains("Added testbox 1.0.0 (virtualbox)"),
        "Expected 'Added' in output: {}",
        output
    );

    let copied = temp_dir.path().join("testbox/testbox_1.0.0_virtualbox.box");
    assert!(copied.exists(), "Box file should be copied into place");

    let json = catalog_json(&catalog);
    assert_eq!(json["name"], "testbox");
    assert_eq!(json["description"], "a box for testing");
    assert_eq!(json["versions"][0]["version"], "1.0.0");
    let provider = &json["versions"][0]["providers"][0];
    assert_eq!(provider["name"], "virtualbox");
    assert_eq!(provider["checksum_type"], "sha1");
    assert_eq!(provider["checksum"], sha1_hex(&box_file).as_str());
    assert_eq!(
        provider["url"],
        format!(
            "file://{}/testbox/testbox_1.0.0_virtualbox.box",
            temp_dir.path().display()
        )
        .as_str()
    );
}

#[test]
fn test_add_with_explicit_provider_overrides_detection() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");
    let box_file = make_box(temp_dir.path(), "staging.box", "virtualbox");

    let (success, output, _) = run_command(&[
        "add",
        "--catalog",
        catalog.to_str().unwrap(),
        "--box",
        box_file.to_str().unwrap(),
        "--name",
        "testbox",
        "--version",
        "1.0.0",
        "--provider",
        "vmware",
    ]);

    assert!(success, "Add command should succeed. output: {}", output);
    let json = catalog_json(&catalog);
    assert_eq!(json["versions"][0]["providers"][0]["name"], "vmware");
    assert!(
        temp_dir
            .path()
            .join("testbox/testbox_1.0.0_vmware.box")
            .exists()
    );
}

#[test]
fn test_add_rejects_malformed_version() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");
    let box_file = make_box(temp_dir.path(), "staging.box", "virtualbox");

    let (success, output, _) = run_command(&[
        "add",
        "--catalog",
        catalog.to_str().unwrap(),
        "--box",
        box_file.to_str().unwrap(),
        "--name",
        "testbox",
        "--version",
        "not-a-version-at-all",
    ]);

    assert!(!success, "Add should fail for a malformed version");
    assert!(
        output.contains("malformed version"),
        "Expected 'malformed version' in output: {}",
        output
    );
    assert!(!catalog.exists(), "No catalog should be written");
}

#[test]
fn test_add_rejects_name_mismatch() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");
    let box_file = make_box(temp_dir.path(), "staging.box", "virtualbox");

    let (success, _, _) = run_command(&[
        "add",
        "--catalog",
        catalog.to_str().unwrap(),
        "--box",
        box_file.to_str().unwrap(),
        "--name",
        "testbox",
        "--version",
        "1.0.0",
    ]);
    assert!(success);

    let (success, output, _) = run_command(&[
        "add",
        "--catalog",
        catalog.to_str().unwrap(),
        "--box",
        box_file.to_str().unwrap(),
        "--name",
        "otherbox",
        "--version",
        "1.0.1",
    ]);

    assert!(!success, "Add under a different name should fail");
    assert!(
        output.contains("does not match"),
        "Expected name mismatch error in output: {}",
        output
    );
}

#[test]
fn test_query_filters_by_version_range() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");
    let box_file = make_box(temp_dir.path(), "staging.box", "virtualbox");

    for version in ["0.3.4", "0.3.5", "1.0.0"] {
        let (success, output, _) = run_command(&[
            "add",
            "--catalog",
            catalog.to_str().unwrap(),
            "--box",
            box_file.to_str().unwrap(),
            "--name",
            "testbox",
            "--version",
            version,
        ]);
        assert!(success, "Add {} should succeed. output: {}", version, output);
    }

    let (success, output, _) = run_command(&[
        "query",
        "--catalog",
        catalog.to_str().unwrap(),
        "--version",
        "<=0.3.5",
    ]);

    assert!(success, "Query should succeed. output: {}", output);
    assert!(output.contains("0.3.4"), "output: {}", output);
    assert!(output.contains("0.3.5"), "output: {}", output);
    assert!(!output.contains("1.0.0"), "output: {}", output);
}

#[test]
fn test_query_with_no_matches_reports_nothing_found() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");
    let box_file = make_box(temp_dir.path(), "staging.box", "virtualbox");

    let (success, _, _) = run_command(&[
        "add",
        "--catalog",
        catalog.to_str().unwrap(),
        "--box",
        box_file.to_str().unwrap(),
        "--name",
        "testbox",
        "--version",
        "1.0.0",
    ]);
    assert!(success);

    let (success, output, _) = run_command(&[
        "query",
        "--catalog",
        catalog.to_str().unwrap(),
        "--version",
        "=9.9.9",
    ]);

    assert!(success, "Query with no matches should still succeed");
    assert!(
        output.contains("No boxes match"),
        "Expected 'No boxes match' in output: {}",
        output
    );
}

#[test]
fn test_delete_removes_catalog_entries_and_files() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");
    let box_file = make_box(temp_dir.path(), "staging.box", "virtualbox");

    for version in ["0.9.0", "1.0.0"] {
        let (success, _, _) = run_command(&[
            "add",
            "--catalog",
            catalog.to_str().unwrap(),
            "--box",
            box_file.to_str().unwrap(),
            "--name",
            "testbox",
            "--version",
            version,
        ]);
        assert!(success);
    }

    let (success, output, _) = run_command(&[
        "delete",
        "--catalog",
        catalog.to_str().unwrap(),
        "--version",
        "<1.0.0",
        "--provider",
        ".*",
    ]);

    assert!(success, "Delete should succeed. output: {}", output);
    assert!(
        output.contains("Deleted 1 box(es)"),
        "Expected deletion report in output: {}",
        output
    );

    assert!(
        !temp_dir
            .path()
            .join("testbox/testbox_0.9.0_virtualbox.box")
            .exists(),
        "Deleted box file should be gone"
    );
    assert!(
        temp_dir
            .path()
            .join("testbox/testbox_1.0.0_virtualbox.box")
            .exists(),
        "Unmatched box file should remain"
    );

    let json = catalog_json(&catalog);
    assert_eq!(json["versions"].as_array().unwrap().len(), 1);
    assert_eq!(json["versions"][0]["version"], "1.0.0");
}

#[test]
fn test_show_on_fresh_location_prints_empty_catalog() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("testbox.json");

    let (success, output, _) =
        run_command(&["show", "--catalog", catalog.to_str().unwrap()]);

    assert!(success, "Show should succeed on a fresh location. output: {}", output);
    assert!(
        output.contains("(empty catalog)"),
        "Expected empty catalog marker in output: {}",
        output
    );
}

#[test]
fn test_unknown_backend_scheme_fails() {
    let (success, output, _) = run_command(&[
        "query",
        "--catalog",
        "ftp://example.com/testbox.json",
    ]);

    assert!(!success, "Unknown scheme should fail");
    assert!(
        output.contains("no known backend"),
        "Expected unknown backend error in output: {}",
        output
    );
}
