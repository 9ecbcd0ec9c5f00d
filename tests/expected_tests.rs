//! Test runner that compares transpiler output against .expected.java and .expected.err files
//!
//! Run with: cargo test --test expected_tests
//! Regenerate with: cargo run --bin accept_expected

use libtest_mimic::{Arguments, Failed, Trial};
use pyjava_transpiler::{GenerateOptions, IndentMode, transpile_with};
use std::fs;
use std::path::{Path, PathBuf};

/// Collect all .py fixture files
fn collect_test_files() -> Vec<PathBuf> {
    let pattern = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/**/*.py");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(Result::ok)
        .collect();
    files.sort();
    files
}

/// Fixtures under `structural/` are generated with depth-based indentation
fn options_for(path: &Path) -> GenerateOptions {
    if path.to_string_lossy().contains("/structural/") {
        GenerateOptions { indent: IndentMode::Structural { width: 4 } }
    } else {
        GenerateOptions::default()
    }
}

fn test_name(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    path.strip_prefix(&root).unwrap_or(path).with_extension("").to_string_lossy().into_owned()
}

fn check_output(path: &Path) -> Result<(), Failed> {
    let expected_java = path.with_extension("expected.java");
    let expected = fs::read_to_string(&expected_java)
        .map_err(|e| format!("Missing expected file {}: {}", expected_java.display(), e))?;
    let source = fs::read_to_string(path).map_err(|e| e.to_string())?;

    let result = transpile_with(&source, &options_for(path))
        .map_err(|e| format!("Compile error:\n{}", e.render(&source, &path.display().to_string())))?;

    if result.code.trim() != expected.trim() {
        return Err(format!(
            "Output mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
            expected.trim(),
            result.code.trim()
        )
        .into());
    }
    Ok(())
}

fn check_error(path: &Path) -> Result<(), Failed> {
    let expected_err = path.with_extension("expected.err");
    let expected = fs::read_to_string(&expected_err)
        .map_err(|e| format!("Missing expected file {}: {}", expected_err.display(), e))?;
    let source = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");

    match transpile_with(&source, &options_for(path)) {
        Ok(_) => Err("Expected error but got success".into()),
        Err(e) => {
            let actual = e.render(&source, filename);
            if actual.trim() != expected.trim() {
                return Err(format!(
                    "Error mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
                    expected.trim(),
                    actual.trim()
                )
                .into());
            }
            Ok(())
        }
    }
}

fn main() {
    let args = Arguments::from_args();

    let tests = collect_test_files()
        .into_iter()
        .map(|path| {
            let name = test_name(&path);
            if path.to_string_lossy().contains("/errors/") {
                Trial::test(name, move || check_error(&path))
            } else {
                Trial::test(name, move || check_output(&path))
            }
        })
        .collect();

    libtest_mimic::run(&args, tests).exit();
}
