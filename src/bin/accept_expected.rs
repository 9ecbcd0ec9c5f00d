//! Binary to generate/update .expected.java and .expected.err fixture files
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- fibo    # Update only fixtures matching "fibo"

use pyjava_transpiler::{GenerateOptions, IndentMode, transpile_with};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixture_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|s| s == "py"))
    {
        let path = entry.path();
        let path_str = path.to_string_lossy();

        // Apply filter if provided
        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn process_file(path: &Path) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return;
        }
    };

    let path_str = path.to_string_lossy();
    let is_error_test = path_str.contains("/errors/");
    let options = if path_str.contains("/structural/") {
        GenerateOptions { indent: IndentMode::Structural { width: 4 } }
    } else {
        GenerateOptions::default()
    };

    match transpile_with(&source, &options) {
        Ok(output) => {
            let expected_java = path.with_extension("expected.java");
            if let Err(e) = fs::write(&expected_java, &output.code) {
                eprintln!("Failed to write {:?}: {}", expected_java, e);
            } else {
                println!("  wrote {}", expected_java.display());
            }

            // Remove any stale .expected.err if this now compiles
            let expected_err = path.with_extension("expected.err");
            if expected_err.exists() {
                let _ = fs::remove_file(&expected_err);
            }
        }
        Err(e) => {
            if is_error_test {
                let expected_err = path.with_extension("expected.err");
                let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");
                if let Err(err) = fs::write(&expected_err, e.render(&source, filename)) {
                    eprintln!("Failed to write {:?}: {}", expected_err, err);
                } else {
                    println!("  wrote {}", expected_err.display());
                }
            } else {
                eprintln!("ERROR: {:?} failed to compile but is not in errors/: {}", path, e);
            }
        }
    }
}
