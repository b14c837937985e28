//! Build script for PawPal
//!
//! Bumps the persistent build counter and embeds build metadata for the
//! status tool and startup banner.

use std::fs;
use std::path::Path;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn read_build_number(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let path = Path::new(BUILD_NUMBER_FILE);
    let build_number = read_build_number(path) + 1;

    fs::write(path, build_number.to_string())
        .expect("Failed to write build number file");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=PAWPAL_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=PAWPAL_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:warning=PawPal build #{} at {}", build_number, timestamp);
}
