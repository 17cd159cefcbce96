//! Build script for the mixtape playlist merger.
//!
//! Places the `.env.example` configuration template in the user's local data
//! directory, next to the `.env` file the server reads at startup.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/mixtape/`.
///
/// - Linux: `~/.local/share/mixtape/.env.example`
/// - macOS: `~/Library/Application Support/mixtape/.env.example`
/// - Windows: `%LOCALAPPDATA%/mixtape/.env.example`
///
/// A missing template only produces a cargo warning. Failing to create the
/// target directory or write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    if !template.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
        return Ok(());
    }

    let mut target_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    target_dir.push("mixtape");
    fs::create_dir_all(&target_dir)?;

    fs::copy(&template, target_dir.join(".env.example"))?;

    Ok(())
}
