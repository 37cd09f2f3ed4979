//! Input resolution and interactive prompts
//!
//! Turns the INPUT arguments (files, directories, glob patterns) into the
//! list of files to upload, and asks for confirmation where needed.

use crate::error::{Result, VitiError};
use crate::models::FileSource;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// All CSV files under a directory, sorted for consistent processing order
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut csv_files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_csv(path) {
            csv_files.push(path.to_path_buf());
        }
    }
    csv_files.sort();

    debug!(
        "Discovered {} CSV files in {}",
        csv_files.len(),
        dir.display()
    );
    Ok(csv_files)
}

/// Expand INPUT arguments into file paths, keeping argument order and
/// dropping repeats
pub fn resolve_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            resolved.push(path.to_path_buf());
        } else if path.is_dir() {
            resolved.extend(discover_csv_files(path)?);
        } else if is_pattern(input) {
            let mut matched: Vec<PathBuf> = Vec::new();
            for entry in glob::glob(input)? {
                match entry {
                    Ok(p) if p.is_file() => matched.push(p),
                    Ok(_) => {}
                    Err(e) => warn!("Skipping unreadable match for '{}': {}", input, e),
                }
            }
            if matched.is_empty() {
                return Err(VitiError::InputNotFound {
                    path: path.to_path_buf(),
                });
            }
            matched.sort();
            resolved.extend(matched);
        } else {
            return Err(VitiError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let mut seen = HashSet::new();
    resolved.retain(|p| seen.insert(p.clone()));
    Ok(resolved)
}

/// Read every file into memory
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<FileSource>> {
    paths.iter().map(|p| FileSource::from_path(p)).collect()
}

fn parse_confirmation(input: &str, default_yes: bool) -> Option<bool> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Some(default_yes);
    }
    match input.as_str() {
        "y" | "yes" | "s" | "sim" => Some(true),
        "n" | "no" | "nao" | "não" => Some(false),
        _ => None,
    }
}

/// Get user confirmation for an action
pub fn prompt_confirmation(message: &str, default_yes: bool) -> Result<bool> {
    let default_text = if default_yes { "Y/n" } else { "y/N" };

    loop {
        print!("{} [{}]: ", message, default_text);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default_yes);
        }

        match parse_confirmation(&input, default_yes) {
            Some(answer) => return Ok(answer),
            None => println!("Please enter 'y' for yes or 'n' for no."),
        }
    }
}
