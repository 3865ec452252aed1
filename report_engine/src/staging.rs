//! Artifact discovery and staging
//!
//! Recursively scans the raw data folder for source tables, picture files
//! and waveform captures, and copies the finished report plus its marked
//! artifacts to the network staging area. Staging is best-effort: copy
//! failures are logged and never invalidate the already-written report.

use crate::config::constants::{artifacts, layout, STAGING_ROOT};
use crate::log_warning;
use crate::logging::codes;
use std::fs;
use std::path::{Path, PathBuf};

/// Artifact and source files found under the raw data folder
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    pub tables: Vec<PathBuf>,
    pub pictures: Vec<PathBuf>,
    /// Waveform captures, found under a folder whose name contains the
    /// waveform hint
    pub waveforms: Vec<PathBuf>,
}

/// Recursively collect files below `root` whose path contains `pattern`
pub fn find_files(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect(root, pattern, &mut found);
    found.sort();
    found
}

fn collect(dir: &Path, pattern: &str, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, pattern, found);
        } else if path.to_string_lossy().contains(pattern) {
            found.push(path);
        }
    }
}

/// Scan the raw data folder once for everything the run needs
pub fn discover(root: &Path) -> DiscoveredFiles {
    let tables = find_files(root, ".csv");
    let pictures = find_files(root, ".png");

    // waveform captures live in their own subfolder; everything else
    // with the same extension is measurement data
    let mut waveforms = Vec::new();
    if let Some(waveform_folder) = find_folder(root, layout::WAVEFORM_FOLDER_HINT) {
        waveforms = find_files(&waveform_folder, ".mat");
    }

    DiscoveredFiles {
        tables,
        pictures,
        waveforms,
    }
}

fn find_folder(root: &Path, hint: &str) -> Option<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if path.to_string_lossy().contains(hint) {
                return Some(path);
            }
            stack.push(path);
        }
    }
    None
}

/// Destination folder in the staging area for one project
pub fn staging_folder(project: &str) -> PathBuf {
    PathBuf::from(STAGING_ROOT)
        .join(project.to_uppercase())
        .join("job")
}

/// Copy the report document and all marked artifacts to the staging area.
/// Returns the number of files copied; every failure is logged and
/// skipped.
pub fn copy_to_staging(
    report_path: &Path,
    files: &DiscoveredFiles,
    staging_area: &Path,
) -> usize {
    let mut copied = 0;

    let marked = |paths: &[PathBuf], marker: &str| -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|path| {
                path.to_string_lossy()
                    .to_lowercase()
                    .contains(&marker.to_lowercase())
            })
            .cloned()
            .collect()
    };

    let mut candidates = marked(&files.pictures, artifacts::PICTURE_MARKER);
    candidates.extend(marked(&files.waveforms, artifacts::WAVEFORM_MARKER));
    candidates.push(report_path.to_path_buf());

    for source in candidates {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let destination = staging_area.join(file_name);
        match fs::copy(&source, &destination) {
            Ok(_) => copied += 1,
            Err(e) => {
                log_warning!(codes::staging::COPY_FAILED, "Couldn't copy file to staging area",
                    "dataset" => "staging",
                    "file" => source.display(),
                    "reason" => e
                );
            }
        }
    }
    copied
}
