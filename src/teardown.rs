use std::path::{Path, PathBuf};

use crate::{info, plan, trace};

/// Everything generation leaves in the project root, relative to it.
pub const ARTIFACTS: [&str; 8] = [
    "node_modules",
    "package.json",
    "package-lock.json",
    "tsconfig.json",
    "playwright.config.ts",
    "tests",
    ".gitignore",
    "README.md",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    WouldRemove,
    RemovedDirectory,
    RemovedFile,
    NothingToRemove,
}

/// Deletes every entry of [`ARTIFACTS`] under `root` without asking. Other
/// files in `root` are left alone. Removal problems are only traced; a
/// half-removed directory is not worth aborting the teardown for.
pub fn remove_node_project(root: &Path, dry_run: bool) -> Vec<(PathBuf, RemoveOutcome)> {
    ARTIFACTS
        .iter()
        .map(|relative| {
            let target = root.join(relative);
            let outcome = remove(&target, dry_run);
            (target, outcome)
        })
        .collect()
}

fn remove(target: &Path, dry_run: bool) -> RemoveOutcome {
    if dry_run {
        plan!("Would remove: {}", target.display());
        return RemoveOutcome::WouldRemove;
    }

    if target.is_dir() {
        if let Err(e) = fs_extra::dir::remove(target) {
            trace!("Ignoring error while removing {}: {e}", target.display());
        }
        info!("Removed directory: {}", target.display());
        RemoveOutcome::RemovedDirectory
    } else if target.is_file() {
        if let Err(e) = fs_extra::file::remove(target) {
            trace!("Ignoring error while removing {}: {e}", target.display());
        }
        info!("Removed file: {}", target.display());
        RemoveOutcome::RemovedFile
    } else {
        info!("Nothing to remove at: {}", target.display());
        RemoveOutcome::NothingToRemove
    }
}
