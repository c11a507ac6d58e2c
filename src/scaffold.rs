use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::{info, plan};

/// Created under the project root, in this order.
pub const TEST_FOLDERS: [&str; 5] = [
    "tests/e2e",
    "tests/front_end/feature_one",
    "tests/back_end/feature_one",
    "tests/support/POMs/feature_one",
    "tests/support/utils",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStatus {
    Created,
    Exists,
    /// `--dry-run`; nothing was checked or created.
    Planned,
}

/// Makes sure the project root exists, creating missing parents too.
///
/// # Errors
///
/// Returns an [`Err`] if the directory can not be created.
pub fn ensure_root(root: &Path, dry_run: bool) -> Result<RootStatus> {
    if dry_run {
        plan!("Would create root folder if missing: {}", root.display());
        return Ok(RootStatus::Planned);
    }

    if root.exists() {
        info!("Exists: {}", root.display());
        return Ok(RootStatus::Exists);
    }

    fs_extra::dir::create_all(root, false)
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("Failed to create {}", root.display()))?;
    info!("Created: {}", root.display());

    Ok(RootStatus::Created)
}

/// Creates every entry of [`TEST_FOLDERS`] below `root`. Folders that already
/// exist are left alone.
///
/// # Errors
///
/// Returns an [`Err`] if any folder can not be created.
pub fn create_folders(root: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::with_capacity(TEST_FOLDERS.len());

    for relative in TEST_FOLDERS {
        let folder = root.join(relative);

        if dry_run {
            plan!("Would create: {}", folder.display());
        } else {
            fs_extra::dir::create_all(&folder, false)
                .map_err(|e| anyhow!("{e}"))
                .with_context(|| format!("Failed to create {}", folder.display()))?;
            info!("Created: {}", folder.display());
        }

        folders.push(folder);
    }

    Ok(folders)
}
