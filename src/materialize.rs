use anyhow::{anyhow, Context as _, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    info, plan,
    manifest::{Entry, Source},
    renderer::{Context, Render},
    warn,
};

/// How to treat destinations, shared by every file of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritePolicy {
    pub dry_run: bool,
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    WouldCreate,
    WouldOverwrite,
    Created,
    Overwrote,
    /// Already there and `--force` was not given; left untouched.
    Skipped,
}

/// Writes `content` to `dest` unless the policy says otherwise.
///
/// # Errors
///
/// Returns an [`Err`] if the parent directories or the file can not be written.
pub fn write_one(dest: &Path, content: &str, policy: WritePolicy) -> Result<WriteOutcome> {
    let exists = dest.exists();

    if policy.dry_run {
        return Ok(if exists {
            plan!("Would overwrite: {}", dest.display());
            WriteOutcome::WouldOverwrite
        } else {
            plan!("Would create: {}", dest.display());
            WriteOutcome::WouldCreate
        });
    }

    if let Some(parent) = dest.parent() {
        fs_extra::dir::create_all(parent, false)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    if exists && !policy.force {
        return Ok(skip(dest));
    }

    fs::write(dest, content).with_context(|| format!("Failed to write {}", dest.display()))?;

    Ok(if exists {
        info!("Overwrote: {}", dest.display());
        WriteOutcome::Overwrote
    } else {
        info!("Wrote: {}", dest.display());
        WriteOutcome::Created
    })
}

fn skip(dest: &Path) -> WriteOutcome {
    warn!("Exists (skip): {}", dest.display());
    WriteOutcome::Skipped
}

/// Applies [`write_one`] to every entry, in order. Templates are only rendered
/// when something is actually going to be written.
///
/// # Errors
///
/// Returns an [`Err`] on the first entry that fails to render or write; the
/// entries before it stay written.
pub fn materialize_all(
    root: &Path,
    entries: &[Entry],
    renderer: &impl Render,
    context: &Context,
    policy: WritePolicy,
) -> Result<Vec<(PathBuf, WriteOutcome)>> {
    let mut outcomes = Vec::with_capacity(entries.len());

    for entry in entries {
        let dest = root.join(entry.path);

        let outcome = match entry.source {
            Source::Literal(content) => write_one(&dest, content, policy)?,
            Source::Template(name) if policy.dry_run => {
                plan!("Would render {name} -> {}", dest.display());
                if dest.exists() {
                    WriteOutcome::WouldOverwrite
                } else {
                    WriteOutcome::WouldCreate
                }
            }
            Source::Template(_) if dest.exists() && !policy.force => skip(&dest),
            Source::Template(name) => {
                let content = renderer.render(name, context)?;
                write_one(&dest, &content, policy)?
            }
        };

        outcomes.push((dest, outcome));
    }

    Ok(outcomes)
}
