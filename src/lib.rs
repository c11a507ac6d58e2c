//! Scaffolding for Playwright + TypeScript test automation projects.
//!
//! [`generate`] runs every step after the prerequisite check; the `qa-gen`
//! binary adds argument parsing, the check itself and exit codes.

pub mod args;
pub mod bootstrap;
pub mod config;
pub mod log;
pub mod manifest;
pub mod materialize;
pub mod prereq;
pub mod process;
pub mod renderer;
pub mod scaffold;
pub mod teardown;

use anyhow::{Context, Result};
use std::path::PathBuf;

use config::RunConfig;
use materialize::WriteOutcome;
use prereq::Toolchain;
use renderer::Render;
use scaffold::RootStatus;

/// What a [`generate`] run did, or with `--dry-run` would have done.
#[derive(Debug)]
pub struct Summary {
    pub root: PathBuf,
    pub root_status: RootStatus,
    pub folders: Vec<PathBuf>,
    pub files: Vec<(PathBuf, WriteOutcome)>,
}

impl Summary {
    #[must_use]
    pub fn count(&self, outcome: WriteOutcome) -> usize {
        self.files.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Creates the project root and test folders, bootstraps the npm project,
/// then writes every file of [`manifest::MANIFEST`].
///
/// # Errors
///
/// Returns an [`Err`] as soon as a step fails. Nothing done before the
/// failure is rolled back.
pub fn generate(config: &RunConfig, toolchain: &Toolchain, renderer: &impl Render) -> Result<Summary> {
    let root = config.project_root();

    let root_status = scaffold::ensure_root(&root, config.dry_run())?;
    let folders = scaffold::create_folders(&root, config.dry_run())?;

    bootstrap::init_node_project(&root, toolchain, config.dry_run(), config.timeout())
        .context("Failed to bootstrap the Node.js project")?;

    let files = materialize::materialize_all(
        &root,
        manifest::MANIFEST,
        renderer,
        &config.template_context(),
        config.policy(),
    )?;

    Ok(Summary {
        root,
        root_status,
        folders,
        files,
    })
}
