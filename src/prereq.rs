use regex::Regex;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;

use crate::{
    info,
    process::{self, CommandError},
    trace,
};

/// Leading major version, with or without a `v` prefix (`v20.11.1`, `10.2.4`).
static MAJOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+)").expect("major version regex is valid"));

#[derive(Error, Debug)]
pub enum PrerequisiteError {
    #[error("{tool} not found. Install {tool} {required}+.\nSearched PATH: {search_path}")]
    Missing {
        tool: &'static str,
        required: u64,
        search_path: String,
    },

    #[error("{tool} found but failed to run. Reinstall {tool}.")]
    Failed {
        tool: &'static str,
        #[source]
        source: CommandError,
    },

    #[error("Could not read a version from `{tool} --version` (got {output:?})")]
    Unparsable { tool: &'static str, output: String },

    #[error("{tool} {required}+ required, found {found}")]
    TooOld {
        tool: &'static str,
        found: String,
        required: u64,
    },
}

/// A tool that must be installed, and the oldest major version accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub tool: &'static str,
    pub min_major: u64,
}

pub const NODE: Requirement = Requirement {
    tool: "node",
    min_major: 18,
};

pub const NPM: Requirement = Requirement {
    tool: "npm",
    min_major: 9,
};

/// Resolved locations of the Node.js tools the bootstrap runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub node: PathBuf,
    pub npm: PathBuf,
    /// Only needed to install the browsers, so its absence is reported then.
    pub npx: Option<PathBuf>,
}

pub struct Prerequisites {
    search_path: Option<OsString>,
}

impl Default for Prerequisites {
    fn default() -> Self {
        Self::new()
    }
}

impl Prerequisites {
    /// Looks tools up on the process `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self { search_path: None }
    }

    /// Looks tools up on `paths` instead of the process `PATH`.
    #[must_use]
    pub fn with_search_path(paths: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(paths.into()),
        }
    }

    /// Checks that `node` and `npm` are installed and recent enough.
    ///
    /// # Errors
    ///
    /// Returns a [`PrerequisiteError`] for the first tool that is missing,
    /// fails to report its version, or is too old.
    pub fn check(&self) -> Result<Toolchain, PrerequisiteError> {
        let node = self.require(NODE)?;
        info!("Checked Node.js: {}", node.display());

        let npm = self.require(NPM)?;
        info!("Checked npm: {}", npm.display());

        let npx = self.find("npx");
        if npx.is_none() {
            trace!("npx not found on {}", self.search_path_display());
        }

        Ok(Toolchain { node, npm, npx })
    }

    fn require(&self, requirement: Requirement) -> Result<PathBuf, PrerequisiteError> {
        let Requirement { tool, min_major } = requirement;

        let path = self.find(tool).ok_or_else(|| PrerequisiteError::Missing {
            tool,
            required: min_major,
            search_path: self.search_path_display(),
        })?;

        let output = process::capture(&path, &["--version"])
            .map_err(|source| PrerequisiteError::Failed { tool, source })?;

        // Some tools print their version on stderr
        let text = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr)
        } else {
            String::from_utf8_lossy(&output.stdout)
        };
        let version = text.trim();
        trace!("{tool} --version: {version}");

        let major = parse_major(version).ok_or_else(|| PrerequisiteError::Unparsable {
            tool,
            output: version.to_owned(),
        })?;

        if major < min_major {
            return Err(PrerequisiteError::TooOld {
                tool,
                found: version.to_owned(),
                required: min_major,
            });
        }

        Ok(path)
    }

    fn find(&self, tool: &str) -> Option<PathBuf> {
        match self.search_path {
            Some(ref paths) => {
                let cwd = std::env::current_dir().ok()?;
                which::which_in(tool, Some(paths), cwd).ok()
            }
            None => which::which(tool).ok(),
        }
    }

    fn search_path_display(&self) -> String {
        self.search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<unset>".to_owned())
    }
}

/// Major version at the very start of `version`.
#[must_use]
pub fn parse_major(version: &str) -> Option<u64> {
    MAJOR_RE
        .captures(version.trim())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl Toolchain {
    /// # Errors
    ///
    /// Returns [`CommandError::NotFound`] when `npx` was not on the search path.
    pub fn npx(&self) -> Result<&Path, CommandError> {
        self.npx.as_deref().ok_or(CommandError::NotFound {
            command: "npx".to_owned(),
        })
    }
}
