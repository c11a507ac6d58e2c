use std::{ffi::OsString, path::PathBuf};

pub use clap::{CommandFactory, Parser};

use crate::trace;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "qa-gen", version, about, args_override_self = true)]
pub struct Args {
    /// Name of the project
    pub project_name: String,

    /// Overwrite any already existing files
    #[arg(long)]
    pub force: bool,

    /// Print every action instead of performing it
    #[arg(long)]
    pub dry_run: bool,

    /// Where to create the project
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Remove the generated files from an existing project
    #[arg(long)]
    pub clean: bool,

    /// Kill any npm/npx command still running after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Flags that take no value. `--clean` is handled on its own.
const SWITCHES: [&str; 4] = ["--force", "--dry-run", "--help", "--version"];

/// Flags whose value is the following token.
const VALUED: [&str; 2] = ["--path", "--timeout"];

const CLEAN: &str = "--clean";

impl Args {
    /// Parses `tokens` (program name excluded), dropping whatever clap does not
    /// know about first, so stray arguments never abort a run.
    ///
    /// # Errors
    ///
    /// Returns the clap error when the project name is missing, a value is
    /// malformed, or `--help`/`--version` was requested.
    pub fn parse_lenient<I, T>(tokens: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let bin = OsString::from(Self::command().get_name().to_owned());

        Self::try_parse_from(std::iter::once(bin).chain(Self::known_tokens(tokens)))
    }

    /// Rewrites `tokens` into what clap expects.
    ///
    /// The first token is the project name even when it looks like a flag,
    /// unless it asks for help or the version. The rest is scanned left to
    /// right: switches are kept, a valued flag is joined with the token after
    /// it, anything else is dropped. `--clean` selects teardown wherever it
    /// appears, including as the value of another flag.
    pub fn known_tokens<I, T>(tokens: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let tokens: Vec<OsString> = tokens.into_iter().map(Into::<OsString>::into).collect();
        let mut kept = Vec::new();

        let Some((first, rest)) = tokens.split_first() else {
            return kept;
        };

        let name = if is_meta(first) {
            kept.push(first.clone());
            None
        } else {
            Some(first.clone())
        };

        let mut rest = rest.iter();
        while let Some(token) = rest.next() {
            let text = token.to_string_lossy().into_owned();

            if text == CLEAN {
                continue;
            } else if SWITCHES.contains(&text.as_str()) || matches!(text.as_str(), "-h" | "-V") {
                kept.push(token.clone());
            } else if VALUED.contains(&text.as_str()) {
                match rest.next() {
                    Some(value) => {
                        // `--path=-x` keeps clap from reading a dashed value as a flag
                        let mut joined = token.clone();
                        joined.push("=");
                        joined.push(value);
                        kept.push(joined);
                    }
                    None => trace!("Ignoring {text} without a value"),
                }
            } else if VALUED
                .iter()
                .any(|flag| text.starts_with(&format!("{flag}=")))
            {
                kept.push(token.clone());
            } else {
                trace!("Ignoring unrecognized argument {text}");
            }
        }

        if tokens.iter().any(|token| token == CLEAN) {
            kept.push(OsString::from(CLEAN));
        }

        if let Some(name) = name {
            // After `--` clap takes a dashed name as the positional
            kept.push(OsString::from("--"));
            kept.push(name);
        }

        kept
    }

    /// One line summary of what was parsed.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Project: {} | Force: {} | Dry-run: {} | Path: {}",
            self.project_name,
            self.force,
            self.dry_run,
            self.path.display()
        )
    }
}

fn is_meta(token: &OsString) -> bool {
    matches!(
        token.to_str(),
        Some("--help" | "-h" | "--version" | "-V")
    )
}
