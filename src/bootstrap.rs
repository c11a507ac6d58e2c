use std::{path::Path, time::Duration};

use crate::{
    info, plan,
    prereq::Toolchain,
    process::{self, CommandError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Npm,
    Npx,
}

impl Tool {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tool::Npm => "npm",
            Tool::Npx => "npx",
        }
    }
}

/// One command of the bootstrap, and what to report once it succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub tool: Tool,
    pub args: &'static [&'static str],
    pub done: &'static str,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", process::display(self.tool.name(), self.args))
    }
}

const NPM_INIT: Step = Step {
    tool: Tool::Npm,
    args: &["init", "-y"],
    done: "Node.js project initialized.",
};

const FAKER: Step = Step {
    tool: Tool::Npm,
    args: &["install", "-D", "@faker-js/faker"],
    done: "Faker installed.",
};

const DOTENV: Step = Step {
    tool: Tool::Npm,
    args: &["install", "dotenv"],
    done: "dotenv installed.",
};

const PLAYWRIGHT: Step = Step {
    tool: Tool::Npm,
    args: &[
        "install",
        "-D",
        "playwright",
        "@playwright/test",
        "typescript",
        "ts-node",
    ],
    done: "Playwright installed.",
};

const BROWSERS_WITH_DEPS: Step = Step {
    tool: Tool::Npx,
    args: &["playwright", "install", "--with-deps"],
    done: "Playwright system dependencies and browsers installed.",
};

const BROWSERS: Step = Step {
    tool: Tool::Npx,
    args: &["playwright", "install"],
    done: "Playwright browsers installed.",
};

/// The commands [`init_node_project`] runs, in order. `with_system_deps` asks
/// Playwright to also install the OS packages its browsers need.
#[must_use]
pub fn steps(with_system_deps: bool) -> [Step; 5] {
    [
        NPM_INIT,
        FAKER,
        DOTENV,
        PLAYWRIGHT,
        if with_system_deps {
            BROWSERS_WITH_DEPS
        } else {
            BROWSERS
        },
    ]
}

/// [`steps`] for the platform we are running on. Only Linux gets the
/// system dependencies.
#[must_use]
pub fn platform_steps() -> [Step; 5] {
    steps(cfg!(target_os = "linux"))
}

/// Runs `steps` one after the other inside `root`, stopping at the first
/// failure. Nothing that already ran is undone. With `dry_run` every command
/// is printed instead.
///
/// # Errors
///
/// Returns the [`CommandError`] of the first command that could not be found,
/// failed, or outlived `timeout`.
pub fn run_steps(
    root: &Path,
    toolchain: &Toolchain,
    steps: &[Step],
    dry_run: bool,
    timeout: Option<Duration>,
) -> Result<(), CommandError> {
    for step in steps {
        if dry_run {
            plan!("Would run: {step}");
            continue;
        }

        let program = match step.tool {
            Tool::Npm => toolchain.npm.as_path(),
            Tool::Npx => toolchain.npx()?,
        };

        process::run(program, step.args, root, timeout)?;
        info!("{}", step.done);
    }

    Ok(())
}

/// Creates `package.json` in `root` and installs Faker, dotenv, Playwright
/// and its browsers.
///
/// # Errors
///
/// See [`run_steps`].
pub fn init_node_project(
    root: &Path,
    toolchain: &Toolchain,
    dry_run: bool,
    timeout: Option<Duration>,
) -> Result<(), CommandError> {
    run_steps(root, toolchain, &platform_steps(), dry_run, timeout)
}
