use std::{
    ffi::OsStr,
    io::{self, Read},
    path::Path,
    process::{Child, Command, ExitStatus, Output, Stdio},
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

use crate::trace;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Why an external command did not succeed.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("`{command}` not found")]
    NotFound { command: String },

    #[error("`{command}` exited with {status}{}", stderr_suffix(.stderr))]
    NonZeroExit {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`{command}` did not finish within {}s", .after.as_secs())]
    Timeout { command: String, after: Duration },

    #[error("Failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}

impl CommandError {
    fn spawn(command: String, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CommandError::NotFound { command }
        } else {
            CommandError::Io { command, source }
        }
    }
}

/// `program args...` as a user would type it.
pub fn display<S: AsRef<OsStr>>(program: impl AsRef<OsStr>, args: &[S]) -> String {
    std::iter::once(program.as_ref())
        .chain(args.iter().map(AsRef::as_ref))
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `program` with `args` inside `cwd` and waits for it. Stdout goes
/// straight to the terminal; stderr is collected for the error message.
///
/// # Errors
///
/// Returns a [`CommandError`] if the program can not be started, exits with a
/// non-zero status, or is still running after `timeout`.
pub fn run<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<(), CommandError> {
    let command = display(program.file_name().unwrap_or(program.as_os_str()), args);
    trace!("Running `{command}` in {}", cwd.display());

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CommandError::spawn(command.clone(), e))?;

    // Drained on its own thread so a child writing lots of warnings never
    // blocks on a full pipe while we wait on it.
    let stderr = child.stderr.take();
    let reader = thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = stderr {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    });

    let status = match timeout {
        Some(limit) => wait_with_timeout(&mut child, limit, &command)?,
        None => child.wait().map_err(|source| CommandError::Io {
            command: command.clone(),
            source,
        })?,
    };

    let stderr = reader.join().unwrap_or_default();

    if status.success() {
        if !stderr.trim().is_empty() {
            trace!("`{command}` stderr:\n{}", stderr.trim());
        }
        Ok(())
    } else {
        Err(CommandError::NonZeroExit {
            command,
            status,
            stderr,
        })
    }
}

fn wait_with_timeout(
    child: &mut Child,
    limit: Duration,
    command: &str,
) -> Result<ExitStatus, CommandError> {
    let started = Instant::now();
    let io_err = |source| CommandError::Io {
        command: command.to_owned(),
        source,
    };

    loop {
        if let Some(status) = child.try_wait().map_err(io_err)? {
            return Ok(status);
        }

        if started.elapsed() >= limit {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CommandError::Timeout {
                command: command.to_owned(),
                after: limit,
            });
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Runs `program` with `args` and returns whatever it printed, for short
/// queries like `--version`.
///
/// # Errors
///
/// Same as [`run`], minus the timeout.
pub fn capture<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> Result<Output, CommandError> {
    let command = display(program.file_name().unwrap_or(program.as_os_str()), args);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| CommandError::spawn(command.clone(), e))?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(CommandError::NonZeroExit {
            command,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
