use anyhow::Context as _;
use derive_builder::Builder;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{args::Args, materialize::WritePolicy, renderer::Context};

/// Everything a single invocation needs, fixed once the arguments are parsed.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct RunConfig {
    #[builder(setter(into))]
    project_name: String,
    #[builder(default)]
    force: bool,
    #[builder(default)]
    dry_run: bool,
    #[builder(setter(into), default = "PathBuf::from(\".\")")]
    destination: PathBuf,
    #[builder(setter(strip_option), default)]
    timeout: Option<Duration>,
}

impl RunConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.project_name {
            Some(ref name) if name.trim().is_empty() => {
                Err("Project name must not be empty".to_owned())
            }
            _ => Ok(()),
        }
    }
}

impl TryFrom<&Args> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> anyhow::Result<Self> {
        let mut builder = RunConfig::builder();

        builder
            .project_name(args.project_name.as_str())
            .force(args.force)
            .dry_run(args.dry_run)
            .destination(args.path.as_path());

        if let Some(secs) = args.timeout {
            builder.timeout(Duration::from_secs(secs));
        }

        builder.build().context("Invalid arguments")
    }
}

impl RunConfig {
    /// Create a new [`RunConfig`] builder
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::create_empty()
    }

    /// Directory the project lives in: `<destination>/<project name>`.
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        self.destination.join(&self.project_name)
    }

    #[must_use]
    pub fn policy(&self) -> WritePolicy {
        WritePolicy {
            dry_run: self.dry_run,
            force: self.force,
        }
    }

    /// Values available to every template in the manifest.
    #[must_use]
    pub fn template_context(&self) -> Context {
        Context::from([("project_name".to_owned(), self.project_name.clone())])
    }

    /// Returns the project name of this [`RunConfig`].
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    #[must_use]
    pub fn force(&self) -> bool {
        self.force
    }

    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the destination (`--path`) of this [`RunConfig`].
    #[must_use]
    pub fn destination(&self) -> &Path {
        self.destination.as_path()
    }

    /// Returns the subprocess timeout of this [`RunConfig`], if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = RunConfig::builder().project_name("myapp").build().unwrap();

        assert!(!config.force());
        assert!(!config.dry_run());
        assert_eq!(config.destination(), Path::new("."));
        assert_eq!(config.timeout(), None);
        assert_eq!(config.project_root(), Path::new(".").join("myapp"));
    }

    #[test]
    fn empty_project_name_is_rejected() {
        assert!(RunConfig::builder().project_name("  ").build().is_err());
        assert!(RunConfig::builder().build().is_err());
    }

    #[test]
    fn from_args() {
        let args = Args::parse_lenient(["demo", "--path", "/srv", "--dry-run", "--timeout", "30"])
            .unwrap();
        let config = RunConfig::try_from(&args).unwrap();

        assert_eq!(config.project_name(), "demo");
        assert!(config.dry_run());
        assert_eq!(config.project_root(), PathBuf::from("/srv/demo"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.policy(),
            WritePolicy {
                dry_run: true,
                force: false
            }
        );
    }

    #[test]
    fn context_carries_the_project_name() {
        let config = RunConfig::builder().project_name("shop").build().unwrap();

        assert_eq!(
            config.template_context().get("project_name").map(String::as_str),
            Some("shop")
        );
    }
}
