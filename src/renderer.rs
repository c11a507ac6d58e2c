use anyhow::{Context as _, Result};
use std::collections::BTreeMap;
use tera::Tera;

/// Variables handed to a template, by name.
pub type Context = BTreeMap<String, String>;

/// Templates compiled into the binary as `(name, source)`.
pub const EMBEDDED: &[(&str, &str)] = &[(
    "README.md.tera",
    include_str!("../embedded/README.md.tera"),
)];

/// Turns a named template plus its variables into file contents.
pub trait Render {
    /// # Errors
    ///
    /// Returns an [`Err`] if no template is called `name` or it fails to render
    /// with `context` (e.g. it uses a variable the context lacks).
    fn render(&self, name: &str, context: &Context) -> Result<String>;
}

pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Loads every template in [`EMBEDDED`].
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if any embedded template does not parse.
    pub fn embedded() -> Result<Self> {
        Self::from_sources(EMBEDDED.iter().copied())
    }

    /// # Errors
    ///
    /// Returns an [`Err`] if any of the templates does not parse.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(sources)
            .context("Failed to load templates")?;

        Ok(Self { tera })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tera.get_template_names()
    }
}

impl Render for TeraRenderer {
    fn render(&self, name: &str, context: &Context) -> Result<String> {
        let mut ctx = tera::Context::new();
        for (key, value) in context {
            ctx.insert(key.as_str(), value);
        }

        self.tera
            .render(name, &ctx)
            .with_context(|| format!("Failed to render template {name}"))
    }
}
