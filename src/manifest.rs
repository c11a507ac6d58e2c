//! The files every generated project starts with.

/// Where the contents of an [`Entry`] come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Written verbatim.
    Literal(&'static str),
    /// Name of a template known to the renderer, rendered with the run's context.
    Template(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Relative to the project root, always `/` separated.
    pub path: &'static str,
    pub source: Source,
}

macro_rules! literal {
    ($path:literal) => {
        Entry {
            path: $path,
            source: Source::Literal(include_str!(concat!("../embedded/", $path))),
        }
    };
    ($path:literal, $file:literal) => {
        Entry {
            path: $path,
            source: Source::Literal(include_str!(concat!("../embedded/", $file))),
        }
    };
}

/// Written in this order.
pub const MANIFEST: &[Entry] = &[
    literal!("playwright.config.ts"),
    literal!("tsconfig.json"),
    literal!("tests/e2e/example.spec.ts"),
    literal!("tests/front_end/feature_one/example_frontend.spec.ts"),
    literal!("tests/back_end/feature_one/example_backend.spec.ts"),
    literal!("tests/support/POMs/feature_one/example.page.ts"),
    literal!("tests/support/utils/helpers.ts"),
    literal!("tests/support/utils/test-data.ts"),
    literal!("tests/support/utils/fixtures.ts"),
    literal!(".gitignore", "gitignore"),
    Entry {
        path: "README.md",
        source: Source::Template("README.md.tera"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{renderer::TeraRenderer, scaffold::TEST_FOLDERS};
    use std::{collections::HashSet, path::Path};

    #[test]
    fn eleven_unique_relative_paths() {
        let paths: HashSet<_> = MANIFEST.iter().map(|e| e.path).collect();

        assert_eq!(MANIFEST.len(), 11);
        assert_eq!(paths.len(), MANIFEST.len());
        assert!(MANIFEST.iter().all(|e| Path::new(e.path).is_relative()));
    }

    #[test]
    fn test_files_land_in_scaffolded_folders() {
        for entry in MANIFEST.iter().filter(|e| e.path.starts_with("tests/")) {
            let parent = Path::new(entry.path).parent().unwrap();

            assert!(
                TEST_FOLDERS.iter().any(|f| Path::new(f) == parent),
                "{} is outside the scaffolded folders",
                entry.path
            );
        }
    }

    #[test]
    fn every_template_is_embedded() {
        let renderer = TeraRenderer::embedded().unwrap();
        let names: Vec<_> = renderer.names().collect();

        for entry in MANIFEST {
            if let Source::Template(name) = entry.source {
                assert!(names.contains(&name), "{name} is not embedded");
            }
        }
    }

    #[test]
    fn fixtures_fall_back_without_auth_token() {
        let fixtures = MANIFEST
            .iter()
            .find(|e| e.path == "tests/support/utils/fixtures.ts")
            .unwrap();

        let Source::Literal(contents) = fixtures.source else {
            panic!("fixtures.ts should be literal");
        };
        assert!(contents.contains(r#"process.env.AUTH_TOKEN ?? "fake-token""#));
    }
}
