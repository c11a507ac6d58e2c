//! End to end runs of `generate` and the teardown against scratch directories.

use qa_gen::{
    config::RunConfig,
    generate,
    manifest::{Source, MANIFEST},
    materialize::WriteOutcome,
    prereq::Toolchain,
    renderer::{Render, TeraRenderer},
    scaffold::RootStatus,
    teardown::{self, RemoveOutcome},
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Every path under `dir` with the contents of the files.
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(dir)
        .into_iter()
        .map(Result::unwrap)
        .map(|entry| {
            let contents = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (entry.path().strip_prefix(dir).unwrap().to_owned(), contents)
        })
        .collect()
}

fn config(destination: &Path, dry_run: bool, force: bool) -> RunConfig {
    RunConfig::builder()
        .project_name("myapp")
        .destination(destination)
        .dry_run(dry_run)
        .force(force)
        .build()
        .unwrap()
}

/// Nothing here exists, so a dry run that tried to spawn one would fail.
fn absent_toolchain() -> Toolchain {
    Toolchain {
        node: PathBuf::from("/nowhere/node"),
        npm: PathBuf::from("/nowhere/npm"),
        npx: None,
    }
}

fn expected_contents(entry_source: Source, renderer: &TeraRenderer, config: &RunConfig) -> String {
    match entry_source {
        Source::Literal(contents) => contents.to_owned(),
        Source::Template(name) => renderer.render(name, &config.template_context()).unwrap(),
    }
}

#[test]
fn dry_run_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let before = snapshot(tmp.path());
    let renderer = TeraRenderer::embedded().unwrap();

    let summary = generate(&config(tmp.path(), true, false), &absent_toolchain(), &renderer).unwrap();

    assert_eq!(summary.root_status, RootStatus::Planned);
    assert_eq!(summary.folders.len(), 5);
    assert_eq!(summary.files.len(), 11);
    assert_eq!(summary.count(WriteOutcome::WouldCreate), 11);
    assert_eq!(snapshot(tmp.path()), before);
}

#[test]
fn dry_run_over_an_existing_project_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("myapp");
    fs::create_dir_all(root.join("tests/e2e")).unwrap();
    fs::write(root.join("tsconfig.json"), "{ \"mine\": true }").unwrap();
    let before = snapshot(tmp.path());
    let renderer = TeraRenderer::embedded().unwrap();

    let summary = generate(&config(tmp.path(), true, true), &absent_toolchain(), &renderer).unwrap();

    assert_eq!(summary.count(WriteOutcome::WouldOverwrite), 1);
    assert_eq!(summary.count(WriteOutcome::WouldCreate), 10);
    assert_eq!(snapshot(tmp.path()), before);
}

#[test]
fn teardown_dry_run_leaves_the_tree() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("myapp");
    fs::create_dir_all(root.join("tests/support/utils")).unwrap();
    fs::write(root.join("README.md"), "readme").unwrap();
    let before = snapshot(tmp.path());

    let outcomes = teardown::remove_node_project(&root, true);

    assert_eq!(outcomes.len(), 8);
    assert!(outcomes.iter().all(|(_, o)| *o == RemoveOutcome::WouldRemove));
    assert_eq!(snapshot(tmp.path()), before);
}

#[cfg(unix)]
mod real_runs {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// `npm` and `npx` stand-ins that succeed without doing anything.
    fn quiet_toolchain(dir: &Path) -> Toolchain {
        let bin = dir.join("bin");
        fs::create_dir_all(&bin).unwrap();

        let tool = |name: &str| {
            let path = bin.join(name);
            fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        Toolchain {
            node: tool("node"),
            npm: tool("npm"),
            npx: Some(tool("npx")),
        }
    }

    #[test]
    fn fresh_run_writes_every_entry() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let toolchain = quiet_toolchain(tmp.path());
        let renderer = TeraRenderer::embedded().unwrap();
        let config = config(&out, false, false);

        let summary = generate(&config, &toolchain, &renderer).unwrap();

        assert_eq!(summary.root_status, RootStatus::Created);
        assert_eq!(summary.count(WriteOutcome::Created), 11);
        assert!(summary.folders.iter().all(|f| f.is_dir()));

        for entry in MANIFEST {
            assert_eq!(
                fs::read_to_string(out.join("myapp").join(entry.path)).unwrap(),
                expected_contents(entry.source, &renderer, &config),
                "{}",
                entry.path
            );
        }
    }

    #[test]
    fn second_run_only_skips() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let toolchain = quiet_toolchain(tmp.path());
        let renderer = TeraRenderer::embedded().unwrap();
        let config = config(&out, false, false);

        generate(&config, &toolchain, &renderer).unwrap();
        let after_first = snapshot(&out);

        let summary = generate(&config, &toolchain, &renderer).unwrap();

        assert_eq!(summary.root_status, RootStatus::Exists);
        assert_eq!(summary.count(WriteOutcome::Skipped), 11);
        assert_eq!(summary.count(WriteOutcome::Overwrote), 0);
        assert_eq!(snapshot(&out), after_first);
    }

    #[test]
    fn existing_files_survive_without_force() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let root = out.join("myapp");
        for entry in MANIFEST {
            let dest = root.join(entry.path);
            fs::create_dir_all(dest.parent().unwrap()).unwrap();
            fs::write(&dest, format!("hand written {}", entry.path)).unwrap();
        }

        generate(
            &config(&out, false, false),
            &quiet_toolchain(tmp.path()),
            &TeraRenderer::embedded().unwrap(),
        )
        .unwrap();

        for entry in MANIFEST {
            assert_eq!(
                fs::read_to_string(root.join(entry.path)).unwrap(),
                format!("hand written {}", entry.path)
            );
        }
    }

    #[test]
    fn force_restores_the_manifest() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let root = out.join("myapp");
        for entry in MANIFEST {
            let dest = root.join(entry.path);
            fs::create_dir_all(dest.parent().unwrap()).unwrap();
            fs::write(&dest, "stale content that is longer than some of the files").unwrap();
        }
        let renderer = TeraRenderer::embedded().unwrap();
        let config = config(&out, false, true);

        let summary = generate(&config, &quiet_toolchain(tmp.path()), &renderer).unwrap();

        assert_eq!(summary.count(WriteOutcome::Overwrote), 11);
        for entry in MANIFEST {
            assert_eq!(
                fs::read_to_string(root.join(entry.path)).unwrap(),
                expected_contents(entry.source, &renderer, &config)
            );
        }
    }

    #[test]
    fn failed_bootstrap_writes_no_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut toolchain = quiet_toolchain(tmp.path());
        fs::write(&toolchain.npm, "#!/bin/sh\necho 'registry unreachable' >&2\nexit 1\n").unwrap();
        toolchain.npx = None;

        let err = generate(
            &config(&out, false, false),
            &toolchain,
            &TeraRenderer::embedded().unwrap(),
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("registry unreachable"));
        // Folders were already made, the manifest was never reached
        assert!(out.join("myapp/tests/e2e").is_dir());
        assert!(!out.join("myapp/playwright.config.ts").exists());
    }

    #[test]
    fn teardown_after_generate_keeps_unrelated_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let root = out.join("myapp");
        generate(
            &config(&out, false, false),
            &quiet_toolchain(tmp.path()),
            &TeraRenderer::embedded().unwrap(),
        )
        .unwrap();
        fs::create_dir_all(root.join("node_modules/.bin")).unwrap();
        fs::write(root.join("package.json"), "{}").unwrap();
        fs::write(root.join(".env"), "AUTH_TOKEN=secret").unwrap();

        teardown::remove_node_project(&root, false);

        let left: Vec<_> = snapshot(&root).into_keys().collect();
        assert_eq!(left, [PathBuf::new(), PathBuf::from(".env")]);
    }
}
