use anyhow::Result;
use clap::error::ErrorKind;
use std::process::ExitCode;
use qa_gen::{
    args::{Args, CommandFactory},
    config::RunConfig,
    error, info,
    materialize::WriteOutcome,
    plan,
    prereq::Prerequisites,
    renderer::TeraRenderer,
    teardown, trace,
};

const USAGE_EXIT: u8 = 2;

fn app(args: &Args, config: &RunConfig) -> Result<()> {
    let root = config.project_root();

    if args.clean {
        teardown::remove_node_project(&root, config.dry_run());
        return Ok(());
    }

    // Runs even with --dry-run, it only reads
    let toolchain = Prerequisites::new().check()?;
    trace!("Toolchain: {toolchain:?}");

    let renderer = TeraRenderer::embedded()?;
    let summary = qa_gen::generate(config, &toolchain, &renderer)?;

    println!();
    info!("Done! Your Playwright testing project is ready.");

    if config.dry_run() {
        plan!("This was a dry run. No actual files were written.");
    } else {
        info!(
            "{} written, {} overwritten, {} skipped",
            summary.count(WriteOutcome::Created),
            summary.count(WriteOutcome::Overwrote),
            summary.count(WriteOutcome::Skipped)
        );
        info!("Navigate to: {}", summary.root.display());
        info!("Run tests with: `npx playwright test`");
    }

    Ok(())
}

fn usage_error() -> ExitCode {
    error!(
        "Project name is missing. {}",
        Args::command().render_usage()
    );
    ExitCode::from(USAGE_EXIT)
}

fn main() -> ExitCode {
    let args = match Args::parse_lenient(std::env::args_os().skip(1)) {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => return usage_error(),
        Err(e) => e.exit(),
    };

    println!("{}", args.summary());

    let Ok(config) = RunConfig::try_from(&args) else {
        return usage_error();
    };

    match app(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
