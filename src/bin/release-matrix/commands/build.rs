//! `release-matrix build` command

use anyhow::Result;

use super::{select_matrix, Settings};
use crate::cli::BuildArgs;
use release_matrix::builder::tool::{BuildTool, SystemRunner};
use release_matrix::ops::release::{run_release, Release, ReleaseOptions};
use release_matrix::util::process::host_parallelism;
use release_matrix::util::{GlobalContext, Shell};

/// Run the release. Returns the accumulated exit status.
pub fn execute(args: BuildArgs, shell: &Shell) -> Result<i32> {
    let ctx = GlobalContext::new()?;
    let settings = Settings::resolve(&ctx, &args.settings);

    let catalog = settings.load_catalog(&args.selection)?;
    let matrix = select_matrix(&ctx, &catalog, &args.selection)?;
    let tool = BuildTool::locate(&settings.tool, &settings.ports_dir)?;

    let build = &settings.config.build;
    let ci = args.ci || ctx.env().ci;

    let jobs = build.resolve_jobs(args.jobs, ci, host_parallelism());

    let opts = ReleaseOptions {
        release_root: settings.release_root.clone(),
        jobs,
        probe_jobs: host_parallelism(),
        purge: build.purge() && !args.no_purge,
    };

    tracing::debug!(
        "catalog {}, {} builds, jobs {}",
        settings.catalog_path.display(),
        matrix.len(),
        jobs
    );

    let runner = SystemRunner;
    let result = run_release(
        &Release {
            catalog: &catalog,
            matrix: &matrix,
            tool: &tool,
            runner: &runner,
            shell,
        },
        &opts,
    );

    Ok(result.exit_status())
}
