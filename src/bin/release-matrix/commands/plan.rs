//! `release-matrix plan` command

use anyhow::Result;

use super::{select_matrix, Settings};
use crate::cli::PlanArgs;
use release_matrix::core::catalog::BoardCatalog;
use release_matrix::ops::plan::plan_release;
use release_matrix::ops::publish::ReleaseLayout;
use release_matrix::util::shell::Status;
use release_matrix::util::{GlobalContext, Shell};

pub fn execute(args: PlanArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let settings = Settings::resolve(&ctx, &args.settings);

    let catalog = settings.load_catalog(&args.selection)?;
    let matrix = select_matrix(&ctx, &catalog, &args.selection)?;
    let layout = ReleaseLayout::new(&settings.release_root, catalog.version());

    for build in plan_release(&matrix, &layout) {
        if shell.is_json() {
            shell.json_event(&build);
            continue;
        }

        let clean = if build.forced_clean { " (clean build)" } else { "" };
        shell.status(
            Status::Planned,
            format!("{} for {}{}", build.board, build.variant, clean),
        );
        for dest in &build.destinations {
            shell.println(format!("  {}", dest.display()));
        }
    }

    Ok(())
}
