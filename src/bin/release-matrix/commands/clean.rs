//! `release-matrix clean` command

use anyhow::Result;

use super::Settings;
use crate::cli::CleanArgs;
use release_matrix::core::catalog::{BoardCatalog, TomlCatalog};
use release_matrix::ops::clean::purge_build_dirs;
use release_matrix::util::shell::Status;
use release_matrix::util::{GlobalContext, Shell};

pub fn execute(args: CleanArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let settings = Settings::resolve(&ctx, &args.settings);
    let catalog = TomlCatalog::load(&settings.catalog_path)?;

    let removed = purge_build_dirs(&settings.ports_dir, catalog.supported_ports())?;
    for dir in &removed {
        shell.status(Status::Removed, dir.display());
    }
    if removed.is_empty() {
        shell.note("no build directories to remove");
    }

    Ok(())
}
