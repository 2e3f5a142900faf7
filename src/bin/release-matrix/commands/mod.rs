//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod plan;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{SelectionArgs, SettingsArgs};
use release_matrix::core::catalog::{check_languages, BoardCatalog, TomlCatalog};
use release_matrix::core::matrix::BuildMatrix;
use release_matrix::util::config::{load_config, Config};
use release_matrix::util::GlobalContext;

/// Paths and tool after merging flags over config over defaults.
pub struct Settings {
    pub config: Config,
    pub catalog_path: PathBuf,
    pub ports_dir: PathBuf,
    pub release_root: PathBuf,
    pub tool: String,
}

impl Settings {
    pub fn resolve(ctx: &GlobalContext, args: &SettingsArgs) -> Self {
        let config = load_config(
            ctx.global_config_path().as_deref(),
            &ctx.project_config_path(),
        );

        let build = &config.build;
        let catalog_path = ctx.resolve(&args.catalog.clone().unwrap_or_else(|| build.catalog()));
        let ports_dir = ctx.resolve(&args.ports_dir.clone().unwrap_or_else(|| build.ports_dir()));
        let release_root = ctx.resolve(
            &args
                .release_root
                .clone()
                .unwrap_or_else(|| build.release_root()),
        );
        let tool = args
            .tool
            .clone()
            .unwrap_or_else(|| build.tool().to_string());

        Settings {
            config,
            catalog_path,
            ports_dir,
            release_root,
            tool,
        }
    }

    /// Load the catalog, applying a `--languages` override. Overridden
    /// languages must still be known to the catalog.
    pub fn load_catalog(&self, selection: &SelectionArgs) -> Result<TomlCatalog> {
        let catalog = TomlCatalog::load(&self.catalog_path)?;
        let catalog = match &selection.languages {
            Some(languages) => catalog.with_languages(languages.clone()),
            None => catalog,
        };
        check_languages(catalog.languages(), catalog.all_languages())?;
        Ok(catalog)
    }
}

/// Build the matrix. Boards come from `--boards`, then `$BOARDS`, then the
/// whole catalog.
pub fn select_matrix(
    ctx: &GlobalContext,
    catalog: &TomlCatalog,
    selection: &SelectionArgs,
) -> Result<BuildMatrix> {
    let boards = selection
        .boards
        .as_deref()
        .or(ctx.env().boards.as_deref());
    let matrix = BuildMatrix::new(catalog, boards, catalog.languages())?;
    Ok(matrix)
}
