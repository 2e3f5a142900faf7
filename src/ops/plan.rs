//! Dry-run view of a release.

use serde::Serialize;
use std::path::PathBuf;

use crate::core::matrix::BuildMatrix;
use crate::ops::publish::{destination_paths, ReleaseLayout};

/// A build the release would perform, without probing or building.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedBuild {
    pub board: String,
    pub port: String,
    pub variant: String,
    pub language: String,
    /// Extra settings force a clean build before any probe runs
    pub forced_clean: bool,
    pub destinations: Vec<PathBuf>,
}

/// Every build in matrix order, with its planned release paths.
pub fn plan_release(matrix: &BuildMatrix, layout: &ReleaseLayout) -> Vec<PlannedBuild> {
    matrix
        .items()
        .map(|item| PlannedBuild {
            board: item.board.id.clone(),
            port: item.board.port.clone(),
            variant: item.variant.name.clone(),
            language: item.variant.language.clone(),
            forced_clean: item.variant.has_settings(),
            destinations: destination_paths(item.board, item.variant, layout)
                .into_iter()
                .map(|copy| copy.destination)
                .collect(),
        })
        .collect()
}
