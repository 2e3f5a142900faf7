//! Artifact publishing.
//!
//! Every image a build produces is copied once per published name (each
//! alias, then the board itself) into the release tree:
//!
//! ```text
//! <release-root>/<alias>/<variant>/adafruit-circuitpython-<alias>-<variant>-<version>.<ext>
//! ```
//!
//! Downstream download indexes depend on this layout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::executor::BuildAttempt;
use crate::builder::tool::BuildTool;
use crate::core::board::BoardTarget;
use crate::core::variant::Variant;
use crate::util::fs::ensure_dir;

/// File name prefix of every published artifact.
pub const ARTIFACT_PREFIX: &str = "adafruit-circuitpython";

/// Naming scheme of the release tree.
#[derive(Debug, Clone)]
pub struct ReleaseLayout {
    root: PathBuf,
    version: String,
}

impl ReleaseLayout {
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        ReleaseLayout {
            root: root.into(),
            version: version.into(),
        }
    }

    pub fn file_name(&self, alias: &str, variant: &str, extension: &str) -> String {
        format!(
            "{}-{}-{}-{}.{}",
            ARTIFACT_PREFIX, alias, variant, self.version, extension
        )
    }

    pub fn destination(&self, alias: &str, variant: &str, extension: &str) -> PathBuf {
        self.root
            .join(alias)
            .join(variant)
            .join(self.file_name(alias, variant, extension))
    }
}

/// One planned copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub extension: String,
    pub alias: String,
    pub destination: PathBuf,
}

/// Every destination for a board and variant: extensions outer, names inner.
pub fn destination_paths(
    board: &BoardTarget,
    variant: &Variant,
    layout: &ReleaseLayout,
) -> Vec<PlannedCopy> {
    board
        .extensions
        .iter()
        .flat_map(move |extension| {
            board.publish_names().map(move |alias| PlannedCopy {
                extension: extension.clone(),
                alias: alias.to_string(),
                destination: layout.destination(alias, &variant.name, extension),
            })
        })
        .collect()
}

/// What publishing one build did.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    /// Files written
    pub copied: Vec<PathBuf>,
    /// One line per copy that could not be made
    pub errors: Vec<String>,
}

impl PublishReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Exit status this report contributes: 1 if anything failed.
    pub fn status(&self) -> i32 {
        if self.errors.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Copies a build's images into the release tree.
pub struct Publisher<'a> {
    tool: &'a BuildTool,
    layout: &'a ReleaseLayout,
}

impl<'a> Publisher<'a> {
    pub fn new(tool: &'a BuildTool, layout: &'a ReleaseLayout) -> Self {
        Publisher { tool, layout }
    }

    /// Publish every declared extension under every name.
    ///
    /// A missing or uncopyable image is recorded in the report and the
    /// remaining copies still run. After a failed incremental build the
    /// shared build directory may still hold an earlier variant's image;
    /// such images are reported, not published.
    pub fn publish(
        &self,
        board: &BoardTarget,
        variant: &Variant,
        attempt: &BuildAttempt,
    ) -> PublishReport {
        let mut report = PublishReport::default();
        let stale = !attempt.success() && !attempt.clean_build;

        for copy in destination_paths(board, variant, self.layout) {
            let source = self
                .tool
                .artifact_path(board, &attempt.build_dir, &copy.extension);

            if !source.is_file() {
                report
                    .errors
                    .push(format!("Cannot find file {}", source.display()));
                continue;
            }

            if stale {
                report.errors.push(format!(
                    "Not publishing {} left over from an earlier build",
                    source.display()
                ));
                continue;
            }

            match copy_artifact(&source, &copy.destination) {
                Ok(()) => report.copied.push(copy.destination),
                Err(e) => report.errors.push(format!("{:#}", e)),
            }
        }

        report
    }
}

fn copy_artifact(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        ensure_dir(parent)?;
    }
    std::fs::copy(source, destination).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(())
}
