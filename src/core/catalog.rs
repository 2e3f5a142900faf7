//! Board catalog.
//!
//! The catalog is the orchestrator's view of the firmware tree: which boards
//! exist, which port builds each of them, which languages are enabled, and
//! which version is being released. It is read once and never mutated.
//!
//! The shipped implementation reads a TOML file:
//!
//! ```toml
//! [release]
//! sha = "a1b2c3d"
//! version = "9.0.0"
//! languages = ["en_US", "de_DE"]
//! all_languages = ["en_US", "de_DE", "fr"]
//! supported_ports = ["atmel-samd", "nrf"]
//!
//! [[boards]]
//! id = "feather_m0_express"
//! port = "atmel-samd"
//! extensions = ["bin", "uf2"]
//! aliases = []
//! ```
//!
//! Instead of listing `languages`, the release table may point
//! `languages_dir` at a directory of `.po` translation files; every file stem
//! becomes an enabled language.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::core::board::BoardTarget;
use crate::util::fs::{files_with_extension, read_to_string};

/// Catalog lookup and validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("board catalog not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unknown board `{board}`")]
    UnknownBoard {
        board: String,
        available: Vec<String>,
    },

    #[error("board `{board}` is listed more than once in the catalog")]
    DuplicateBoard { board: String },

    #[error("no translations found in {}", dir.display())]
    NoLanguages { dir: PathBuf },

    #[error("unknown language `{language}`; known languages: {}", known.join(", "))]
    UnknownLanguage {
        language: String,
        known: Vec<String>,
    },
}

/// Read-only source of board and release metadata.
pub trait BoardCatalog {
    /// All boards, in catalog order.
    fn boards(&self) -> &[BoardTarget];

    /// Ports whose build directories belong to the release.
    fn supported_ports(&self) -> &[String];

    /// Languages to build.
    fn languages(&self) -> &[String];

    /// Every language the firmware knows about.
    fn all_languages(&self) -> &[String];

    /// Commit SHA of the tree being released.
    fn sha(&self) -> &str;

    /// Version string used in artifact file names.
    fn version(&self) -> &str;

    /// Look up a board by identifier.
    fn board(&self, id: &str) -> Option<&BoardTarget> {
        self.boards().iter().find(|b| b.id == id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    release: ReleaseTable,
    #[serde(default)]
    boards: Vec<BoardTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReleaseTable {
    sha: String,
    version: String,
    #[serde(default)]
    languages: Vec<String>,
    languages_dir: Option<PathBuf>,
    #[serde(default)]
    all_languages: Vec<String>,
    #[serde(default)]
    supported_ports: Vec<String>,
}

/// Catalog loaded from a TOML file.
#[derive(Debug, Clone)]
pub struct TomlCatalog {
    boards: Vec<BoardTarget>,
    supported_ports: Vec<String>,
    languages: Vec<String>,
    all_languages: Vec<String>,
    sha: String,
    version: String,
}

impl TomlCatalog {
    /// Load a catalog file. A relative `languages_dir` is resolved against
    /// the catalog's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CatalogError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let contents = read_to_string(path)?;
        let base = path.parent().unwrap_or(Path::new("."));
        Self::parse(&contents, base)
            .with_context(|| format!("failed to load board catalog: {}", path.display()))
    }

    /// Parse catalog text. `base` anchors a relative `languages_dir`.
    pub fn parse(contents: &str, base: &Path) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents).context("invalid catalog")?;
        let release = file.release;

        let mut seen = std::collections::HashSet::new();
        for board in &file.boards {
            if !seen.insert(board.id.as_str()) {
                return Err(CatalogError::DuplicateBoard {
                    board: board.id.clone(),
                }
                .into());
            }
        }

        let languages = match &release.languages_dir {
            Some(dir) if release.languages.is_empty() => discover_languages(&base.join(dir))?,
            _ => release.languages,
        };

        let all_languages = if release.all_languages.is_empty() {
            languages.clone()
        } else {
            release.all_languages
        };

        let supported_ports = if release.supported_ports.is_empty() {
            let mut ports: Vec<String> = file.boards.iter().map(|b| b.port.clone()).collect();
            ports.sort();
            ports.dedup();
            ports
        } else {
            release.supported_ports
        };

        check_languages(&languages, &all_languages)?;

        Ok(TomlCatalog {
            boards: file.boards,
            supported_ports,
            languages,
            all_languages,
            sha: release.sha,
            version: release.version,
        })
    }

    /// Replace the enabled languages.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }
}

impl BoardCatalog for TomlCatalog {
    fn boards(&self) -> &[BoardTarget] {
        &self.boards
    }

    fn supported_ports(&self) -> &[String] {
        &self.supported_ports
    }

    fn languages(&self) -> &[String] {
        &self.languages
    }

    fn all_languages(&self) -> &[String] {
        &self.all_languages
    }

    fn sha(&self) -> &str {
        &self.sha
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// Every enabled language must be a known one.
pub fn check_languages(enabled: &[String], known: &[String]) -> Result<(), CatalogError> {
    match enabled.iter().find(|lang| !known.contains(lang)) {
        Some(language) => Err(CatalogError::UnknownLanguage {
            language: language.clone(),
            known: known.to_vec(),
        }),
        None => Ok(()),
    }
}

/// Languages available as `.po` translation files in `dir`, sorted.
pub fn discover_languages(dir: &Path) -> Result<Vec<String>> {
    let languages: Vec<String> = files_with_extension(dir, "po")?
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect();

    if languages.is_empty() {
        return Err(CatalogError::NoLanguages {
            dir: dir.to_path_buf(),
        }
        .into());
    }

    Ok(languages)
}
