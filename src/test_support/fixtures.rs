//! Test fixtures for common test scenarios.

use std::fmt::Write as _;
use std::path::PathBuf;

/// A fake firmware checkout: `<root>/ports/<port>/<build_dir>/firmware.<ext>`.
#[derive(Debug, Clone)]
pub struct FirmwareTree {
    root: PathBuf,
}

impl FirmwareTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FirmwareTree { root: root.into() }
    }

    pub fn ports(&self) -> PathBuf {
        self.root.join("ports")
    }

    pub fn release_root(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Pretend a build left an image behind. The image content is the
    /// build directory name, so tests can tell images apart.
    pub fn write_image(&self, port: &str, build_dir: &str, extension: &str) -> PathBuf {
        let dir = self.ports().join(port).join(build_dir);
        std::fs::create_dir_all(&dir).expect("create build dir");
        let path = dir.join(format!("firmware.{}", extension));
        std::fs::write(&path, build_dir).expect("write image");
        path
    }

    /// Path of a published artifact.
    pub fn published(&self, alias: &str, variant: &str, version: &str, extension: &str) -> PathBuf {
        self.release_root().join(alias).join(variant).join(format!(
            "adafruit-circuitpython-{}-{}-{}.{}",
            alias, variant, version, extension
        ))
    }
}

/// A board entry for [`catalog_toml`].
#[derive(Debug, Clone, Copy)]
pub struct BoardFixture<'a> {
    pub id: &'a str,
    pub port: &'a str,
    pub extensions: &'a [&'a str],
    pub aliases: &'a [&'a str],
}

/// Render a catalog file.
pub fn catalog_toml(version: &str, languages: &[&str], boards: &[BoardFixture<'_>]) -> String {
    let quoted = |items: &[&str]| {
        items
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = format!(
        "[release]\nsha = \"0000000\"\nversion = \"{}\"\nlanguages = [{}]\n",
        version,
        quoted(languages)
    );
    for board in boards {
        let _ = write!(
            out,
            "\n[[boards]]\nid = \"{}\"\nport = \"{}\"\nextensions = [{}]\naliases = [{}]\n",
            board.id,
            board.port,
            quoted(board.extensions),
            quoted(board.aliases)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::core::catalog::{BoardCatalog, TomlCatalog};

    #[test]
    fn test_catalog_toml_parses() {
        let text = catalog_toml(
            "9.0.0",
            &["en_US", "de_DE"],
            &[BoardFixture {
                id: "baz",
                port: "nrf",
                extensions: &["bin", "uf2"],
                aliases: &["foo", "bar"],
            }],
        );

        let catalog = TomlCatalog::parse(&text, Path::new(".")).unwrap();
        assert_eq!(catalog.version(), "9.0.0");
        assert_eq!(catalog.boards()[0].aliases, vec!["foo", "bar"]);
        assert_eq!(catalog.supported_ports(), ["nrf"]);
    }
}
