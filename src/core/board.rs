//! Board targets.

use serde::{Deserialize, Serialize};

/// A hardware board that gets its own firmware image.
///
/// Publishing adds the board's own identifier after the aliases, so it
/// does not need to be listed among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTarget {
    /// Board identifier, e.g. `feather_m0_express`
    pub id: String,

    /// Port (build subdirectory) that owns this board
    pub port: String,

    /// Artifact file extensions, in publishing order
    pub extensions: Vec<String>,

    /// Other names the same artifacts are published under
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl BoardTarget {
    pub fn new(id: impl Into<String>, port: impl Into<String>) -> Self {
        BoardTarget {
            id: id.into(),
            port: port.into(),
            extensions: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Every name artifacts are published under: aliases, then the board itself.
    pub fn publish_names(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.id.as_str()))
    }
}
