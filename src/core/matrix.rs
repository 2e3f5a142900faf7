//! The (board × variant) work list.

use std::collections::BTreeSet;

use crate::core::board::BoardTarget;
use crate::core::catalog::{BoardCatalog, CatalogError};
use crate::core::variant::{build_variants, Variant};

/// One unit of work: a board built in one variant.
#[derive(Debug, Clone, Copy)]
pub struct WorkItem<'a> {
    pub board: &'a BoardTarget,
    pub variant: &'a Variant,
}

/// Ordered build matrix. Boards are the outer loop, variants the inner one.
#[derive(Debug, Clone)]
pub struct BuildMatrix {
    boards: Vec<BoardTarget>,
    variants: Vec<Variant>,
}

impl BuildMatrix {
    /// Build the matrix for `languages`.
    ///
    /// With `selection = None` every catalog board is built in catalog order.
    /// Otherwise the selection is built in the given order, and every name
    /// must exist in the catalog.
    pub fn new<C, S>(
        catalog: &C,
        selection: Option<&[S]>,
        languages: &[String],
    ) -> Result<Self, CatalogError>
    where
        C: BoardCatalog + ?Sized,
        S: AsRef<str>,
    {
        let boards = match selection {
            None => catalog.boards().to_vec(),
            Some(names) => names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    catalog
                        .board(name)
                        .cloned()
                        .ok_or_else(|| CatalogError::UnknownBoard {
                            board: name.to_string(),
                            available: catalog.boards().iter().map(|b| b.id.clone()).collect(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(BuildMatrix {
            boards,
            variants: build_variants(languages),
        })
    }

    pub fn boards(&self) -> &[BoardTarget] {
        &self.boards
    }

    /// Variants built for every board.
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Total number of builds.
    pub fn len(&self) -> usize {
        self.boards.len() * self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Work items in build order.
    pub fn items(&self) -> impl Iterator<Item = WorkItem<'_>> {
        self.boards.iter().flat_map(move |board| {
            self.variants
                .iter()
                .map(move |variant| WorkItem { board, variant })
        })
    }
}

/// Known languages that are not enabled, sorted.
pub fn skipped_languages(all: &[String], enabled: &[String]) -> Vec<String> {
    let enabled: BTreeSet<&str> = enabled.iter().map(String::as_str).collect();
    all.iter()
        .map(String::as_str)
        .filter(|lang| !enabled.contains(lang))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
