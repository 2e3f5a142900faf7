//! Core data structures.
//!
//! - Boards and the catalog they come from
//! - Build variants (one per language, plus the eraser image)
//! - The ordered (board × variant) build matrix

pub mod board;
pub mod catalog;
pub mod matrix;
pub mod variant;

pub use board::BoardTarget;
pub use catalog::{BoardCatalog, CatalogError, TomlCatalog};
pub use matrix::{BuildMatrix, WorkItem};
pub use variant::Variant;
