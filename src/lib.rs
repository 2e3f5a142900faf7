//! release-matrix - firmware release builder
//!
//! Builds every board of a firmware catalog once per translation (plus an
//! eraser image), drives the port's build tool, and publishes the images
//! into a versioned release tree.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Provides a scripted build-tool runner, an in-memory catalog and
/// firmware tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{BoardCatalog, BoardTarget, BuildMatrix, TomlCatalog, Variant};
pub use crate::util::context::GlobalContext;
