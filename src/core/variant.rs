//! Build variants.
//!
//! A variant is one flavor of firmware for a board: either a translation
//! (one per enabled language) or a fixed special image such as the flash
//! eraser.

use std::fmt;

use serde::Serialize;

/// Name of the flash eraser variant.
pub const ERASER_VARIANT: &str = "CIRCUITPY_ERASER";

/// Locale the eraser image is built with.
pub const DEFAULT_LANGUAGE: &str = "en_US";

/// Settings that turn a regular build into an eraser build.
pub const ERASER_SETTINGS: &str = "CIRCUITPY_ERASER=1";

/// One build flavor: (name, language, extra settings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub language: String,
    /// Extra build settings, passed to the tool verbatim (split on whitespace)
    pub settings: String,
}

impl Variant {
    /// A translation variant: named after its language, no extra settings.
    pub fn language(code: impl Into<String>) -> Self {
        let code = code.into();
        Variant {
            name: code.clone(),
            language: code,
            settings: String::new(),
        }
    }

    /// The non-localized flash eraser image.
    pub fn eraser() -> Self {
        Variant {
            name: ERASER_VARIANT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            settings: ERASER_SETTINGS.to_string(),
        }
    }

    /// Any non-empty settings string counts, even one that splits into no
    /// arguments.
    pub fn has_settings(&self) -> bool {
        !self.settings.is_empty()
    }

    /// Settings as individual tool arguments.
    pub fn settings_args(&self) -> impl Iterator<Item = &str> {
        self.settings.split_whitespace()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Variants for one board: each language in order, then the special variants.
///
/// The languages are not validated; whatever is supplied is built.
pub fn build_variants<S: AsRef<str>>(languages: &[S]) -> Vec<Variant> {
    languages
        .iter()
        .map(|code| Variant::language(code.as_ref()))
        .chain(std::iter::once(Variant::eraser()))
        .collect()
}
