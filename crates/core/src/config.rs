//! Core runtime configuration.
//!
//! The set of shapes and the output location are resolved once at process startup and then
//! passed into [`crate::AnsatzService`]. Nothing in the pipeline reads process-wide state.

use std::path::{Path, PathBuf};

use ansatz_types::{Locator, ShapeName};

use crate::constants::{ALCUBIERRE_SHAPE, DEFAULT_OUTPUT_FILENAME, NATARIO_SHAPE};
use crate::{AnsatzError, AnsatzResult};

/// One configured shape: its display name and where to fetch it from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeEntry {
    pub name: ShapeName,
    pub locator: Locator,
}

/// Ordered mapping of shape name to locator.
///
/// Iteration order is insertion order, which is also the section order of the document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeCatalog {
    entries: Vec<ShapeEntry>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from `(name, locator)` string pairs.
    ///
    /// # Errors
    ///
    /// Returns `AnsatzError::InvalidInput` if a name or locator is invalid or a name repeats.
    pub fn from_pairs<I, N, L>(pairs: I) -> AnsatzResult<Self>
    where
        I: IntoIterator<Item = (N, L)>,
        N: AsRef<str>,
        L: AsRef<str>,
    {
        pairs.into_iter().try_fold(Self::new(), |catalog, (name, locator)| {
            catalog.with_shape(ShapeName::new(name)?, Locator::parse(locator)?)
        })
    }

    /// The built-in Alcubierre and Natário warp-bubble shapes.
    pub fn warp_bubbles() -> AnsatzResult<Self> {
        Self::from_pairs([ALCUBIERRE_SHAPE, NATARIO_SHAPE])
    }

    /// Appends a shape.
    ///
    /// # Errors
    ///
    /// Returns `AnsatzError::InvalidInput` if `name` is already present.
    pub fn with_shape(mut self, name: ShapeName, locator: Locator) -> AnsatzResult<Self> {
        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(AnsatzError::InvalidInput(format!(
                "duplicate shape name: {}",
                name
            )));
        }
        self.entries.push(ShapeEntry { name, locator });
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct AnsatzConfig {
    catalog: ShapeCatalog,
    output_path: PathBuf,
}

impl AnsatzConfig {
    /// Create a new `AnsatzConfig`.
    ///
    /// # Errors
    ///
    /// Returns `AnsatzError::InvalidInput` if the catalog is empty or the output path has no
    /// file name.
    pub fn new(catalog: ShapeCatalog, output_path: PathBuf) -> AnsatzResult<Self> {
        if catalog.is_empty() {
            return Err(AnsatzError::InvalidInput(
                "shape catalog cannot be empty".into(),
            ));
        }
        if output_path.file_name().is_none() {
            return Err(AnsatzError::InvalidInput(format!(
                "output path has no file name: {}",
                output_path.display()
            )));
        }

        Ok(Self {
            catalog,
            output_path,
        })
    }

    /// The built-in warp-bubble catalog written to `metric_ansatz.tex` in the working directory.
    pub fn warp_bubbles() -> AnsatzResult<Self> {
        Self::new(
            ShapeCatalog::warp_bubbles()?,
            PathBuf::from(DEFAULT_OUTPUT_FILENAME),
        )
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
