//! # Ansatz Core
//!
//! Core logic for generating the metric ansatz document:
//! - loading named shape definitions through a [`ShapeSource`] (HTTP, file, embedded)
//! - parsing each profile against an allow-listed symbol table
//! - substituting the profile into the fixed spherically-symmetric metric
//! - rendering and writing the LaTeX document
//!
//! **No process concerns**: logging setup, exit codes and stdout belong in the binary.

pub mod config;
pub mod constants;
pub mod error;
pub mod metric;
pub mod pipeline;
pub mod render;
pub mod shapes;

pub use config::{AnsatzConfig, ShapeCatalog, ShapeEntry};
pub use error::{AnsatzError, AnsatzResult, ParseError};
pub use metric::{build_metric, BuildError, MetricMatrix};
pub use pipeline::AnsatzService;
pub use render::{DocumentRenderer, RenderRecord};
pub use shapes::{
    load_shape, parse_shape_data, FileShapeSource, HttpShapeSource, ShapeData, ShapeDescriptor,
    ShapeSource, StaticShapeSource,
};

// Re-export the validated primitives used throughout the public API.
pub use ansatz_types::{Locator, ShapeName};
