//! LaTeX document rendering.
//!
//! The document is a fixed preamble, one unnumbered section per shape and a fixed footer.
//! Each section shows the profile text exactly as it was fetched, the description (empty
//! when absent) and the generic line element. The whole document is assembled in memory
//! and written in one step.

use std::fs;
use std::path::{Path, PathBuf};

use ansatz_types::ShapeName;

use crate::constants::{DOCUMENT_FOOTER, DOCUMENT_PREAMBLE, LINE_ELEMENT, PARTIAL_SUFFIX};
use crate::shapes::ShapeDescriptor;
use crate::{AnsatzError, AnsatzResult};

/// Everything the renderer needs for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRecord {
    pub name: ShapeName,
    pub profile_expression_text: String,
    pub description_text: String,
    pub line_element_latex: String,
}

impl RenderRecord {
    /// Builds the record for a fetched shape, using the generic line element.
    pub fn from_descriptor(shape: &ShapeDescriptor) -> Self {
        Self {
            name: shape.name.clone(),
            profile_expression_text: shape.profile_expression.clone(),
            description_text: shape.description.clone().unwrap_or_default(),
            line_element_latex: LINE_ELEMENT.to_owned(),
        }
    }
}

/// Service for rendering and writing the ansatz document.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    /// Creates a new `DocumentRenderer` instance.
    pub fn new() -> Self {
        Self
    }

    /// Renders `records`, in order, into the complete document text.
    ///
    /// Section format produced:
    /// ```latex
    /// \section*{<name>}
    /// Profile: $f(r,t) = <profile>$\quad (<description>)
    ///
    /// \[<line element>\]
    /// ```
    pub fn render(&self, records: &[RenderRecord]) -> String {
        let mut output = String::from(DOCUMENT_PREAMBLE);

        for record in records {
            output.push_str(&format!("\\section*{{{}}}\n", record.name));
            output.push_str(&format!(
                "Profile: $f(r,t) = {}$\\quad ({})\n\n",
                record.profile_expression_text, record.description_text
            ));
            output.push_str("\\[");
            output.push_str(&record.line_element_latex);
            output.push_str("\\]\n\n");
        }

        output.push_str(DOCUMENT_FOOTER);
        output
    }

    /// Writes `document` to `path`, replacing any existing file.
    ///
    /// The text goes to a sibling `<name>.partial` file first and is then renamed over
    /// `path`, so a failed write never leaves a truncated document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AnsatzError::Write` on any I/O failure.
    pub fn write(&self, path: &Path, document: &str) -> AnsatzResult<()> {
        let partial = partial_path(path);
        let write_error = |source| AnsatzError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Err(e) = fs::write(&partial, document) {
            let _ = fs::remove_file(&partial);
            return Err(write_error(e));
        }
        if let Err(e) = fs::rename(&partial, path) {
            let _ = fs::remove_file(&partial);
            return Err(write_error(e));
        }

        tracing::info!("wrote {} bytes to {}", document.len(), path.display());
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}
