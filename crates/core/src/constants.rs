//! Constants used throughout the ansatz core crate.
//!
//! Shape locations, the output filename and the fixed LaTeX text of the document live here
//! so the renderer and the default configuration agree on them.

/// Filename of the generated document, relative to the current working directory.
pub const DEFAULT_OUTPUT_FILENAME: &str = "metric_ansatz.tex";

/// Display name and location of the Alcubierre shape definition.
pub const ALCUBIERRE_SHAPE: (&str, &str) = (
    "Alcubierre",
    "https://raw.githubusercontent.com/arcticoder/warp-bubble-coordinate-spec/refs/heads/main/scripts/shapes/alcubierre.json",
);

/// Display name and location of the Natário shape definition.
pub const NATARIO_SHAPE: (&str, &str) = (
    "Natário",
    "https://raw.githubusercontent.com/arcticoder/warp-bubble-coordinate-spec/refs/heads/main/scripts/shapes/natario.json",
);

/// Document preamble, up to and including the coordinate note and its trailing blank line.
pub const DOCUMENT_PREAMBLE: &str = "\\documentclass{article}
\\usepackage{amsmath}
\\begin{document}

Coordinates: (t, r, θ, φ) with axial symmetry about the z-axis; functions have compact support in r.

";

/// Document footer.
pub const DOCUMENT_FOOTER: &str = "\\end{document}\n";

/// Generic spherically-symmetric line element shown for every shape.
///
/// This is the template form with `f(r,t)`, not the substituted profile.
pub const LINE_ELEMENT: &str =
    r"ds^2 = -\,dt^2 + \bigl(1 - f(r,t)\bigr)\,dr^2 + r^2\,d\theta^2 + r^2\sin^2\theta\,d\phi^2";

/// Suffix of the temporary file the document is written to before being moved into place.
pub const PARTIAL_SUFFIX: &str = ".partial";
