//! Shape loading.
//!
//! A shape definition is a small JSON object:
//!
//! ```json
//! { "f": "interpolated_alcubierre(r)", "description": "thin wall" }
//! ```
//!
//! `f` is required; `description` is optional and unknown fields are ignored. Where the JSON
//! comes from is abstracted behind [`ShapeSource`] so the pipeline can run against HTTP, local
//! files or embedded fixtures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ansatz_types::{Locator, ShapeName};
use serde::Deserialize;

use crate::error::ParseError;
use crate::{AnsatzError, AnsatzResult};

/// Wire form of a shape definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShapeData {
    /// Profile expression text, e.g. `interpolated_alcubierre(r)`.
    pub f: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A named, sourced shape definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDescriptor {
    pub name: ShapeName,
    pub source: Locator,
    pub profile_expression: String,
    pub description: Option<String>,
}

/// Retrieves shape definitions from some transport.
pub trait ShapeSource {
    /// Fetches and decodes the definition at `locator`.
    ///
    /// # Errors
    ///
    /// Returns `AnsatzError::Fetch` when the definition cannot be retrieved and
    /// `AnsatzError::Parse` when the retrieved body is not a valid shape object.
    fn fetch(&self, locator: &Locator) -> AnsatzResult<ShapeData>;
}

impl<S: ShapeSource + ?Sized> ShapeSource for &S {
    fn fetch(&self, locator: &Locator) -> AnsatzResult<ShapeData> {
        (**self).fetch(locator)
    }
}

/// Decodes a shape definition body.
pub fn parse_shape_data(locator: &Locator, body: &str) -> AnsatzResult<ShapeData> {
    serde_json::from_str(body).map_err(|source| {
        AnsatzError::from(ParseError::ShapeData {
            locator: locator.to_string(),
            source,
        })
    })
}

/// Fetches one shape and pairs it with its configured name.
pub fn load_shape<S: ShapeSource + ?Sized>(
    source: &S,
    name: &ShapeName,
    locator: &Locator,
) -> AnsatzResult<ShapeDescriptor> {
    let data = source.fetch(locator)?;
    tracing::info!("fetched shape {} from {}", name, locator);

    Ok(ShapeDescriptor {
        name: name.clone(),
        source: locator.clone(),
        profile_expression: data.f,
        description: data.description,
    })
}

fn fetch_error(locator: &Locator, reason: impl Into<String>) -> AnsatzError {
    AnsatzError::Fetch {
        locator: locator.to_string(),
        reason: reason.into(),
    }
}

/// Fetches shape definitions with a single blocking HTTP GET per locator.
///
/// No retries and no timeout beyond the transport defaults.
#[derive(Clone)]
pub struct HttpShapeSource {
    agent: ureq::Agent,
}

impl HttpShapeSource {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for HttpShapeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSource for HttpShapeSource {
    fn fetch(&self, locator: &Locator) -> AnsatzResult<ShapeData> {
        let url = match locator {
            Locator::Url(url) => url,
            Locator::File(_) => {
                return Err(fetch_error(locator, "HTTP source cannot fetch a file locator"))
            }
        };

        tracing::debug!("GET {}", url);
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(fetch_error(locator, format!("HTTP status {}", code)))
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(fetch_error(locator, transport.to_string()))
            }
        };

        let body = response
            .into_string()
            .map_err(|e| fetch_error(locator, format!("failed to read response body: {}", e)))?;
        parse_shape_data(locator, &body)
    }
}

/// Reads shape definitions from JSON files on the local filesystem.
///
/// Relative paths are resolved against the base directory when one is set.
#[derive(Clone, Debug, Default)]
pub struct FileShapeSource {
    base_dir: Option<PathBuf>,
}

impl FileShapeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ShapeSource for FileShapeSource {
    fn fetch(&self, locator: &Locator) -> AnsatzResult<ShapeData> {
        let path = match locator {
            Locator::File(path) => self.resolve(path),
            Locator::Url(_) => {
                return Err(fetch_error(locator, "file source cannot fetch a URL locator"))
            }
        };

        let body = std::fs::read_to_string(&path)
            .map_err(|e| fetch_error(locator, format!("failed to read {}: {}", path.display(), e)))?;
        parse_shape_data(locator, &body)
    }
}

/// Serves shape definitions from bodies held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticShapeSource {
    bodies: HashMap<Locator, String>,
}

impl StaticShapeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the JSON body returned for `locator`.
    pub fn with_body(mut self, locator: Locator, body: impl Into<String>) -> Self {
        self.bodies.insert(locator, body.into());
        self
    }
}

impl ShapeSource for StaticShapeSource {
    fn fetch(&self, locator: &Locator) -> AnsatzResult<ShapeData> {
        let body = self
            .bodies
            .get(locator)
            .ok_or_else(|| fetch_error(locator, "no embedded definition"))?;
        parse_shape_data(locator, body)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    /// Serves a single canned HTTP response on a loopback port and returns its URL.
    pub(crate) fn serve_once(status_line: &'static str, body: &'static str) -> Locator {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Locator::url(format!("http://{}/shape.json", addr)).expect("valid url")
    }

    #[test]
    fn parse_shape_data_reads_f_and_optional_description() {
        let locator = Locator::file("a.json");
        let data = parse_shape_data(
            &locator,
            r#"{"f": "interpolated_alcubierre(r)", "description": "thin wall", "extra": 1}"#,
        )
        .expect("valid shape");
        assert_eq!(data.f, "interpolated_alcubierre(r)");
        assert_eq!(data.description.as_deref(), Some("thin wall"));

        let data = parse_shape_data(&locator, r#"{"f": "r"}"#).expect("no description");
        assert_eq!(data.description, None);
    }

    #[test]
    fn parse_shape_data_rejects_malformed_bodies() {
        let locator = Locator::file("a.json");
        for body in ["", "not json", r#"{"description": "x"}"#, r#"{"f": 3}"#, "[]"] {
            let err = parse_shape_data(&locator, body).expect_err("expected parse error");
            assert!(
                matches!(err, AnsatzError::Parse(ParseError::ShapeData { .. })),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn http_source_fetches_json() {
        let locator = serve_once("200 OK", r#"{"f": "interpolated_natario(r)"}"#);
        let data = HttpShapeSource::new().fetch(&locator).expect("fetch");
        assert_eq!(data.f, "interpolated_natario(r)");
        assert_eq!(data.description, None);
    }

    #[test]
    fn http_source_reports_non_success_status_as_fetch_error() {
        let locator = serve_once("404 Not Found", "");
        let err = HttpShapeSource::new().fetch(&locator).expect_err("404");
        match err {
            AnsatzError::Fetch { reason, .. } => assert!(reason.contains("404"), "{reason}"),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[test]
    fn http_source_reports_transport_failure_as_fetch_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let locator = Locator::url(format!("http://127.0.0.1:{}/shape.json", port)).expect("url");
        let err = HttpShapeSource::new().fetch(&locator).expect_err("refused");
        assert!(matches!(err, AnsatzError::Fetch { .. }));
    }

    #[test]
    fn http_source_reports_bad_json_as_parse_error() {
        let locator = serve_once("200 OK", "<html>oops</html>");
        let err = HttpShapeSource::new().fetch(&locator).expect_err("bad body");
        assert!(matches!(err, AnsatzError::Parse(ParseError::ShapeData { .. })));
    }

    #[test]
    fn http_source_refuses_file_locators() {
        let err = HttpShapeSource::new()
            .fetch(&Locator::file("shape.json"))
            .expect_err("file locator");
        assert!(matches!(err, AnsatzError::Fetch { .. }));
    }

    #[test]
    fn file_source_resolves_relative_paths_against_base_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            temp_dir.path().join("natario.json"),
            r#"{"f": "interpolated_natario(r)", "description": "divergence-free"}"#,
        )
        .expect("Failed to write fixture");

        let source = FileShapeSource::with_base_dir(temp_dir.path());
        let data = source
            .fetch(&Locator::file("natario.json"))
            .expect("fetch from file");
        assert_eq!(data.description.as_deref(), Some("divergence-free"));

        let err = source
            .fetch(&Locator::file("missing.json"))
            .expect_err("missing file");
        assert!(matches!(err, AnsatzError::Fetch { .. }));
    }

    #[test]
    fn load_shape_keeps_configured_name_and_locator() {
        let locator = Locator::file("alcubierre.json");
        let source = StaticShapeSource::new().with_body(
            locator.clone(),
            r#"{"f": "interpolated_alcubierre(r)", "description": "thin wall"}"#,
        );
        let name = ShapeName::new("Alcubierre").expect("name");

        let shape = load_shape(&source, &name, &locator).expect("load");
        assert_eq!(shape.name, name);
        assert_eq!(shape.source, locator);
        assert_eq!(shape.profile_expression, "interpolated_alcubierre(r)");
        assert_eq!(shape.description.as_deref(), Some("thin wall"));

        let err = load_shape(&source, &name, &Locator::file("other.json"))
            .expect_err("unregistered locator");
        assert!(matches!(err, AnsatzError::Fetch { .. }));
    }
}
