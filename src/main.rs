use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ansatz_core::{AnsatzConfig, AnsatzService, HttpShapeSource};

/// Main entry point for the metric ansatz generator
///
/// Fetches the built-in warp-bubble shape definitions over HTTP, validates each profile by
/// substituting it into the spherically-symmetric metric, and writes `metric_ansatz.tex`
/// to the current working directory.
///
/// No arguments or configuration variables are read. Log verbosity follows `RUST_LOG` when
/// it is set and defaults to `ansatz=info` otherwise; logs go to stderr, keeping stdout for
/// the confirmation line.
///
/// # Returns
/// * `Ok(())` - If the document was written
/// * `Err(anyhow::Error)` - On the first fetch, parse, build or write failure
/// Log directives used when `RUST_LOG` is unset or blank.
const DEFAULT_LOG_DIRECTIVES: &str = "ansatz=info,metric_ansatz=info";

/// Builds the log filter from the value of `RUST_LOG`, if any.
///
/// A non-blank value replaces the defaults entirely, so `RUST_LOG=ansatz=warn` quiets the
/// per-shape info lines. Directives that fail to parse are skipped.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => {
            EnvFilter::builder().parse_lossy(directives)
        }
        _ => EnvFilter::new(DEFAULT_LOG_DIRECTIVES),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = Arc::new(AnsatzConfig::warp_bubbles()?);
    tracing::info!("-- Generating metric ansatz for {} shape(s)", cfg.catalog().len());

    let service = AnsatzService::new(cfg, HttpShapeSource::new());
    let path = service.generate()?;

    println!("Generated {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_applies_only_without_rust_log() {
        for unset in [None, Some(""), Some("  ")] {
            let filter = log_filter(unset).to_string();
            assert!(filter.contains("ansatz=info"), "{unset:?}: {filter}");
            assert!(filter.contains("metric_ansatz=info"), "{unset:?}: {filter}");
        }
    }

    #[test]
    fn rust_log_replaces_default_directives() {
        let filter = log_filter(Some("ansatz=warn")).to_string();
        assert!(filter.contains("ansatz=warn"), "{filter}");
        assert!(!filter.contains("=info"), "{filter}");

        let filter = log_filter(Some("error")).to_string();
        assert!(!filter.contains("ansatz"), "{filter}");
    }
}
