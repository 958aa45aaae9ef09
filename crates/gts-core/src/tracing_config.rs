//! Tracing configuration.
//!
//! Supports three output formats controlled by `GTS_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ```bash
//! GTS_LOG=debug GTS_LOG_FORMAT=tree gts build card.gts
//! GTS_LOG="gts_lowering=trace" gts typings card.gts
//! ```
//!
//! The subscriber is only initialised when `GTS_LOG` (or `RUST_LOG`) is set,
//! or when a caller asks for a default filter.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("GTS_LOG_FORMAT").unwrap_or_default())
    }
}

/// `GTS_LOG`, then `RUST_LOG`, then `default_directives`.
fn build_filter(default_directives: Option<&str>) -> Option<EnvFilter> {
    if let Ok(value) = std::env::var("GTS_LOG") {
        return Some(EnvFilter::builder().parse_lossy(value));
    }
    if std::env::var("RUST_LOG").is_ok() {
        return Some(EnvFilter::from_default_env());
    }
    default_directives.map(|directives| EnvFilter::builder().parse_lossy(directives))
}

/// Initialise the global tracing subscriber if `GTS_LOG` or `RUST_LOG` is set.
pub fn init_tracing() {
    init_tracing_with_default(None);
}

/// Like [`init_tracing`], but installs `default_directives` when neither
/// variable is set. Output goes to stderr; a second call is a no-op.
pub fn init_tracing_with_default(default_directives: Option<&str>) {
    let Some(filter) = build_filter(default_directives) else {
        return;
    };

    let _ = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(LogFormat::parse("TREE"), LogFormat::Tree);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }
}
