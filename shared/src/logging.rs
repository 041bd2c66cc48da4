//! Shared logging utilities
//!
//! The library never installs a global subscriber. Callers build a span with
//! [`cluster_span`] and hand it to the components they create; every event is
//! emitted as a child of that span. Binaries install the stdout subscriber via
//! [`init_tracing`].

use tracing::Span;

/// Root span that a cluster and all of its process handles log under
pub fn cluster_span(name: &str) -> Span {
    tracing::info_span!("cluster", name = %name)
}

/// Span for a disposable component (tests, one-shot commands)
pub fn detached_span() -> Span {
    Span::none()
}

/// Build the filter directive for a binary at the given level
pub fn filter_directive(binary: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{binary}={level},minicluster={level},shared={level},reqwest=warn,hyper=warn")
}

/// Initialize the stdout tracing subscriber for a binary.
///
/// `RUST_LOG` overrides the computed filter when set.
pub fn init_tracing(binary: &str, verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(binary, verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_levels() {
        assert!(filter_directive("minicluster", true).starts_with("minicluster=debug"));
        assert!(filter_directive("minicluster", false).contains("shared=info"));
    }
}
