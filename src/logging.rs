//! tracing subscriber setup

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when neither `RUST_LOG` nor the settings name one
pub const DEFAULT_DIRECTIVE: &str = "cycle_ledger=warn";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once; later calls are no-ops.
///
/// `RUST_LOG` wins over `configured`. Output goes to stderr so that
/// `--json` output on stdout stays machine-readable.
pub fn init_tracing(configured: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), configured);
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn build_filter(env: Option<&str>, configured: Option<&str>) -> EnvFilter {
    [env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        assert_eq!(build_filter(None, None).to_string(), DEFAULT_DIRECTIVE);
        assert_eq!(
            build_filter(None, Some("cycle_ledger=debug")).to_string(),
            "cycle_ledger=debug"
        );
        assert_eq!(
            build_filter(Some("info"), Some("cycle_ledger=debug")).to_string(),
            "info"
        );
        assert_eq!(build_filter(Some("  "), None).to_string(), DEFAULT_DIRECTIVE);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing(None);
        init_tracing(Some("cycle_ledger=trace"));
    }
}
