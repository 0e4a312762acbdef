//! Tracing subscriber setup for the `vittec` binary.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber.
///
/// Does nothing unless `VITTE_LOG` or `RUST_LOG` holds filter directives
/// (`VITTE_LOG` wins). With `VITTE_LOG_TREE=1` events are rendered as an
/// indented span tree. Output goes to stderr. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(directives) = std::env::var("VITTE_LOG").or_else(|_| std::env::var("RUST_LOG")) else {
            return;
        };
        let registry = tracing_subscriber::registry().with(EnvFilter::new(directives));
        let tree = std::env::var("VITTE_LOG_TREE").is_ok_and(|v| v.trim() == "1");
        // Another subscriber may already be installed (tests, embedding).
        let _ = if tree {
            registry
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .try_init()
        };
    });
}
