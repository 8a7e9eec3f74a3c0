pub mod builders;
pub mod recording_sink;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Filter comes from `FFSHELL_LOG` (same variable the binary reads), so
/// `FFSHELL_LOG=ffshell=debug cargo test -- --nocapture` shows runner events.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FFSHELL_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn,ffshell=info"));

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Build an argv from string literals.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// `sh -c <script>` as an argv, for tests that need shell redirection.
pub fn sh(script: &str) -> Vec<String> {
    argv(&["sh", "-c", script])
}
