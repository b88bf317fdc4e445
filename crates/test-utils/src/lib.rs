//! Shared fixtures for watchhook's integration tests.
//!
//! - [`recording_runner`]: a `CommandRunner` that records command lines.
//! - [`scripted_watch`]: a `WatchService` fed by the test.
//! - [`builders`]: YAML config documents without hand-written strings.

pub mod builders;
pub mod recording_runner;
pub mod scripted_watch;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for anything a test awaits through [`with_timeout`].
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

/// Used when `RUST_LOG` is unset: crate internals at debug, the rest at info.
const DEFAULT_TEST_FILTER: &str = "info,watchhook=debug";

static TRACING: Once = Once::new();

/// Send `tracing` output through the harness capture, once per test binary.
///
/// Output only shows for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        // A test may already have installed its own global subscriber.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_test_writer().with_target(true))
            .try_init();
    });
}

/// Await `fut`, failing the test after [`TEST_DEADLINE`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    within(TEST_DEADLINE, fut).await
}

/// Await `fut`, failing the test after `limit`.
pub async fn within<F: Future>(limit: Duration, fut: F) -> F::Output {
    match tokio::time::timeout(limit, fut).await {
        Ok(output) => output,
        Err(_) => panic!("test future still pending after {limit:?}"),
    }
}
