//! Test logging.

use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `debug` for the workspace crates.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("cham_query=debug,cham_mutation=debug,cham_merger=debug,cham_engine=debug,cham::sql=info")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
