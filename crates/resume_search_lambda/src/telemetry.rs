use tracing_subscriber::EnvFilter;

pub const FINDER_COMPONENT: &str = "finder_handler";
pub const UPLOADER_COMPONENT: &str = "uploader_handler";

/// Installs a JSON subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .try_init();
}
