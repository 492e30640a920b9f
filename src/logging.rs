use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the global fmt subscriber. Later calls are ignored, so tests and
/// the binary can both call this freely.
pub fn init(filter: &str) {
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
