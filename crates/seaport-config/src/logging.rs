//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this twice
/// returns an error instead of panicking.
pub fn init_tracing(log_level: &str) -> Result<(), String> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.try_init()
		.map_err(|e| format!("Failed to initialize tracing: {}", e))
}
