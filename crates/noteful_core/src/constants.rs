//! Shared constants used across Noteful crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default maximum request body accepted by the API layer.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "noteful=info,noteful_server=info,tower_http=warn";
