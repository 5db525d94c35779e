//! Application configuration parsed from flags and environment variables.

use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration for the garage records API.
#[derive(Parser)]
#[command(name = "backend", about = "Garage records API")]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// OAuth client id expected as the audience of social ID tokens.
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    pub google_client_id: String,

    /// Shared secret used to sign session tokens.
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: String,

    /// Session token lifetime in seconds.
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 86_400)]
    pub session_ttl_secs: i64,

    /// Deadline in milliseconds for verifier and collection round-trips.
    #[arg(long, env = "OPERATION_DEADLINE_MS", default_value_t = 5_000)]
    pub operation_deadline_ms: u64,
}
