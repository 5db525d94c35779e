//! Backend entry-point: wires adapters, services, and REST endpoints.

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::server::{self, AppConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::parse();
    let bind_addr = config.bind_addr;
    let state = web::Data::new(server::build_state(&config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(web::scope("/api/v1").configure(server::configure_api))
    })
    .bind(bind_addr)?
    .run()
    .await
}
