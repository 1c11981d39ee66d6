use config::CONFIG;
use controller::create_app;
use service::app_state::create_app_state;

use cyder_tools::log::{LocalLogger, error, info};

mod config;
mod controller;
mod database;
mod schema;
mod service;
mod utils;

#[tokio::main]
async fn main() {
    LocalLogger::init(&CONFIG.log_level);

    let app_state = match create_app_state().await {
        Ok(state) => state,
        Err(e) => {
            error!("failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    let addr = format!("{}:{}", &CONFIG.host, CONFIG.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}: {}", &addr, e);
            std::process::exit(1);
        }
    };
    info!("server start at {}{}", &addr, &CONFIG.base_path);

    let app = create_app(&CONFIG.base_path, &CONFIG.cors_allowed_origins, app_state);
    if let Err(e) = axum::serve(listener, app).await {
        error!("server stopped: {}", e);
    }
}
