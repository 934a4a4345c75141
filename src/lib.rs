use log::error;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod registration_backend;
pub mod utils;

use crate::config::ServerConfig;
use crate::utils::logging::init_logging;

pub async fn run() {
    dotenvy::dotenv().ok();
    init_logging();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = api::server::start_server(config).await {
        error!("Error starting server: {}", e);
        std::process::exit(1);
    }
}
