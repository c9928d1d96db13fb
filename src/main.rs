// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database and pipeline clients, then start the HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use beach_cache::config::{self, Config};
use beach_cache::handlers;
use beach_cache::services::PipelineDeps;
use dotenv::dotenv;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    let config_error = config.validate().err();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Some(e) = config_error {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting beach-cache service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Build the provider, blob and directory clients once
    let deps = match PipelineDeps::from_config(&config, pool.clone()) {
        Ok(deps) => deps,
        Err(e) => {
            log::error!("Failed to initialize pipeline clients: {}", e);
            std::process::exit(1);
        }
    };

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let pool = web::Data::new(pool);
    let config = web::Data::new(config);
    let deps = web::Data::new(deps);

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(deps.clone())
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .configure(handlers::health_config)
            .configure(handlers::beaches_config)
            .configure(handlers::cron_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
