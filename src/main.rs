// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::info;
use std::sync::Arc;
use vectorquote::services::SessionStore;
use vectorquote::{AppState, config::AppConfig, configure};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting vectorquote service...");

    let config = AppConfig::from_env().context("invalid configuration")?;
    let bind_addr = config.bind_addr.clone();
    let session_ttl = config.session_ttl;
    info!(
        "Analysis delay {:?}, session TTL {:?}, payments to {}",
        config.analysis_delay, session_ttl, config.payment_email
    );

    let app_state = AppState::new(config);
    let _sweeper = SessionStore::spawn_sweeper(Arc::clone(&app_state.store), session_ttl);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {bind_addr}"))?
    .run()
    .await?;

    Ok(())
}
