mod config;
mod db;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::state::{AppState, Repositories};
use crate::utils::clock::SystemClock;
use crate::utils::jwt::JwtIssuer;
use crate::utils::token_verifier::OidcVerifier;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,nila_server=debug")),
        )
        .init();

    info!("connecting to database");
    let db = db::establish_connection(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db::sync_schema(&db).await.context("Failed to create schema")?;
    info!("database ready");

    let state = AppState::assemble(
        Repositories::sea_orm(db),
        JwtIssuer::new(&config.jwt_secret),
        Arc::new(OidcVerifier::new(config.google_client_id, config.apple_bundle_id)),
        Arc::new(SystemClock),
    );
    let state = web::Data::new(state);

    info!(host = %config.host, port = config.port, "starting server");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(routes::json_config())
            .app_data(routes::path_config())
            .wrap(actix_web::middleware::Logger::default())
            .configure(routes::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
