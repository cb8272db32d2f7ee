mod config;
mod db;
mod entities;
mod error;
mod models;
mod ranking;
mod routes;
mod store;
mod templates;
mod tmdb;

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, models::NewMovie, store::MovieStore, tmdb::TmdbClient};

pub struct AppState {
    pub store: MovieStore,
    pub tmdb: Arc<TmdbClient>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/add", get(routes::add_form).post(routes::add_search))
        .route("/find", get(routes::find))
        .route("/edit", get(routes::edit_form).post(routes::edit))
        .route("/delete", get(routes::delete))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,topmovies=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("topmovies/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = MovieStore::new(db);

    if let Some(path) = &config.seed_file {
        let seeds = read_seed_file(path)?;
        store.import(seeds).await?;
    }
    tracing::info!(movies = store.count().await?, "movie store ready");

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_auth.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_image_url.clone(),
        config.tmdb_rps,
    );

    let state = Arc::new(AppState { store, tmdb: Arc::new(tmdb) });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn read_seed_file(path: &Path) -> anyhow::Result<Vec<NewMovie>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path.display()))
}
