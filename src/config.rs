use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

/// How requests to TMDB are authenticated.
#[derive(Clone, Debug, PartialEq)]
pub enum TmdbAuth {
    /// v3 key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token, sent as a bearer header.
    AccessToken(String),
    /// No credentials: the client serves mock data.
    None,
}

impl TmdbAuth {
    fn from_parts(api_key: Option<String>, access_token: Option<String>) -> Self {
        let non_blank = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        match (non_blank(access_token), non_blank(api_key)) {
            (Some(token), _) => TmdbAuth::AccessToken(token),
            (None, Some(key)) => TmdbAuth::ApiKey(key),
            (None, None) => TmdbAuth::None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub tmdb_auth: TmdbAuth,
    pub tmdb_base_url: String,
    pub tmdb_image_url: String,
    pub tmdb_rps: u32,
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movies.db?mode=rwc".to_string());

        let tmdb_auth = TmdbAuth::from_parts(
            std::env::var("TMDB_API_KEY").ok(),
            std::env::var("TMDB_ACCESS_TOKEN").ok(),
        );
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_url = std::env::var("TMDB_IMAGE_URL")
            .unwrap_or_else(|_| "https://image.tmdb.org/t/p/w500".to_string());

        let tmdb_rps: u32 =
            std::env::var("TMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let seed_file = std::env::var("SEED_FILE").ok().filter(|s| !s.trim().is_empty()).map(PathBuf::from);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            tmdb_auth,
            tmdb_base_url,
            tmdb_image_url,
            tmdb_rps,
            seed_file,
        })
    }
}
