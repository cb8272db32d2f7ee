use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::TmdbAuth,
    error::{CatalogError, CatalogResult},
    models::{CandidateDetail, CandidateSummary},
};

pub struct TmdbClient {
    client: reqwest::Client,
    auth: TmdbAuth,
    base_url: String,
    image_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        auth: TmdbAuth,
        base_url: String,
        image_url: String,
        rps: u32,
    ) -> Self {
        // Warn once on app load if using mock data
        if auth == TmdbAuth::None {
            tracing::warn!("Using mock TMDB data - no TMDB_API_KEY or TMDB_ACCESS_TOKEN provided");
        }

        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN),
        )));
        Self { client, auth, base_url, image_url, limiter }
    }

    pub async fn search(&self, title: &str) -> CatalogResult<Vec<CandidateSummary>> {
        if self.auth == TmdbAuth::None {
            return Ok(mock::search(title, &self.image_url));
        }

        self.limiter.until_ready().await;

        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = self
            .get(url)
            .query(&[("query", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(query = %title, results = resp.results.len(), "tmdb search");

        Ok(resp
            .results
            .into_iter()
            .map(|m| CandidateSummary {
                external_id: m.id.to_string(),
                title: m.title,
                year: m.release_date.as_deref().and_then(year_from_release_date),
                thumbnail_url: m
                    .poster_path
                    .filter(|p| !p.is_empty())
                    .map(|p| poster_url(&self.image_url, &p)),
            })
            .collect())
    }

    pub async fn details(&self, external_id: &str) -> CatalogResult<CandidateDetail> {
        if self.auth == TmdbAuth::None {
            return mock::details(external_id, &self.image_url);
        }

        self.limiter.until_ready().await;

        let url = format!(
            "{}/movie/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(external_id)
        );
        let resp: DetailResponse =
            self.get(url).send().await?.error_for_status()?.json().await?;

        debug!(external_id, title = %resp.title, "tmdb details");

        self.to_detail(external_id, resp)
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let req = self.client.get(url);
        match &self.auth {
            TmdbAuth::ApiKey(key) => req.query(&[("api_key", key)]),
            TmdbAuth::AccessToken(token) => req.bearer_auth(token),
            TmdbAuth::None => req,
        }
    }

    fn to_detail(&self, external_id: &str, resp: DetailResponse) -> CatalogResult<CandidateDetail> {
        let release_date = resp.release_date.unwrap_or_default();
        let Some(year) = year_from_release_date(&release_date) else {
            return Err(CatalogError::Malformed(format!(
                "no release year for \"{}\" (release_date: {:?})",
                resp.title, release_date
            )));
        };

        Ok(CandidateDetail {
            external_id: external_id.to_string(),
            title: resp.title,
            year,
            description: resp.overview.unwrap_or_default(),
            img_url: resp
                .poster_path
                .filter(|p| !p.is_empty())
                .map(|p| poster_url(&self.image_url, &p))
                .unwrap_or_default(),
        })
    }
}

/// `"2002-11-14"` -> `2002`.
pub fn year_from_release_date(release_date: &str) -> Option<i32> {
    release_date.split('-').next()?.trim().parse().ok()
}

pub fn poster_url(image_base: &str, poster_path: &str) -> String {
    format!("{}/{}", image_base.trim_end_matches('/'), poster_path.trim_start_matches('/'))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchMovie>,
}

#[derive(Debug, Deserialize)]
struct SearchMovie {
    id: i64,
    title: String,
    release_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    title: String,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

mod mock {
    use super::*;

    const MOVIES: &[(&str, &str, i32, &str, &str)] = &[
        (
            "550",
            "Fight Club",
            1999,
            "A ticking-time-bomb insomniac and a slippery soap salesman channel primal male aggression into a shocking new form of therapy.",
            "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        ),
        (
            "1817",
            "Phone Booth",
            2002,
            "A publicist finds himself trapped in a phone booth, pinned down by an extortionist's sniper rifle.",
            "/tjrX2oWRCM3Tvarz38zlZM7Uc10.jpg",
        ),
        (
            "76600",
            "Avatar: The Way of Water",
            2022,
            "Set more than a decade after the events of the first film, the Sully family fights to stay together.",
            "/t6HIqrRAclMCA60NsSmeqe9RmNV.jpg",
        ),
    ];

    pub(super) fn search(title: &str, image_url: &str) -> Vec<CandidateSummary> {
        let needle = title.trim().to_lowercase();
        MOVIES
            .iter()
            .filter(|(_, t, ..)| t.to_lowercase().contains(&needle))
            .map(|(id, t, year, _, poster)| CandidateSummary {
                external_id: id.to_string(),
                title: t.to_string(),
                year: Some(*year),
                thumbnail_url: Some(poster_url(image_url, poster)),
            })
            .collect()
    }

    pub(super) fn details(external_id: &str, image_url: &str) -> CatalogResult<CandidateDetail> {
        MOVIES
            .iter()
            .find(|(id, ..)| *id == external_id)
            .map(|(id, t, year, overview, poster)| CandidateDetail {
                external_id: id.to_string(),
                title: t.to_string(),
                year: *year,
                description: overview.to_string(),
                img_url: poster_url(image_url, poster),
            })
            .ok_or_else(|| CatalogError::Malformed(format!("unknown mock movie {external_id}")))
    }
}
