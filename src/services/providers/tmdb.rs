/// TMDB (The Movie Database) v3 provider
///
/// Every request carries the configured API key as the `api_key` query
/// parameter. Responses are optionally cached in Redis.
use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieId, TrendingWindow},
    services::providers::MovieProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const LIST_CACHE_TTL: u64 = 3600; // 1 hour
const MOVIE_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    /// Creates a provider from the startup configuration
    pub fn new(config: &Config, cache: Option<Cache>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues a GET against TMDB and decodes the JSON body
    ///
    /// Failure messages name the request path only. The full URL carries the
    /// API key and must never reach a caller.
    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Value> {
        let url = self.endpoint(path);
        tracing::debug!(path = %path, "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| upstream_failure(path, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "TMDB resource not found: {}",
                path
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                path = %path,
                body = %body,
                "TMDB returned error status"
            );
            return Err(AppError::UpstreamUnavailable(format!(
                "TMDB returned status {} for {}",
                status, path
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| upstream_failure(path, e))
    }

    async fn fetch(
        &self,
        key: CacheKey,
        ttl: u64,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<Value> {
        match &self.cache {
            Some(cache) => cached!(cache, key, ttl, self.get_json(path, params)),
            None => self.get_json(path, params).await,
        }
    }
}

fn upstream_failure(path: &str, err: reqwest::Error) -> AppError {
    let err = err.without_url();
    tracing::warn!(error = %err, path = %path, "TMDB request failed");
    AppError::UpstreamUnavailable(format!("TMDB request failed for {}", path))
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn search(&self, query: &str) -> AppResult<Value> {
        let payload = self
            .fetch(
                CacheKey::Search(query.to_string()),
                SEARCH_CACHE_TTL,
                "/search/movie",
                &[("query", query)],
            )
            .await?;

        tracing::info!(
            query = %query,
            results = payload["results"].as_array().map_or(0, |r| r.len()),
            provider = self.name(),
            "Movie search completed"
        );

        Ok(payload)
    }

    async fn trending(&self, window: TrendingWindow) -> AppResult<Value> {
        let path = format!("/trending/movie/{}", window);
        self.fetch(CacheKey::Trending(window), LIST_CACHE_TTL, &path, &[])
            .await
    }

    async fn details(&self, movie_id: MovieId) -> AppResult<Value> {
        let path = format!("/movie/{}", movie_id);
        self.fetch(CacheKey::Details(movie_id), MOVIE_CACHE_TTL, &path, &[])
            .await
    }

    async fn popular(&self) -> AppResult<Value> {
        self.fetch(CacheKey::Popular, LIST_CACHE_TTL, "/movie/popular", &[])
            .await
    }

    async fn recommendations(&self, movie_id: MovieId) -> AppResult<Value> {
        let path = format!("/movie/{}/recommendations", movie_id);
        self.fetch(
            CacheKey::Recommendations(movie_id),
            MOVIE_CACHE_TTL,
            &path,
            &[],
        )
        .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
