// src/api.rs

//! HTTP API exposing the scraper and the tweet lookup.
//!
//! - `GET /api/youtube/scrape?max_results=N` runs a full scrape
//! - `GET /api/twitter/search?limit=N` searches recent hazard tweets
//! - `GET /health`

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::error::Result;
use crate::models::{Config, SearchResults};
use crate::pipeline::HazardScraper;
use crate::services::{PlatformFetcher, SearchFetcher, TwitterClient, twitter};

const TWEET_LIMIT_MIN: usize = 1;
const TWEET_LIMIT_MAX: usize = 100;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    fetcher: Arc<dyn SearchFetcher>,
    twitter: Option<Arc<TwitterClient>>,
}

impl AppState {
    pub fn new(
        config: Config,
        fetcher: Arc<dyn SearchFetcher>,
        twitter: Option<TwitterClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            twitter: twitter.map(Arc::new),
        }
    }

    /// Live fetcher plus a tweet client when the bearer token is set.
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher = Arc::new(PlatformFetcher::new(&config.scraper)?);
        let twitter = match TwitterClient::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("Tweet search disabled: {}", e);
                None
            }
        };
        Ok(Self::new(config, fetcher, twitter))
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/youtube/scrape", get(youtube_scrape))
        .route("/api/twitter/search", get(twitter_search))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    max_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TweetParams {
    limit: Option<usize>,
}

/// Serialized directly so categories keep their run order.
#[derive(Serialize)]
struct ScrapeResponse {
    results: SearchResults,
}

async fn youtube_scrape(
    State(state): State<AppState>,
    Query(params): Query<ScrapeParams>,
) -> Response {
    let cap = state.config.api.clamp_max_results(params.max_results);
    let scraper = match HazardScraper::new(&state.config, state.fetcher.clone()) {
        Ok(scraper) => scraper,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let results = scraper.scrape_all(cap).await;
    Json(ScrapeResponse { results }).into_response()
}

async fn twitter_search(
    State(state): State<AppState>,
    Query(params): Query<TweetParams>,
) -> Response {
    let Some(client) = state.twitter.clone() else {
        let message = format!("{} missing on server", twitter::TWITTER_TOKEN_ENV);
        return Json(json!({ "error": message })).into_response();
    };

    let limit = params
        .limit
        .unwrap_or(state.config.api.twitter_default_limit)
        .clamp(TWEET_LIMIT_MIN, TWEET_LIMIT_MAX);

    match client.search_hazards(limit).await {
        Ok(search) => Json(search).into_response(),
        Err(e) => {
            log::warn!("Tweet search failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HazardTerm, QueryTemplates};
    use async_trait::async_trait;
    use serde_json::Value;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Returns the same page for every query.
    struct StaticFetcher(String);

    #[async_trait]
    impl SearchFetcher for StaticFetcher {
        async fn fetch(&self, _query: &str, _hint_count: usize) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn page(count: usize) -> String {
        let items: Vec<Value> = (0..count)
            .map(|i| {
                json!({ "videoRenderer": {
                    "videoId": format!("v{i}"),
                    "title": { "runs": [ { "text": format!("Cyclone Chennai help {i}") } ] }
                } })
            })
            .collect();
        let data = json!({
            "contents": { "twoColumnSearchResultsRenderer": { "primaryContents": {
                "sectionListRenderer": { "contents": [ { "itemSectionRenderer": { "contents": items } } ] }
            } } }
        });
        format!("<script>var ytInitialData = {data};</script>")
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.hazards = vec![HazardTerm::new("cyclone", "चक्रवात")];
        config.queries = QueryTemplates {
            english: vec!["{hazard} help".into()],
            hindi: vec!["{hazard} मदद".into()],
        };
        config
    }

    async fn serve(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn youtube_scrape_clamps_cap() {
        let state = AppState::new(config(), Arc::new(StaticFetcher(page(40))), None);
        let base = serve(state).await;

        let body: Value = reqwest::get(format!("{base}/api/youtube/scrape?max_results=100"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let english = body["results"]["english_cyclone_emergency"].as_array().unwrap();
        assert_eq!(english.len(), 30);
        assert_eq!(english[0]["url"], "https://www.youtube.com/watch?v=v0");

        let body: Value = reqwest::get(format!("{base}/api/youtube/scrape"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["results"]["hindi_cyclone_emergency"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn twitter_without_token_reports_error() {
        let state = AppState::new(config(), Arc::new(StaticFetcher(String::new())), None);
        let base = serve(state).await;

        let response = reqwest::get(format!("{base}/api/twitter/search")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "TWITTER_BEARER_TOKEN missing on server");
    }

    #[tokio::test]
    async fn twitter_search_passes_clamped_limit() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("max_results", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [ { "id": "9", "text": "Cyclone alert", "lang": "en" } ]
            })))
            .mount(&upstream)
            .await;

        let client = TwitterClient::with_base_url(&upstream.uri(), "secret").unwrap();
        let state = AppState::new(config(), Arc::new(StaticFetcher(String::new())), Some(client));
        let base = serve(state).await;

        let body: Value = reqwest::get(format!("{base}/api/twitter/search?limit=500"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["count"], 1);
        assert_eq!(body["items"][0]["url"], "https://twitter.com/i/web/status/9");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let state = AppState::new(config(), Arc::new(StaticFetcher(String::new())), None);
        let base = serve(state).await;
        let text = reqwest::get(format!("{base}/health")).await.unwrap().text().await.unwrap();
        assert_eq!(text, "ok");
    }
}
