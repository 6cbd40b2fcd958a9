// src/services/twitter.rs

//! Recent-tweet lookup for hazard keywords.
//!
//! A thin wrapper over the v2 recent search endpoint, used by the API server
//! alongside the video pipeline.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable holding the bearer token.
pub const TWITTER_TOKEN_ENV: &str = "TWITTER_BEARER_TOKEN";

/// Hazard query sent to the search endpoint.
pub const HAZARD_QUERY: &str = "tsunami OR cyclone -is:retweet (lang:en OR lang:hi)";

const DEFAULT_API_BASE: &str = "https://api.twitter.com";
const SEARCH_PATH: &str = "/2/tweets/search/recent";
const MIN_PAGE: usize = 10;
const MAX_PAGE: usize = 100;

/// Result of a hazard tweet search.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TweetSearch {
    pub count: usize,
    pub items: Vec<TweetItem>,
    pub query: String,
}

/// A single tweet, flattened for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TweetItem {
    pub id: String,
    pub created_at: String,
    pub lang: String,
    pub text: String,
    pub likes: Option<u64>,
    pub retweets: Option<u64>,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    text: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    lang: String,
    #[serde(default)]
    public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    like_count: Option<u64>,
    retweet_count: Option<u64>,
}

impl From<Tweet> for TweetItem {
    fn from(tweet: Tweet) -> Self {
        let metrics = tweet.public_metrics.unwrap_or_default();
        Self {
            url: format!("https://twitter.com/i/web/status/{}", tweet.id),
            id: tweet.id,
            created_at: tweet.created_at,
            lang: tweet.lang,
            text: tweet.text.replace('\n', " "),
            likes: metrics.like_count,
            retweets: metrics.retweet_count,
        }
    }
}

/// Client for the recent search endpoint.
pub struct TwitterClient {
    client: Client,
    search_url: Url,
    bearer_token: String,
}

impl TwitterClient {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE, bearer_token)
    }

    pub fn with_base_url(base_url: &str, bearer_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            search_url: Url::parse(base_url)?.join(SEARCH_PATH)?,
            bearer_token: bearer_token.into(),
        })
    }

    /// Build a client from `TWITTER_BEARER_TOKEN`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(TWITTER_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Self::new(token.trim()),
            _ => Err(AppError::MissingCredential(TWITTER_TOKEN_ENV.to_string())),
        }
    }

    /// Search recent hazard tweets, returning at most `limit` items.
    pub async fn search_hazards(&self, limit: usize) -> Result<TweetSearch> {
        let page_size = limit.clamp(MIN_PAGE, MAX_PAGE);
        let response = self
            .client
            .get(self.search_url.clone())
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", HAZARD_QUERY.to_string()),
                ("max_results", page_size.to_string()),
                ("tweet.fields", "created_at,lang,public_metrics".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::fetch(HAZARD_QUERY, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(HAZARD_QUERY, format!("HTTP {status}")));
        }

        let body: SearchResponse = response.json().await?;
        let items: Vec<TweetItem> = body
            .data
            .into_iter()
            .take(limit)
            .map(TweetItem::from)
            .collect();

        Ok(TweetSearch {
            count: items.len(),
            items,
            query: HAZARD_QUERY.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn search_flattens_tweets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/tweets/search/recent"))
            .and(header("authorization", "Bearer secret"))
            .and(query_param("max_results", "10"))
            .and(query_param("query", HAZARD_QUERY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "id": "1",
                        "text": "Cyclone near\nChennai",
                        "created_at": "2024-05-01T10:00:00.000Z",
                        "lang": "en",
                        "public_metrics": { "like_count": 4, "retweet_count": 2 }
                    },
                    { "id": "2", "text": "सुनामी", "lang": "hi" }
                ]
            })))
            .mount(&server)
            .await;

        let client = TwitterClient::with_base_url(&server.uri(), "secret").unwrap();
        let result = client.search_hazards(5).await.unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.query, HAZARD_QUERY);
        let first = &result.items[0];
        assert_eq!(first.text, "Cyclone near Chennai");
        assert_eq!(first.likes, Some(4));
        assert_eq!(first.url, "https://twitter.com/i/web/status/1");
        assert_eq!(result.items[1].retweets, None);
    }

    #[tokio::test]
    async fn empty_result_has_no_data_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": {} })))
            .mount(&server)
            .await;

        let client = TwitterClient::with_base_url(&server.uri(), "secret").unwrap();
        let result = client.search_hazards(10).await.unwrap();
        assert_eq!(result.count, 0);
    }

    #[tokio::test]
    async fn unauthorized_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = TwitterClient::with_base_url(&server.uri(), "bad").unwrap();
        assert!(matches!(
            client.search_hazards(10).await,
            Err(AppError::Fetch { .. })
        ));
    }
}
