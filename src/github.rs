use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::types::Error;

const GITHUB_API: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("ghpr/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<crate::types::Issue>,
}

// Capability interface over the remote API, so the aggregator and the
// orchestrator can be driven by a fake in tests. Futures are Send because
// fetches run inside spawned tasks.
pub trait GitHub: Send + Sync {
    fn authenticated_user(&self) -> impl Future<Output = Result<User, Error>> + Send;
    fn search_issues(&self, query: &str) -> impl Future<Output = Result<SearchResults, Error>> + Send;
}

pub struct RestClient {
    http: Client,
    token: String,
}

impl RestClient {
    pub fn new(token: String) -> Self {
        Self {
            http: Client::new(),
            token,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self
            .http
            .get(format!("{GITHUB_API}/{path}"))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|err| Error::Fetch(err.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                Err(Error::Fetch("GitHub rate limited the request".to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Err(Error::Fetch(format!(
                    "GitHub authentication failed ({status}). {}",
                    body.trim()
                )))
            }
            status if !status.is_success() => {
                Err(Error::Fetch(format!("GitHub API error: {status}")))
            }
            _ => response
                .json::<T>()
                .await
                .map_err(|err| Error::Fetch(err.to_string())),
        }
    }
}

impl GitHub for RestClient {
    async fn authenticated_user(&self) -> Result<User, Error> {
        self.get("user").await
    }

    async fn search_issues(&self, query: &str) -> Result<SearchResults, Error> {
        self.get(&search_path(query)).await
    }
}

// The query is already '+'-joined by Category::search_query; it goes into
// q= verbatim, matching what the search API expects.
fn search_path(query: &str) -> String {
    format!("search/issues?q={query}")
}
