//! GitHub REST API client

use super::BranchHost;
use crate::config::RepoId;
use crate::error::{CleanupError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const API_VERSION: &str = "2022-11-28";
const PER_PAGE: usize = 100;

/// Branch entry as returned by `GET /repos/{owner}/{repo}/branches`
#[derive(Debug, Deserialize)]
struct BranchItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryItem {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Rate limit state reported in response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: Option<u64>,
    pub reset: Option<DateTime<Utc>>,
    /// Seconds to wait, sent with secondary rate limits
    pub retry_after: Option<u64>,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let number = |key: &str| {
            headers
                .get(key)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok())
        };
        Self {
            remaining: number("x-ratelimit-remaining").and_then(|n| u64::try_from(n).ok()),
            reset: number("x-ratelimit-reset").and_then(|secs| DateTime::from_timestamp(secs, 0)),
            retry_after: number("retry-after").and_then(|n| u64::try_from(n).ok()),
        }
    }

    /// Primary quota used up, or a secondary limit asking the client to back off.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0) || self.retry_after.is_some()
    }
}

/// Client bound to a single repository
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: String,
    repo: RepoId,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str, repo: RepoId) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("branch-sweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CleanupError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(api_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CleanupError::Config(format!(
                "API URL cannot be used as a base: {api_url}"
            )));
        }

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
            repo,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint<'a, I>(&'a self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CleanupError::Config(format!("Invalid API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(
                ["repos", self.repo.owner.as_str(), self.repo.name.as_str()]
                    .into_iter()
                    .chain(segments),
            );
        Ok(url)
    }

    /// `git/refs/heads/{name}`, keeping `/` in branch names as path separators.
    pub(crate) fn branch_ref_url(&self, name: &str) -> Result<Url> {
        self.endpoint(["git", "refs", "heads"].into_iter().chain(name.split('/')))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await?;

        let limits = RateLimitInfo::from_headers(response.headers());
        trace!(
            "{} {} (rate limit remaining: {:?})",
            response.status(),
            response.url(),
            limits.remaining
        );

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response, limits).await)
        }
    }
}

async fn error_from_response(response: Response, limits: RateLimitInfo) -> CleanupError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = host_message(status, &body);

    match status {
        StatusCode::UNAUTHORIZED => CleanupError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => CleanupError::RateLimit {
            message,
            reset: limits.reset,
        },
        StatusCode::FORBIDDEN if limits.is_exhausted() => CleanupError::RateLimit {
            message,
            reset: limits.reset,
        },
        StatusCode::FORBIDDEN => CleanupError::Auth(message),
        StatusCode::NOT_FOUND => CleanupError::NotFound(message),
        status => CleanupError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Prefer the `message` field of a JSON error body, then the raw body, then
/// the status reason.
fn host_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return message;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

#[async_trait]
impl BranchHost for GitHubClient {
    async fn repository(&self) -> Result<String> {
        let url = self.endpoint(std::iter::empty())?;
        let response = self.send(self.client.get(url)).await?;
        let repo: RepositoryItem = response.json().await?;
        Ok(repo.full_name)
    }

    async fn list_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page = 1usize;

        loop {
            let mut url = self.endpoint(["branches"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let response = self.send(self.client.get(url)).await?;
            let items: Vec<BranchItem> = response.json().await?;
            let count = items.len();
            debug!("Fetched {} branches from page {}", count, page);
            names.extend(items.into_iter().map(|b| b.name));

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(names)
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        let url = self.branch_ref_url(name)?;
        debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
