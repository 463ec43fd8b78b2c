//! GitHub REST implementation of the host gateway
//!
//! Talks to `api.github.com` (or a GitHub Enterprise base URL) with a bearer
//! token. List endpoints are paginated by the host at 100 items per page, so
//! every listing call walks pages until a short page comes back.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::GatewayError;
use crate::event::PullRequestRef;
use crate::gateway::{ChangedFile, Commit, GatewayResult, HostGateway, IssueComment};

const PER_PAGE: usize = 100;

/// Page to fetch after receiving `batch_len` items for `current`.
///
/// A short page (fewer than [`PER_PAGE`] items, including an empty one) ends
/// the walk; a full page may be followed by more, so the next page must be
/// fetched even when it turns out to be empty.
fn next_page(current: u32, batch_len: usize) -> Option<u32> {
    if batch_len < PER_PAGE {
        None
    } else {
        Some(current + 1)
    }
}

/// GitHub API configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Base API URL, e.g. `https://api.github.com`
    pub api_url: String,

    /// Token with permission to read the PR and write issue comments
    pub token: String,
}

impl GitHubConfig {
    /// Create a config for the given base URL and token.
    pub fn new(api_url: &str, token: &str) -> Self {
        GitHubConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }
}

/// GitHub-backed [`HostGateway`].
pub struct GitHubGateway {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubGateway {
    /// Create a new gateway.
    pub fn new(config: GitHubConfig) -> GatewayResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("prgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(GitHubGateway {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    async fn check(resp: reqwest::Response, context: &str) -> GatewayResult<reqwest::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(context.to_string()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }

    /// GET a paginated list endpoint, walking pages until a short page.
    async fn get_paged<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let resp = self
                .http_client
                .get(self.url(path))
                .bearer_auth(&self.config.token)
                .header("Accept", "application/vnd.github+json")
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await?;
            let resp = Self::check(resp, path).await?;

            let batch: Vec<T> = resp.json().await?;
            let batch_len = batch.len();
            items.extend(batch);

            match next_page(page, batch_len) {
                Some(next) => page = next,
                None => break,
            }
        }

        debug!(path, count = items.len(), "Fetched paginated list");
        Ok(items)
    }

    async fn send_body(
        &self,
        req: reqwest::RequestBuilder,
        body: &str,
        context: &str,
    ) -> GatewayResult<IssueComment> {
        let resp = req
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .json(&json!({ "body": body }))
            .send()
            .await?;
        let resp = Self::check(resp, context).await?;
        Ok(resp.json().await?)
    }
}

/// Wire shape of one entry from the PR commits endpoint.
#[derive(Debug, serde::Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, serde::Deserialize)]
struct CommitDetail {
    message: String,
}

#[async_trait]
impl HostGateway for GitHubGateway {
    async fn list_changed_files(&self, pr: &PullRequestRef) -> GatewayResult<Vec<ChangedFile>> {
        let path = format!("/repos/{}/pulls/{}/files", pr.repository, pr.number);
        self.get_paged(&path).await
    }

    async fn list_commits(&self, pr: &PullRequestRef) -> GatewayResult<Vec<Commit>> {
        let path = format!("/repos/{}/pulls/{}/commits", pr.repository, pr.number);
        let entries: Vec<CommitEntry> = self.get_paged(&path).await?;
        Ok(entries
            .into_iter()
            .map(|e| Commit {
                message: e.commit.message,
            })
            .collect())
    }

    async fn list_comments(&self, pr: &PullRequestRef) -> GatewayResult<Vec<IssueComment>> {
        let path = format!("/repos/{}/issues/{}/comments", pr.repository, pr.number);
        self.get_paged(&path).await
    }

    async fn create_comment(
        &self,
        pr: &PullRequestRef,
        body: &str,
    ) -> GatewayResult<IssueComment> {
        let path = format!("/repos/{}/issues/{}/comments", pr.repository, pr.number);
        let req = self.http_client.post(self.url(&path));
        self.send_body(req, body, &path).await
    }

    async fn update_comment(
        &self,
        pr: &PullRequestRef,
        comment_id: u64,
        body: &str,
    ) -> GatewayResult<IssueComment> {
        let path = format!("/repos/{}/issues/comments/{}", pr.repository, comment_id);
        let req = self.http_client.patch(self.url(&path));
        self.send_body(req, body, &path).await
    }
}
