//! GitHub REST API implementation of [`lang_radar::api::Client`].

mod builder;
mod payload;
mod rate_limit;

pub use builder::{GithubClientBuilder, GITHUB_API_URL};
pub use rate_limit::RateLimit;

use async_trait::async_trait;
use lang_radar::api::{Client, Error, LanguageByteMap, RepositoryRef, Result};
use log::{debug, warn};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

pub struct GithubClient {
    client: reqwest::Client,
    github_url: Url,
}

impl GithubClient {
    fn repos_url(&self, username: &str, per_page: u32) -> Result<Url> {
        let mut url = self.github_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("GitHub API URL {} cannot be a base URL", self.github_url))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut().append_pair("per_page", &per_page.to_string());
        Ok(url)
    }
}

#[async_trait]
impl Client for GithubClient {
    async fn repositories(&self, username: &str, per_page: u32) -> Result<Vec<RepositoryRef>> {
        let request_url = self.repos_url(username, per_page)?;
        debug!("Listing repositories: {}", request_url);
        let response = self.client.get(request_url).send().await.map_err(transport)?;
        log_rate_limit(&response);

        match response.status() {
            status if status.is_success() => {
                let repos = read_json::<Vec<payload::Repo>>(response).await?;
                Ok(repos.into_iter().map(RepositoryRef::from).collect())
            }
            StatusCode::NOT_FOUND => Err(Error::UserNotFound(username.to_string())),
            status if rate_limit::is_rate_limited(status, response.headers()) => {
                let reset = RateLimit::from_headers(response.headers())
                    .ok()
                    .and_then(|limit| limit.reset_at())
                    .map(|at| at.to_rfc3339());
                warn!("GitHub API rate limit exhausted while listing repositories of {}", username);
                Err(Error::RateLimited { reset })
            }
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn languages(&self, repo: &RepositoryRef) -> Result<LanguageByteMap> {
        let response = self
            .client
            .get(&repo.languages_url)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        read_json::<LanguageByteMap>(response).await
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::upstream(err.status().map(|status| status.as_u16()), err.to_string())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status().as_u16();
    response
        .json::<T>()
        .await
        .map_err(|err| Error::upstream(Some(status), format!("Malformed response body: {}", err)))
}

/// Keeps the status and GitHub's own message, falling back to the reason phrase.
async fn unexpected_status(response: Response) -> Error {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unexpected status").to_string();
    let message = match response.json::<payload::ErrorBody>().await {
        Ok(body) => format!("{}: {}", reason, body.message),
        Err(_) => reason,
    };
    Error::upstream(Some(status.as_u16()), message)
}

fn log_rate_limit(response: &Response) {
    if let Ok(limit) = RateLimit::from_headers(response.headers()) {
        debug!("Rate limit: {}/{} remaining, resets at {}", limit.remaining, limit.limit, limit.reset);
    }
}
