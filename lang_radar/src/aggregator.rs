use crate::api::{ChartRequest, ChartStyle, Client, Error, LanguageByteMap, LanguageTotals, RepositoryRef, Result};
use crate::selector::{select_top, RankedSeries, DEFAULT_TOP_LANGUAGES};
use crate::transform::{displayed_percentage, transform, DisplaySeries};
use derive_more::Constructor;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Listing page size accepted by the GitHub API.
pub const MAX_REPOS_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct RadarOptions {
    /// Repositories requested by the single listing call
    pub max_repos: u32,
    /// Maximal parallel language requests
    pub max_language_requests: usize,
    /// Vertices of the radar chart
    pub top_languages: usize,
    pub exclude_forks: bool,
}

impl Default for RadarOptions {
    fn default() -> Self {
        RadarOptions {
            max_repos: MAX_REPOS_PAGE,
            max_language_requests: 10,
            top_languages: DEFAULT_TOP_LANGUAGES,
            exclude_forks: false,
        }
    }
}

/// Result of the aggregation pipeline for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageProfile {
    pub username: String,
    pub totals: LanguageTotals,
    pub series: RankedSeries,
    pub display: DisplaySeries,
}

impl LanguageProfile {
    pub fn title(&self) -> String {
        format!(
            "Top {} Linguagens por Bytes de Código de {}",
            self.series.series.len(),
            self.username
        )
    }

    /// Languages ranked past the chart's vertices.
    pub fn other_languages(&self) -> &[String] {
        &self.series.overflow_labels
    }

    pub fn chart_request(&self, style: ChartStyle) -> ChartRequest {
        ChartRequest {
            title: self.title(),
            labels: self.display.labels.clone(),
            values: self.display.values.clone(),
            suggested_max: self.display.suggested_max,
            style,
        }
    }
}

pub struct LanguageRadar<CLIENT>
where
    CLIENT: 'static + Client,
{
    client: Arc<CLIENT>,
    options: RadarOptions,
}

impl<CLIENT> LanguageRadar<CLIENT>
where
    CLIENT: 'static + Client,
{
    pub fn new(client: CLIENT, options: RadarOptions) -> Self {
        LanguageRadar {
            client: Arc::new(client),
            options,
        }
    }

    /// Lists `username`'s repositories, sums their languages and ranks them.
    ///
    /// Only the listing call can fail the profile. A repository whose languages
    /// cannot be fetched contributes nothing.
    pub async fn profile(&self, username: &str) -> Result<LanguageProfile> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::MissingUsername);
        }

        let repos = self.client.repositories(username, self.options.max_repos).await?;
        info!("Found {} repositories for {}", repos.len(), username);
        let repos = self.filter_forks(repos);

        let totals = aggregate_languages(self.client.clone(), repos, self.options.max_language_requests).await;
        if totals.is_empty() {
            warn!("No detectable code in public repositories of {}. Using placeholder series.", username);
        }

        let series = select_top(&totals, self.options.top_languages);
        let display = transform(&series);
        for (label, value) in display.labels.iter().zip(&display.values) {
            debug!("{}: {}%", label, displayed_percentage(*value));
        }

        Ok(LanguageProfile {
            username: username.to_string(),
            totals,
            series,
            display,
        })
    }

    fn filter_forks(&self, repos: Vec<RepositoryRef>) -> Vec<RepositoryRef> {
        if !self.options.exclude_forks {
            return repos;
        }
        let count = repos.len();
        let repos: Vec<RepositoryRef> = repos.into_iter().filter(|repo| !repo.fork).collect();
        debug!("Excluded {} forked repositories", count - repos.len());
        repos
    }
}

/// Fetches the languages of every repository concurrently and sums them.
///
/// One task per repository, at most `max_requests` requests in flight. Totals
/// are folded only after every task settled, so completion order never matters.
/// Dropping the returned future aborts requests still in flight.
pub async fn aggregate_languages<CLIENT>(
    client: Arc<CLIENT>,
    repos: Vec<RepositoryRef>,
    max_requests: usize,
) -> LanguageTotals
where
    CLIENT: 'static + Client,
{
    let permits = Arc::new(Semaphore::new(max_requests.max(1)));
    let mut tasks = JoinSet::new();
    for repo in repos {
        let client = client.clone();
        let permits = permits.clone();
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let languages = client.languages(&repo).await;
            (repo, languages)
        });
    }

    let mut fetched: Vec<LanguageByteMap> = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(languages))) => fetched.push(languages),
            Ok((repo, Err(err))) => warn!("Skipping languages of repository {}: {}", repo.name, err),
            Err(err) => error!("Language request task failed: {}", err),
        }
    }
    debug!("Fetched languages of {} repositories", fetched.len());

    fetched.into_iter().collect()
}
