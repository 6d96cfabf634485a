//! HTTP endpoint rendering a GitHub user's language usage as a radar chart.

pub mod args;
pub mod server;

pub use args::{Args, ResponseFormat};
pub use server::{router, AppState};

use github_client::GithubClientBuilder;
use lang_radar::api::Result;
use lang_radar::{LanguageRadar, RadarOptions};
use log::{info, warn};
use quickchart_client::QuickChartClient;

/// Wires the GitHub client, the aggregation pipeline and the renderer from configuration.
pub fn build_state(args: &Args) -> Result<AppState> {
    let mut client = GithubClientBuilder::default()
        .with_github_url(&args.api_url)
        .try_with_user_agent(&args.user_agent)?;
    match &args.api_token {
        Some(token) => {
            info!("Using personal access token for GitHub API requests.");
            client = client.try_with_token(token)?;
        }
        None => warn!("No personal access token (GITHUB_PAT) configured. GitHub API requests may hit the rate limit quickly."),
    }

    let options = RadarOptions::new(args.max_repos, args.max_lang_req, args.top_languages, args.exclude_forks);
    let radar = LanguageRadar::new(client.build()?, options);
    let renderer = QuickChartClient::new(&args.chart_url)?;

    Ok(AppState::new(
        radar,
        renderer,
        args.response_format,
        args.chart_width,
        args.chart_height,
    ))
}
