use clap::Parser;
use github_client::GITHUB_API_URL;
use quickchart_client::QUICKCHART_URL;
use secrecy::SecretString;
use serde::Deserialize;
use std::{fmt::Display, str::FromStr};
use strum_macros::{Display as StrumDisplay, EnumString};

/// Shape of a successful chart response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `{"imageData": "data:image/png;base64,...", "otherLanguages": [...]}`
    Json,
    /// Raw PNG bytes
    Image,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Listen address
    #[clap(long, env, default_value = "127.0.0.1")]
    pub host: String,

    /// Listen port
    #[clap(short, long, env, default_value_t = 3000)]
    pub port: u16,

    /// GitHub personal access token, raises the API rate limit
    #[clap(short, long, env = "GITHUB_PAT")]
    pub api_token: Option<SecretString>,

    /// GitHub API URL
    #[clap(long, env, default_value = GITHUB_API_URL)]
    pub api_url: String,

    /// User-Agent sent to the GitHub API
    #[clap(long, env, default_value = "lang-radar")]
    pub user_agent: String,

    /// Chart rendering service URL
    #[clap(long, env, default_value = QUICKCHART_URL)]
    pub chart_url: String,

    /// Repositories fetched per user
    #[clap(long, env, default_value_t = 100, parse(try_from_str=max_repos_in_range))]
    pub max_repos: u32,

    /// Maximal parallel repository languages requests
    #[clap(long, env, default_value_t = 10, parse(try_from_str=max_lang_req_in_range))]
    pub max_lang_req: usize,

    /// Languages drawn on the radar chart
    #[clap(short, long, env, default_value_t = 5, parse(try_from_str=top_languages_in_range))]
    pub top_languages: usize,

    /// Leave forked repositories out of the language totals
    #[clap(long, env)]
    pub exclude_forks: bool,

    /// Default response format, `json` or `image`
    #[clap(short, long, env, default_value = "json")]
    pub response_format: ResponseFormat,

    /// Chart width in pixels
    #[clap(long, env, default_value_t = 500, parse(try_from_str=chart_size_in_range))]
    pub chart_width: u32,

    /// Chart height in pixels
    #[clap(long, env, default_value_t = 500, parse(try_from_str=chart_size_in_range))]
    pub chart_height: u32,
}

fn max_repos_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 1, 100, "max_repos".to_string())
}

fn max_lang_req_in_range(value: &str) -> clap::Result<usize, String> {
    number_in_range(value, 1, 100, "max_lang_req".to_string())
}

fn top_languages_in_range(value: &str) -> clap::Result<usize, String> {
    // A radar needs at least three vertices
    number_in_range(value, 3, 12, "top_languages".to_string())
}

fn chart_size_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 100, 2000, "chart size".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}
