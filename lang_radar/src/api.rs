use async_trait::async_trait;
use derive_more::Constructor;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub username not provided.")]
    MissingUsername,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("GitHub user \"{0}\" not found.")]
    UserNotFound(String),
    #[error("GitHub API rate limit exceeded{}. Try again later or configure a valid personal access token (GITHUB_PAT).", .reset.as_ref().map(|r| format!(" (resets at {})", r)).unwrap_or_default())]
    RateLimited { reset: Option<String> },
    #[error("Upstream error{}: {message}", .status.map(|s| format!(" (status {})", s)).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },
    #[error("Chart rendering failed: {0}")]
    Rendering(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn upstream<STR: Into<String>>(status: Option<u16>, message: STR) -> Self {
        Error::Upstream {
            status,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Language name to number of bytes of source attributed to it.
///
/// Ordered map so every iteration over an aggregate is deterministic.
pub type LanguageByteMap = BTreeMap<String, u64>;

/// Repository as returned by the listing call. `languages_url` locates its language breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct RepositoryRef {
    pub name: String,
    pub languages_url: String,
    pub fork: bool,
}

/// Sum of language byte counts over every repository folded in so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTotals {
    pub bytes: LanguageByteMap,
    pub total_bytes: u64,
}

impl LanguageTotals {
    pub fn add(&mut self, languages: LanguageByteMap) {
        for (language, bytes) in languages {
            let entry = self.bytes.entry(language).or_insert(0);
            *entry = entry.saturating_add(bytes);
            self.total_bytes = self.total_bytes.saturating_add(bytes);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_bytes == 0 || self.bytes.is_empty()
    }
}

impl FromIterator<LanguageByteMap> for LanguageTotals {
    fn from_iter<I: IntoIterator<Item = LanguageByteMap>>(iter: I) -> Self {
        let mut totals = LanguageTotals::default();
        iter.into_iter().for_each(|languages| totals.add(languages));
        totals
    }
}

/// Source of repositories and their language breakdowns.
#[async_trait]
pub trait Client: Send + Sync {
    async fn repositories(&self, username: &str, per_page: u32) -> Result<Vec<RepositoryRef>>;

    async fn languages(&self, repo: &RepositoryRef) -> Result<LanguageByteMap>;
}

/// Styling forwarded verbatim to the renderer. `None` keeps the renderer's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    pub line_color: Option<String>,
    pub fill_color: Option<String>,
    pub point_color: Option<String>,
    pub text_color: Option<String>,
    pub grid_color: Option<String>,
    pub background_color: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            line_color: None,
            fill_color: None,
            point_color: None,
            text_color: None,
            grid_color: None,
            background_color: None,
            width: 500,
            height: 500,
        }
    }
}

/// Everything a renderer needs to draw the radar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub suggested_max: f64,
    pub style: ChartStyle,
}

#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Returns the encoded PNG image.
    async fn render(&self, chart: &ChartRequest) -> Result<Vec<u8>>;
}

#[test]
fn totals_add_test() {
    let mut totals = LanguageTotals::default();
    totals.add(LanguageByteMap::from([("Rust".to_string(), 300), ("C".to_string(), 100)]));
    totals.add(LanguageByteMap::from([("Rust".to_string(), 200)]));
    assert_eq!(totals.total_bytes, 600);
    assert_eq!(totals.bytes["Rust"], 500);
    assert_eq!(totals.bytes["C"], 100);
}

#[test]
fn totals_saturate_test() {
    let mut totals = LanguageTotals::default();
    totals.add(LanguageByteMap::from([("C".to_string(), u64::MAX), ("Rust".to_string(), 10)]));
    totals.add(LanguageByteMap::from([("C".to_string(), 1)]));
    assert_eq!(totals.bytes["C"], u64::MAX);
    assert_eq!(totals.bytes["Rust"], 10);
    assert_eq!(totals.total_bytes, u64::MAX);
}

#[test]
fn totals_empty_test() {
    let totals: LanguageTotals = vec![LanguageByteMap::new(), LanguageByteMap::from([("Go".to_string(), 0)])]
        .into_iter()
        .collect();
    assert!(totals.is_empty());
}

#[test]
fn error_messages_test() {
    assert_eq!(
        Error::upstream(Some(500), "Internal Server Error").to_string(),
        "Upstream error (status 500): Internal Server Error"
    );
    assert!(Error::RateLimited { reset: None }.to_string().contains("GITHUB_PAT"));
    assert!(Error::UserNotFound("ghost".to_string()).to_string().contains("\"ghost\""));
}
