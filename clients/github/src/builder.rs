use crate::GithubClient;
use lang_radar::api::Result;
use log::debug;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use url::Url;

pub const GITHUB_API_URL: &str = "https://api.github.com";

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("lang-radar"));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        Self {
            client_builder: ClientBuilder::default(),
            github_url: GITHUB_API_URL.to_string(),
            headers,
        }
    }
}

impl GithubClientBuilder {
    /// Authenticates every request with a personal access token.
    pub fn try_with_token(mut self, token: &secrecy::SecretString) -> Result<GithubClientBuilder> {
        let mut value = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
            .map_err(anyhow::Error::from)?;
        value.set_sensitive(true);
        self.headers.insert(header::AUTHORIZATION, value);
        Ok(self)
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        Ok(self.try_with_header(header::USER_AGENT, user_agent)?)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    fn try_with_header(mut self, key: HeaderName, val: impl AsRef<str>) -> anyhow::Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref())?;
        self.headers.insert(key, val);
        Ok(self)
    }

    pub fn build(self) -> Result<GithubClient> {
        let github_url = Url::parse(&self.github_url).map_err(anyhow::Error::from)?;
        if github_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!("GitHub API URL {} cannot be a base URL", github_url).into());
        }
        debug!("GitHub API URL: {}", github_url);
        let client = self
            .client_builder
            .default_headers(self.headers)
            .build()
            .map_err(anyhow::Error::from)?;
        Ok(GithubClient { client, github_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn token_header_test() -> anyhow::Result<()> {
        let builder = GithubClientBuilder::default().try_with_token(&SecretString::new("ghp_secret".to_string()))?;
        let value = &builder.headers[header::AUTHORIZATION];
        assert_eq!(value.to_str()?, "token ghp_secret");
        assert!(value.is_sensitive());
        Ok(())
    }

    #[test]
    fn invalid_url_test() {
        assert!(GithubClientBuilder::default().with_github_url("not a url").build().is_err());
        assert!(GithubClientBuilder::default().with_github_url("mailto:me@example.com").build().is_err());
    }
}
