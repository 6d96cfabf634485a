use anyhow::anyhow;
use chrono::{DateTime, TimeZone, Utc};
use derive_more::Constructor;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use std::str::FromStr;

/// Snapshot of the `x-ratelimit-*` headers of a GitHub API response.
#[derive(Constructor, Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

impl RateLimit {
    pub fn from_headers(headers: &HeaderMap<HeaderValue>) -> anyhow::Result<RateLimit> {
        Ok(RateLimit {
            limit: read_header::<u32>(headers, "x-ratelimit-limit")?,
            remaining: read_header::<u32>(headers, "x-ratelimit-remaining")?,
            reset: read_header::<i64>(headers, "x-ratelimit-reset")?,
        })
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset, 0).single()
    }
}

/// Whether a failed response means the quota is used up.
///
/// GitHub answers 403 with `x-ratelimit-remaining: 0` for the primary limit and 429 for secondary ones.
pub fn is_rate_limited(status: StatusCode, headers: &HeaderMap<HeaderValue>) -> bool {
    match status {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => read_header::<u32>(headers, "x-ratelimit-remaining")
            .map(|remaining| remaining == 0)
            .unwrap_or(false),
        _ => false,
    }
}

fn read_header<T>(headers: &HeaderMap<HeaderValue>, header: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let header = headers
        .get(header)
        .ok_or_else(|| anyhow!("Header {} not found", header))?
        .to_str()?;
    Ok(header.parse::<T>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(remaining: &str) -> anyhow::Result<HeaderMap<HeaderValue>> {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_str("60")?);
        headers.insert("x-ratelimit-remaining", HeaderValue::from_str(remaining)?);
        headers.insert("x-ratelimit-reset", HeaderValue::from_str("1700000000")?);
        Ok(headers)
    }

    #[test]
    fn from_headers_test() -> anyhow::Result<()> {
        let limit = RateLimit::from_headers(&headers("12")?)?;
        assert_eq!(limit, RateLimit::new(60, 12, 1_700_000_000));
        assert_eq!(limit.reset_at().map(|at| at.timestamp()), Some(1_700_000_000));
        assert!(RateLimit::from_headers(&HeaderMap::new()).is_err());
        Ok(())
    }

    #[test]
    fn rate_limited_test() -> anyhow::Result<()> {
        assert!(is_rate_limited(StatusCode::FORBIDDEN, &headers("0")?));
        assert!(!is_rate_limited(StatusCode::FORBIDDEN, &headers("5")?));
        assert!(!is_rate_limited(StatusCode::FORBIDDEN, &HeaderMap::new()));
        assert!(is_rate_limited(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new()));
        assert!(!is_rate_limited(StatusCode::NOT_FOUND, &headers("0")?));
        Ok(())
    }
}
