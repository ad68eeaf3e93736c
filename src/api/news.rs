//! News aggregator client.

use super::DataConverter;
use super::wire::PostsEnvelope;
use crate::config::NewsApiConfig;
use crate::error::{Error, Result};
use crate::state::NewsItem;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use url::Url;

/// Cursor for the next page of the feed.
///
/// Holds the raw `next` value the service returned and the `page` parameter
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    raw: String,
    page: String,
}

impl PageToken {
    /// Token for an explicit page number.
    pub fn new(page: impl Into<String>) -> Self {
        let page = page.into();
        Self {
            raw: page.clone(),
            page,
        }
    }

    /// Derive a token from a `next` value.
    ///
    /// URLs (absolute, or relative to `base`) and bare query strings such as
    /// `page=2` yield their `page` query parameter; anything else is used as
    /// the page value itself. Returns `None` for empty values and for URLs
    /// without a `page` parameter.
    pub fn from_next(next: &str, base: &Url) -> Option<Self> {
        let next = next.trim();
        if next.is_empty() {
            return None;
        }

        let url = match Url::parse(next) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                if next.contains(['/', '?']) {
                    base.join(next).ok()?
                } else if next.contains('=') {
                    base.join(&format!("?{next}")).ok()?
                } else {
                    return Some(Self::new(next));
                }
            }
            Err(e) => {
                tracing::warn!(next, error = %e, "unparseable next-page value");
                return None;
            }
        };

        let page = url
            .query_pairs()
            .find(|(k, _)| k == "page")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());

        match page {
            Some(page) => Some(Self {
                raw: next.to_string(),
                page,
            }),
            None => {
                tracing::warn!(next, "next-page URL carries no page parameter");
                None
            }
        }
    }

    /// Value sent as the `page` query parameter.
    pub fn page(&self) -> &str {
        &self.page
    }

    /// The value as returned by the service.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// One page of normalized news.
#[derive(Debug, Clone, Default)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    /// `None` when the feed has no further pages.
    pub next: Option<PageToken>,
}

/// Source of paginated news.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the first page (`None`) or the page behind a previously
    /// returned token.
    async fn fetch_page(&self, page: Option<PageToken>) -> Result<NewsPage>;
}

/// HTTP client for the news aggregator's posts endpoint.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl NewsClient {
    /// Create a client from configuration.
    pub fn new(config: &NewsApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
            auth_token: config.auth_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Endpoint this client queries.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    async fn fetch_page(&self, page: Option<PageToken>) -> Result<NewsPage> {
        let token = self.auth_token.as_deref().ok_or_else(|| {
            Error::config("news auth token is not configured (set COINCAST_NEWS__AUTH_TOKEN)")
        })?;

        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("auth_token", token);
            if let Some(page) = &page {
                query.append_pair("page", page.page());
            }
        }

        tracing::debug!(page = page.as_ref().map(PageToken::page), "fetching news page");

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::remote(status.as_u16(), body));
        }

        let bytes = resp.bytes().await?;
        let envelope: PostsEnvelope = serde_json::from_slice(&bytes)?;
        let (records, next) = envelope.into_records();

        let items: Vec<NewsItem> = records
            .into_iter()
            .map(DataConverter::convert_post)
            .collect();
        let next = next.and_then(|n| PageToken::from_next(&n, &self.base_url));

        tracing::info!(count = items.len(), has_next = next.is_some(), "news page loaded");

        Ok(NewsPage { items, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://cryptopanic.com/api/developer/v2/posts/").unwrap()
    }

    #[test]
    fn test_token_from_absolute_url() {
        let token = PageToken::from_next(
            "https://cryptopanic.com/api/developer/v2/posts/?auth_token=x&page=3",
            &base(),
        )
        .unwrap();
        assert_eq!(token.page(), "3");
    }

    #[test]
    fn test_token_from_relative_url() {
        let token = PageToken::from_next("/api/developer/v2/posts/?page=2", &base()).unwrap();
        assert_eq!(token.page(), "2");
        assert_eq!(token.raw(), "/api/developer/v2/posts/?page=2");
    }

    #[test]
    fn test_token_from_bare_page_number() {
        let token = PageToken::from_next("4", &base()).unwrap();
        assert_eq!(token.page(), "4");
    }

    #[test]
    fn test_token_from_bare_query_string() {
        let token = PageToken::from_next("page=2", &base()).unwrap();
        assert_eq!(token.page(), "2");
        assert_eq!(token.raw(), "page=2");

        let token = PageToken::from_next("?auth_token=x&page=5", &base()).unwrap();
        assert_eq!(token.page(), "5");
    }

    #[test]
    fn test_url_without_page_ends_feed() {
        assert_eq!(PageToken::from_next("https://cryptopanic.com/x/?foo=1", &base()), None);
        assert_eq!(PageToken::from_next("  ", &base()), None);
    }

    #[tokio::test]
    async fn test_missing_token_is_config_error() {
        let client = NewsClient::new(&NewsApiConfig::default()).unwrap();
        let err = client.fetch_page(None).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
