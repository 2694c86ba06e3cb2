use crate::config::AppConfig;
use crate::domain::model::RawRecord;
use crate::domain::ports::{CanvasClient, Page, QueryParam};
use crate::utils::error::{PulseError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("canvas-pulse/", env!("CARGO_PKG_VERSION"));

/// Canvas REST API over HTTPS with a bearer token.
pub struct CanvasHttpClient {
    client: Client,
    base_url: Url,
}

impl CanvasHttpClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            PulseError::InvalidConfigValueError {
                field: "CANVAS_TOKEN".to_string(),
                value: String::new(),
                reason: "Token contains characters that cannot be sent in a header".to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.token,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }
}

#[async_trait]
impl CanvasClient for CanvasHttpClient {
    fn resolve_url(&self, path: &str) -> Result<String> {
        Ok(self.base_url.join(path)?.to_string())
    }

    async fn fetch_page(&self, url: &str, params: Option<&[QueryParam]>) -> Result<Page> {
        let mut request = self.client.get(url);
        if let Some(params) = params {
            request = request.query(params);
        }

        tracing::debug!("🌐 GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(PulseError::HttpStatusError {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let next = next_link(response.headers(), response.url());
        let body: RawRecord = response.json().await?;

        Ok(Page { body, next })
    }
}

fn next_link(headers: &HeaderMap, page_url: &Url) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
        .and_then(|link| match page_url.join(&link) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::warn!("Ignoring unusable next link '{}': {}", link, e);
                None
            }
        })
}

/// 從 `Link` 標頭取出 `rel="next"` 的目標（RFC 8288 格式）
pub fn parse_next_link(header: &str) -> Option<String> {
    static ENTRY: OnceLock<Regex> = OnceLock::new();
    static REL: OnceLock<Regex> = OnceLock::new();

    let entry = ENTRY.get_or_init(|| Regex::new(r"<([^>]*)>([^<]*)").expect("valid link regex"));
    let rel = REL.get_or_init(|| {
        Regex::new(r#"(?i)\brel\s*=\s*(?:"([^"]*)"|([^\s;,]+))"#).expect("valid rel regex")
    });

    entry.captures_iter(header).find_map(|caps| {
        let target = caps.get(1)?.as_str().trim();
        let params = caps.get(2).map_or("", |m| m.as_str());

        let is_next = rel.captures_iter(params).any(|rel_caps| {
            rel_caps
                .get(1)
                .or_else(|| rel_caps.get(2))
                .is_some_and(|values| {
                    values
                        .as_str()
                        .split_whitespace()
                        .any(|v| v.eq_ignore_ascii_case("next"))
                })
        });

        (is_next && !target.is_empty()).then(|| target.to_string())
    })
}
