use std::sync::Arc;

use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use tracing::{debug, info, warn};

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod series;

pub use config::PortalConfig;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Cookie set by the portal once the login went through
pub const SESSION_COOKIE: &str = "SSVCJSESSIONID";

#[derive(Debug, PartialEq)]
enum ApiException {
    /// Session missing or expired
    Unauthorized,
    Forbidden,
    TooManyRequests,
    UnknownError,
}

impl ApiException {
    fn from_status(status: u16) -> Self {
        match status {
            401 => ApiException::Unauthorized,
            403 => ApiException::Forbidden,
            429 => ApiException::TooManyRequests,
            _ => ApiException::UnknownError,
        }
    }
}

/// Raw answer of the portal, left for the caller to interpret.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait ApiClient {
    /// GETs `path` (relative to the portal root) over the authenticated session.
    fn http_get(
        &self,
        path: &str,
        query_string: &[(String, String)],
    ) -> Result<HttpResponse, anyhow::Error>;
}

/// Session on UTE's self-service portal.
pub struct UtePortal {
    config: PortalConfig,
    http_client: Client,
    cookies: Arc<Jar>,
}

impl std::fmt::Debug for UtePortal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtePortal")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UtePortal {
    pub fn new(config: PortalConfig) -> anyhow::Result<Self> {
        let cookies = Arc::new(Jar::default());
        let http_client = Client::builder()
            .cookie_provider(cookies.clone())
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(UtePortal {
            config,
            http_client,
            cookies,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Logs in with the configured credentials, leaving the session cookie in
    /// the client's cookie jar.
    pub fn authenticate(&self) -> anyhow::Result<()> {
        let home = self.url("");
        info!("opening self-service portal");
        debug!(url = %home, "GET");
        self.http_client.get(&home).send()?.error_for_status()?;

        let login_url = self.url(&self.config.login_path);
        info!(user = %self.config.user, "logging in");
        debug!(url = %login_url, "POST");
        let response = self
            .http_client
            .post(&login_url)
            .form(&[
                ("userId", self.config.user.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()?;
        debug!(status = %response.status(), "login response");

        if self.has_session()? {
            info!("session {} OK", SESSION_COOKIE);
        } else {
            warn!("session cookie {} not found, login may have failed", SESSION_COOKIE);
        }

        Ok(())
    }

    /// Whether the jar holds the session cookie. Only cookies the jar would
    /// send to the portal base path are seen, so this relies on the portal
    /// scoping `SSVCJSESSIONID` to that path or a parent of it.
    pub fn has_session(&self) -> anyhow::Result<bool> {
        let url = Url::parse(&self.url(""))?;
        let found = self
            .cookies
            .cookies(&url)
            .and_then(|header| header.to_str().map(str::to_owned).ok())
            .map(|header| {
                header
                    .split(';')
                    .any(|c| c.trim().starts_with(&format!("{}=", SESSION_COOKIE)))
            })
            .unwrap_or(false);
        Ok(found)
    }
}

impl ApiClient for UtePortal {
    fn http_get(
        &self,
        path: &str,
        query_string: &[(String, String)],
    ) -> Result<HttpResponse, anyhow::Error> {
        let url = self.url(path);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));

        debug!(url = %url, "GET");
        let response = self
            .http_client
            .get(&url)
            .query(&query_string)
            .headers(headers)
            .send()?;

        let response = HttpResponse {
            status: response.status().as_u16(),
            body: response.text()?,
        };
        info!("HTTP status: {}", response.status);
        if !response.is_success() {
            warn!(
                "HTTP {} ({:?}) from {}",
                response.status,
                ApiException::from_status(response.status),
                path
            );
        }

        Ok(response)
    }
}
