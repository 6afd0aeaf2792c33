use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::{Client, Response};
use url::Url;

use crate::errors::{LetterboxdError, Result};
use crate::session::Session;

pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            timeout: None,
        }
    }
}

/// Session-changing calls take `&mut self`; share a client across tasks only behind a lock.
#[derive(Debug)]
pub struct LetterboxdClient {
    options: ClientOptions,
    base: Url,
    pub(crate) session: Session,
}

impl LetterboxdClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::with_session(options, Session::default())
    }

    pub fn with_session(options: ClientOptions, session: Session) -> Result<Self> {
        let base = Url::parse(&options.base_url)
            .map_err(|err| LetterboxdError::InvalidUrl(format!("{}: {err}", options.base_url)))?;
        Ok(Self {
            options,
            base,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub(crate) fn user_agent(&self) -> &str {
        self.options
            .user_agent
            .as_deref()
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    pub(crate) fn base(&self) -> &Url {
        &self.base
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|err| LetterboxdError::InvalidUrl(format!("{path}: {err}")))
    }

    // single use, no idle connections kept
    pub(crate) fn http(&self, jar: Option<Arc<Jar>>) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(self.user_agent())
            .pool_max_idle_per_host(0);
        if let Some(timeout) = self.options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(jar) = jar {
            builder = builder.cookie_provider(jar);
        }
        builder.build().map_err(LetterboxdError::Request)
    }

    pub(crate) fn cookie_header(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.session.cookie)
            .map_err(|err| LetterboxdError::InvalidHeader(format!("cookie: {err}")))
    }

    pub(crate) fn require_username(&self) -> Result<&str> {
        if self.session.username.is_empty() {
            return Err(LetterboxdError::Auth(
                "no active session, call authenticate first".to_string(),
            ));
        }
        Ok(&self.session.username)
    }
}

pub(crate) async fn success_body(
    response: Response,
    kind: fn(String) -> LetterboxdError,
) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        log::warn!("{} answered {}", response.url(), status);
        return Err(LetterboxdError::status(kind, status));
    }
    Ok(response.text().await?)
}

pub(crate) fn jar_cookie(jar: &Jar, url: &Url) -> String {
    jar.cookies(url)
        .and_then(|value| value.to_str().ok().map(str::to_string))
        .unwrap_or_default()
}
