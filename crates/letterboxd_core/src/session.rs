use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, HOST, ORIGIN, REFERER};

use crate::client::{jar_cookie, success_body, LetterboxdClient};
use crate::envelope::{csrf_token, interpret, parse_json};
use crate::errors::{LetterboxdError, Result};

pub const LOGIN_PATH: &str = "/user/login.do";

// two-factor accounts cannot log in
const AUTHENTICATION_CODE_PLACEHOLDER: &str = " ";

const BROWSER_HEADERS: [(&str, &str); 7] = [
    ("dnt", "1"),
    ("priority", "u=0"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("sec-gpc", "1"),
    ("te", "trailers"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub cookie: String,
    pub csrf: String,
    pub username: String,
}

impl LetterboxdClient {
    /// The session is written as the two login requests run, so a rejected
    /// login leaves the anonymous token and the post-login cookie behind.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let login_url = self.endpoint(LOGIN_PATH)?;
        let jar = Arc::new(Jar::default());
        self.session.username = username.to_string();

        log::debug!("requesting anonymous login token from {login_url}");
        let response = self
            .http(Some(jar.clone()))?
            .post(login_url.clone())
            .form(&Vec::<(&str, &str)>::new())
            .send()
            .await?;
        let body = success_body(response, LetterboxdError::Auth).await?;
        self.session.cookie = jar_cookie(&jar, &login_url);
        self.session.csrf = csrf_token(&parse_json(&body)?).unwrap_or_default();

        log::debug!("submitting credentials for {username}");
        let headers = self.login_headers()?;
        let form = [
            ("username", username),
            ("password", password),
            ("__csrf", self.session.csrf.as_str()),
            ("authenticationCode", AUTHENTICATION_CODE_PLACEHOLDER),
        ];
        let response = self
            .http(Some(jar.clone()))?
            .post(login_url.clone())
            .headers(headers)
            .form(&form)
            .send()
            .await?;
        let body = success_body(response, LetterboxdError::Auth).await?;
        self.session.cookie = jar_cookie(&jar, &login_url);

        let json = parse_json(&body)?;
        let envelope = interpret(&json);
        if !envelope.success {
            log::warn!("login rejected for {username}: {}", envelope.message);
            return Err(LetterboxdError::Auth(envelope.message));
        }
        self.session.csrf = csrf_token(&json).unwrap_or_default();
        log::info!("logged in to Letterboxd as {username}");
        Ok(())
    }

    fn login_headers(&self) -> Result<HeaderMap> {
        let origin = self.base().origin().ascii_serialization();
        let host = match (self.base().host_str(), self.base().port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(LetterboxdError::InvalidUrl(format!(
                    "{} has no host",
                    self.base()
                )))
            }
        };

        let mut headers = HeaderMap::new();
        for (name, value) in BROWSER_HEADERS.iter() {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        headers.insert(HOST, header_value(&host)?);
        headers.insert(REFERER, header_value(&format!("{origin}/"))?);
        headers.insert(ORIGIN, header_value(&origin)?);
        headers.insert(COOKIE, self.cookie_header()?);
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| LetterboxdError::InvalidHeader(format!("{value}: {err}")))
}
