//! Pooled HTTP session carrying the authentication state of one client.

use log::{debug, info};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::banking::BankingError;

const USER_AGENT: &str = "bankcli";

/// Whether the session holds a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated { token: String },
}

/// Owns the connection pool and the bearer token for one client.
///
/// Headers are assembled per request from the current state; nothing is
/// written into the pool's default headers after construction.
#[derive(Debug)]
pub struct Session {
    client: Option<Client>,
    base_url: String,
    timeout: Duration,
    auth: AuthState,
}

impl Session {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BankingError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(BankingError::Setup)?;

        Ok(Self {
            client: Some(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            auth: AuthState::Unauthenticated,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    pub fn token(&self) -> Option<&str> {
        match &self.auth {
            AuthState::Authenticated { token } => Some(token),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Stores a bearer token; every later request carries it.
    pub fn set_token(&mut self, token: String) {
        self.auth = AuthState::Authenticated { token };
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    /// Releases the connection pool. Returns false if it was already released.
    pub fn close(&mut self) -> bool {
        match self.client.take() {
            Some(client) => {
                drop(client);
                info!("Banking client session closed");
                true
            }
            None => false,
        }
    }

    /// Joins `segments` onto the base URL, percent-encoding each one, so an
    /// id containing `/` or `?` stays a single path segment.
    pub fn url(&self, segments: &[&str]) -> Result<Url, BankingError> {
        let invalid = || BankingError::InvalidUrl(self.base_url.clone());

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(invalid());
        }
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, BankingError> {
        let client = self.client.as_ref().ok_or(BankingError::SessionClosed)?;
        let url = self.url(segments)?;
        debug!("{} {}", method, url);

        let mut request = client.request(method, url);
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, segments: &[&str]) -> Result<Response, BankingError> {
        let request = self.request(Method::GET, segments)?;
        self.send(request).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Response, BankingError> {
        let request = self.request(Method::POST, segments)?.json(body);
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BankingError> {
        request.send().await.map_err(|e| self.classify(e))
    }

    /// Reads the body and decodes it as JSON.
    /// A non-2xx status becomes `BankingError::Http` carrying the raw body.
    pub async fn read_json<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, BankingError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(BankingError::Http { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn classify(&self, error: reqwest::Error) -> BankingError {
        if error.is_timeout() {
            BankingError::Timeout(self.timeout)
        } else if error.is_builder() {
            BankingError::InvalidRequest(error)
        } else {
            BankingError::Transport(error)
        }
    }
}
