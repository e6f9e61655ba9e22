use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::error::{IntranetError, IntranetResult, server_message};
use crate::models::{LoginReqDto, RefreshReqDto, RefreshResDto, TokenPair};
use crate::routes;

/// Shared HTTP client for the intranet API.
///
/// Cloning is cheap; clones share the connection pool and the token pair.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    tokens: Arc<Mutex<Option<TokenPair>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: SessionStore) -> IntranetResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            tokens: Arc::new(Mutex::new(None)),
        })
    }

    pub fn from_config(config: &Config) -> IntranetResult<Self> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.http_timeout_secs),
            SessionStore::new(config.session_file.clone()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /* =========================
    Session
    ========================= */

    pub async fn login(&self, rut: &str, password: &str) -> IntranetResult<TokenPair> {
        if rut.trim().is_empty() || password.is_empty() {
            return Err(IntranetError::validation("rut", "RUT y contraseña son obligatorios"));
        }

        info!(rut = %rut, "Login request");

        let body = LoginReqDto {
            rut: rut.trim().to_string(),
            password: password.to_string(),
        };
        let resp = self
            .execute(Method::POST, routes::TOKEN, None, |req| req.json(&body))
            .await?;
        let tokens: TokenPair = decode(resp).await?;

        self.session.save(&tokens).await?;
        *self.tokens.lock().await = Some(tokens.clone());

        info!("Login successful");
        Ok(tokens)
    }

    pub async fn logout(&self) -> IntranetResult<()> {
        *self.tokens.lock().await = None;
        self.session.clear().await?;
        info!("Session cleared");
        Ok(())
    }

    /// Access token for the next call, refreshed first when it expired.
    ///
    /// A refresh token the server rejects ends the session: memory and the
    /// session file are cleared and the call fails as unauthenticated.
    async fn bearer(&self) -> IntranetResult<String> {
        let mut guard = self.tokens.lock().await;
        if guard.is_none() {
            *guard = self.session.load().await?;
        }
        let (access, refresh) = match guard.as_ref() {
            Some(tokens) => (tokens.access.clone(), tokens.refresh.clone()),
            None => return Err(IntranetError::Unauthenticated),
        };
        if !jwt::is_expired(&access) {
            return Ok(access);
        }

        debug!("Access token expired, refreshing");
        let body = RefreshReqDto {
            refresh: refresh.clone(),
        };
        let refreshed: RefreshResDto = match self
            .execute(Method::POST, routes::TOKEN_REFRESH, None, |req| req.json(&body))
            .await
        {
            Ok(resp) => decode(resp).await?,
            Err(IntranetError::Http { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                warn!("Refresh token rejected, clearing session");
                *guard = None;
                self.session.clear().await?;
                return Err(IntranetError::Unauthenticated);
            }
            Err(e) => return Err(e),
        };

        let tokens = TokenPair {
            access: refreshed.access,
            refresh: refreshed.refresh.unwrap_or(refresh),
        };
        self.session.save(&tokens).await?;
        let access = tokens.access.clone();
        *guard = Some(tokens);
        Ok(access)
    }

    /* =========================
    Transport
    ========================= */

    /// Sends one request and maps any non-2xx answer to [`IntranetError::Http`].
    async fn execute(
        &self,
        method: Method,
        path: &str,
        bearer: Option<String>,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> IntranetResult<Response> {
        let request_id = Uuid::new_v4();
        let span = info_span!("api_call", method = %method, path = %path, request_id = %request_id);

        async move {
            let mut req = self
                .http
                .request(method, self.url(path))
                .header("X-Request-Id", request_id.to_string());
            if let Some(token) = bearer {
                req = req.bearer_auth(token);
            }

            debug!("Sending request");
            let resp = build(req).send().await.map_err(|e| {
                error!(error = %e, "Transport failure");
                IntranetError::from(e)
            })?;

            let status = resp.status();
            if status.is_success() {
                debug!(status = status.as_u16(), "Response received");
                return Ok(resp);
            }

            let body = resp.text().await.unwrap_or_default();
            let message = server_message(&body);
            error!(status = status.as_u16(), error = %message, "API call failed");
            Err(IntranetError::Http { status, message })
        }
        .instrument(span)
        .await
    }

    async fn authorized(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> IntranetResult<Response> {
        let token = self.bearer().await?;
        self.execute(method, path, Some(token), build).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> IntranetResult<T> {
        let resp = self
            .authorized(Method::GET, path, |req| {
                if query.is_empty() { req } else { req.query(query) }
            })
            .await?;
        decode(resp).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> IntranetResult<T> {
        let resp = self
            .authorized(Method::POST, path, |req| req.json(body))
            .await?;
        decode(resp).await
    }

    /// POST without a body, as the annul actions expect.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> IntranetResult<T> {
        let resp = self.authorized(Method::POST, path, |req| req).await?;
        decode(resp).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> IntranetResult<T> {
        let resp = self
            .authorized(Method::POST, path, |req| req.multipart(form))
            .await?;
        decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> IntranetResult<()> {
        self.authorized(Method::DELETE, path, |req| req).await?;
        Ok(())
    }

    /// Raw body of a binary endpoint (generated PDFs).
    pub async fn get_bytes(&self, path: &str) -> IntranetResult<Vec<u8>> {
        let resp = self.authorized(Method::GET, path, |req| req).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Action endpoints sometimes answer `204` or an empty `200`; those decode
/// as an empty object.
async fn decode<T: DeserializeOwned>(resp: Response) -> IntranetResult<T> {
    let bytes = resp.bytes().await?;
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &bytes
    };
    Ok(serde_json::from_slice(body)?)
}
