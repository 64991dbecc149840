//! HTTP client for the upstream API.
//!
//! All session-scoped traffic funnels through [`UpstreamClient::request_json`],
//! which owns the renewal discipline: wait out any in-flight refresh,
//! send with the current access token, and on a 401 renew through the
//! session's coordinator and retry exactly once.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use caredesk_core::config::UpstreamConfig;
use caredesk_core::error::{AppError, ErrorKind};
use caredesk_session::SessionHandle;
use caredesk_session::refresh::RefreshOutcome;

use crate::error::UpstreamError;

/// Client for the upstream clinic API.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection
/// pool across clones.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    pub(crate) http: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "failed to build upstream HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Execute `method path` for the given session and decode the JSON
    /// response.
    ///
    /// A 401 triggers one renewal through the session's coordinator and
    /// one retry; a second consecutive 401 is surfaced, not retried.
    pub async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        session: &SessionHandle,
    ) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // Never race an in-flight refresh; start on the renewed token.
        session.state().coordinator.wait_for_refresh().await;

        let access = session.current_tokens().await.access_token;
        let response = self.send(method.clone(), path, body, &access).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::decode_response(response).await;
        }

        debug!(path = %path, "access token rejected, renewing");
        match self.renew_session(session).await {
            RefreshOutcome::Renewed(_) => {
                let access = session.current_tokens().await.access_token;
                let response = self.send(method, path, body, &access).await?;
                Self::decode_response(response).await
            }
            RefreshOutcome::Failed => Err(UpstreamError::SessionExpired),
        }
    }

    /// GET `path` for the session.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &SessionHandle,
    ) -> Result<T, UpstreamError> {
        self.request_json(Method::GET, path, None::<&Value>, session)
            .await
    }

    /// POST `path` with no body, discarding the response payload.
    pub async fn post_discard(
        &self,
        path: &str,
        session: &SessionHandle,
    ) -> Result<(), UpstreamError> {
        let _: Value = self
            .request_json(Method::POST, path, None::<&Value>, session)
            .await?;
        Ok(())
    }

    /// Renew the session's tokens, sharing the operation with any other
    /// caller that hit a 401 at the same time.
    async fn renew_session(&self, session: &SessionHandle) -> RefreshOutcome {
        let state = session.state();
        let outcome = state
            .coordinator
            .refresh(|| async {
                let refresh_token = state.current_tokens().await.refresh_token;
                match self.refresh_tokens(&refresh_token).await {
                    Ok(grant) => {
                        let pair = grant.token_pair();
                        // Store before waiters are released so their
                        // retries pick up the renewed access token.
                        state.store_tokens(pair.session_tokens()).await;
                        Some(pair)
                    }
                    Err(err) => {
                        warn!(error = %err, "token refresh failed");
                        None
                    }
                }
            })
            .await;

        if let RefreshOutcome::Renewed(pair) = &outcome {
            session.record_renewal(pair.clone());
            debug!("session tokens renewed");
        }
        outcome
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        access_token: &str,
    ) -> Result<reqwest::Response, UpstreamError> {
        let mut request = self
            .http
            .request(method, self.url(path))
            .bearer_auth(access_token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Decode a response into `T`.
    ///
    /// 204 decodes as an empty value; non-success statuses become
    /// [`UpstreamError::Api`] carrying the body's `message` (falling
    /// back to `error`, then to the status text).
    pub(crate) async fn decode_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, UpstreamError> {
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(|_| UpstreamError::Api {
                status: status.as_u16(),
                message: "response had no body".to_string(),
                body: None,
            });
        }

        if status.is_success() {
            return response.json::<T>().await.map_err(UpstreamError::from);
        }

        let status_text = status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string();
        let body = response.json::<Value>().await.ok();
        let message = body
            .as_ref()
            .and_then(|b| {
                b.get("message")
                    .or_else(|| b.get("error"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
            .unwrap_or(status_text);

        Err(UpstreamError::Api {
            status: status.as_u16(),
            message,
            body,
        })
    }
}
