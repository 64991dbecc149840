//! Typed auth endpoints on the upstream API.

use caredesk_session::SessionHandle;

use crate::client::UpstreamClient;
use crate::dto::{CredentialsPayload, RefreshPayload, TokenGrant, UserPayload};
use crate::error::UpstreamError;

impl UpstreamClient {
    /// `POST /auth/login` — authentication bootstrap.
    ///
    /// Runs outside any session: no token is attached, and a 401 means
    /// bad credentials rather than an expired session.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenGrant, UpstreamError> {
        let payload = CredentialsPayload {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&payload)
            .send()
            .await?;
        Self::decode_response(response).await
    }

    /// `POST /auth/refresh` — exchange the refresh token for a new pair.
    ///
    /// Only ever called from inside a session's coordinator; it never
    /// triggers a renewal of itself.
    pub(crate) async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<TokenGrant, UpstreamError> {
        let payload = RefreshPayload {
            refresh_token: refresh_token.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&payload)
            .send()
            .await?;
        Self::decode_response(response).await
    }

    /// `POST /auth/logout` — revoke the session upstream.
    pub async fn logout(&self, session: &SessionHandle) -> Result<(), UpstreamError> {
        self.post_discard("/auth/logout", session).await
    }

    /// `GET /auth/me` — the user this session belongs to.
    pub async fn me(&self, session: &SessionHandle) -> Result<UserPayload, UpstreamError> {
        self.get_json("/auth/me", session).await
    }
}
