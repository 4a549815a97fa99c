use async_trait::async_trait;
use reqwest::StatusCode;
use rocketlab_core::auth_gate::{AuthProvider, AuthSnapshot, CurrentUser};
use rocketlab_core::error::RemoteError;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Envelope};

/// Identity provider backed by the API's `/auth` endpoints.
#[derive(Clone)]
pub struct RestAuthProvider {
    client: ApiClient,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// `data` of both `/auth/login` and `/auth/me`; login adds the token.
#[derive(Deserialize)]
struct SessionView {
    #[serde(default)]
    access_token: Option<String>,
    user: CurrentUser,
    is_admin: bool,
}

impl From<SessionView> for AuthSnapshot {
    fn from(view: SessionView) -> Self {
        AuthSnapshot::signed_in(view.user, view.is_admin)
    }
}

impl RestAuthProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in and keep the access token on the shared client.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSnapshot, RemoteError> {
        let Envelope { data } = self
            .client
            .post_json::<_, Envelope<SessionView>>("/api/v1/auth/login", &LoginBody { username, password })
            .await?;

        let token = data
            .access_token
            .clone()
            .ok_or_else(|| RemoteError::new("login response carried no access token"))?;
        self.client.set_token(Some(token));
        tracing::info!(user_id = data.user.id, is_admin = data.is_admin, "Signed in");

        Ok(data.into())
    }
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn snapshot(&self) -> Result<AuthSnapshot, RemoteError> {
        if !self.client.has_token() {
            return Ok(AuthSnapshot::anonymous());
        }

        match self.client.get_json::<Envelope<SessionView>>("/api/v1/auth/me").await {
            Ok(Envelope { data }) => Ok(data.into()),
            Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => {
                tracing::debug!("Session no longer valid, dropping token");
                self.client.set_token(None);
                Ok(AuthSnapshot::anonymous())
            }
            Err(err) if err.status() == Some(StatusCode::FORBIDDEN) => Ok(AuthSnapshot::anonymous()),
            Err(err) => Err(err.into()),
        }
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        if !self.client.has_token() {
            return Ok(());
        }

        match self.client.post_empty("/api/v1/auth/logout").await {
            Ok(()) => {}
            // Already signed out server-side.
            Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => {}
            Err(err) => return Err(err.into()),
        }
        self.client.set_token(None);
        Ok(())
    }
}
