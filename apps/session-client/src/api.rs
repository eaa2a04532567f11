//! HTTP client for the authentication API.
//!
//! Owns the `ClientSession`: a successful login saves the returned credential,
//! and a 401/403 from a protected call clears it so the next route decision
//! renders the login view. Nothing on this path is retried.

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ClientError;
use crate::store::{ClientSession, SessionRepository};

#[derive(Debug, Serialize)]
struct GoogleLoginRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleLoginResponse {
    user: LoginUser,
    session_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWindow {
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub user: ProfileUser,
    pub session: SessionWindow,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct AuthApi<R> {
    client: Client,
    base_url: String,
    session: ClientSession<R>,
}

impl<R: SessionRepository> AuthApi<R> {
    pub fn new(base_url: impl Into<String>, session: ClientSession<R>) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &ClientSession<R> {
        &self.session
    }

    /// Exchanges a Google ID token for a session credential and stores it.
    pub async fn login_with_google(&mut self, id_token: &str) -> Result<LoginUser, ClientError> {
        let response = self
            .client
            .post(format!("{}/auth/google", self.base_url))
            .json(&GoogleLoginRequest { token: id_token })
            .send()
            .await?;

        if !response.status().is_success() {
            let err = rejection(response).await;
            warn!("Backend failed to verify token: {err}");
            return Err(err);
        }

        let body: GoogleLoginResponse = response.json().await?;
        self.session.save(&body.session_token)?;
        info!("Signed in as {}", body.user.id);

        Ok(body.user)
    }

    /// Calls the protected profile endpoint with the stored credential.
    pub async fn fetch_profile(&mut self) -> Result<Profile, ClientError> {
        let credential = self
            .session
            .load()?
            .filter(|c| !c.is_empty())
            .ok_or(ClientError::Unauthorized)?;

        let response = self
            .client
            .get(format!("{}/profile", self.base_url))
            .bearer_auth(credential)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Session refused by server, clearing stored credential");
                self.session.clear()?;
                Err(ClientError::Unauthorized)
            }
            status if status.is_success() => Ok(response.json().await?),
            _ => Err(rejection(response).await),
        }
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session.clear()?;
        info!("User logged out");
        Ok(())
    }
}

async fn rejection(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    ClientError::Rejected { status, message }
}
