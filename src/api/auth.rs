//! Sign-in and credential management.

use reqwest::Method;
use tracing::info;

use super::types::{CredentialChange, LoginRequest, LoginResponse, Message};
use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};
use crate::session::Session;

pub const LOGIN_PATH: &str = "/login/";
pub const CREDENTIALS_PATH: &str = "/reset-password-or-email/";

/// Exchange credentials for tokens and start a session.
///
/// The login call is sent without credentials and is never refreshed; a 401
/// here means the credentials were rejected.
///
/// # Errors
///
/// Returns [`ApiError::Status`] for rejected credentials, [`ApiError::Decode`]
/// for a response without tokens, and [`ApiError::Session`] if the session
/// cannot be persisted.
pub async fn login(client: &ApiClient, employee_number: &str, password: &str) -> Result<Session, ApiError> {
    let request = ApiRequest::post(LOGIN_PATH).json(&LoginRequest { employee_number, password })?;
    let response: LoginResponse = client.send_public(request).await?.json()?;

    let session = Session::new(response.access_token, response.refresh_token, response.user, response.role);
    if !session.is_complete() {
        return Err(ApiError::Decode("login response is missing tokens or user".into()));
    }
    client.session().login(session.clone())?;
    info!(username = %session.username, role = %session.role, "logged in");
    Ok(session)
}

/// End the current session. Returns `false` when already logged out.
pub fn logout(client: &ApiClient) -> bool {
    client.session().logout()
}

/// Change the password and/or e-mail of an account.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn change_credentials(client: &ApiClient, change: &CredentialChange) -> Result<Message, ApiError> {
    client.send_json(Method::POST, CREDENTIALS_PATH, change).await
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
