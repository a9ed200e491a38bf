//! Admin authentication

use shared::client::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

use super::CatalogClient;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

const LOGIN_PATH: &str = "api/admin/login";
const REGISTER_PATH: &str = "api/admin/register";

impl<H: HttpClient> CatalogClient<H> {
    /// Log in as an admin and keep the returned token for later calls
    ///
    /// A valid account without admin rights is rejected with
    /// [`ClientError::NotAdmin`] and its token is discarded.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<String> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post(LOGIN_PATH, &request).await?;

        if !response.is_admin {
            tracing::warn!(email, "Login rejected, not an admin");
            return Err(ClientError::NotAdmin);
        }
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::InvalidResponse("login response has no token".into()))?;

        self.http.set_token(Some(token.clone()));
        tracing::info!(email, "Admin logged in");
        Ok(token)
    }

    /// Forget the session token
    pub fn logout(&mut self) {
        self.http.set_token(None);
        tracing::info!("Admin logged out");
    }

    /// Register a new admin account
    ///
    /// The request is validated locally before it is sent.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<MessageResponse> {
        request.validate()?;
        let response: MessageResponse = self.http.post(REGISTER_PATH, request).await?;
        tracing::info!(email = %request.email, "Admin registered");
        Ok(response)
    }
}
