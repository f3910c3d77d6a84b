//! `POST /api/login` and `POST /api/register`.

use reqwest::Url;
use serde::Serialize;
use sportshop_core::Level;

use super::{error_from_body, CatalogClient};
use crate::error::ClientError;
use crate::types::{LoginReply, LoginRequest, RegisterRequest};

impl CatalogClient {
    /// Submits credentials. A 2xx response with an empty or non-JSON body is
    /// still a success, with no echoed name.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] when the server rejects the credentials with an
    ///   `error` message.
    /// - [`ClientError::UnexpectedStatus`] or [`ClientError::Http`] otherwise.
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginReply, ClientError> {
        let url = self.endpoint("/api/login")?;
        let body = self
            .post_json(url, &LoginRequest { name, password })
            .await?;
        Ok(serde_json::from_str::<LoginReply>(&body).unwrap_or_default())
    }

    /// Creates an account. `level` is sent in the account vocabulary
    /// (`DEBUTANT`, `CONFIRME`, `EXPERT`).
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::login`].
    pub async fn register(
        &self,
        name: &str,
        password: &str,
        sport: &str,
        level: Level,
    ) -> Result<(), ClientError> {
        let url = self.endpoint("/api/register")?;
        let request = RegisterRequest {
            name,
            password,
            sport,
            level: level.account_code(),
        };
        self.post_json(url, &request).await.map(|_| ())
    }

    /// Account submissions are not retried: a repeated registration is not
    /// harmless.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<String, ClientError> {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(error_from_body(status.as_u16(), &text, &url))
        }
    }
}
