//! REST client for the prompt endpoints.
//!
//! Wraps the `/api` routes (session bootstrap, prompt CRUD, tags) using
//! [`reqwest`]. Every request carries the caller's access token as a
//! Bearer header.

use promptcubic_core::types::DbId;
use promptcubic_db::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};
use promptcubic_db::models::tag::{CreateTag, SetPromptTags, Tag};
use promptcubic_db::models::user::User;
use serde::Deserialize;

use crate::error::ClientError;

/// HTTP client for one backend, acting as one user.
#[derive(Clone)]
pub struct PromptApi {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

/// Body of `GET /api/session`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Session {
    pub user: User,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl PromptApi {
    /// Create a client for the backend at `base_url`, e.g. `http://host:3000`.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, access_token)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            access_token: access_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Swap in a refreshed access token.
    pub fn set_access_token(&mut self, access_token: impl Into<String>) {
        self.access_token = access_token.into();
    }

    /// Make sure the caller has a local user row and read back the identity.
    pub async fn session(&self) -> Result<Session, ClientError> {
        let response = self.get("/api/session").send().await?;
        Self::parse_response(response).await
    }

    /// The caller's prompts, oldest first.
    pub async fn list_prompts(&self) -> Result<Vec<Prompt>, ClientError> {
        let response = self.get("/api/prompts").send().await?;
        Self::parse_response(response).await
    }

    pub async fn create_prompt(&self, input: &CreatePrompt) -> Result<Prompt, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/prompts")
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn update_prompt(
        &self,
        id: DbId,
        input: &UpdatePrompt,
    ) -> Result<Prompt, ClientError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/api/prompts/{id}"))
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Delete a prompt. Returns the server's confirmation message.
    pub async fn delete_prompt(&self, id: DbId) -> Result<String, ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/api/prompts/{id}"))
            .send()
            .await?;
        let body: MessageResponse = Self::parse_response(response).await?;
        Ok(body.message)
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        let response = self.get("/api/tags").send().await?;
        Self::parse_response(response).await
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag, ClientError> {
        let body = CreateTag {
            name: name.to_string(),
        };
        let response = self
            .request(reqwest::Method::POST, "/api/tags")
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Replace the tag set of a prompt. Returns the tags now attached.
    pub async fn set_prompt_tags(
        &self,
        prompt_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<Vec<Tag>, ClientError> {
        let body = SetPromptTags {
            tag_ids: tag_ids.to_vec(),
        };
        let response = self
            .request(reqwest::Method::PUT, &format!("/api/prompts/{prompt_id}/tags"))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
    }

    /// Ensure the response has a success status code. On failure the
    /// server's `{"error": ...}` message is extracted, falling back to the
    /// raw body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
