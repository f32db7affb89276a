//! HTTP client for the task board REST API.
//!
//! The backend authenticates with a session cookie set by `/auth/login`.
//! The client keeps that cookie and replays it on every request, so a
//! session can be carried across processes via [`ApiClient::session_cookie`]
//! and [`ApiClient::with_session`].

use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::task::{CreateTask, Task, UpdateTask, User};

/// Email/password pair used by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: User,
}

/// Pull a readable message out of an error body.
///
/// Tries `message`, then `error`, then falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    body.trim().to_string()
}

/// Reduce `Set-Cookie` values to a `Cookie` header (`a=1; b=2`).
fn cookie_header<'a>(set_cookies: impl Iterator<Item = &'a str>) -> Option<String> {
    let pairs: Vec<&str> = set_cookies
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie: None,
        })
    }

    /// Reuse a session cookie captured by an earlier login.
    pub fn with_session(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");
        let builder = self.client.request(method, url);
        match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    /// Map a non-2xx response to an error.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let mut message = extract_error_message(&body);
        if message.is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();
        }
        tracing::warn!(status = status.as_u16(), %message, "api request failed");

        match status.as_u16() {
            401 => Err(Error::Unauthorized(message)),
            404 => Err(Error::NotFound(message)),
            code => Err(Error::Api {
                status: code,
                message,
            }),
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        Self::check_response(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    // -- Tasks --

    pub async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.send_json(self.request(Method::GET, "/tasks")).await
    }

    pub async fn create_task(&self, task: &CreateTask) -> Result<Task> {
        self.send_json(self.request(Method::POST, "/tasks").json(task))
            .await
    }

    pub async fn update_task(&self, id: &str, patch: &UpdateTask) -> Result<Task> {
        self.send_json(self.request(Method::PUT, &format!("/tasks/{id}")).json(patch))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/tasks/{id}")))
            .await?;
        Ok(())
    }

    // -- Auth --

    pub async fn register(&self, credentials: &Credentials) -> Result<()> {
        self.send(self.request(Method::POST, "/auth/register").json(credentials))
            .await?;
        Ok(())
    }

    /// Log in and keep the session cookie from the response.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<User> {
        let response = self
            .send(self.request(Method::POST, "/auth/login").json(credentials))
            .await?;

        let cookie = cookie_header(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        if cookie.is_some() {
            self.cookie = cookie;
        }

        let body: AuthResponse = response.json().await?;
        Ok(body.user)
    }

    /// End the session. The local cookie is dropped even if the call fails.
    pub async fn logout(&mut self) -> Result<()> {
        let result = self.send(self.request(Method::POST, "/auth/logout")).await;
        self.cookie = None;
        result.map(|_| ())
    }

    pub async fn me(&self) -> Result<User> {
        let body: AuthResponse = self.send_json(self.request(Method::GET, "/auth/me")).await?;
        Ok(body.user)
    }
}
