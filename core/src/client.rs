//! Stateless request builder and response parser for the user API.
//!
//! # Design
//! `UsersClient` holds only a base URL and an optional API key. Each
//! operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`,
//! so the I/O boundary stays explicit. `UserService` joins the two halves
//! through a `Transport`; FFI hosts join them themselves.

use crate::config::{normalize_base_url, ServiceConfig};
use crate::error::{ClientError, PayloadError};
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::mapper;
use crate::request::{merge_headers, CreateUserBody, ListUsersQuery};
use crate::response::classify;
use crate::types::{CreatedUser, User, UserPage};

#[derive(Debug, Clone)]
pub struct UsersClient {
    base_url: String,
    api_key: Option<String>,
}

impl UsersClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            base_url: normalize_base_url(&config.base_url),
            api_key: config.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// General request form. `path` is relative to the base URL; caller
    /// headers are merged with the defaults and the API key.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
        headers: Headers,
    ) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            query,
            headers: merge_headers(headers, self.api_key.as_deref()),
            body,
        }
    }

    pub fn build_get_user(&self, id: i64) -> HttpRequest {
        self.build_request(HttpMethod::Get, &format!("/users/{id}"), Vec::new(), None, Headers::new())
    }

    pub fn build_list_users(&self, page: u32, per_page: u32) -> HttpRequest {
        let query = ListUsersQuery { page, per_page };
        self.build_request(HttpMethod::Get, "/users", query.to_pairs(), None, Headers::new())
    }

    pub fn build_create_user(&self, name: &str, job: &str) -> Result<HttpRequest, ClientError> {
        let input = CreateUserBody {
            name: name.to_string(),
            job: job.to_string(),
        };
        let body = serde_json::to_string(&input).map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(self.build_request(HttpMethod::Post, "/users", Vec::new(), Some(body), Headers::new()))
    }

    /// Expects `{ "data": { ...user... } }`.
    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ClientError> {
        let payload = classify(&response)?;
        let data = payload.get("data").filter(|v| !v.is_null()).ok_or_else(|| PayloadError::missing("data"))?;
        let user = mapper::to_user(mapper::as_object(data, "data")?)?;
        Ok(user)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<UserPage, ClientError> {
        let payload = classify(&response)?;
        Ok(mapper::to_user_page(&payload)?)
    }

    /// `name` and `job` are the values that were sent; the result echoes
    /// them rather than trusting the response.
    pub fn parse_create_user(&self, response: HttpResponse, name: &str, job: &str) -> Result<CreatedUser, ClientError> {
        let payload = classify(&response)?;
        mapper::require_fields(&payload, &["id", "createdAt"])?;
        Ok(mapper::to_created_user(&payload, name, job)?)
    }
}
