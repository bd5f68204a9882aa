//! `UserService`: the three API operations over a `Transport`.
//!
//! Each call is one round-trip: build, send, classify, map. The first
//! failing stage ends the call; nothing is retried or cached.

use tracing::{debug, warn};

use crate::client::UsersClient;
use crate::config::ServiceConfig;
use crate::error::{ClientError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::request::{DEFAULT_PAGE, DEFAULT_PER_PAGE};
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreatedUser, User, UserPage};

/// Blocking client for the user API.
///
/// Holds only immutable configuration, so one instance can be shared
/// across threads (`&UserService` is `Send + Sync` when the transport is).
#[derive(Debug, Clone)]
pub struct UserService<T> {
    client: UsersClient,
    transport: T,
}

impl UserService<UreqTransport> {
    /// Service backed by `ureq`. The API key falls back to
    /// `REQRES_API_KEY` when the configuration has none.
    pub fn with_defaults(config: ServiceConfig) -> Self {
        let config = config.resolve_api_key();
        let transport = UreqTransport::new(config.timeout);
        Self::new(transport, &config)
    }
}

impl<T: Transport> UserService<T> {
    pub fn new(transport: T, config: &ServiceConfig) -> Self {
        Self {
            client: UsersClient::from_config(config),
            transport,
        }
    }

    pub fn client(&self) -> &UsersClient {
        &self.client
    }

    /// `GET /users/{id}`.
    pub fn get_user_by_id(&self, id: i64) -> Result<User> {
        let request = self.client.build_get_user(id);
        let response = self.execute(&request)?;
        self.client
            .parse_get_user(response)
            .inspect_err(|e| warn!(id, error = %e, "get user failed"))
    }

    /// `GET /users?page=&per_page=`.
    pub fn list_users(&self, page: u32, per_page: u32) -> Result<UserPage> {
        let request = self.client.build_list_users(page, per_page);
        let response = self.execute(&request)?;
        self.client
            .parse_list_users(response)
            .inspect_err(|e| warn!(page, per_page, error = %e, "list users failed"))
    }

    /// First page with the default page size.
    pub fn list_users_default(&self) -> Result<UserPage> {
        self.list_users(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }

    /// `POST /users` with `{name, job}`.
    pub fn create_user(&self, name: &str, job: &str) -> Result<CreatedUser> {
        let request = self.client.build_create_user(name, job)?;
        let response = self.execute(&request)?;
        self.client
            .parse_create_user(response, name, job)
            .inspect_err(|e| warn!(error = %e, "create user failed"))
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url(), "sending request");
        let response = self.transport.send(request).map_err(|e| {
            warn!(url = %request.url(), error = %e, "transport failed");
            ClientError::from(e)
        })?;
        debug!(status = response.status, url = %response.url, "received response");
        Ok(response)
    }
}
