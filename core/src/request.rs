//! Outgoing request assembly: header merging, list query and create body.

use serde::{Deserialize, Serialize};

use crate::http::Headers;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 6;

/// Merge caller headers with the defaults every request carries.
///
/// Caller headers win; `Accept` and `Content-Type` default to JSON; the API
/// key is added only when configured and the caller did not send one.
pub fn merge_headers(caller: Headers, api_key: Option<&str>) -> Headers {
    let mut headers = caller;
    headers.insert_if_absent("Accept", "application/json");
    headers.insert_if_absent("Content-Type", "application/json");
    if let Some(key) = api_key {
        headers.insert_if_absent(API_KEY_HEADER, key);
    }
    headers
}

/// Pagination parameters for `GET /users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListUsersQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ]
    }
}

/// JSON body for `POST /users`. Emptiness is not checked here; the server
/// decides what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub job: String,
}
