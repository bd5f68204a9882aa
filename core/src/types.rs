//! Domain DTOs for the user API.
//!
//! # Design
//! Values are produced by the mapper in `crate::mapper` from a decoded
//! response and are read-only afterwards: fields are private and exposed
//! through accessors. The canonical (serialized) form uses camelCase keys,
//! unlike the snake_case wire format the API sends.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A single user returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    avatar: String,
}

impl User {
    pub(crate) fn new(
        id: i64,
        email: String,
        first_name: String,
        last_name: String,
        avatar: String,
    ) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
            avatar,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Avatar image URL.
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    /// Canonical string-keyed form: `id, email, firstName, lastName, avatar`.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), Value::from(self.id));
        map.insert("email".into(), Value::from(self.email.as_str()));
        map.insert("firstName".into(), Value::from(self.first_name.as_str()));
        map.insert("lastName".into(), Value::from(self.last_name.as_str()));
        map.insert("avatar".into(), Value::from(self.avatar.as_str()));
        map
    }

    /// Rebuild a user from the map produced by [`User::to_map`].
    pub fn from_map(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map))
    }
}

/// One page of users plus the pagination envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    page: u64,
    per_page: u64,
    total: u64,
    total_pages: u64,
    data: Vec<User>,
}

impl UserPage {
    pub(crate) fn new(page: u64, per_page: u64, total: u64, total_pages: u64, data: Vec<User>) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages,
            data,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Users in the order the server listed them.
    pub fn data(&self) -> &[User] {
        &self.data
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("page".into(), Value::from(self.page));
        map.insert("perPage".into(), Value::from(self.per_page));
        map.insert("total".into(), Value::from(self.total));
        map.insert("totalPages".into(), Value::from(self.total_pages));
        map.insert(
            "data".into(),
            Value::Array(self.data.iter().map(|u| Value::Object(u.to_map())).collect()),
        );
        map
    }

    pub fn from_map(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map))
    }
}

/// Result of a create call. `name` and `job` echo the request arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    id: String,
    name: String,
    job: String,
    #[serde(serialize_with = "serialize_timestamp")]
    created_at: DateTime<FixedOffset>,
}

impl CreatedUser {
    pub(crate) fn new(id: String, name: String, job: String, created_at: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            name,
            job,
            created_at,
        }
    }

    /// Opaque server-assigned identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    /// `created_at` as RFC 3339 with second precision and a numeric offset,
    /// e.g. `2025-01-01T12:00:00+00:00`.
    pub fn created_at_rfc3339(&self) -> String {
        format_timestamp(&self.created_at)
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), Value::from(self.id.as_str()));
        map.insert("name".into(), Value::from(self.name.as_str()));
        map.insert("job".into(), Value::from(self.job.as_str()));
        map.insert("createdAt".into(), Value::from(self.created_at_rfc3339()));
        map
    }

    pub fn from_map(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map))
    }
}

fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}
