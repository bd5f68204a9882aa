use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// A user as the API sends it (snake_case wire names).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserPage {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub data: Vec<User>,
}

#[derive(Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    6
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedUser {
    pub name: String,
    pub job: String,
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Clone)]
pub struct AppState {
    users: Arc<Vec<User>>,
    api_key: Option<Arc<str>>,
}

const SEED: [(&str, &str); 12] = [
    ("George", "Bluth"),
    ("Janet", "Weaver"),
    ("Emma", "Wong"),
    ("Eve", "Holt"),
    ("Charles", "Morris"),
    ("Tracey", "Ramos"),
    ("Michael", "Lawson"),
    ("Lindsay", "Ferguson"),
    ("Tobias", "Funke"),
    ("Byron", "Fields"),
    ("George", "Edwards"),
    ("Rachel", "Howell"),
];

/// The twelve users the public reqres API serves.
pub fn seed_users() -> Vec<User> {
    SEED.iter()
        .zip(1u64..)
        .map(|((first, last), id)| User {
            id,
            email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        })
        .collect()
}

/// Router without API-key enforcement.
pub fn app() -> Router {
    router(None)
}

/// Router that answers 401 unless `x-api-key` matches `api_key`.
pub fn app_with_api_key(api_key: &str) -> Router {
    router(Some(Arc::from(api_key)))
}

fn router(api_key: Option<Arc<str>>) -> Router {
    let state = AppState {
        users: Arc::new(seed_users()),
        api_key,
    };
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: Option<String>) -> Result<(), std::io::Error> {
    let app = match api_key {
        Some(key) => app_with_api_key(&key),
        None => app(),
    };
    axum::serve(listener, app).await
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.api_key {
        let supplied = request
            .headers()
            .get("x-api-key")
            .and_then(|value| value.to_str().ok());
        if supplied != Some(expected.as_ref()) {
            tracing::debug!(path = %request.uri().path(), "rejecting request without API key");
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Missing API key"}))).into_response();
        }
    }
    next.run(request).await
}

async fn list_users(State(state): State<AppState>, Query(pagination): Query<Pagination>) -> Json<UserPage> {
    let per_page = if pagination.per_page == 0 {
        default_per_page()
    } else {
        pagination.per_page
    };
    let total = state.users.len() as u64;
    let skip = pagination.page.saturating_sub(1).saturating_mul(per_page);
    let data = state
        .users
        .iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(per_page).unwrap_or(usize::MAX))
        .cloned()
        .collect();

    Json(UserPage {
        page: pagination.page,
        per_page,
        total,
        total_pages: total.div_ceil(per_page),
        data,
    })
}

async fn get_user(State(state): State<AppState>, Path(id): Path<u64>) -> (StatusCode, Json<Value>) {
    match state.users.iter().find(|user| user.id == id) {
        Some(user) => (
            StatusCode::OK,
            Json(json!({
                "data": user,
                "support": {
                    "url": "https://reqres.in/#support-heading",
                    "text": "To keep ReqRes free, contributions towards server costs are appreciated!",
                },
            })),
        ),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn create_user(Json(input): Json<CreateUser>) -> (StatusCode, Json<CreatedUser>) {
    let created = CreatedUser {
        name: input.name,
        job: input.job,
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    tracing::debug!(id = %created.id, "created user");
    (StatusCode::CREATED, Json(created))
}
