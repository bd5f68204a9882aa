//! Blocking client core for a reqres-style user-management API.
//!
//! # Overview
//! Fetches a user by id, lists users page by page and creates users. The
//! pipeline for every call is: build the request (headers, query, body),
//! send it through a `Transport`, classify the response (decode JSON, then
//! check the status), and map the payload into a typed DTO.
//!
//! # Design
//! - `UsersClient` is stateless and split into `build_*` / `parse_*` so the
//!   I/O boundary is explicit (host-does-IO); the FFI crate uses it directly.
//! - `UserService` composes both halves over a `Transport`; `UreqTransport`
//!   is the default blocking implementation.
//! - JSON decode failures outrank status-code failures: a non-JSON 404 is an
//!   `InvalidResponse`, not an `Api` error.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use users_core::{ServiceConfig, UserService};
//!
//! let service = UserService::with_defaults(ServiceConfig::default());
//! let user = service.get_user_by_id(2)?;
//! println!("{} {}", user.first_name(), user.last_name());
//! # Ok::<(), users_core::ClientError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapper;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;
pub mod types;

pub use client::UsersClient;
pub use config::ServiceConfig;
pub use error::{ClientError, PayloadError, Result};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use service::UserService;
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{CreatedUser, User, UserPage};
