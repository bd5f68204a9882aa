//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use users_core::http::HttpMethod;
use users_core::{ClientError, CreatedUser, PayloadError, User, UserPage};

/// Opaque handle to a `UsersClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiUsersClient {
    pub(crate) inner: users_core::UsersClient,
}

/// Move a Rust string into a heap C string. Interior NUL bytes cannot be
/// represented, so such strings become empty.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `url` already contains the encoded query string. Built by
/// `users_build_*`; the C caller executes it and passes the response back
/// through `users_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: users_core::HttpRequest) -> *mut Self {
        let url = c_string(req.url());
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len();
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this after executing a request and passes a
/// pointer to a `users_parse_*` function. `url` may be null; it only feeds
/// error messages. The FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub url: *const c_char,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiUsersResult`.
#[repr(C)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidResponse = 1,
    Api = 2,
    MalformedPayload = 3,
    InvalidTimestamp = 4,
    Serialization = 5,
    Transport = 6,
    Panic = 7,
    NullArg = 8,
}

/// Tag that tells `users_free_result` what `FfiUsersResult::data` points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    User = 1,
    UserPage = 2,
    CreatedUser = 3,
}

#[repr(C)]
pub struct FfiUser {
    pub id: i64,
    pub email: *mut c_char,
    pub first_name: *mut c_char,
    pub last_name: *mut c_char,
    pub avatar: *mut c_char,
}

impl FfiUser {
    fn from_core(user: &User) -> Self {
        FfiUser {
            id: user.id(),
            email: c_string(user.email()),
            first_name: c_string(user.first_name()),
            last_name: c_string(user.last_name()),
            avatar: c_string(user.avatar()),
        }
    }
}

#[repr(C)]
pub struct FfiUserPage {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub items: *mut FfiUser,
    pub len: usize,
}

/// `created_at` is RFC 3339 with a numeric offset.
#[repr(C)]
pub struct FfiCreatedUser {
    pub id: *mut c_char,
    pub name: *mut c_char,
    pub job: *mut c_char,
    pub created_at: *mut c_char,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null. `http_status` is set for
/// `Api` and `InvalidResponse` errors.
#[repr(C)]
pub struct FfiUsersResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiUsersResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiUsersResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiUsersResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_user(user: User) -> *mut Self {
        let ffi_user = Box::new(FfiUser::from_core(&user));
        Self::ok(FfiDataTag::User, Box::into_raw(ffi_user) as *mut std::ffi::c_void)
    }

    pub(crate) fn ok_user_page(page: UserPage) -> *mut Self {
        let len = page.data().len();
        let items = if page.data().is_empty() {
            std::ptr::null_mut()
        } else {
            let users: Box<[FfiUser]> = page.data().iter().map(FfiUser::from_core).collect();
            Box::into_raw(users) as *mut FfiUser
        };
        let ffi_page = Box::new(FfiUserPage {
            page: page.page(),
            per_page: page.per_page(),
            total: page.total(),
            total_pages: page.total_pages(),
            items,
            len,
        });
        Self::ok(FfiDataTag::UserPage, Box::into_raw(ffi_page) as *mut std::ffi::c_void)
    }

    pub(crate) fn ok_created_user(created: CreatedUser) -> *mut Self {
        let ffi_created = Box::new(FfiCreatedUser {
            id: c_string(created.id()),
            name: c_string(created.name()),
            job: c_string(created.job()),
            created_at: c_string(created.created_at_rfc3339()),
        });
        Self::ok(FfiDataTag::CreatedUser, Box::into_raw(ffi_created) as *mut std::ffi::c_void)
    }

    /// Build an error result from a `ClientError`.
    pub(crate) fn from_error(err: ClientError) -> *mut Self {
        let msg = err.to_string();
        let (code, status) = match &err {
            ClientError::InvalidResponse { status, .. } => (FfiErrorCode::InvalidResponse, *status),
            ClientError::Api { status, .. } => (FfiErrorCode::Api, *status),
            ClientError::MalformedPayload(PayloadError::InvalidTimestamp { .. }) => {
                (FfiErrorCode::InvalidTimestamp, 0)
            }
            ClientError::MalformedPayload(_) => (FfiErrorCode::MalformedPayload, 0),
            ClientError::Serialization(_) => (FfiErrorCode::Serialization, 0),
            ClientError::Transport(_) => (FfiErrorCode::Transport, 0),
        };
        Self::error(code, status, msg)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
