//! C-ABI wrapper around `users-core`.
//!
//! # Overview
//! Exposes the user API's build/parse halves through `extern "C"` functions
//! so any language with a C FFI can build requests and parse responses while
//! doing the HTTP I/O itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `users_build_*` / `users_parse_*` mirror the core API 1:1.
//! - A single `FfiUsersResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `users_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use users_core::{Headers, HttpResponse};

use types::*;

/// Borrow a C string as `&str`; null or invalid UTF-8 yields `None`.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Copy a C string, replacing invalid UTF-8 with U+FFFD; null yields "".
fn read_lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `UsersClient` bound to `base_url`. `api_key` may be null.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `users_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn users_client_new(base_url: *const c_char, api_key: *const c_char) -> *mut FfiUsersClient {
    catch_unwind(|| {
        let Some(url) = read_str(base_url) else {
            return std::ptr::null_mut();
        };
        let mut client = users_core::UsersClient::new(url);
        if let Some(key) = read_str(api_key) {
            client = client.with_api_key(key);
        }
        Box::into_raw(Box::new(FfiUsersClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `users_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn users_client_free(client: *mut FfiUsersClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for `GET /users/{id}`.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `users_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn users_build_get_user(client: *const FfiUsersClient, id: i64) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_user(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for `GET /users?page=&per_page=`.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn users_build_list_users(
    client: *const FfiUsersClient,
    page: u32,
    per_page: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_users(page, per_page))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for `POST /users` with `{name, job}`.
///
/// Returns null if any argument is null or not UTF-8, or if serialization
/// fails.
#[unsafe(no_mangle)]
pub extern "C" fn users_build_create_user(
    client: *const FfiUsersClient,
    name: *const c_char,
    job: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(name), Some(job)) = (read_str(name), read_str(job)) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_create_user(name, job) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. Null strings
/// become empty; bytes that are not UTF-8 are kept as U+FFFD so a garbage
/// body still fails JSON decoding.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        url: read_lossy(resp.url),
        headers: Headers::new(),
        body: read_lossy(resp.body),
    }
}

/// Parse the response of a get-user request.
///
/// Returns a result with `data_tag = User` on success.
#[unsafe(no_mangle)]
pub extern "C" fn users_parse_get_user(
    client: *const FfiUsersClient,
    response: *const FfiHttpResponse,
) -> *mut FfiUsersResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiUsersResult::null_arg("client");
        }
        if response.is_null() {
            return FfiUsersResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_get_user(core_resp) {
            Ok(user) => FfiUsersResult::ok_user(user),
            Err(e) => FfiUsersResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiUsersResult::panic("panic in users_parse_get_user"))
}

/// Parse the response of a list-users request.
///
/// Returns a result with `data_tag = UserPage` on success.
#[unsafe(no_mangle)]
pub extern "C" fn users_parse_list_users(
    client: *const FfiUsersClient,
    response: *const FfiHttpResponse,
) -> *mut FfiUsersResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiUsersResult::null_arg("client");
        }
        if response.is_null() {
            return FfiUsersResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_list_users(core_resp) {
            Ok(page) => FfiUsersResult::ok_user_page(page),
            Err(e) => FfiUsersResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiUsersResult::panic("panic in users_parse_list_users"))
}

/// Parse the response of a create-user request. `name` and `job` must be
/// the values passed to `users_build_create_user`; they are echoed into
/// the result.
///
/// Returns a result with `data_tag = CreatedUser` on success.
#[unsafe(no_mangle)]
pub extern "C" fn users_parse_create_user(
    client: *const FfiUsersClient,
    response: *const FfiHttpResponse,
    name: *const c_char,
    job: *const c_char,
) -> *mut FfiUsersResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiUsersResult::null_arg("client");
        }
        if response.is_null() {
            return FfiUsersResult::null_arg("response");
        }
        let Some(name) = read_str(name) else {
            return FfiUsersResult::null_arg("name");
        };
        let Some(job) = read_str(job) else {
            return FfiUsersResult::null_arg("job");
        };
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_create_user(core_resp, name, job) {
            Ok(created) => FfiUsersResult::ok_created_user(created),
            Err(e) => FfiUsersResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiUsersResult::panic("panic in users_parse_create_user"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `users_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn users_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiUsersResult` returned by any `users_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn users_free_result(result: *mut FfiUsersResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::User => {
                let user = unsafe { Box::from_raw(result.data as *mut FfiUser) };
                free_ffi_user_fields(&user);
            }
            FfiDataTag::UserPage => {
                let page = unsafe { Box::from_raw(result.data as *mut FfiUserPage) };
                if !page.items.is_null() && page.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(page.items, page.len))
                    };
                    for item in items.iter() {
                        free_ffi_user_fields(item);
                    }
                }
            }
            FfiDataTag::CreatedUser => {
                let created = unsafe { Box::from_raw(result.data as *mut FfiCreatedUser) };
                free_c_string(created.id);
                free_c_string(created.name);
                free_c_string(created.job);
                free_c_string(created.created_at);
            }
            FfiDataTag::None => {}
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free the C-string fields of an `FfiUser` (but not the struct itself).
fn free_ffi_user_fields(user: &FfiUser) {
    free_c_string(user.email);
    free_c_string(user.first_name);
    free_c_string(user.last_name);
    free_c_string(user.avatar);
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn users_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    const BASE_URL: &str = "https://reqres.in/api";

    fn new_client(api_key: Option<&str>) -> *mut FfiUsersClient {
        let url = CString::new(BASE_URL).unwrap();
        let key = api_key.map(|k| CString::new(k).unwrap());
        users_client_new(url.as_ptr(), key.as_ref().map_or(std::ptr::null(), |k| k.as_ptr()))
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn headers_of(req: &FfiHttpRequest) -> Vec<(String, String)> {
        let headers = unsafe { std::slice::from_raw_parts(req.headers, req.headers_len) };
        headers
            .iter()
            .map(|h| (c_str(h.key).to_string(), c_str(h.value).to_string()))
            .collect()
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client(None);
        assert!(!client.is_null());
        users_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let client = users_client_new(std::ptr::null(), std::ptr::null());
        assert!(client.is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        users_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_get_user_returns_correct_request() {
        let client = new_client(Some("reqres-free-v1"));
        let req = users_build_get_user(client, 2);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        assert_eq!(c_str(req_ref.url), "https://reqres.in/api/users/2");
        assert!(req_ref.body.is_null());

        let headers = headers_of(req_ref);
        assert_eq!(headers.len(), 3);
        assert!(headers.contains(&("x-api-key".to_string(), "reqres-free-v1".to_string())));

        users_free_request(req);
        users_client_free(client);
    }

    #[test]
    fn build_get_user_null_client_returns_null() {
        assert!(users_build_get_user(std::ptr::null(), 2).is_null());
    }

    #[test]
    fn build_list_users_includes_query() {
        let client = new_client(None);
        let req = users_build_list_users(client, 2, 3);
        let req_ref = unsafe { &*req };
        assert_eq!(c_str(req_ref.url), "https://reqres.in/api/users?page=2&per_page=3");
        assert_eq!(req_ref.headers_len, 2);

        users_free_request(req);
        users_client_free(client);
    }

    #[test]
    fn build_create_user_produces_post_with_json_body() {
        let client = new_client(None);
        let name = CString::new("Neo").unwrap();
        let job = CString::new("The One").unwrap();
        let req = users_build_create_user(client, name.as_ptr(), job.as_ptr());
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Post));
        let body: serde_json::Value = serde_json::from_str(c_str(req_ref.body)).unwrap();
        assert_eq!(body["name"], "Neo");
        assert_eq!(body["job"], "The One");

        users_free_request(req);
        users_client_free(client);
    }

    #[test]
    fn build_create_user_null_job_returns_null() {
        let client = new_client(None);
        let name = CString::new("Neo").unwrap();
        assert!(users_build_create_user(client, name.as_ptr(), std::ptr::null()).is_null());
        users_client_free(client);
    }

    #[test]
    fn parse_get_user_success() {
        let client = new_client(None);
        let body = CString::new(
            r#"{"data":{"id":2,"email":"janet.weaver@reqres.in","first_name":"Janet","last_name":"Weaver","avatar":"https://reqres.in/img/faces/2-image.jpg"}}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_get_user(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(r.error_message.is_null());
        assert!(matches!(r.data_tag, FfiDataTag::User));

        let user = unsafe { &*(r.data as *const FfiUser) };
        assert_eq!(user.id, 2);
        assert_eq!(c_str(user.first_name), "Janet");
        assert_eq!(c_str(user.last_name), "Weaver");

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_get_user_plain_text_404_is_invalid_response() {
        let client = new_client(None);
        let url = CString::new("https://reqres.in/api/users/9999").unwrap();
        let body = CString::new("Not found").unwrap();
        let resp = FfiHttpResponse {
            status: 404,
            url: url.as_ptr(),
            body: body.as_ptr(),
        };
        let result = users_parse_get_user(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidResponse));
        assert_eq!(r.http_status, 404);
        let msg = c_str(r.error_message);
        assert!(msg.contains("Invalid JSON"));
        assert!(msg.contains("/users/9999"));

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_get_user_non_utf8_body_is_invalid_response() {
        let client = new_client(None);
        let body = CString::new(vec![0xff, 0xfe, b'{']).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_get_user(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidResponse));
        assert_eq!(r.http_status, 200);
        assert!(r.data.is_null());

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_get_user_api_error() {
        let client = new_client(None);
        let body = CString::new(r#"{"error":"Missing API key"}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 401,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_get_user(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Api));
        assert_eq!(r.http_status, 401);
        assert!(c_str(r.error_message).contains("Missing API key"));

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_list_users_two_items() {
        let client = new_client(None);
        let body = CString::new(
            r#"{"page":1,"per_page":2,"total":12,"total_pages":6,"data":[
                {"id":1,"email":"george.bluth@reqres.in","first_name":"George","last_name":"Bluth","avatar":"a"},
                {"id":2,"email":"janet.weaver@reqres.in","first_name":"Janet","last_name":"Weaver","avatar":"b"}
            ]}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_list_users(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::UserPage));

        let page = unsafe { &*(r.data as *const FfiUserPage) };
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 6);
        let len: usize = page.len;
        assert_eq!(len, 2);
        let items = unsafe { std::slice::from_raw_parts(page.items, page.len) };
        assert_eq!(c_str(items[0].first_name), "George");
        assert_eq!(items[1].id, 2);

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_list_users_empty_page() {
        let client = new_client(None);
        let body = CString::new(r#"{"page":3,"per_page":6,"total":12,"total_pages":2,"data":[]}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_list_users(client, &resp);
        let r = unsafe { &*result };
        let page = unsafe { &*(r.data as *const FfiUserPage) };
        assert_eq!(page.len, 0);
        assert!(page.items.is_null());

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_create_user_success() {
        let client = new_client(None);
        let body = CString::new(r#"{"id":"123","createdAt":"2025-01-01T12:00:00.000Z"}"#).unwrap();
        let name = CString::new("Neo").unwrap();
        let job = CString::new("The One").unwrap();
        let resp = FfiHttpResponse {
            status: 201,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_create_user(client, &resp, name.as_ptr(), job.as_ptr());
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::CreatedUser));

        let created = unsafe { &*(r.data as *const FfiCreatedUser) };
        assert_eq!(c_str(created.id), "123");
        assert_eq!(c_str(created.name), "Neo");
        assert_eq!(c_str(created.job), "The One");
        assert_eq!(c_str(created.created_at), "2025-01-01T12:00:00+00:00");

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_create_user_bad_timestamp() {
        let client = new_client(None);
        let body = CString::new(r#"{"id":"123","createdAt":"soon"}"#).unwrap();
        let name = CString::new("Neo").unwrap();
        let job = CString::new("The One").unwrap();
        let resp = FfiHttpResponse {
            status: 201,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_create_user(client, &resp, name.as_ptr(), job.as_ptr());
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidTimestamp));

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let body = CString::new("{}").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            url: std::ptr::null(),
            body: body.as_ptr(),
        };
        let result = users_parse_list_users(std::ptr::null(), &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NullArg));

        users_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client(None);
        let result = users_parse_get_user(client, std::ptr::null());
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NullArg));

        users_free_result(result);
        users_client_free(client);
    }

    #[test]
    fn free_request_null_is_safe() {
        users_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        users_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        users_free_string(std::ptr::null_mut());
    }
}
