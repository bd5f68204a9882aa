//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `UserService` over
//! real HTTP through `UreqTransport`. Validates that request building,
//! classification and mapping agree with the server's actual payloads.

use std::net::SocketAddr;
use std::time::Duration;

use users_core::{ClientError, Headers, HttpMethod, ServiceConfig, Transport, UserService, UreqTransport};

/// Spawn the mock server on its own runtime thread and return its address.
fn start_mock_server(api_key: Option<&str>) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let api_key = api_key.map(str::to_string);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, api_key).await
        })
        .unwrap();
    });

    addr
}

fn service(addr: SocketAddr, api_key: Option<&str>) -> UserService<UreqTransport> {
    let mut config = ServiceConfig::new(format!("http://{addr}")).with_timeout(Duration::from_secs(5));
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }
    UserService::new(UreqTransport::new(config.timeout), &config)
}

#[test]
fn user_lifecycle() {
    let addr = start_mock_server(Some("reqres-free-v1"));
    let service = service(addr, Some("reqres-free-v1"));

    // Step 1: fetch a seeded user.
    let user = service.get_user_by_id(2).unwrap();
    assert_eq!(user.id(), 2);
    assert_eq!(user.first_name(), "Janet");
    assert_eq!(user.email(), "janet.weaver@reqres.in");

    // Step 2: default listing.
    let page = service.list_users_default().unwrap();
    assert_eq!(page.page(), 1);
    assert_eq!(page.per_page(), 6);
    assert_eq!(page.total(), 12);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.data().len(), 6);
    assert_eq!(page.data()[0].first_name(), "George");

    // Step 3: explicit pagination.
    let page = service.list_users(2, 2).unwrap();
    assert_eq!(page.data().len(), 2);
    assert_eq!(page.data()[0].id(), 3);

    // Step 4: create.
    let created = service.create_user("Neo", "The One").unwrap();
    assert!(!created.id().is_empty());
    assert_eq!(created.name(), "Neo");
    assert_eq!(created.job(), "The One");

    // Step 5: unknown user is an API error with the generic message.
    let err = service.get_user_by_id(9999).unwrap_err();
    assert!(
        matches!(err, ClientError::Api { status: 404, ref message } if message == "Unexpected status code 404"),
        "unexpected error: {err}"
    );
}

#[test]
fn missing_api_key_surfaces_server_error_message() {
    let addr = start_mock_server(Some("secret"));
    let service = service(addr, None);

    let err = service.get_user_by_id(2).unwrap_err();
    assert!(
        matches!(err, ClientError::Api { status: 401, ref message } if message == "Missing API key"),
        "unexpected error: {err}"
    );
}

#[test]
fn plain_text_error_body_is_invalid_response() {
    let addr = start_mock_server(None);
    let service = service(addr, None);

    // axum rejects a non-numeric path segment with a text/plain 400.
    let request = service
        .client()
        .build_request(HttpMethod::Get, "/users/abc", Vec::new(), None, Headers::new());
    let transport = UreqTransport::new(Duration::from_secs(5));
    let response = transport.send(&request).unwrap();
    let err = service.client().parse_get_user(response).unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse { status: 400, .. }), "unexpected error: {err}");
    assert!(err.to_string().contains("/users/abc"));
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(addr, None).get_user_by_id(2).unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "unexpected error: {err}");
}
