//! Provider listing and admin API driven through the router.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use client_registry::{
    config::{AdminToken, Config},
    http::{AppState, build_router},
    registration::ClientProperties,
    storage::{ClientRegistrationStore, create_registration_store},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN: &str = "admin-secret";

fn config(admin_token: Option<&str>, listing: &str) -> Config {
    Config {
        version: "test".to_string(),
        http_port: "8080".to_string().try_into().unwrap(),
        admin_token: AdminToken::from(admin_token.map(str::to_string)),
        enable_provider_listing: listing.to_string().try_into().unwrap(),
        client_properties: ClientProperties::default(),
    }
}

fn store() -> Arc<ClientRegistrationStore> {
    let properties: ClientProperties = serde_json::from_value(json!({
        "registration": {
            "google": { "client-id": "abc", "client-secret": "s3cr3t" },
            "github": { "client-id": "gh", "client-secret": "gh-secret" }
        }
    }))
    .unwrap();
    create_registration_store(&properties).unwrap()
}

fn app(config: Config) -> (Router, Arc<ClientRegistrationStore>) {
    let registration_store = store();
    let router = build_router(AppState {
        config: Arc::new(config),
        registration_store: registration_store.clone(),
    });
    (router, registration_store)
}

fn admin_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_provider_listing() {
    let (router, _) = app(config(None, "true"));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/oauth2/providers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let providers = body.as_array().unwrap();
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0]["registration_id"], "github");
    assert_eq!(providers[1]["registration_id"], "google");
    assert_eq!(providers[1]["client_name"], "Google");
    assert!(providers[1].get("client_secret").is_none());
}

#[tokio::test]
async fn test_provider_listing_skips_non_login_clients() {
    let properties: ClientProperties = serde_json::from_value(json!({
        "registration": {
            "google": { "client-id": "abc", "client-secret": "s3cr3t" },
            "svc": {
                "client-id": "svc",
                "client-secret": "svc-secret",
                "authorization-grant-type": "client_credentials"
            }
        },
        "provider": {
            "svc": { "token-uri": "https://idp.example.com/token" }
        }
    }))
    .unwrap();
    let registration_store = create_registration_store(&properties).unwrap();
    assert!(registration_store.contains("svc"));

    let router = build_router(AppState {
        config: Arc::new(config(None, "true")),
        registration_store,
    });
    let response = router
        .oneshot(
            Request::builder()
                .uri("/oauth2/providers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let providers = body.as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["registration_id"], "google");
}

#[tokio::test]
async fn test_provider_listing_disabled() {
    let (router, _) = app(config(None, "false"));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/oauth2/providers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_absent_without_token() {
    let (router, _) = app(config(None, "true"));
    let response = router
        .oneshot(admin_request(Method::GET, "/admin/registrations", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_requires_bearer_token() {
    let (router, _) = app(config(Some(TOKEN), "true"));

    let missing = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/registrations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(missing).await["error"], "unauthorized");

    let wrong = router
        .oneshot(
            Request::builder()
                .uri("/admin/registrations")
                .header(header::AUTHORIZATION, "Bearer nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_list_and_get() {
    let (router, _) = app(config(Some(TOKEN), "true"));

    let response = router
        .clone()
        .oneshot(admin_request(Method::GET, "/admin/registrations", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert!(!body.to_string().contains("s3cr3t"));

    let response = router
        .clone()
        .oneshot(admin_request(Method::GET, "/admin/registrations/google", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let google = json_body(response).await;
    assert_eq!(google["client_id"], "abc");
    assert_eq!(google["has_client_secret"], true);
    assert_eq!(google["configuration_metadata"]["preconfigured"], "true");

    let response = router
        .oneshot(admin_request(Method::GET, "/admin/registrations/okta", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "registration_not_found");
}

#[tokio::test]
async fn test_admin_put_and_delete() {
    let (router, registration_store) = app(config(Some(TOKEN), "true"));

    let body = json!({
        "client-id": "app",
        "client-secret": "app-secret",
        "authorization-grant-type": "authorization_code",
        "redirect-uri": "{baseUrl}/login/oauth2/code/{registrationId}",
        "authorization-uri": "https://sso.example.com/auth",
        "token-uri": "https://sso.example.com/token",
        "scope": ["openid", "profile"],
        "configuration-metadata": { "source": "admin" }
    });
    let response = router
        .clone()
        .oneshot(admin_request(
            Method::PUT,
            "/admin/registrations/keycloak",
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stored = json_body(response).await;
    assert_eq!(stored["registration_id"], "keycloak");
    assert_eq!(stored["configuration_metadata"]["source"], "admin");

    let keycloak = registration_store
        .find_by_registration_id("keycloak")
        .unwrap();
    assert_eq!(keycloak.client_secret, "app-secret");
    assert_eq!(keycloak.provider_details.token_uri, "https://sso.example.com/token");

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(admin_request(
                Method::DELETE,
                "/admin/registrations/keycloak",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert!(
        registration_store
            .find_by_registration_id("keycloak")
            .is_none()
    );
}

#[tokio::test]
async fn test_admin_put_from_preset() {
    let (router, registration_store) = app(config(Some(TOKEN), "true"));

    let response = router
        .oneshot(admin_request(
            Method::PUT,
            "/admin/registrations/work-github",
            Some(json!({ "provider": "github", "client-id": "gh2" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = registration_store
        .find_by_registration_id("work-github")
        .unwrap();
    assert_eq!(stored.client_name, "GitHub");
    assert_eq!(
        stored.provider_details.authorization_uri,
        "https://github.com/login/oauth/authorize"
    );
}

#[tokio::test]
async fn test_admin_put_rejects_invalid_registration() {
    let (router, registration_store) = app(config(Some(TOKEN), "true"));

    let response = router
        .oneshot(admin_request(
            Method::PUT,
            "/admin/registrations/broken",
            Some(json!({
                "client-id": "x",
                "authorization-grant-type": "authorization_code",
                "token-uri": "https://sso.example.com/token"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_registration");
    assert!(!registration_store.contains("broken"));
}
