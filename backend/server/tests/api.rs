use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use catalog::CatalogStore;
use gear::{
    config::{AdminConfig, Config, EmailConfig, WhatsAppConfig},
    router,
    state::AppState,
};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::util::ServiceExt;

const DATASET: &str = r#"{
    "catalogs": [
        {
            "id": "2025",
            "name": "Safety Catalog 2025",
            "isCurrent": true,
            "categories": [
                {
                    "id": "hands",
                    "name": "Hand Protection",
                    "subCategories": [
                        { "id": "cut-resistant", "name": "Cut Resistant Gloves" }
                    ]
                },
                {
                    "id": "head",
                    "name": "Head Protection",
                    "subCategories": [
                        { "id": "helmets", "name": "Helmets" }
                    ]
                }
            ]
        }
    ],
    "products": [
        {
            "id": "glove-pro-5",
            "name": "ProGrip Level 5 Glove",
            "description": "Cut resistant nitrile coated glove",
            "category": "hands",
            "subCategory": "cut-resistant"
        },
        {
            "id": "helmet-x",
            "name": "SiteGuard Helmet",
            "category": "head",
            "subCategory": "helmets"
        }
    ]
}"#;

fn config(email: Option<EmailConfig>, whatsapp: Option<WhatsAppConfig>) -> Config {
    Config {
        port: 0,
        data_path: String::new(),
        email,
        whatsapp,
        admin: AdminConfig {
            email: "admin@gear-safety.example".to_string(),
            password: Some("hunter2".to_string()),
        },
    }
}

fn email_config(server: &MockServer) -> EmailConfig {
    EmailConfig {
        api_url: server.url("/emails"),
        api_key: "test-key".to_string(),
        from: "catalog@gear-safety.example".to_string(),
        to: "sales@gear-safety.example".to_string(),
    }
}

fn whatsapp_config(server: &MockServer) -> WhatsAppConfig {
    WhatsAppConfig {
        api_url: server.base_url(),
        phone_id: "phone-1".to_string(),
        recipient: "351000000000".to_string(),
        token: "test-token".to_string(),
    }
}

fn app(config: Config) -> Router {
    let store = CatalogStore::from_json(DATASET).unwrap();

    router(AppState::from_parts(config, store))
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn post(path: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn current_catalog_is_served() {
    let response = app(config(None, None))
        .oneshot(get("/api/catalogs/current"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "2025");
    assert_eq!(body["categories"][0]["id"], "hands");
}

#[tokio::test]
async fn missing_current_catalog_is_a_404() {
    let store = CatalogStore::from_json(r#"{ "catalogs": [], "products": [] }"#).unwrap();
    let app = router(AppState::from_parts(config(None, None), store));

    let response = app.oneshot(get("/api/catalogs/current")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "No current catalog found" })
    );
}

#[tokio::test]
async fn categories_come_back_in_dataset_order() {
    let response = app(config(None, None))
        .oneshot(get("/api/categories"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["id"], "hands");
    assert_eq!(body[1]["id"], "head");
}

#[tokio::test]
async fn products_narrow_by_query_parameters() {
    let app = app(config(None, None));

    let response = app
        .clone()
        .oneshot(get("/api/products?category=hands"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "glove-pro-5");

    let response = app
        .clone()
        .oneshot(get("/api/products?q=HELMET"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "helmet-x");

    let response = app.oneshot(get("/api/products?category=feet")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn empty_quote_is_a_400_before_any_dispatch() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200);
        })
        .await;

    let response = app(config(Some(email_config(&server)), None))
        .oneshot(post("/api/quotes", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Missing required fields" })
    );
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn quote_fans_out_to_both_channels() {
    let server = MockServer::start_async().await;
    let email = server
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(200).json_body(json!({ "id": "msg-1" }));
        })
        .await;
    let whatsapp = server
        .mock_async(|when, then| {
            when.method(POST).path("/phone-1/messages");
            then.status(200).json_body(json!({ "messages": [] }));
        })
        .await;

    let payload = json!({
        "name": "Ana",
        "email": "ana@example.com",
        "quantity": 50,
        "company": "Obras Norte"
    });
    let response = app(config(
        Some(email_config(&server)),
        Some(whatsapp_config(&server)),
    ))
    .oneshot(post("/api/quotes", &payload))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    email.assert_async().await;
    whatsapp.assert_async().await;
}

#[tokio::test]
async fn newsletter_signup_succeeds_over_email() {
    let server = MockServer::start_async().await;
    let email = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer test-key");
            then.status(200).json_body(json!({ "id": "msg-2" }));
        })
        .await;

    let response = app(config(Some(email_config(&server)), None))
        .oneshot(post("/api/newsletter", &json!({ "email": "a@b.com" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    email.assert_async().await;
}

#[tokio::test]
async fn newsletter_without_email_is_a_400() {
    let response = app(config(None, None))
        .oneshot(post("/api/newsletter", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failing_webhook_turns_into_a_500() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(200);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/phone-1/messages");
            then.status(500);
        })
        .await;

    let response = app(config(
        Some(email_config(&server)),
        Some(whatsapp_config(&server)),
    ))
    .oneshot(post("/api/chat", &json!({ "message": "hello" })))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Failed to send notification" })
    );
}

#[tokio::test]
async fn auth_round_trip() {
    let app = app(config(None, None));

    // Wrong password first.
    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/login",
            &json!({ "email": "admin@gear-safety.example", "password": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/login",
            &json!({ "email": "admin@gear-safety.example", "password": "hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["role"], "admin");

    let me = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["email"],
        "admin@gear-safety.example"
    );

    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(logout).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_stats_require_a_session() {
    let app = app(config(None, None));

    let response = app
        .clone()
        .oneshot(get("/api/admin/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/login",
            &json!({ "email": "admin@gear-safety.example", "password": "hunter2" }),
        ))
        .await
        .unwrap();
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let stats = Request::builder()
        .uri("/api/admin/stats")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(stats).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "catalogs": 1, "categories": 2, "subCategories": 2, "products": 2 })
    );
}
