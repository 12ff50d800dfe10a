//! API integration tests
//!
//! The full router runs in-process over an in-memory document store; the
//! book search client runs against a local mock of the Gutendex API.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::Query,
    http::{header, Method, Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tower::ServiceExt;

use biblioteca_server::{
    api,
    config::{AdminUser, AppConfig, SearchConfig},
    models::remote_book::{BookSearchQuery, DownloadKind},
    services::gutenberg::GutendexClient,
    store::MemoryStore,
    AppState,
};

const ADMIN_EMAIL: &str = "admin@biblioteca.local";
const ADMIN_PASSWORD: &str = "admin";

fn app() -> Router {
    let mut config = AppConfig::default();
    config.auth.admins = vec![AdminUser {
        id: "local_admin_1".to_string(),
        email: ADMIN_EMAIL.to_string(),
        password: Some(ADMIN_PASSWORD.to_string()),
        password_hash: None,
    }];
    let state = AppState::new(config, Arc::new(MemoryStore::new())).expect("Failed to build state");
    api::router(state)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(format!("/api/v1{}", uri));
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("No token in response").to_string()
}

fn book(title: &str) -> Value {
    json!({"title": title, "shelf": 4, "row": 2, "quantity": 3})
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_login() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["id"], "local_admin_1");
    assert_eq!(body["user"]["is_admin"], true);

    let token = body["token"].as_str().unwrap();
    let (status, me) = send(&app, Method::GET, "/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/books", None, Some(book("Rayuela"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/loans", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/reports/inventory", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Public reads stay open
    let (status, body) = send(&app, Method::GET, "/books", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();
    let token = login(&app).await;

    let (status, created) = send(&app, Method::POST, "/books", Some(&token), Some(book("El Aleph"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["version"], 1);

    let (_, listed) = send(&app, Method::GET, "/books", None, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let mut changes = book("El Aleph (Emecé)");
    changes["expected_version"] = json!(1);
    let (status, updated) = send(&app, Method::PUT, &format!("/books/{}", id), Some(&token), Some(changes)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["version"], 2);

    let mut stale = book("Lost update");
    stale["expected_version"] = json!(1);
    let (status, body) = send(&app, Method::PUT, &format!("/books/{}", id), Some(&token), Some(stale)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7);

    let (_, listed) = send(&app, Method::GET, "/books", None, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["title"], "El Aleph (Emecé)");

    let (status, _) = send(&app, Method::DELETE, &format!("/books/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, Method::GET, "/books", None, None).await;
    assert_eq!(listed, json!([]));
    let (status, _) = send(&app, Method::GET, &format!("/books/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_title_filter() {
    let app = app();
    let token = login(&app).await;
    for title in ["Ficciones", "El túnel", "FICCIONES completas"] {
        send(&app, Method::POST, "/books", Some(&token), Some(book(title))).await;
    }

    let (status, found) = send(&app, Method::GET, "/books?search=ficc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Ficciones", "FICCIONES completas"]);
}

#[tokio::test]
async fn test_book_validation() {
    let app = app();
    let token = login(&app).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(&token),
        Some(json!({"title": "Rayuela", "shelf": 0, "row": 7, "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_loan_validation_and_return() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/loans",
        Some(&token),
        Some(json!({"first_name": "", "last_name": "Paz", "borrower_type": "student"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("first_name"));

    let (_, loans) = send(&app, Method::GET, "/loans", Some(&token), None).await;
    assert_eq!(loans, json!([]));

    let (status, loan) = send(
        &app,
        Method::POST,
        "/loans",
        Some(&token),
        Some(json!({
            "first_name": "Ana",
            "last_name": "Paz",
            "borrower_type": "student",
            "course": "4 B",
            "shift": "afternoon",
            "inventory_number": "311",
            "book_title": "Martín Fierro"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(loan["borrower"]["kind"], "student");
    assert_eq!(loan["status"], "loaned");
    let id = loan["id"].as_str().unwrap().to_string();

    let (status, entry) = send(&app, Method::POST, &format!("/loans/{}/return", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["loan_id"], id.as_str());

    let (status, _) = send(&app, Method::POST, &format!("/loans/{}/return", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, loaned) = send(&app, Method::GET, "/loans?status=loaned", Some(&token), None).await;
    assert_eq!(loaned, json!([]));
    let (_, returns) = send(&app, Method::GET, "/returns", Some(&token), None).await;
    assert_eq!(returns.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_public_reservation_flow() {
    let app = app();
    let token = login(&app).await;
    let (_, created) = send(&app, Method::POST, "/books", Some(&token), Some(book("Platero y yo"))).await;
    let book_id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/reservations",
        None,
        Some(json!({"book_id": book_id, "reserver_name": "Luz", "reserver_email": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, reservation) = send(
        &app,
        Method::POST,
        "/reservations",
        None,
        Some(json!({"book_id": book_id, "reserver_name": "Luz", "reserver_email": "luz@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["book_title"], "Platero y yo");

    let (status, _) = send(&app, Method::GET, "/reservations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let id = reservation["id"].as_str().unwrap();
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/reservations/{}/status", id),
        Some(&token),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (_, pending) = send(&app, Method::GET, "/reservations?status=pending", Some(&token), None).await;
    assert_eq!(pending, json!([]));
    let (_, all) = send(&app, Method::GET, "/reservations", Some(&token), None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_visits_and_usage_report() {
    let app = app();
    let token = login(&app).await;

    let (status, anonymous) = send(&app, Method::POST, "/visits", None, Some(json!({"path": "/"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let visitor_id = anonymous["visitor_id"].as_str().unwrap().to_string();
    assert!(visitor_id.starts_with("anon_"));

    let (_, again) = send(
        &app,
        Method::POST,
        "/visits",
        None,
        Some(json!({"path": "/books", "visitor_id": visitor_id})),
    )
    .await;
    assert_eq!(again["visitor_id"], visitor_id.as_str());

    let (_, admin) = send(&app, Method::POST, "/visits", Some(&token), Some(json!({"path": "/loans"}))).await;
    assert_eq!(admin["visitor_id"], "local_admin_1");

    let (_, count) = send(&app, Method::GET, "/visits/count", Some(&token), None).await;
    assert_eq!(count["total"], 3);

    send(
        &app,
        Method::POST,
        "/usage-events",
        Some(&token),
        Some(json!({
            "name": "Science fair prep",
            "date": "2025-09-01",
            "start_time": "10:00",
            "end_time": "11:30",
            "subject": "Biology",
            "shift": "morning"
        })),
    )
    .await;
    let (status, report) = send(&app, Method::GET, "/reports/usage?period=monthly", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_page_visits"], 3);
    assert_eq!(report["by_period"][0]["label"], "2025-09");
    assert_eq!(report["by_subject"][0], json!({"label": "Biology", "count": 1}));
}

#[tokio::test]
async fn test_inventory_grouping() {
    let app = app();
    let token = login(&app).await;
    for (name, category) in [("Globe", "maps"), ("Netbook A", "netbooks"), ("Atlas map", "maps")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/inventory",
            Some(&token),
            Some(json!({"name": name, "category": category, "quantity": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, groups) = send(&app, Method::GET, "/inventory", Some(&token), None).await;
    assert_eq!(groups[0]["category"], "maps");
    assert_eq!(groups[0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(groups[1]["label"], "Netbooks");
}

#[tokio::test]
async fn test_book_stream_sends_snapshot() {
    let app = app();
    let token = login(&app).await;
    send(&app, Method::POST, "/books", Some(&token), Some(book("Don Segundo Sombra"))).await;

    let request = Request::builder()
        .uri("/api/v1/books/stream")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut frames = response.into_body().into_data_stream();
    let first = frames.next().await.unwrap().unwrap();
    let text = String::from_utf8_lossy(&first);
    assert!(text.contains("event: snapshot"));
    assert!(text.contains("Don Segundo Sombra"));
}

// ---------------------------------------------------------------------------
// Gutendex client against a mock server
// ---------------------------------------------------------------------------

async fn mock_gutendex() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let next = format!("{}/books/?page=2", base);

    let app = Router::new().route(
        "/books/",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let next = next.clone();
            async move {
                if params.get("page").map(String::as_str) == Some("2") {
                    return Json(json!({
                        "count": 3,
                        "next": null,
                        "results": [
                            {"id": 2, "title": "Duplicate", "authors": [], "languages": ["es"], "formats": {}},
                            {"id": 3, "title": "Only HTML", "authors": [], "languages": ["es"],
                             "formats": {"text/html": "http://h/3"}}
                        ]
                    }));
                }
                Json(json!({
                    "count": 3,
                    "next": next,
                    "results": [
                        {
                            "id": 1,
                            "title": "Don Quijote",
                            "authors": [{"name": "Cervantes Saavedra, Miguel de", "birth_year": 1547, "death_year": 1616}],
                            "languages": ["es"],
                            "formats": {
                                "text/html": "http://h/1",
                                "text/plain; charset=utf-8": "http://t/1",
                                "application/epub+zip": "http://e/1",
                                "application/pdf": "http://p/1",
                                "image/jpeg": "http://c/1"
                            },
                            "download_count": 900
                        },
                        {
                            "id": 2,
                            "title": "Poemas",
                            "authors": [],
                            "languages": ["es"],
                            "formats": {
                                "text/html": "http://h/2",
                                "text/plain; charset=us-ascii": "http://t/2"
                            }
                        }
                    ]
                }))
            }
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

#[tokio::test]
async fn test_gutendex_format_selection() {
    let base_url = mock_gutendex().await;
    let client = GutendexClient::new(SearchConfig {
        base_url,
        default_language: "es".to_string(),
        timeout_seconds: 5,
        max_pages: 2,
    })
    .unwrap();

    let results = client.search(&BookSearchQuery::default()).await.unwrap();
    assert_eq!(results.count, 3);
    let ids: Vec<_> = results.books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let quijote = &results.books[0];
    assert_eq!(quijote.author, "Cervantes Saavedra, Miguel de");
    assert_eq!(quijote.cover_url, "http://c/1");
    let download = quijote.download.as_ref().unwrap();
    assert_eq!((download.label.as_str(), download.url.as_str()), ("PDF", "http://p/1"));

    let poems = &results.books[1];
    assert_eq!(poems.title, "Poemas");
    assert_eq!(poems.author, "Unknown author");
    assert_eq!(poems.download.as_ref().unwrap().url, "http://t/2");

    let html_only = results.books[2].download.as_ref().unwrap();
    assert_eq!(html_only.kind, DownloadKind::View);
}

#[tokio::test]
async fn test_gutendex_unreachable_is_upstream_error() {
    let client = GutendexClient::new(SearchConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        default_language: "es".to_string(),
        timeout_seconds: 2,
        max_pages: 1,
    })
    .unwrap();

    let err = client.search(&BookSearchQuery::default()).await.unwrap_err();
    assert!(matches!(err, biblioteca_server::AppError::Upstream(_)));
}
