mod common;

use axum::http::StatusCode;
use serde_json::json;
use service::records::domain::Sender;

use common::*;

async fn with_customers(n: usize) -> (TestApp, String) {
    let app = app().await;
    for i in 0..n {
        let (name, email) = (format!("Customer {i:02}"), format!("c{i:02}@example.com"));
        app.records.add_customer(&name, &email, "555-0100").unwrap();
    }
    let token = login_token(&app).await;
    (app, token)
}

#[tokio::test]
async fn page_past_the_end_serves_last_page() {
    let (app, token) = with_customers(25).await;
    let (status, body) = fetch(&app, "/api/admin/customers?page=10", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 3);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["message"], "Customers fetched successfully");
    let customers = body["customers"].as_array().unwrap();
    assert_eq!(customers.len(), 5);
    assert_eq!(customers[0]["name"], "Customer 20");
    assert!(customers[0].get("registrationDate").is_some());
}

#[tokio::test]
async fn unparsable_page_means_first_page() {
    let (app, token) = with_customers(12).await;
    for q in ["page=abc", "page=0", "page=-2", ""] {
        let (status, body) = fetch(&app, &format!("/api/admin/customers?{q}"), &token).await;
        assert_eq!(status, StatusCode::OK, "query {q:?}");
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["customers"].as_array().unwrap().len(), 10);
    }
}

#[tokio::test]
async fn customer_filters_are_substring_and_case_insensitive() {
    let (app, token) = with_customers(25).await;
    let (_, body) = fetch(&app, "/api/admin/customers?name=CUSTOMER%202&email=", &token).await;
    assert_eq!(body["customers"].as_array().unwrap().len(), 5);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn empty_customer_listing_is_200_with_page_zero() {
    let (app, token) = with_customers(3).await;
    let (status, body) = fetch(&app, "/api/admin/customers?email=nobody", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "customers": [], "currentPage": 0, "totalPages": 0, "message": "No more records" })
    );
}

#[tokio::test]
async fn service_provider_listing_and_empty_404() {
    let app = app().await;
    let records = &app.records;
    records
        .add_service_provider("Sparky", "sparky@example.com", "1", "Electrical", vec![])
        .unwrap();
    records.add_service_provider("Drip", "drip@example.com", "2", "Plumbing", vec![]).unwrap();
    let token = login_token(&app).await;

    let uri = "/api/admin/service-providers?serviceType=plumb";
    let (status, body) = fetch(&app, uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["serviceProviders"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["serviceType"], "Plumbing");
    assert!(items[0].get("reviews").is_none());

    let (status, body) = fetch(&app, "/api/admin/service-providers?name=zzz", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["serviceProviders"], json!([]));
    assert_eq!(body["message"], "No more records");
}

#[tokio::test]
async fn chats_filter_on_joined_customer_email() {
    let app = app().await;
    let alice = app.records.add_customer("Alice", "alice@example.com", "1").unwrap();
    let bob = app.records.add_customer("Bob", "bob@example.org", "2").unwrap();
    let sp = app
        .records
        .add_service_provider("Sparky", "sparky@example.com", "3", "Electrical", vec![])
        .unwrap();
    let messages = [(Sender::Customer, "hello"), (Sender::ServiceProvider, "hi")];
    app.records.add_chat(&alice.id, &sp.id, &messages).unwrap();
    app.records.add_chat(&bob.id, &sp.id, &[(Sender::Customer, "yo")]).unwrap();
    let token = login_token(&app).await;

    let filter = encode(r#"{"customer":{"email":"alice"}}"#);
    let (status, body) = fetch(&app, &format!("/api/admin/chats?filter={filter}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    let chats = body["chats"].as_array().unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0]["customer"]["email"], "alice@example.com");
    assert_eq!(chats[0]["serviceProvider"]["serviceType"], "Electrical");
    assert_eq!(chats[0]["messageCount"], 2);
    assert_eq!(body["message"], "Chats fetched successfully");

    let (_, body) = fetch(&app, "/api/admin/chats", &token).await;
    assert_eq!(body["chats"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_chat_filter_is_400() {
    let app = app().await;
    let token = login_token(&app).await;
    let uri = format!("/api/admin/chats?filter={}", encode("{oops"));
    let (status, body) = fetch(&app, &uri, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid filter");
}

#[tokio::test]
async fn malformed_query_string_is_json_400() {
    let app = app().await;
    let token = login_token(&app).await;
    for uri in [
        "/api/admin/customers?name=a&name=b",
        "/api/admin/service-providers?serviceType=x&serviceType=y",
        "/api/admin/chats?page=1&page=2",
    ] {
        let (status, body) = fetch(&app, uri, &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let message = body["message"].as_str().unwrap_or_default();
        assert!(message.contains("duplicate field"), "{uri}: {body}");
    }
}

#[tokio::test]
async fn details_resolve_or_404_with_id() {
    let app = app().await;
    let c = app.records.add_customer("Cara", "cara@example.com", "1").unwrap();
    let records = &app.records;
    let sp =
        records.add_service_provider("Dan", "dan@example.com", "2", "Gardening", vec![]).unwrap();
    let messages = [(Sender::Customer, "first"), (Sender::ServiceProvider, "second")];
    let chat = records.add_chat(&c.id, &sp.id, &messages).unwrap();
    let token = login_token(&app).await;

    let (status, body) = fetch(&app, &format!("/api/admin/customers/{}", c.id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["email"], "cara@example.com");

    let uri = format!("/api/admin/service-providers/{}", sp.id);
    let (status, body) = fetch(&app, &uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceProvider"]["reviews"], json!([]));

    let (status, body) = fetch(&app, &format!("/api/admin/chats/{chat}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chat"]["customer"]["name"], "Cara");
    assert_eq!(body["chat"]["serviceProvider"]["serviceType"], "Gardening");
    assert_eq!(body["chat"]["messages"][1]["sender"], "serviceProvider");

    for path in ["customers", "service-providers", "chats"] {
        let uri = format!("/api/admin/{path}/64b7f0c2a1b2c3d4e5f60718");
        let (status, body) = fetch(&app, &uri, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert!(body["message"].as_str().unwrap().contains("64b7f0c2a1b2c3d4e5f60718"));
    }
}

#[tokio::test]
async fn stats_count_records() {
    let (app, token) = with_customers(4).await;
    app.records.add_service_provider("P", "p@example.com", "1", "Cleaning", vec![]).unwrap();
    let (status, body) = fetch(&app, "/api/admin/stats", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "totalCustomers": 4, "totalServiceProviders": 1 }));
}

#[tokio::test]
async fn storage_failure_is_generic_500() {
    let (app, token) = with_customers(2).await;
    app.records.set_failure(Some("connection reset by peer"));
    for path in ["/api/admin/customers", "/api/admin/stats", "/api/admin/chats"] {
        let (status, body) = fetch(&app, path, &token).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_eq!(body, json!({ "message": "Server error" }));
    }
}
