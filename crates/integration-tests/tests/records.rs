//! Items, customers, settings, users, dashboard and the activity log.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use ledgerdesk_integration_tests::TestApp;

#[tokio::test]
async fn test_item_crud() {
    let mut app = TestApp::logged_in().await;

    let (_, first) = app
        .post("/api/items", &json!({ "name": "Bolt", "price": 0.5, "stock": 100 }))
        .await;
    let (_, second) = app
        .post(
            "/api/items",
            &json!({ "name": "Widget", "desc": "Blue", "unit": "pcs", "price": 5, "stock": 20 }),
        )
        .await;
    let widget = second["id"].as_i64().unwrap();
    assert!(widget > first["id"].as_i64().unwrap());

    // Newest first
    let (_, items) = app.get("/api/items").await;
    assert_eq!(items[0]["name"], json!("Widget"));
    assert_eq!(items[0]["description"], json!("Blue"));
    assert_eq!(items[1]["name"], json!("Bolt"));

    let (_, updated) = app
        .post(
            "/api/items/update",
            &json!({ "id": widget, "name": "Widget XL", "desc": "Red", "unit": "box", "price": 7.5, "stock": 3 }),
        )
        .await;
    assert_eq!(updated, json!(true));

    let (_, items) = app.get("/api/items").await;
    assert_eq!(items[0]["name"], json!("Widget XL"));
    assert_eq!(items[0]["unit"], json!("box"));
    assert_eq!(items[0]["price"], json!(7.5));
    assert_eq!(items[0]["stock"], json!(3));

    let (_, deleted) = app.post("/api/items/delete", &json!({ "id": widget })).await;
    assert_eq!(deleted, json!(true));

    let (_, items) = app.get("/api/items").await;
    assert_eq!(items.as_array().unwrap().len(), 1);

    let (_, logs) = app.get("/api/logs").await;
    assert_eq!(logs[0]["action"], json!("Delete Item"));
    assert_eq!(logs[0]["details"], json!(format!("ID: {widget}")));
    assert_eq!(logs[0]["username"], json!("admin"));
}

#[tokio::test]
async fn test_customer_create_list_delete() {
    let mut app = TestApp::logged_in().await;

    let (status, created) = app
        .post(
            "/api/customers",
            &json!({ "name": "Acme", "phone": "1", "email": "a@acme.test", "address": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap();

    let (_, customers) = app.get("/api/customers").await;
    assert_eq!(customers[0]["name"], json!("Acme"));
    assert_eq!(customers[0]["email"], json!("a@acme.test"));

    let (_, deleted) = app.post("/api/customers/delete", &json!({ "id": id })).await;
    assert_eq!(deleted, json!(true));

    let (_, customers) = app.get("/api/customers").await;
    assert_eq!(customers, json!([]));

    // Customer deletion is not audited
    let (_, logs) = app.get("/api/logs").await;
    assert_eq!(logs, json!([]));
}

#[tokio::test]
async fn test_settings_start_empty_then_replace() {
    let mut app = TestApp::logged_in().await;

    let (status, empty) = app.get("/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!({}));

    let (_, saved) = app
        .post(
            "/api/settings",
            &json!({ "name": "Acme Ltd", "address": "1 Main St", "prevent_negative": 1 }),
        )
        .await;
    assert_eq!(saved, json!(true));

    let (_, saved) = app
        .post("/api/settings", &json!({ "name": "Acme Holdings", "phone": "555" }))
        .await;
    assert_eq!(saved, json!(true));

    let (_, settings) = app.get("/api/settings").await;
    assert_eq!(settings["name"], json!("Acme Holdings"));
    assert_eq!(settings["phone"], json!("555"));
    // A replace, not a merge
    assert_eq!(settings["address"], Value::Null);
    assert_eq!(settings["prevent_negative"], json!(false));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company_settings")
        .fetch_one(&app.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_user_management() {
    let mut app = TestApp::logged_in().await;

    let (_, created) = app
        .post(
            "/api/users",
            &json!({
                "username": "clerk",
                "password": "pw1",
                "role": "operator",
                "permissions": ["invoices"],
            }),
        )
        .await;
    assert_eq!(created, json!(true));

    let (status, duplicate) = app
        .post("/api/users", &json!({ "username": "clerk", "password": "other" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(duplicate, json!(false));

    let (_, users) = app.get("/api/users").await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], json!("admin"));
    assert_eq!(users[1]["username"], json!("clerk"));
    assert_eq!(users[1]["role"], json!("operator"));
    assert_eq!(users[1]["permissions"], json!(["invoices"]));
    for user in users {
        assert!(user.get("password").is_none());
    }

    let clerk = users[1]["id"].as_i64().unwrap();
    let (_, deleted) = app.post("/api/users/delete", &json!({ "id": clerk })).await;
    assert_eq!(deleted, json!(true));

    let (_, logs) = app.get("/api/logs").await;
    assert_eq!(logs[0]["action"], json!("Delete User"));
    assert_eq!(logs[0]["details"], json!(format!("ID: {clerk}")));
}

#[tokio::test]
async fn test_created_user_can_log_in() {
    let mut app = TestApp::logged_in().await;
    app.post(
        "/api/users",
        &json!({ "username": "clerk", "password": "pw1", "role": "operator" }),
    )
    .await;

    app.post("/api/logout", &json!({})).await;
    let (_, login) = app.login("clerk", "pw1").await;
    assert_eq!(login["success"], json!(true));
    assert_eq!(login["role"], json!("operator"));
    assert_eq!(login["permissions"], json!([]));

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = 'clerk'")
        .fetch_one(&app.pool())
        .await
        .unwrap();
    assert!(stored.starts_with("$argon2"));
}

#[tokio::test]
async fn test_dashboard_zero_state() {
    let mut app = TestApp::logged_in().await;

    let (status, summary) = app.get("/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summary,
        json!({
            "customers": 0,
            "items": 0,
            "invoices": 0,
            "sales": 0.0,
            "lowStock": 0,
            "chartData": [],
        })
    );
}

#[tokio::test]
async fn test_dashboard_counts_and_monthly_sales() {
    let mut app = TestApp::logged_in().await;

    app.post("/api/customers", &json!({ "name": "Acme" })).await;
    app.post("/api/items", &json!({ "name": "Low", "price": 1, "stock": 10 }))
        .await;
    app.post("/api/items", &json!({ "name": "Plenty", "price": 1, "stock": 11 }))
        .await;
    for (number, date, total) in [
        ("INV-1", "2024-01-10", 100.0),
        ("INV-2", "2024-01-20", 50.0),
        ("INV-3", "2024-02-05", 25.0),
    ] {
        let (_, created) = app
            .post(
                "/api/invoices",
                &json!({ "invoice_no": number, "date": date, "grand_total": total }),
            )
            .await;
        assert_eq!(created, json!(true));
    }

    let (_, summary) = app.get("/api/dashboard").await;
    assert_eq!(summary["customers"], json!(1));
    assert_eq!(summary["items"], json!(2));
    assert_eq!(summary["invoices"], json!(3));
    assert_eq!(summary["sales"], json!(175.0));
    assert_eq!(summary["lowStock"], json!(1));
    assert_eq!(
        summary["chartData"],
        json!([
            { "month": "02-2024", "total": 25.0 },
            { "month": "01-2024", "total": 150.0 },
        ])
    );
}

#[tokio::test]
async fn test_logs_are_capped_and_newest_first() {
    let mut app = TestApp::logged_in().await;
    let pool = app.pool();
    for n in 0..105 {
        sqlx::query("INSERT INTO logs (username, action, details) VALUES ('admin', 'Test', ?)")
            .bind(format!("#{n}"))
            .execute(&pool)
            .await
            .unwrap();
    }

    let (_, logs) = app.get("/api/logs").await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 100);
    assert_eq!(logs[0]["details"], json!("#104"));
    assert!(logs[0]["timestamp"].is_string());
}

#[tokio::test]
async fn test_legacy_role_row_does_not_break_users_or_login() {
    let mut app = TestApp::logged_in().await;
    sqlx::query("INSERT INTO users (username, password, role) VALUES ('old', 'x', 'manager')")
        .execute(&app.pool())
        .await
        .unwrap();

    let (status, users) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users[1]["username"], json!("old"));
    assert_eq!(users[1]["role"], json!("operator"));

    app.post("/api/logout", &json!({})).await;
    let (status, login) = app.login("old", "x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["success"], json!(true));
    assert_eq!(login["role"], json!("operator"));
}
