//! Store download, restore upload and the invoice CSV.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use serde_json::json;

use ledgerdesk_integration_tests::TestApp;

#[tokio::test]
async fn test_backup_download_is_the_store_file() {
    let mut app = TestApp::logged_in().await;

    let raw = app.get_raw("/api/backup").await;

    assert_eq!(raw.status, StatusCode::OK);
    assert_eq!(
        raw.headers[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(
        raw.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"invoice_backup.db\""
    );
    assert!(raw.body.starts_with(b"SQLite format 3\0"));
}

#[tokio::test]
async fn test_restore_round_trip() {
    let mut app = TestApp::logged_in().await;
    app.post("/api/customers", &json!({ "name": "Acme" })).await;

    let backup = app.get_raw("/api/backup").await.body;

    app.post("/api/customers", &json!({ "name": "Globex" })).await;
    let (_, customers) = app.get("/api/customers").await;
    assert_eq!(customers.as_array().unwrap().len(), 2);

    let (status, restored) = app.post_file("/api/restore", "dbfile", &backup).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored, json!(true));

    // Sessions live outside the store, so the login survives the swap
    let (status, customers) = app.get("/api/customers").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = customers
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Acme")]);

    // The staged upload is cleaned up
    let staged = std::fs::read_dir(app.dir.path().join("uploads"))
        .unwrap()
        .count();
    assert_eq!(staged, 0);
}

#[tokio::test]
async fn test_restore_without_file_part_is_false() {
    let mut app = TestApp::logged_in().await;

    let (status, restored) = app.post_file("/api/restore", "other", b"whatever").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored, json!(false));
}

#[tokio::test]
async fn test_restore_rejects_garbage_and_keeps_data() {
    let mut app = TestApp::logged_in().await;
    app.post("/api/customers", &json!({ "name": "Acme" })).await;

    let (status, restored) = app
        .post_file("/api/restore", "dbfile", b"definitely not sqlite")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored, json!(false));

    let (_, customers) = app.get("/api/customers").await;
    assert_eq!(customers[0]["name"], json!("Acme"));
}

#[tokio::test]
async fn test_restore_requires_a_session() {
    let mut app = TestApp::new().await;
    let (status, _) = app.post_file("/api/restore", "dbfile", b"x").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_export_csv() {
    let mut app = TestApp::logged_in().await;

    let (_, acme) = app
        .post("/api/customers", &json!({ "name": "Acme, Inc." }))
        .await;
    app.post(
        "/api/invoices",
        &json!({
            "invoice_no": "INV-1",
            "customer_id": acme["id"],
            "date": "2024-03-15",
            "subtotal": 20,
            "grand_total": 22,
        }),
    )
    .await;

    let raw = app.get_raw("/api/export").await;

    assert_eq!(raw.status, StatusCode::OK);
    assert_eq!(raw.headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
        raw.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"invoices.csv\""
    );

    let csv = String::from_utf8(raw.body).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("InvoiceNo,Date,Customer,Subtotal,GrandTotal"));
    assert_eq!(
        lines.next(),
        Some(r#""INV-1","2024-03-15","Acme, Inc.","20","22""#)
    );
    assert_eq!(lines.next(), None);
}
