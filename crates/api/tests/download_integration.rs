//! File delivery against PostgreSQL: PDF watermarking and the download gates.
//!
//! Run with: TEST_DATABASE_URL=... cargo test --test download_integration -- --ignored --test-threads=1

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    admin_json_request, body_bytes, create_test_pool, db_config, db_config_with, get_request,
    json_request, parse_response_body, sample_pdf, serve_file, test_app_with, TestApp,
};
use lopdf::Document;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

const CUSTOMER: &str = "lifter@example.com";

struct Purchase {
    order_id: String,
    product_id: String,
    reference: String,
}

async fn buy_plan(app: &TestApp, file_name: &str, content_type: &'static str, body: Vec<u8>) -> Purchase {
    let file_url = serve_file(file_name, content_type, body).await;

    let response = app
        .app()
        .oneshot(admin_json_request(
            Method::POST,
            "/api/v1/admin/products",
            json!({
                "name": "Strength Plan",
                "price": 80.0,
                "duration_label": "4 weeks",
                "file_url": file_url
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product = parse_response_body(response).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let response = app
        .app()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/pay",
            json!({
                "email": CUSTOMER,
                "amount": 80.0,
                "currency": "GHS",
                "items": [{ "id": product_id }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let payment: Value = parse_response_body(response).await;

    Purchase {
        order_id: payment["order_id"].as_str().unwrap().to_string(),
        product_id,
        reference: payment["reference_id"].as_str().unwrap().to_string(),
    }
}

async fn verify(app: &TestApp, reference: &str) {
    let response = app
        .app()
        .oneshot(get_request(&format!("/api/v1/pay/verify?reference={}", reference)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

fn download_path(purchase: &Purchase) -> String {
    format!("/api/v1/download/{}/{}", purchase.order_id, purchase.product_id)
}

async fn setup(config: storefront_api::config::Config) -> (PgPool, TestApp) {
    let pool = create_test_pool().await;
    let app = test_app_with(config, pool.clone());
    (pool, app)
}

#[tokio::test]
#[ignore]
async fn test_pdf_download_is_watermarked_on_every_page() {
    let (_pool, app) = setup(db_config()).await;
    let purchase = buy_plan(&app, "plan.pdf", "application/pdf", sample_pdf(3)).await;
    verify(&app, &purchase.reference).await;

    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Strength Plan.pdf\""
    );

    let bytes = body_bytes(response).await;
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 3);

    let licence = format!("Licensed to {} - Order #{}", CUSTOMER, &purchase.order_id[..8]);
    for page_id in pages.values() {
        let content = doc.get_page_content(*page_id).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains(&licence), "page {:?} missing licence line", page_id);
        assert!(content.contains("Week "));
    }
}

#[tokio::test]
#[ignore]
async fn test_broken_pdf_is_served_unchanged() {
    let (_pool, app) = setup(db_config()).await;
    let broken = b"%PDF-1.4 truncated".to_vec();
    let purchase = buy_plan(&app, "broken.pdf", "application/pdf", broken.clone()).await;
    verify(&app, &purchase.reference).await;

    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(body_bytes(response).await, broken);
}

#[tokio::test]
#[ignore]
async fn test_unpaid_order_is_hidden_when_payment_required() {
    let (_pool, app) = setup(db_config_with(&[("downloads.require_paid_order", "true")])).await;
    let purchase = buy_plan(&app, "plan.txt", "text/plain", b"Week 1".to_vec()).await;

    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Purchase not found");

    verify(&app, &purchase.reference).await;
    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_unpaid_order_downloads_by_default() {
    let (_pool, app) = setup(db_config()).await;
    let purchase = buy_plan(&app, "plan.txt", "text/plain", b"Week 1".to_vec()).await;

    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"Week 1".to_vec());
}

#[tokio::test]
#[ignore]
async fn test_expired_window_is_forbidden_when_enforced() {
    let (pool, app) =
        setup(db_config_with(&[("downloads.enforce_entitlement_window", "true")])).await;
    let purchase = buy_plan(&app, "plan.txt", "text/plain", b"Week 1".to_vec()).await;
    verify(&app, &purchase.reference).await;

    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    sqlx::query(
        "UPDATE product_durations \
         SET start_date = CURRENT_DATE - 60, end_date = CURRENT_DATE - 30 \
         WHERE order_id = $1::uuid",
    )
    .bind(&purchase.order_id)
    .execute(&pool)
    .await
    .unwrap();

    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Your access to this file has expired");
}

#[tokio::test]
#[ignore]
async fn test_expired_window_still_downloads_by_default() {
    let (pool, app) = setup(db_config()).await;
    let purchase = buy_plan(&app, "plan.txt", "text/plain", b"Week 1".to_vec()).await;
    verify(&app, &purchase.reference).await;

    sqlx::query(
        "UPDATE product_durations \
         SET start_date = CURRENT_DATE - 60, end_date = CURRENT_DATE - 30 \
         WHERE order_id = $1::uuid",
    )
    .bind(&purchase.order_id)
    .execute(&pool)
    .await
    .unwrap();

    let response = app.app().oneshot(get_request(&download_path(&purchase))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
