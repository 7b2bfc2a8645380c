//! HTTP round trips through the router with the in-memory store

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Method, Request, StatusCode};
use pulse_cloud::db::MemoryReportStore;
use pulse_cloud::{AppState, Config, api};
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "pulse-test-boundary";

const ORDERS_CSV: &str = "\
Mã đơn hàng,Trạng Thái Đơn Hàng,SKU phân loại hàng,Tên sản phẩm,Số lượng,Giá gốc,Giá ưu đãi,Phí cố định,Ngày hoàn thành thanh toán,Tên kho hàng
A1,Hoàn thành,SKU-1,Áo thun,2,100000,90000,5000,2024-05-10 09:00,HN
A2,Hoàn thành,SKU-2,Quần jean,1,200000,200000,8000,2024-05-12 10:00,HCM
,,,,,,,,,
";

fn app_with(config: Config) -> Router {
    api::create_router(AppState::with_store(config, Arc::new(MemoryReportStore::new())))
}

fn app() -> Router {
    app_with(Config::default())
}

fn multipart_body(filename: &str, content: &str) -> String {
    let mut body = String::new();
    for (name, value) in [("name", "May 2024"), ("platform", "Shopee"), ("shop", "shop-1")] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    ));
    body
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn upload(app: &Router, filename: &str, content: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reports")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(filename, content)))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn health_check() {
    let (status, body) = get(&app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "pulse-cloud");
}

#[tokio::test]
async fn upload_then_query_metrics() {
    let app = app();

    let (status, body) = upload(&app, "orders.csv", ORDERS_CSV).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["code"], 0);
    let report = &body["data"]["report"];
    assert_eq!(report["name"], "May 2024");
    assert_eq!(report["platform"], "shopee");
    assert_eq!(report["shopId"], "shop-1");
    assert_eq!(report["orderCount"], 2);
    assert_eq!(report["isActive"], true);
    assert_eq!(body["data"]["skippedRows"], 0);

    let (status, body) = get(&app, "/api/reports").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/metrics").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["totalGmv"], 400000.0);
    assert_eq!(body["data"]["totalOrders"], 2);
    assert_eq!(body["data"]["totalPlatformFees"], 13000.0);

    let (_, body) = get(&app, "/api/metrics?warehouse=HN").await;
    assert_eq!(body["data"]["totalGmv"], 200000.0);

    let (_, body) = get(&app, "/api/metrics?startDate=2024-05-11&endDate=2024-05-31").await;
    assert_eq!(body["data"]["totalGmv"], 200000.0);
    assert_eq!(body["data"]["totalOrders"], 1);

    let (_, body) = get(&app, "/api/metrics?platform=tiktok").await;
    assert_eq!(body["data"]["totalGmv"], 0.0);

    let (_, body) = get(&app, "/api/metrics?adExpense=40000").await;
    assert_eq!(body["data"]["adCostRate"], 10.0);
}

#[tokio::test]
async fn economics_and_comparison() {
    let app = app();
    upload(&app, "orders.csv", ORDERS_CSV).await;

    let (status, body) = get(&app, "/api/metrics/economics").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["skuEconomics"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["orderEconomics"].as_array().unwrap().len(), 2);

    let (status, body) =
        get(&app, "/api/metrics/comparison?startDate=2024-05-08&endDate=2024-05-14").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["previousStart"], "2024-05-01");
    assert_eq!(body["data"]["previousEnd"], "2024-05-07");
    assert_eq!(body["data"]["current"]["totalGmv"], 400000.0);
    assert_eq!(body["data"]["deltas"]["gmv"]["kind"], "noComparison");

    let (status, body) = get(&app, "/api/metrics/comparison?timeRange=all").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);
}

#[tokio::test]
async fn deactivate_and_delete_reports() {
    let app = app();
    let (_, body) = upload(&app, "orders.csv", ORDERS_CSV).await;
    let id = body["data"]["report"]["id"].as_i64().unwrap();

    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/api/reports/{id}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "isActive": false }).to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], false);

    let (_, body) = get(&app, "/api/metrics").await;
    assert_eq!(body["data"]["totalGmv"], 0.0);

    let delete = |id: i64| {
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/reports/{id}"))
            .body(Body::empty())
            .unwrap()
    };
    let (status, _) = send(&app, delete(id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, delete(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn rejected_uploads() {
    let app = app();

    let (status, body) = upload(&app, "orders.pdf", ORDERS_CSV).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["code"], 4003);

    let (status, body) = upload(&app, "orders.csv", "foo,bar\n1,2\n").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4005);

    let (_, body) = get(&app, "/api/reports").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = app_with(Config {
        max_upload_bytes: 128,
        ..Config::default()
    });
    let (status, body) = upload(&app, "orders.csv", ORDERS_CSV).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 4006);
}

#[tokio::test]
async fn bad_query_parameters() {
    let app = app();
    let (status, body) = get(&app, "/api/metrics?startDate=not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5001);

    let (status, _) = get(&app, "/api/metrics?timeRange=fortnight").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
