use std::io::Write;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use rust_decimal::Decimal;
use salesboard_core::{DataSources, MergedOrder};
use salesboard_ingest::{IngestError, LoadOutcome, LoadReport};
use tower::ServiceExt;

use super::*;

fn order(id: usize, days_overdue: i64) -> MergedOrder {
    MergedOrder {
        order_id: format!("ORD-{id:02}"),
        destination: "Leeds".to_string(),
        items: 2,
        order_value: Decimal::new(1_999, 2),
        days_overdue,
        marketplace: "Amazon".to_string(),
        country: "GBR".to_string(),
        shop_name: "Corner Shop".to_string(),
    }
}

fn state_with(orders: Option<Vec<MergedOrder>>) -> AppState {
    let repository = Arc::new(OrderRepository::new());
    if let Some(orders) = orders {
        repository
            .load_with(|| {
                Ok::<_, IngestError>(LoadOutcome {
                    orders,
                    report: LoadReport::default(),
                })
            })
            .expect("load");
    }
    AppState { repository }
}

/// Twelve orders whose overdue values equal their index.
fn twelve() -> Vec<MergedOrder> {
    (0..12).map(|i| order(i, i as i64)).collect()
}

async fn get(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = build_app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).expect("json parse")
    };
    (status, json)
}

fn order_ids(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|o| o["orderId"].as_str().expect("orderId").to_string())
        .collect()
}

// -------------------------------------------------------------------------
// /sales
// -------------------------------------------------------------------------

#[tokio::test]
async fn sales_before_load_is_server_error() {
    let (status, json) = get(state_with(None), "/sales").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "not_ready");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn sales_second_page_descending() {
    let (status, json) = get(
        state_with(Some(twelve())),
        "/sales?page=2&limit=5&sortDirection=desc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        order_ids(&json),
        vec!["ORD-06", "ORD-05", "ORD-04", "ORD-03", "ORD-02"]
    );
    assert_eq!(json["currentPage"], 2);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["more"], true);
}

#[tokio::test]
async fn sales_rows_have_expected_fields_and_types() {
    let (_, json) = get(state_with(Some(twelve())), "/sales?limit=1").await;
    let row = &json["data"][0];
    assert!(row["marketplace"].is_string());
    assert!(row["orderId"].is_string());
    assert!(row["destination"].is_string());
    assert!(row["items"].is_i64());
    assert!(row["orderValue"].is_f64());
    assert!(row["daysOverdue"].is_i64());
    assert!(row["shopName"].is_string());
    assert!(row["country"].is_string());
}

#[tokio::test]
async fn sales_ascending_is_non_decreasing() {
    let orders = vec![order(0, 4), order(1, -1), order(2, 9), order(3, 0)];
    let (_, json) = get(state_with(Some(orders)), "/sales?limit=10&sortDirection=asc").await;
    let days: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["daysOverdue"].as_i64().unwrap())
        .collect();
    assert_eq!(days, vec![-1, 0, 4, 9]);
}

#[tokio::test]
async fn sales_invalid_sort_direction_matches_desc() {
    let (_, upwards) = get(
        state_with(Some(twelve())),
        "/sales?page=1&limit=10&sortDirection=upwards",
    )
    .await;
    let (_, desc) = get(
        state_with(Some(twelve())),
        "/sales?page=1&limit=10&sortDirection=desc",
    )
    .await;
    assert_eq!(order_ids(&upwards), order_ids(&desc));
}

#[tokio::test]
async fn sales_garbage_pagination_uses_defaults() {
    let (status, json) = get(state_with(Some(twelve())), "/sales?page=zero&limit=-3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
    assert_eq!(json["totalPages"], 3);
}

#[tokio::test]
async fn sales_on_empty_dataset_is_ok_and_empty() {
    let (status, json) = get(state_with(Some(vec![])), "/sales?page=3&limit=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
    assert_eq!(json["totalPages"], 0);
    assert_eq!(json["more"], false);
}

// -------------------------------------------------------------------------
// /health, /user, fallback
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_unloaded_then_ready() {
    let (status, json) = get(state_with(None), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["data"]["dataset"], "unloaded");

    let (status, json) = get(state_with(Some(twelve())), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["dataset"], "ready");
    assert_eq!(json["data"]["orders"], 12);
}

#[tokio::test]
async fn user_returns_demo_profile() {
    let (status, json) = get(state_with(None), "/user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "janedoe@email.com",
            "id": 1
        })
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, json) = get(state_with(None), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn request_id_header_is_echoed() {
    let response = build_app(state_with(None))
        .oneshot(
            Request::builder()
                .uri("/user")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-123"
    );
}

// -------------------------------------------------------------------------
// Background load
// -------------------------------------------------------------------------

#[tokio::test]
async fn background_load_publishes_data() {
    let dir = tempfile::tempdir().unwrap();
    let sources = DataSources {
        orders_path: dir.path().join("orders.csv.gz"),
        stores_path: dir.path().join("stores.csv"),
    };
    std::fs::write(
        &sources.stores_path,
        "storeId,marketplace,country,shopName\n1,Amazon,GBR,Shop\n",
    )
    .unwrap();
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(
            b"storeId,orderId,destination,items,orderValue,latest_ship_date,shipment_status\n\
              1,A,Leeds,1,9.99,01/01/2024,Pending\n",
        )
        .unwrap();
    std::fs::write(&sources.orders_path, encoder.finish().unwrap()).unwrap();

    let state = state_with(None);
    let loaded = crate::loader::spawn_load(Arc::clone(&state.repository), sources)
        .await
        .expect("join");
    assert!(loaded);

    let (status, json) = get(state, "/sales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order_ids(&json), vec!["A"]);
}

#[tokio::test]
async fn background_load_failure_keeps_not_ready() {
    let dir = tempfile::tempdir().unwrap();
    let sources = DataSources {
        orders_path: dir.path().join("missing.csv.gz"),
        stores_path: dir.path().join("missing.csv"),
    };

    let state = state_with(None);
    let loaded = crate::loader::spawn_load(Arc::clone(&state.repository), sources)
        .await
        .expect("join");
    assert!(!loaded);

    let (status, json) = get(state, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["data"]["dataset"], "failed");
}
