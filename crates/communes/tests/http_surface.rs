//! End-to-end coverage of the HTTP surface, driven through the
//! router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use communes::catalog::{catalog_router, Catalog, InMemoryCatalog};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(InMemoryCatalog::new());
    catalog_router(Arc::new(Catalog::new(store.clone(), store)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed_herault(app: &Router) -> i64 {
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/departments",
            json!({ "code": "34", "name": "Hérault" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn city_lifecycle_over_http() {
    let app = app();
    seed_herault(&app).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/cities",
            json!({ "name": "Montpellier", "population": 295_542, "departmentCode": "34" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["departmentCode"], "34");

    let response = app.clone().oneshot(get(&format!("/cities/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Montpellier");

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/cities/{id}"),
            json!({ "name": "Montpellier", "population": 300_000, "departmentCode": "34" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["population"], 300_000);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/cities/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"],
        format!("city {id} deleted")
    );

    let response = app.clone().oneshot(get(&format!("/cities/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failures_carry_the_standard_error_body() {
    let app = app();

    let response = app.clone().oneshot(get("/cities/404")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["path"], "/cities/404");
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
    assert!(body["message"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn invalid_payload_reports_every_violation_at_once() {
    let app = app();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/cities",
            json!({ "name": "M", "population": -1, "departmentCode": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = json_body(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("; "));
    assert!(message.contains("at least 2 characters"));
    assert!(message.contains("negative"));
}

#[tokio::test]
async fn duplicate_city_name_is_a_bad_request() {
    let app = app();
    seed_herault(&app).await;
    let payload = json!({ "name": "Sète", "population": 44_270, "departmentCode": "34" });

    let response = app
        .clone()
        .oneshot(send_json("POST", "/cities", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/cities", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn top_and_range_queries_use_camel_case_parameters() {
    let app = app();
    seed_herault(&app).await;
    for (name, population) in [("Montpellier", 295_542), ("Béziers", 80_341)] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/cities",
                json!({ "name": name, "population": population, "departmentCode": "34" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get("/cities/top?departmentCode=34&n=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let top = json_body(response).await;
    assert_eq!(top.as_array().unwrap().len(), 1);
    assert_eq!(top[0]["name"], "Montpellier");

    let response = app
        .clone()
        .oneshot(get("/cities/by-population?departmentCode=34&min=0&max=100000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let in_range = json_body(response).await;
    assert_eq!(in_range.as_array().unwrap().len(), 1);
    assert_eq!(in_range[0]["name"], "Béziers");

    let response = app
        .clone()
        .oneshot(get("/cities/by-population?departmentCode=34&min=10&max=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get("/cities/population-min?minPopulation=100000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let big = json_body(response).await;
    assert_eq!(big.as_array().unwrap().len(), 1);
    assert_eq!(big[0]["name"], "Montpellier");
}

#[tokio::test]
async fn department_population_is_derived_in_responses() {
    let app = app();
    let id = seed_herault(&app).await;
    for (name, population) in [("Montpellier", 295_542), ("Sète", 44_270)] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/cities",
                json!({ "name": name, "population": population, "departmentCode": "34" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/departments/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["population"], 339_812);

    let response = app
        .clone()
        .oneshot(get("/departments/code/34"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["code"], "34");
}

#[tokio::test]
async fn department_delete_conflicts_while_cities_remain() {
    let app = app();
    let id = seed_herault(&app).await;
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/cities",
            json!({ "name": "Sète", "population": 44_270, "departmentCode": "34" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/departments/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["status"], 409);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn csv_export_sets_download_headers() {
    let app = app();
    seed_herault(&app).await;
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/cities",
            json!({ "name": "Montpellier", "population": 295_542, "departmentCode": "34" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get("/cities/export/csv?minPopulation=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"cities_population_min_0.csv\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("Name,Population,DepartmentCode,DepartmentName"));
    assert!(text.contains("Montpellier,295542,34,Hérault"));
}

#[tokio::test]
async fn pdf_export_sets_download_headers() {
    let app = app();
    seed_herault(&app).await;

    let response = app
        .clone()
        .oneshot(get("/departments/34/export/pdf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"departement_34.pdf\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn prefix_and_name_lookups_are_routed() {
    let app = app();
    seed_herault(&app).await;
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/cities",
            json!({ "name": "Montpellier", "population": 295_542, "departmentCode": "34" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get("/cities/name/montpellier"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Montpellier");

    let response = app
        .clone()
        .oneshot(get("/cities/starts-with/mont"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let matches = json_body(response).await;
    assert_eq!(matches.as_array().unwrap().len(), 1);
}
