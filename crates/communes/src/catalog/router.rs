use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CityDraft, DepartmentDraft};
use super::service::{Catalog, CatalogError};
use super::store::{CityStore, DepartmentStore};

/// Router builder exposing the full catalog HTTP surface.
pub fn catalog_router<S, D>(catalog: Arc<Catalog<S, D>>) -> Router
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    Router::new()
        .route(
            "/cities",
            get(list_cities::<S, D>).post(create_city::<S, D>),
        )
        .route(
            "/cities/top",
            get(top_cities::<S, D>),
        )
        .route(
            "/cities/by-population",
            get(cities_by_population::<S, D>),
        )
        .route(
            "/cities/population-min",
            get(cities_with_min_population::<S, D>),
        )
        .route(
            "/cities/export/csv",
            get(export_cities_csv::<S, D>),
        )
        .route(
            "/cities/starts-with/:prefix",
            get(cities_starting_with::<S, D>),
        )
        .route(
            "/cities/name/:name",
            get(get_city_by_name::<S, D>),
        )
        .route(
            "/cities/:id",
            get(get_city::<S, D>)
                .put(update_city::<S, D>)
                .delete(delete_city::<S, D>),
        )
        .route(
            "/departments",
            get(list_departments::<S, D>).post(create_department::<S, D>),
        )
        .route(
            "/departments/code/:code",
            get(get_department_by_code::<S, D>),
        )
        // Same parameter name as /departments/:id so the route trees merge.
        .route(
            "/departments/:id/export/pdf",
            get(export_department_pdf::<S, D>),
        )
        .route(
            "/departments/:id",
            get(get_department::<S, D>)
                .put(update_department::<S, D>)
                .delete(delete_department::<S, D>),
        )
        .with_state(catalog)
}

/// HTTP status for each error category of the catalog taxonomy.
pub fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::InvalidArgument(_) | CatalogError::DuplicateKey(_) => {
            StatusCode::BAD_REQUEST
        }
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Conflict(_) => StatusCode::CONFLICT,
        CatalogError::Export(_) | CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Standardized error body carried by every failure response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    timestamp: String,
    status: u16,
    error: String,
    message: String,
    path: String,
}

fn fail(err: CatalogError, path: &str) -> Response {
    let status = status_for(&err);
    let body = ErrorBody {
        timestamp: Utc::now().to_rfc3339(),
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Unknown").to_string(),
        message: err.to_string(),
        path: path.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Request body for city creation and update.
#[derive(Debug, Deserialize)]
struct CityPayload {
    name: String,
    population: i64,
    #[serde(rename = "departmentCode")]
    department_code: String,
}

impl From<CityPayload> for CityDraft {
    fn from(payload: CityPayload) -> Self {
        Self {
            name: payload.name,
            population: payload.population,
            department_code: payload.department_code,
        }
    }
}

/// Request body for department creation and update.
#[derive(Debug, Deserialize)]
struct DepartmentPayload {
    code: String,
    name: String,
}

impl From<DepartmentPayload> for DepartmentDraft {
    fn from(payload: DepartmentPayload) -> Self {
        Self {
            code: payload.code,
            name: payload.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopQuery {
    #[serde(rename = "departmentCode")]
    department_code: String,
    n: i64,
}

#[derive(Debug, Deserialize)]
struct PopulationRangeQuery {
    #[serde(rename = "departmentCode")]
    department_code: String,
    min: i64,
    max: i64,
}

#[derive(Debug, Deserialize)]
struct MinPopulationQuery {
    #[serde(rename = "minPopulation")]
    min_population: i64,
}

async fn list_cities<S, D>(State(catalog): State<Arc<Catalog<S, D>>>, uri: Uri) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.list() {
        Ok(cities) => (StatusCode::OK, Json(cities)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn get_city<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.get(id) {
        Ok(city) => (StatusCode::OK, Json(city)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn get_city_by_name<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(name): Path<String>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.get_by_name(&name) {
        Ok(city) => (StatusCode::OK, Json(city)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn create_city<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    uri: Uri,
    Json(payload): Json<CityPayload>,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.create(&payload.into()) {
        Ok(city) => (StatusCode::CREATED, Json(city)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn update_city<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(id): Path<i64>,
    uri: Uri,
    Json(payload): Json<CityPayload>,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.update(id, &payload.into()) {
        Ok(city) => (StatusCode::OK, Json(city)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn delete_city<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.delete(id) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": format!("city {id} deleted") })),
        )
            .into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn top_cities<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Query(query): Query<TopQuery>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.top_by_department(&query.department_code, query.n) {
        Ok(cities) => (StatusCode::OK, Json(cities)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn cities_by_population<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Query(query): Query<PopulationRangeQuery>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog
        .cities
        .by_population_range(&query.department_code, query.min, query.max)
    {
        Ok(cities) => (StatusCode::OK, Json(cities)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn cities_with_min_population<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Query(query): Query<MinPopulationQuery>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.with_min_population(query.min_population) {
        Ok(cities) => (StatusCode::OK, Json(cities)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn cities_starting_with<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(prefix): Path<String>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.starting_with(&prefix) {
        Ok(cities) => (StatusCode::OK, Json(cities)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn export_cities_csv<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Query(query): Query<MinPopulationQuery>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.cities.export_csv(query.min_population) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"cities_population_min_{}.csv\"",
                        query.min_population
                    ),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn list_departments<S, D>(State(catalog): State<Arc<Catalog<S, D>>>, uri: Uri) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.departments.list() {
        Ok(departments) => (StatusCode::OK, Json(departments)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn get_department<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.departments.get(id) {
        Ok(department) => (StatusCode::OK, Json(department)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn get_department_by_code<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(code): Path<String>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.departments.get_by_code(&code) {
        Ok(department) => (StatusCode::OK, Json(department)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn create_department<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    uri: Uri,
    Json(payload): Json<DepartmentPayload>,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.departments.create(&payload.into()) {
        Ok(department) => (StatusCode::CREATED, Json(department)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn update_department<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(id): Path<i64>,
    uri: Uri,
    Json(payload): Json<DepartmentPayload>,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.departments.update(id, &payload.into()) {
        Ok(department) => (StatusCode::OK, Json(department)).into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn delete_department<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.departments.delete(id) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": format!("department {id} deleted") })),
        )
            .into_response(),
        Err(err) => fail(err, uri.path()),
    }
}

async fn export_department_pdf<S, D>(
    State(catalog): State<Arc<Catalog<S, D>>>,
    Path(code): Path<String>,
    uri: Uri,
) -> Response
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    match catalog.departments.export_pdf(&code) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"departement_{code}.pdf\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => fail(err, uri.path()),
    }
}
