// src/handlers/heritage.rs

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::AppError,
    models::heritage::{HeritageItem, SearchRequest},
    utils::{response::ApiResponse, sql::LIKE_ESCAPE},
};

/// Columns selected for every heritage item; the point is split into lng/lat.
pub(crate) const HERITAGE_COLUMNS: &str = "id, name, category, location, description, province, city, \
     ST_X(coordinates) AS lng, ST_Y(coordinates) AS lat, created_at";

/// Lists every heritage item ordered by id.
pub async fn list_heritage(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let sql = format!("SELECT {} FROM heritage_items ORDER BY id", HERITAGE_COLUMNS);
    let items = sqlx::query_as::<_, HeritageItem>(&sql)
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch heritage items: {:?}", e);
            AppError::from(e)
        })?;

    let total = items.len();
    Ok(ApiResponse::new(items).with("total", total))
}

/// Retrieves a single heritage item by ID.
pub async fn get_heritage(
    State(pool): State<PgPool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let sql = format!("SELECT {} FROM heritage_items WHERE id = $1", HERITAGE_COLUMNS);

    let item = sqlx::query_as::<_, HeritageItem>(&sql)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound(format!("Heritage item {} not found", id)))?;

    Ok(ApiResponse::new(item))
}

/// Searches by province, city, category and keyword; all filters optional.
pub async fn search_heritage(
    State(pool): State<PgPool>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let mut query_builder = build_search_query(&req);
    let items: Vec<HeritageItem> = query_builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Heritage search failed: {:?}", e);
            AppError::from(e)
        })?;

    let total = items.len();
    Ok(ApiResponse::new(items).with("total", total))
}

fn build_search_query(req: &SearchRequest) -> QueryBuilder<'static, Postgres> {
    let mut query_builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM heritage_items WHERE 1=1",
        HERITAGE_COLUMNS
    ));

    if let Some(province) = req.province_filter() {
        query_builder.push(" AND province = ").push_bind(province.to_string());
    }
    if let Some(city) = req.city_filter() {
        query_builder.push(" AND city = ").push_bind(city.to_string());
    }
    if let Some(category) = req.category_filter() {
        query_builder.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(pattern) = req.keyword_pattern() {
        query_builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }

    query_builder.push(" ORDER BY id");
    query_builder
}
