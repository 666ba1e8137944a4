// src/handlers/spatial.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::heritage::HERITAGE_COLUMNS,
    models::heritage::{HeritageItem, NearbyHeritageItem, PointQuery, RegionQuery},
    utils::response::ApiResponse,
};

const POINT_QUERY_RADIUS: f64 = 0.05;
const POINT_QUERY_LIMIT: i64 = 10;
const BUFFER_QUERY_RADIUS: f64 = 0.1;

/// Items within `radius` degrees of a point, nearest first.
async fn nearby(
    pool: &PgPool,
    query: PointQuery,
    radius: f64,
    limit: Option<i64>,
) -> Result<Vec<NearbyHeritageItem>, AppError> {
    let sql = format!(
        r#"
        SELECT {}, ST_Distance(coordinates, ST_SetSRID(ST_MakePoint($1, $2), 4326)) AS distance
        FROM heritage_items
        WHERE ST_DWithin(coordinates, ST_SetSRID(ST_MakePoint($1, $2), 4326), $3)
        ORDER BY distance
        LIMIT $4
        "#,
        HERITAGE_COLUMNS
    );

    sqlx::query_as::<_, NearbyHeritageItem>(&sql)
        .bind(query.lng)
        .bind(query.lat)
        .bind(radius)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Spatial query failed: {:?}", e);
            AppError::from(e)
        })
}

/// Point query: the few items closest to where the user clicked.
pub async fn point_query(
    State(pool): State<PgPool>,
    payload: Result<Json<PointQuery>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(query) = payload?;
    query.validate()?;
    let radius = query.radius.unwrap_or(POINT_QUERY_RADIUS);

    let items = nearby(&pool, query, radius, Some(POINT_QUERY_LIMIT)).await?;
    let total = items.len();

    Ok(ApiResponse::new(items)
        .with("total", total)
        .with("queryPoint", json!({ "lng": query.lng, "lat": query.lat })))
}

/// Buffer query: every item inside a circle.
pub async fn buffer_query(
    State(pool): State<PgPool>,
    payload: Result<Json<PointQuery>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(query) = payload?;
    query.validate()?;
    let radius = query.radius.unwrap_or(BUFFER_QUERY_RADIUS);

    let items = nearby(&pool, query, radius, None).await?;
    let total = items.len();

    Ok(ApiResponse::new(items).with("total", total).with(
        "queryArea",
        json!({ "lng": query.lng, "lat": query.lat, "radius": radius }),
    ))
}

/// Items administratively inside a province and/or city.
pub async fn within_region(
    State(pool): State<PgPool>,
    payload: Result<Json<RegionQuery>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(region) = payload?;
    region.validate()?;

    let (province, city) = (region.province_filter(), region.city_filter());
    if province.is_none() && city.is_none() {
        return Err(AppError::BadRequest(
            "Either province or city is required".to_string(),
        ));
    }

    let mut query_builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM heritage_items WHERE 1=1",
        HERITAGE_COLUMNS
    ));
    if let Some(province) = province {
        query_builder.push(" AND province = ").push_bind(province.to_string());
    }
    if let Some(city) = city {
        query_builder.push(" AND city = ").push_bind(city.to_string());
    }
    query_builder.push(" ORDER BY id");

    let items: Vec<HeritageItem> = query_builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Region query failed: {:?}", e);
            AppError::from(e)
        })?;
    let total = items.len();

    Ok(ApiResponse::new(items)
        .with("total", total)
        .with("filter", json!({ "province": province, "city": city })))
}
