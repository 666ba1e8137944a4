// src/handlers/statistics.rs

use axum::{extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::heritage::{CatalogueOverview, CategoryCount, ProvinceCount},
    utils::response::ApiResponse,
};

/// Catalogue-wide counters.
pub async fn overview(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let overview = sqlx::query_as::<_, CatalogueOverview>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(DISTINCT category) AS categories_count,
            COUNT(DISTINCT province) AS provinces_count,
            COUNT(DISTINCT category) AS types_count
        FROM heritage_items
        "#,
    )
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::new(overview))
}

pub async fn by_category(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, CategoryCount>(
        r#"
        SELECT category, COUNT(*) AS count
        FROM heritage_items
        GROUP BY category
        ORDER BY count DESC, category
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let total: i64 = rows.iter().map(|r| r.count).sum();
    Ok(ApiResponse::new(rows).with("total", total))
}

/// Counts per province, alphabetical.
pub async fn by_region(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    province_counts(&pool, "ORDER BY province").await
}

/// Counts per province, largest first.
pub async fn by_province(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    province_counts(&pool, "ORDER BY count DESC, province").await
}

async fn province_counts(
    pool: &PgPool,
    order_by: &'static str,
) -> Result<ApiResponse<Vec<ProvinceCount>>, AppError> {
    let sql = format!(
        "SELECT province, COUNT(*) AS count FROM heritage_items GROUP BY province {}",
        order_by
    );
    let rows = sqlx::query_as::<_, ProvinceCount>(&sql)
        .fetch_all(pool)
        .await?;

    let total: i64 = rows.iter().map(|r| r.count).sum();
    Ok(ApiResponse::new(rows).with("total", total))
}
