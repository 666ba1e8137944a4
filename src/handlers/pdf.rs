// src/handlers/pdf.rs

use axum::{
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::pdf::{
        Pagination, PdfContent, PdfFile, PdfHotParams, PdfListParams, PdfSearchParams,
    },
    utils::{
        response::ApiResponse,
        sql::{LIKE_ESCAPE, contains_pattern},
    },
};

/// Metadata columns; the size is computed so the bytes are never loaded.
const PDF_COLUMNS: &str = "id, file_name, OCTET_LENGTH(file_data)::BIGINT AS file_size, upload_time";

/// Pages through the library ordered by id.
pub async fn list_files(
    State(pool): State<PgPool>,
    params: Result<Query<PdfListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let (page, limit) = (params.page(), params.limit());

    let sql = format!("SELECT {} FROM pdf_files ORDER BY id LIMIT $1 OFFSET $2", PDF_COLUMNS);
    let (files, total) = tokio::try_join!(
        sqlx::query_as::<_, PdfFile>(&sql)
            .bind(limit)
            .bind(params.offset())
            .fetch_all(&pool),
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pdf_files").fetch_one(&pool),
    )
    .map_err(|e| {
        tracing::error!("Failed to list PDF files: {:?}", e);
        AppError::from(e)
    })?;

    let files: Vec<PdfFile> = files.into_iter().map(PdfFile::with_book_name).collect();
    Ok(ApiResponse::new(files).with("pagination", Pagination::new(page, limit, total)))
}

/// Sends the stored bytes as an attachment.
pub async fn download(
    State(pool): State<PgPool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;

    let file = sqlx::query_as::<_, PdfContent>("SELECT file_name, file_data FROM pdf_files WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound(format!("PDF file {} not found", id)))?;

    tracing::info!("Serving PDF {} ({}, {} bytes)", id, file.file_name, file.file_data.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file.file_name)),
            (header::CONTENT_LENGTH, file.file_data.len().to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        file.file_data,
    )
        .into_response())
}

/// Metadata of one file.
pub async fn info(
    State(pool): State<PgPool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let sql = format!("SELECT {} FROM pdf_files WHERE id = $1", PDF_COLUMNS);

    let file = sqlx::query_as::<_, PdfFile>(&sql)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound(format!("PDF file {} not found", id)))?;

    Ok(ApiResponse::new(file.with_book_name()))
}

/// Case-insensitive substring match on the file name, alphabetical.
pub async fn search(
    State(pool): State<PgPool>,
    params: Result<Query<PdfSearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;

    let files = sqlx::query_as::<_, PdfFile>(&search_sql())
        .bind(contains_pattern(params.name()))
        .bind(params.limit())
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("PDF search failed: {:?}", e);
            AppError::from(e)
        })?;

    let files: Vec<PdfFile> = files.into_iter().map(PdfFile::with_book_name).collect();
    let count = files.len();
    Ok(ApiResponse::new(files).with("count", count))
}

fn search_sql() -> String {
    format!(
        "SELECT {} FROM pdf_files WHERE file_name ILIKE $1{} ORDER BY file_name LIMIT $2",
        PDF_COLUMNS, LIKE_ESCAPE
    )
}

/// Most recently uploaded files first.
pub async fn hot(
    State(pool): State<PgPool>,
    params: Result<Query<PdfHotParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let sql = format!(
        "SELECT {} FROM pdf_files ORDER BY upload_time DESC, id DESC LIMIT $1",
        PDF_COLUMNS
    );

    let files = sqlx::query_as::<_, PdfFile>(&sql)
        .bind(params.limit())
        .fetch_all(&pool)
        .await?;

    let files: Vec<PdfFile> = files.into_iter().map(PdfFile::with_book_name).collect();
    Ok(ApiResponse::new(files))
}

/// Library reachability and size.
pub async fn health(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pdf_files")
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::warn!("PDF library health check failed: {:?}", e);
            AppError::from(e)
        })?;

    Ok(ApiResponse::new(json!({ "status": "healthy", "pdfCount": count })))
}

/// `attachment` disposition with an ASCII fallback name and the exact
/// UTF-8 name in `filename*` (RFC 6266).
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        percent_encode(file_name)
    )
}

/// RFC 5987 `attr-char` encoding.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
