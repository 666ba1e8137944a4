// src/models/pdf.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

static PDF_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pdf$").expect("valid extension regex"));
static PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid parenthesis regex"));
static SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const DEFAULT_HOT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Metadata of one row in `pdf_files`; the bytes stay in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PdfFile {
    pub id: i64,
    pub file_name: String,
    pub file_size: i64,
    pub upload_time: DateTime<Utc>,
    #[sqlx(skip)]
    pub book_name: String,
}

impl PdfFile {
    pub fn with_book_name(mut self) -> Self {
        self.book_name = book_name_from_file_name(&self.file_name);
        self
    }
}

/// File name and contents for a download.
#[derive(Debug, FromRow)]
pub struct PdfContent {
    pub file_name: String,
    pub file_data: Vec<u8>,
}

/// Display title derived from a stored file name.
///
/// Drops the `.pdf` extension and every parenthesized note (such as the
/// source library tag), then collapses whitespace.
pub fn book_name_from_file_name(file_name: &str) -> String {
    let bare = PDF_EXT_RE.replace(file_name, "");
    let without_notes = PARENS_RE.replace_all(&bare, "");
    let name = SPACES_RE.replace_all(without_notes.trim(), " ").into_owned();

    if !name.is_empty() {
        return name;
    }
    let bare = bare.trim();
    if bare.is_empty() {
        "Unknown book".to_string()
    } else {
        bare.to_string()
    }
}

/// Query parameters for `GET /api/pdf/files`.
#[derive(Debug, Default, Deserialize)]
pub struct PdfListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PdfListParams {
    /// 1-based page; anything below 1 reads the first page.
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Query parameters for `GET /api/pdf/search`.
#[derive(Debug, Default, Deserialize)]
pub struct PdfSearchParams {
    /// Substring of the file name; blank matches every file.
    pub name: Option<String>,
    pub limit: Option<i64>,
}

impl PdfSearchParams {
    pub fn name(&self) -> &str {
        self.name.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_SEARCH_LIMIT)
    }
}

/// Query parameters for `GET /api/pdf/hot`.
#[derive(Debug, Default, Deserialize)]
pub struct PdfHotParams {
    pub limit: Option<i64>,
}

impl PdfHotParams {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_HOT_LIMIT)
    }
}

/// Zero or a missing value falls back to the default; the rest is capped.
fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    match limit {
        Some(n) if n > 0 => n.min(MAX_LIMIT),
        _ => default,
    }
}

/// `pagination` block of the file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}
