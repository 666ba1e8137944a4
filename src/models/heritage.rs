// src/models/heritage.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::sql::contains_pattern;

/// Represents the 'heritage_items' table in the database.
/// Coordinates are stored as a PostGIS point and exposed as lng/lat.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HeritageItem {
    pub id: i64,

    pub name: String,

    /// e.g. "Traditional Opera", "Traditional Craft".
    pub category: Option<String>,

    pub location: Option<String>,

    pub description: Option<String>,

    pub province: Option<String>,

    pub city: Option<String>,

    pub lng: Option<f64>,

    pub lat: Option<f64>,

    pub created_at: Option<DateTime<Utc>>,
}

/// A heritage item annotated with its distance (in degrees) from a query point.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NearbyHeritageItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: HeritageItem,
    pub distance: f64,
}

/// DTO for `POST /api/heritage/search`. Every filter is optional.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    /// "all" disables the province filter.
    #[validate(length(max = 50))]
    pub province: Option<String>,
    #[validate(length(max = 50))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub keyword: Option<String>,
}

impl SearchRequest {
    pub fn province_filter(&self) -> Option<&str> {
        non_blank(self.province.as_deref()).filter(|p| !p.eq_ignore_ascii_case("all"))
    }

    pub fn city_filter(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }

    pub fn category_filter(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Substring pattern for the keyword, with LIKE wildcards escaped.
    pub fn keyword_pattern(&self) -> Option<String> {
        non_blank(self.keyword.as_deref()).map(contains_pattern)
    }
}

/// DTO for the point and buffer spatial queries.
/// `radius` is in degrees (SRID 4326).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct PointQuery {
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(exclusive_min = 0.0, max = 10.0))]
    pub radius: Option<f64>,
}

/// DTO for `POST /api/spatial/within-region`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegionQuery {
    #[validate(length(max = 50))]
    pub province: Option<String>,
    #[validate(length(max = 50))]
    pub city: Option<String>,
}

impl RegionQuery {
    pub fn province_filter(&self) -> Option<&str> {
        non_blank(self.province.as_deref())
    }

    pub fn city_filter(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }
}

/// Whole-catalogue counters for `GET /api/statistics`.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueOverview {
    pub total: i64,
    pub categories_count: i64,
    pub provinces_count: i64,
    pub types_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CategoryCount {
    pub category: Option<String>,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProvinceCount {
    pub province: Option<String>,
    pub count: i64,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
