use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Success envelope: `{"success": true, "data": ...}` plus optional
/// top-level extras such as `total` or echoed query parameters.
#[derive(Debug)]
pub struct ApiResponse<T> {
    data: T,
    extra: Map<String, Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        self.extra
            .insert(key.to_string(), serde_json::to_value(value).unwrap_or(Value::Null));
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": true,
            "data": self.data,
        });
        if let Value::Object(map) = &mut body {
            map.extend(self.extra);
        }
        Json(body).into_response()
    }
}
