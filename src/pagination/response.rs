use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::links::PageLinks;
use super::window::PageWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetaResponse {
    pub current_page: u64,
    pub per_page: u64,
    /// `null` when the filtered set is empty.
    pub from: Option<u64>,
    /// `null` when the filtered set is empty.
    pub to: Option<u64>,
    pub total: u64,
    pub last_page: u64,
}

impl From<&PageWindow> for MetaResponse {
    fn from(window: &PageWindow) -> Self {
        let has_rows = window.total > 0;
        Self {
            current_page: window.number,
            per_page: window.size,
            from: has_rows.then_some(window.from),
            to: has_rows.then_some(window.to),
            total: window.total,
            last_page: window.last_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationLinks {
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationResponse {
    pub meta: MetaResponse,
    pub links: PaginationLinks,
}

impl PaginationResponse {
    #[must_use]
    pub fn new(window: &PageWindow, links: &PageLinks) -> Self {
        Self {
            meta: MetaResponse::from(window),
            links: links.links(window),
        }
    }
}

/// Outer JSON envelope for a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: PaginationResponse,
    #[serde(skip)]
    content_range: Option<HeaderValue>,
}

impl<T> PaginatedResponse<T> {
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Vec<T>, pagination: PaginationResponse) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: message.into(),
            data,
            pagination,
            content_range: None,
        }
    }

    /// Also send a `Content-Range` header describing the returned slice.
    #[must_use]
    pub fn with_content_range(mut self, resource: &str, window: &PageWindow) -> Self {
        self.content_range = content_range(resource, window);
        self
    }
}

impl<T: Serialize> IntoResponse for PaginatedResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        let mut headers = HeaderMap::new();
        if let Some(value) = &self.content_range {
            headers.insert(axum::http::header::CONTENT_RANGE, value.clone());
        }
        (status, headers, Json(self)).into_response()
    }
}

/// `"{resource} {start}-{end}/{total}"` with 0-based inclusive bounds,
/// or `"{resource} */{total}"` when the page holds no rows.
#[must_use]
pub fn content_range(resource: &str, window: &PageWindow) -> Option<HeaderValue> {
    let safe_name: String = resource
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect();
    let value = if window.is_empty() {
        format!("{safe_name} */{}", window.total)
    } else {
        format!(
            "{safe_name} {}-{}/{}",
            window.from - 1,
            window.to - 1,
            window.total
        )
    };
    HeaderValue::from_str(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> PageLinks {
        PageLinks::new("http", "localhost", "/items", None, "page[size]", "page[number]").unwrap()
    }

    #[test]
    fn test_meta_for_full_single_page() {
        let window = PageWindow::new(5, 1, 5);
        let pagination = PaginationResponse::new(&window, &links());
        assert_eq!(
            pagination.meta,
            MetaResponse {
                current_page: 1,
                per_page: 5,
                from: Some(1),
                to: Some(5),
                total: 5,
                last_page: 1,
            }
        );
        assert!(pagination.links.next.is_none());
        assert!(pagination.links.prev.is_none());
    }

    #[test]
    fn test_meta_for_empty_set_has_null_bounds() {
        let window = PageWindow::new(10, 1, 0);
        let meta = MetaResponse::from(&window);
        assert_eq!(meta.from, None);
        assert_eq!(meta.to, None);
        assert_eq!(meta.last_page, 1);
    }

    #[test]
    fn test_envelope_json_shape() {
        let window = PageWindow::new(10, 1, 0);
        let response: PaginatedResponse<serde_json::Value> =
            PaginatedResponse::ok("items retrieved successfully", vec![], PaginationResponse::new(&window, &links()));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["message"], "items retrieved successfully");
        assert!(json["data"].as_array().unwrap().is_empty());
        assert!(json["pagination"]["meta"]["from"].is_null());
        assert!(json["pagination"]["links"]["next"].is_null());
        assert!(json.get("content_range").is_none());
    }

    #[test]
    fn test_content_range_header() {
        let window = PageWindow::new(10, 2, 25);
        assert_eq!(
            content_range("athletes", &window).unwrap(),
            HeaderValue::from_static("athletes 10-19/25")
        );

        let past_end = PageWindow::new(10, 9, 25);
        assert_eq!(
            content_range("athletes", &past_end).unwrap(),
            HeaderValue::from_static("athletes */25")
        );
    }

    #[test]
    fn test_content_range_strips_control_chars() {
        let window = PageWindow::new(10, 1, 3);
        let value = content_range("bad\nname", &window).unwrap();
        assert_eq!(value, HeaderValue::from_static("badname 0-2/3"));
    }
}
