//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::ScanLogPage;

/// Pagination query parameters for scan log listings.
///
/// Uses `serde_with` to parse numbers from query strings. Range checks
/// (`>= 1`, cap of 100 per page) happen in the scan service so the cap is
/// applied no matter how the listing is reached.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub per_page: Option<i64>,
}

/// Pagination metadata echoed back with every page.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<&ScanLogPage> for PaginationMeta {
    fn from(page: &ScanLogPage) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            pages: page.pages(),
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_absent() {
        let p: PageParams = serde_json::from_str("{}").unwrap();
        assert!(p.page.is_none());
        assert!(p.per_page.is_none());
    }

    #[test]
    fn test_parses_string_numbers() {
        let p: PageParams = serde_json::from_str(r#"{"page": "2", "per_page": "1000"}"#).unwrap();
        assert_eq!(p.page, Some(2));
        assert_eq!(p.per_page, Some(1000));
    }

    #[test]
    fn test_negative_is_parsed() {
        let p: PageParams = serde_json::from_str(r#"{"page": "-1"}"#).unwrap();
        assert_eq!(p.page, Some(-1));
    }

    #[test]
    fn test_non_numeric_is_error() {
        assert!(serde_json::from_str::<PageParams>(r#"{"page": "abc"}"#).is_err());
    }
}
