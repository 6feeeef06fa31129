//! Pagination arguments and the `Pagination` meta object.

use engine_types::FieldError;
use serde::{Deserialize, Serialize};

/// Limits applied to every list query.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    pub default_limit: u64,
    /// `None` places no upper bound, and allows `limit: -1`.
    pub max_limit: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            default_limit: 10,
            max_limit: None,
        }
    }
}

/// The `PaginationArg` input as sent by the client.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaginationArg {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub start: Option<i64>,
    pub limit: Option<i64>,
}

/// Offset pagination handed to the data layer. A `None` limit returns
/// every record from `start` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u64,
    pub limit: Option<u64>,
}

fn at_least_one(value: i64, name: &str) -> Result<u64, FieldError> {
    u64::try_from(value)
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| FieldError::validation(format!("{name} must be greater than 0")))
}

impl PaginationConfig {
    fn clamp(&self, limit: Option<u64>) -> Option<u64> {
        match (limit, self.max_limit) {
            (None, max_limit) => max_limit,
            (Some(limit), Some(max_limit)) => Some(limit.min(max_limit)),
            (Some(limit), None) => Some(limit),
        }
    }

    /// Turns page or offset arguments into a window. Mixing both styles is a
    /// pagination error; out of range values are validation errors.
    pub fn window(&self, arg: &PaginationArg) -> Result<Window, FieldError> {
        let page_based = arg.page.is_some() || arg.page_size.is_some();
        let offset_based = arg.start.is_some() || arg.limit.is_some();
        if page_based && offset_based {
            return Err(FieldError::pagination(
                "Cannot use both page & offset pagination in the same query",
            ));
        }

        if page_based {
            let page = at_least_one(arg.page.unwrap_or(1), "page")?;
            let page_size = match arg.page_size {
                Some(page_size) => at_least_one(page_size, "pageSize")?,
                None => self.default_limit,
            };
            let page_size = self.clamp(Some(page_size)).unwrap_or(page_size);
            return Ok(Window {
                start: (page - 1).saturating_mul(page_size),
                limit: Some(page_size),
            });
        }

        let start = match arg.start {
            Some(start) => u64::try_from(start)
                .map_err(|_| FieldError::validation("start must be greater than or equal to 0"))?,
            None => 0,
        };
        let limit = match arg.limit {
            None => Some(self.default_limit),
            Some(-1) => None,
            Some(limit) => Some(at_least_one(limit, "limit")?),
        };
        Ok(Window {
            start,
            limit: self.clamp(limit),
        })
    }
}

/// `Pagination { total, page, pageSize, pageCount }`
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
}

impl PaginationMeta {
    pub fn new(window: Window, total: u64) -> Self {
        let page_size = window
            .limit
            .unwrap_or_else(|| total.saturating_sub(window.start));
        if page_size == 0 {
            return PaginationMeta {
                total,
                page: 1,
                page_size,
                page_count: 0,
            };
        }
        PaginationMeta {
            total,
            page: window.start / page_size + 1,
            page_size,
            page_count: total.div_ceil(page_size),
        }
    }
}
