//! Pagination metadata normalization.
//!
//! The same API family answers in two shapes:
//!
//! - participant style: `{"data": [...], "meta": {"pagination": {"total": 41, "per_page": 20}}}`
//! - vacancy style: `{"data": [...], "pagination": {"total_page": 3}}`
//!
//! [`PaginationMeta`] captures whichever shape a response used and
//! [`PaginationMeta::cursor`] turns it into one canonical [`PaginationCursor`].

use serde_json::Value;

use crate::error::{MagangError, Result};
use crate::json::as_u64;

/// Canonical pagination state learned from the first page of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    /// Page size the server paginates with.
    pub page_size: u32,
    /// Total number of records, when the response shape reports it.
    pub total_count: Option<u64>,
    /// Number of pages in the collection.
    pub total_pages: u64,
}

impl PaginationCursor {
    /// Cursor from a record total and page size (participant shape).
    pub fn from_totals(total_count: u64, page_size: u64) -> Result<Self> {
        if page_size == 0 {
            return Err(MagangError::MalformedResponse(
                "pagination per_page is zero".into(),
            ));
        }
        Ok(Self {
            page_size: clamp_u32(page_size),
            total_count: Some(total_count),
            total_pages: total_pages(total_count, page_size),
        })
    }

    /// Cursor from a page count reported directly (vacancy shape).
    pub fn from_page_count(total_pages: u64, page_size: u32, total_count: Option<u64>) -> Self {
        Self {
            page_size,
            total_count,
            total_pages,
        }
    }

    /// Last page to request, capped at `max_pages`.
    #[must_use]
    pub fn last_page(&self, max_pages: u32) -> u32 {
        clamp_u32(self.total_pages.min(u64::from(max_pages)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0 || self.total_count == Some(0)
    }
}

/// `ceil(total / per_page)`. `per_page` must be non-zero.
#[must_use]
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page)
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Pagination metadata exactly as a response reported it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaginationMeta {
    /// `meta.pagination.{total, per_page}`.
    Totals {
        total: Option<u64>,
        per_page: Option<u64>,
    },
    /// `pagination.{total_page, total?, limit?}`.
    PageCount {
        total_pages: Option<u64>,
        total: Option<u64>,
        per_page: Option<u64>,
    },
    /// Neither shape present.
    #[default]
    Absent,
}

impl PaginationMeta {
    /// Detect which pagination shape a response body uses.
    pub fn from_body(body: &Value) -> Self {
        if let Some(p) = body
            .get("meta")
            .and_then(|m| m.get("pagination"))
            .filter(|p| p.is_object())
        {
            return Self::Totals {
                total: p.get("total").and_then(as_u64),
                per_page: p.get("per_page").and_then(as_u64),
            };
        }

        if let Some(p) = body.get("pagination").filter(|p| p.is_object()) {
            return Self::PageCount {
                total_pages: p.get("total_page").and_then(as_u64),
                total: p
                    .get("total")
                    .or_else(|| p.get("total_data"))
                    .and_then(as_u64),
                per_page: p
                    .get("limit")
                    .or_else(|| p.get("per_page"))
                    .and_then(as_u64),
            };
        }

        Self::Absent
    }

    /// Normalize into a cursor.
    ///
    /// `requested_page_size` is only used when the vacancy shape does not echo
    /// the page size back.
    pub fn cursor(&self, requested_page_size: u32) -> Result<PaginationCursor> {
        match *self {
            Self::Totals { total, per_page } => {
                let total = total.ok_or_else(|| {
                    MagangError::MalformedResponse("meta.pagination.total missing".into())
                })?;
                let per_page = per_page.ok_or_else(|| {
                    MagangError::MalformedResponse("meta.pagination.per_page missing".into())
                })?;
                PaginationCursor::from_totals(total, per_page)
            }
            Self::PageCount {
                total_pages,
                total,
                per_page,
            } => {
                let total_pages = total_pages.ok_or_else(|| {
                    MagangError::MalformedResponse("pagination.total_page missing".into())
                })?;
                let page_size = per_page
                    .filter(|n| *n > 0)
                    .map(clamp_u32)
                    .unwrap_or(requested_page_size);
                if page_size == 0 {
                    return Err(MagangError::MalformedResponse(
                        "page size is zero".into(),
                    ));
                }
                Ok(PaginationCursor::from_page_count(total_pages, page_size, total))
            }
            Self::Absent => Err(MagangError::MalformedResponse(
                "response carries no pagination metadata".into(),
            )),
        }
    }
}
