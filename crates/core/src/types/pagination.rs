//! Page/limit pagination.
//!
//! Pages are 1-indexed. Anything below 1, or anything that does not parse as a
//! number, falls back to the defaults instead of failing the request.

use serde::Serialize;

/// Parsed and clamped pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    /// Page used when none (or an invalid one) is given.
    pub const DEFAULT_PAGE: i64 = 1;
    /// Page size used when none (or an invalid one) is given.
    pub const DEFAULT_LIMIT: i64 = 10;
    /// Largest page size a client may request.
    pub const MAX_LIMIT: i64 = 100;

    /// Build from raw numbers, clamping out-of-range values.
    #[must_use]
    pub const fn new(page: i64, limit: i64) -> Self {
        let page = if page < 1 { Self::DEFAULT_PAGE } else { page };
        let limit = if limit < 1 {
            Self::DEFAULT_LIMIT
        } else if limit > Self::MAX_LIMIT {
            Self::MAX_LIMIT
        } else {
            limit
        };
        Self { page, limit }
    }

    /// Build from optional query-string values.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |value: Option<&str>| value.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(parse(page).unwrap_or(0), parse(limit).unwrap_or(0))
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip for SQL `OFFSET`.
    ///
    /// Saturates at `i64::MAX` for absurd page numbers, which yields an empty
    /// page rather than an overflow.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Metadata for a result set of `total` rows.
    #[must_use]
    pub const fn meta(&self, total: i64) -> PageMeta {
        let total = if total < 0 { 0 } else { total };
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: (total + self.limit - 1) / self.limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_below_one_fall_back_to_defaults() {
        let p = Pagination::new(0, -5);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(-3, 0);
        assert_eq!((p.page(), p.limit()), (1, 10));
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(Pagination::new(1, 10_000).limit(), Pagination::MAX_LIMIT);
    }

    #[test]
    fn test_from_query_tolerates_garbage() {
        let p = Pagination::from_query(Some("abc"), Some("2.5"));
        assert_eq!(p, Pagination::default());

        let p = Pagination::from_query(Some("3"), Some(" 25 "));
        assert_eq!((p.page(), p.limit()), (3, 25));

        assert_eq!(Pagination::from_query(None, None), Pagination::default());
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(4, 20).offset(), 60);
    }

    #[test]
    fn test_offset_saturates_for_huge_page() {
        let p = Pagination::from_query(Some("9223372036854775807"), Some("10"));
        assert_eq!(p.page(), i64::MAX);
        assert_eq!(p.offset(), i64::MAX);

        let p = Pagination::new(i64::MAX, Pagination::MAX_LIMIT);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn test_meta_total_pages_rounds_up() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.meta(0).total_pages, 0);
        assert_eq!(p.meta(10).total_pages, 1);
        assert_eq!(p.meta(11).total_pages, 2);
        assert_eq!(p.meta(95).total, 95);
    }
}
