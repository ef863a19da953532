//! Page/limit normalization for list endpoints
//!
//! Resolution never fails. Absent, zero or non-numeric values fall back to
//! the defaults; anything else is clamped into range.

use serde::Serialize;

/// Page size used when a request gives none
pub const DEFAULT_LIMIT: u32 = 10;

/// Hard ceiling on the page size regardless of the request
pub const MAX_LIMIT: u32 = 50;

/// Page size bounds applied when resolving a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    default_limit: u32,
    max_limit: u32,
}

impl PageBounds {
    /// Create bounds, clamped so `1 <= default_limit <= max_limit`
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }
}

impl Default for PageBounds {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, MAX_LIMIT)
    }
}

/// A resolved page request
///
/// Invariant: `page >= 1` and `1 <= limit <= bounds.max_limit()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Resolve raw `page` / `limit` strings with the default bounds
    pub fn resolve(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::resolve_within(page, limit, PageBounds::default())
    }

    /// Resolve raw `page` / `limit` strings within `bounds`
    pub fn resolve_within(page: Option<&str>, limit: Option<&str>, bounds: PageBounds) -> Self {
        let page = match page.and_then(parse_leading_int) {
            Some(n) if n != 0 => n.clamp(1, i64::from(u32::MAX)) as u32,
            _ => 1,
        };

        let limit = match limit.and_then(parse_leading_int) {
            Some(n) if n != 0 => n.clamp(1, i64::from(bounds.max_limit)) as u32,
            _ => bounds.default_limit,
        };

        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip: `(page - 1) * limit`
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Number of records to return
    pub fn take(&self) -> u64 {
        u64::from(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

/// Parse the leading integer of `raw` the way browsers parse query numbers
///
/// Leading whitespace and one sign are accepted, then digits up to the first
/// non-digit. `"12abc"` is 12, `"abc"` is `None`. Overflow saturates.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        let page = PageRequest::resolve(None, None);
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.skip(), 0);
        assert_eq!(page.take(), 10);
    }

    #[test]
    fn test_zero_page_and_oversized_limit() {
        let page = PageRequest::resolve(Some("0"), Some("1000"));
        assert_eq!((page.page(), page.limit()), (1, 50));
    }

    #[test]
    fn test_non_numeric_falls_back() {
        let page = PageRequest::resolve(Some("abc"), Some("ten"));
        assert_eq!((page.page(), page.limit()), (1, 10));
    }

    #[test]
    fn test_negative_values_clamp_to_one() {
        let page = PageRequest::resolve(Some("-4"), Some("-20"));
        assert_eq!((page.page(), page.limit()), (1, 1));
    }

    #[test]
    fn test_leading_digits_are_used() {
        let page = PageRequest::resolve(Some("3rd"), Some(" 25 per page"));
        assert_eq!((page.page(), page.limit()), (3, 25));
        assert_eq!(page.skip(), 50);
    }

    #[test]
    fn test_huge_page_saturates() {
        let page = PageRequest::resolve(Some("999999999999999999999999"), Some("50"));
        assert_eq!(page.page(), u32::MAX);
        assert_eq!(page.skip(), u64::from(u32::MAX - 1) * 50);
    }

    #[test]
    fn test_limit_always_in_range() {
        for raw in ["-100", "-1", "0", "1", "7", "49", "50", "51", "1e9", "x", ""] {
            let limit = PageRequest::resolve(None, Some(raw)).limit();
            assert!((1..=MAX_LIMIT).contains(&limit), "limit {limit} for {raw:?}");
        }
    }

    #[test]
    fn test_custom_bounds() {
        let bounds = PageBounds::new(5, 20);
        let page = PageRequest::resolve_within(None, Some("30"), bounds);
        assert_eq!(page.limit(), 20);
        let page = PageRequest::resolve_within(None, None, bounds);
        assert_eq!(page.limit(), 5);
    }

    #[test]
    fn test_total_pages() {
        let page = PageRequest::resolve(None, Some("10"));
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
    }
}
